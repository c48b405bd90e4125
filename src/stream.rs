//! Output-stream adapters for the drivers.
//!
//! [`ComparingWriter`] is the verification sink: it implements
//! `std::io::Write` but, instead of storing bytes, reads the same number of
//! bytes from a reference stream and compares. The first divergence is
//! remembered and surfaced as a write error, which aborts the decompression
//! driver exactly like a real destination failure would.

use std::io::{self, Read, Write};

/// A sink that checks written bytes against a reference stream.
pub struct ComparingWriter<R: Read> {
    reference: R,
    scratch: Vec<u8>,
    /// Bytes successfully matched so far; the offset of the next write.
    offset: u64,
    mismatch: Option<u64>,
}

impl<R: Read> ComparingWriter<R> {
    pub fn new(reference: R) -> Self {
        ComparingWriter {
            reference,
            scratch: vec![0u8; 64 * 1024],
            offset: 0,
            mismatch: None,
        }
    }

    /// Offset of the first byte that differed, once a comparison has failed.
    pub fn mismatch_offset(&self) -> Option<u64> {
        self.mismatch
    }

    /// Total bytes matched so far.
    pub fn bytes_compared(&self) -> u64 {
        self.offset
    }

    /// Declares the written stream complete: the reference must be at EOF
    /// too, otherwise the decoded data was shorter than the original.
    pub fn finish(&mut self) -> Result<(), u64> {
        if let Some(off) = self.mismatch {
            return Err(off);
        }
        let mut probe = [0u8; 1];
        match self.reference.read(&mut probe) {
            Ok(0) => Ok(()),
            Ok(_) => {
                self.mismatch = Some(self.offset);
                Err(self.offset)
            }
            // A reference read failure at this point also means we cannot
            // attest equality.
            Err(_) => {
                self.mismatch = Some(self.offset);
                Err(self.offset)
            }
        }
    }

    fn mismatch_error(&mut self, offset: u64) -> io::Error {
        self.mismatch = Some(offset);
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("decoded data differs from the original at byte {}", offset),
        )
    }
}

impl<R: Read> Write for ComparingWriter<R> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut pos = 0usize;
        while pos < buf.len() {
            let want = (buf.len() - pos).min(self.scratch.len());
            let got = self.reference.read(&mut self.scratch[..want])?;
            if got == 0 {
                // Decoded output is longer than the reference.
                return Err(self.mismatch_error(self.offset));
            }
            let expected = &self.scratch[..got];
            let actual = &buf[pos..pos + got];
            if let Some(i) = expected.iter().zip(actual).position(|(a, b)| a != b) {
                return Err(self.mismatch_error(self.offset + i as u64));
            }
            pos += got;
            self.offset += got as u64;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
