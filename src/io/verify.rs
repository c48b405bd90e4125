//! Verify-by-redecompress: decode the just-written compressed file against
//! the original source through a comparing sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Status;
use crate::io::{decompress_stream, load_dictionary, Settings, StreamStats};
use crate::stream::ComparingWriter;

/// Re-decodes `compressed_path` and compares every byte against
/// `original_path`. A divergence, extra output, or missing output is a
/// [`Status::VerifyMismatch`] carrying the first differing byte offset.
pub fn verify_file(
    compressed_path: &Path,
    original_path: &Path,
    dictionary_path: Option<&Path>,
    settings: &Settings,
) -> Result<StreamStats, Status> {
    let mut src = BufReader::new(File::open(compressed_path).map_err(Status::Source)?);
    let reference = BufReader::new(File::open(original_path).map_err(Status::Destination)?);

    let dictionary = match dictionary_path {
        Some(path) => Some(load_dictionary(path).map_err(Status::Dictionary)?),
        None => None,
    };

    let mut sink = ComparingWriter::new(reference);
    let result = decompress_stream(&mut src, &mut sink, dictionary.as_deref(), settings);

    match result {
        Ok(stats) => match sink.finish() {
            Ok(()) => Ok(stats),
            Err(offset) => Err(Status::VerifyMismatch(offset)),
        },
        Err(Status::Destination(e)) => match sink.mismatch_offset() {
            Some(offset) => Err(Status::VerifyMismatch(offset)),
            None => Err(Status::Destination(e)),
        },
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::compress::compress_file;
    use std::io::Write;

    fn write_temp(data: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(data).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn verify_accepts_faithful_output() {
        let data: Vec<u8> = b"verify this stream please. "
            .iter()
            .cycle()
            .take(10_000)
            .copied()
            .collect();
        let original = write_temp(&data);
        let compressed = tempfile::NamedTempFile::new().unwrap();

        let settings = Settings::default();
        compress_file(
            original.path(),
            compressed.path(),
            None,
            &settings,
            None,
            None,
        )
        .unwrap();

        let stats = verify_file(compressed.path(), original.path(), None, &settings).unwrap();
        assert_eq!(stats.original_size as usize, data.len());
    }

    #[test]
    fn verify_flags_corrupted_payload() {
        let data: Vec<u8> = b"corruption target corruption target "
            .iter()
            .cycle()
            .take(5_000)
            .copied()
            .collect();
        let original = write_temp(&data);
        let compressed = tempfile::NamedTempFile::new().unwrap();

        let settings = Settings::default();
        compress_file(
            original.path(),
            compressed.path(),
            None,
            &settings,
            None,
            None,
        )
        .unwrap();

        // Corrupt one literal byte inside the block payload.
        let mut bytes = std::fs::read(compressed.path()).unwrap();
        let i = 7 + 4 + 2; // header, block header, token + first literal
        bytes[i] ^= 0x01;
        std::fs::write(compressed.path(), &bytes).unwrap();

        let err = verify_file(compressed.path(), original.path(), None, &settings).unwrap_err();
        assert!(
            matches!(err, Status::VerifyMismatch(_) | Status::Decompression),
            "corruption must fail verification, got: {err}"
        );
    }

    #[test]
    fn verify_flags_wrong_original() {
        let data = vec![b'v'; 4096];
        let original = write_temp(&data);
        let compressed = tempfile::NamedTempFile::new().unwrap();

        let settings = Settings::default();
        compress_file(
            original.path(),
            compressed.path(),
            None,
            &settings,
            None,
            None,
        )
        .unwrap();

        let mut other = data.clone();
        other[100] = b'w';
        let tampered = write_temp(&other);

        let err = verify_file(compressed.path(), tampered.path(), None, &settings).unwrap_err();
        match err {
            Status::VerifyMismatch(offset) => assert_eq!(offset, 100),
            other => panic!("expected a mismatch at byte 100, got: {other}"),
        }
    }
}
