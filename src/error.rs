//! Error taxonomy shared by the drivers and the CLI.
//!
//! Every failure the library can surface is one of the [`Status`] variants;
//! the CLI prints the `Display` form to stderr and exits non-zero. Lower
//! layers use small dedicated error types (`DecompressError`, the encoder's
//! incompressibility sentinel) that the drivers map into `Status`.

use std::fmt;
use std::io;

/// High-level failure classification for compression and decompression runs.
#[derive(Debug)]
pub enum Status {
    /// The input could not be read.
    Source(io::Error),
    /// The output could not be written. In verify mode this carries the
    /// offset of the first byte that differed from the reference file.
    Destination(io::Error),
    /// The dictionary file could not be read.
    Dictionary(io::Error),
    /// An allocation request could not be satisfied.
    Memory,
    /// Invariant violation inside the parser or encoder. Indicates a bug,
    /// not bad input.
    Compression,
    /// Raw-block mode input exceeds the 64 KiB single-block limit.
    RawTooLarge,
    /// Raw-block mode cannot represent incompressible data.
    RawUncompressed,
    /// Frame magic or descriptor is invalid.
    Format,
    /// Header checksum byte does not match the descriptor.
    Checksum,
    /// Malformed block: bad offset, truncated run, or oversized output.
    Decompression,
    /// Verify mode found decoded output diverging from the source, starting
    /// at this byte offset.
    VerifyMismatch(u64),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Source(e) => write!(f, "error reading input: {}", e),
            Status::Destination(e) => write!(f, "error writing output: {}", e),
            Status::Dictionary(e) => write!(f, "error reading dictionary: {}", e),
            Status::Memory => write!(f, "out of memory"),
            Status::Compression => write!(f, "internal compression error"),
            Status::RawTooLarge => {
                write!(f, "raw blocks can only be used with files <= 64 Kb")
            }
            Status::RawUncompressed => {
                write!(f, "data is incompressible, raw blocks only support compressed data")
            }
            Status::Format => {
                write!(f, "invalid magic number, version, flags or block size")
            }
            Status::Checksum => write!(f, "invalid header checksum"),
            Status::Decompression => write!(f, "decompression error"),
            Status::VerifyMismatch(offset) => {
                write!(f, "decoded data differs from the original starting at byte {}", offset)
            }
        }
    }
}

impl std::error::Error for Status {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Status::Source(e) | Status::Destination(e) | Status::Dictionary(e) => Some(e),
            _ => None,
        }
    }
}
