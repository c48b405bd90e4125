//! Stream and file drivers: the read-input / write-output loops that carry
//! blocks through the frame layer, plus dictionary loading and the
//! verify-by-redecompress path.

pub mod compress;
pub mod decompress;
pub mod dictionary;
pub mod verify;

pub use compress::{compress_file, compress_stream};
pub use decompress::{decompress_file, decompress_stream};
pub use dictionary::load_dictionary;
pub use verify::verify_file;

use std::io::Read;

use crate::format::{MAX_BLOCK_MAX_CODE, MIN_BLOCK_MAX_CODE};

/// Driver configuration shared by the compress and decompress paths.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// Emit (or expect) a single frameless block with a 2-byte end marker.
    pub raw_block: bool,
    /// Compress each block without referencing the previous block's tail.
    pub independent_blocks: bool,
    /// Requested block-max code, 4..=7 for 64 KiB..4 MiB.
    pub block_max_code: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            raw_block: false,
            independent_blocks: false,
            block_max_code: MAX_BLOCK_MAX_CODE,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> bool {
        (MIN_BLOCK_MAX_CODE..=MAX_BLOCK_MAX_CODE).contains(&self.block_max_code)
    }
}

/// Byte counts and token totals reported back to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamStats {
    pub original_size: u64,
    pub compressed_size: u64,
    pub command_count: usize,
}

/// Called once compression is about to start, with the final block-max code
/// and the block-independence flag.
pub type StartFn<'a> = &'a mut dyn FnMut(u8, bool);

/// Called after each block with the running (original, compressed) totals.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u64, u64);

/// Reads until `buf` is full or the source reaches EOF; returns bytes read.
pub(crate) fn read_fill(src: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        let n = src.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
