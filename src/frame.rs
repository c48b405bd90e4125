//! Frame container: stream header, per-block headers, and the end marker.
//!
//! The emitted descriptor is fixed apart from two degrees of freedom: the
//! block-independence flag and the block-max code. The header checksum byte
//! is always computed (second-lowest byte of the XXH32 of the two descriptor
//! bytes, seed 0), and the decoder accepts any block-max code in 4..=7,
//! sizing its window from the decoded value.

use crate::format::{
    BLOCK_UNCOMPRESSED_BIT, FLG_INDEP_BLOCKS, FLG_VERSION, FRAME_HEADER_SIZE, FRAME_MAGIC,
    MAX_BLOCK_MAX_CODE, MIN_BLOCK_MAX_CODE,
};
use crate::xxhash::xxh32_oneshot;

/// Descriptor fields recovered from a stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub block_max_code: u8,
    pub independent_blocks: bool,
}

/// Stream-header validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecodeError {
    /// Magic, version, feature bits, or block-max code are not the ones this
    /// format emits.
    Format,
    /// Descriptor bytes do not hash to the stored checksum byte.
    Checksum,
}

/// Size and storage mode of one block, from its 4-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Payload size in bytes; zero terminates the frame.
    pub size: u32,
    /// Payload is stored as verbatim literals, not block-encoded.
    pub uncompressed: bool,
}

/// Checksum byte over the two descriptor bytes of the stream header.
#[inline]
pub fn header_checksum_byte(descriptor: &[u8]) -> u8 {
    ((xxh32_oneshot(descriptor, 0) >> 8) & 0xFF) as u8
}

/// Writes the 7-byte stream header into `out` and returns its size.
pub fn encode_frame_header(out: &mut [u8], block_max_code: u8, independent_blocks: bool) -> usize {
    debug_assert!((MIN_BLOCK_MAX_CODE..=MAX_BLOCK_MAX_CODE).contains(&block_max_code));

    out[..4].copy_from_slice(&FRAME_MAGIC);
    let mut flg = FLG_VERSION;
    if independent_blocks {
        flg |= FLG_INDEP_BLOCKS;
    }
    out[4] = flg;
    out[5] = block_max_code << 4;
    out[6] = header_checksum_byte(&out[4..6]);

    FRAME_HEADER_SIZE
}

/// Validates and decodes a 7-byte stream header.
pub fn decode_frame_header(header: &[u8; FRAME_HEADER_SIZE]) -> Result<FrameInfo, FrameDecodeError> {
    if header[..4] != FRAME_MAGIC {
        return Err(FrameDecodeError::Format);
    }
    // Version must be 1; every feature bit other than block independence is
    // unsupported here and must be clear.
    if header[4] & !FLG_INDEP_BLOCKS != FLG_VERSION {
        return Err(FrameDecodeError::Format);
    }
    let block_max_code = header[5] >> 4;
    if header[5] & 0x0F != 0
        || !(MIN_BLOCK_MAX_CODE..=MAX_BLOCK_MAX_CODE).contains(&block_max_code)
    {
        return Err(FrameDecodeError::Format);
    }
    if header_checksum_byte(&header[4..6]) != header[6] {
        return Err(FrameDecodeError::Checksum);
    }

    Ok(FrameInfo {
        block_max_code,
        independent_blocks: header[4] & FLG_INDEP_BLOCKS != 0,
    })
}

/// Writes a 4-byte block header: 31-bit size, top bit set for verbatim
/// literal payloads.
pub fn encode_block_header(out: &mut [u8], payload_size: u32, uncompressed: bool) {
    debug_assert_eq!(payload_size & BLOCK_UNCOMPRESSED_BIT, 0);
    let mut value = payload_size;
    if uncompressed {
        value |= BLOCK_UNCOMPRESSED_BIT;
    }
    out[..4].copy_from_slice(&value.to_le_bytes());
}

/// Decodes a 4-byte block header. A zero size is the frame terminator.
pub fn decode_block_header(header: &[u8; 4]) -> BlockInfo {
    let value = u32::from_le_bytes(*header);
    BlockInfo {
        size: value & !BLOCK_UNCOMPRESSED_BIT,
        uncompressed: value & BLOCK_UNCOMPRESSED_BIT != 0,
    }
}

/// Writes the 4-zero-byte end-of-frame marker and returns its size.
pub fn encode_frame_footer(out: &mut [u8]) -> usize {
    out[..4].fill(0);
    4
}
