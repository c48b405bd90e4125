//! Streaming decompression driver.
//!
//! Mirrors the compress driver's window discipline: 64 KiB of history in
//! front of a block-sized decode area, with the previous block's tail (or
//! the dictionary) slid into the history region before each block so
//! dependent-mode back-references resolve. Blocks are delivered strictly in
//! source order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::block::expand_block;
use crate::error::Status;
use crate::format::{
    block_max_size, BLOCK_HEADER_SIZE, FRAME_HEADER_SIZE, HISTORY_SIZE, MIN_BLOCK_MAX_CODE,
    RAW_FOOTER_SIZE,
};
use crate::frame::{decode_block_header, decode_frame_header, FrameDecodeError};
use crate::io::{load_dictionary, read_fill, Settings, StreamStats};

/// Decompresses `src` into `dst`.
///
/// For framed input the descriptor determines block size and dependence; in
/// raw mode a single block (with its 2-byte end marker stripped) is decoded.
/// `dictionary` must match the one used at compression time.
pub fn decompress_stream(
    src: &mut impl Read,
    dst: &mut impl Write,
    dictionary: Option<&[u8]>,
    settings: &Settings,
) -> Result<StreamStats, Status> {
    let mut stats = StreamStats::default();
    let mut independent_blocks = false;
    let mut code = MIN_BLOCK_MAX_CODE;

    if !settings.raw_block {
        let mut header = [0u8; FRAME_HEADER_SIZE];
        let got = read_fill(src, &mut header).map_err(Status::Source)?;
        if got != FRAME_HEADER_SIZE {
            return Err(Status::Format);
        }
        let info = decode_frame_header(&header).map_err(|e| match e {
            FrameDecodeError::Format => Status::Format,
            FrameDecodeError::Checksum => Status::Checksum,
        })?;
        independent_blocks = info.independent_blocks;
        code = info.block_max_code;
        stats.compressed_size += FRAME_HEADER_SIZE as u64;
    }

    let block_size = block_max_size(code);
    let mut in_block = vec![0u8; block_size + RAW_FOOTER_SIZE];
    let mut out_data = vec![0u8; HISTORY_SIZE + block_size];

    let mut prev_decompressed = 0usize; // history bytes in front of the block
    let mut prev_data_size = 0usize; // previous block's decoded size
    let mut dict_len = dictionary.map_or(0, |d| d.len().min(HISTORY_SIZE));
    let mut num_blocks = 0usize;

    loop {
        if prev_decompressed > 0 {
            out_data.copy_within(
                HISTORY_SIZE + prev_data_size - prev_decompressed
                    ..HISTORY_SIZE + prev_data_size,
                HISTORY_SIZE - prev_decompressed,
            );
        } else if let Some(dict) = dictionary.filter(|_| dict_len > 0) {
            out_data[HISTORY_SIZE - dict_len..HISTORY_SIZE]
                .copy_from_slice(&dict[dict.len() - dict_len..]);
            prev_decompressed = dict_len;
            if !independent_blocks {
                dict_len = 0;
            }
        }

        let (payload_size, uncompressed) = if !settings.raw_block {
            let mut header = [0u8; BLOCK_HEADER_SIZE];
            let got = read_fill(src, &mut header).map_err(Status::Source)?;
            if got != BLOCK_HEADER_SIZE {
                break;
            }
            stats.compressed_size += BLOCK_HEADER_SIZE as u64;
            let info = decode_block_header(&header);
            if info.size == 0 {
                break;
            }
            if info.size as usize > block_size {
                return Err(Status::Format);
            }
            (info.size as usize, info.uncompressed)
        } else {
            if num_blocks > 0 {
                break;
            }
            // Raw: one block followed by the 2-byte end marker.
            let got = read_fill(src, &mut in_block).map_err(Status::Source)?;
            if got < RAW_FOOTER_SIZE {
                break;
            }
            (got - RAW_FOOTER_SIZE, false)
        };
        if payload_size == 0 {
            num_blocks += 1;
            continue;
        }

        if !settings.raw_block {
            let got = read_fill(src, &mut in_block[..payload_size]).map_err(Status::Source)?;
            if got != payload_size {
                break;
            }
            stats.compressed_size += payload_size as u64;
        } else {
            stats.compressed_size += (payload_size + RAW_FOOTER_SIZE) as u64;
        }

        let decompressed_size = if uncompressed {
            out_data[HISTORY_SIZE..HISTORY_SIZE + payload_size]
                .copy_from_slice(&in_block[..payload_size]);
            payload_size
        } else {
            expand_block(&in_block[..payload_size], &mut out_data, HISTORY_SIZE, block_size)
                .map_err(|_| Status::Decompression)?
        };

        if decompressed_size != 0 {
            stats.original_size += decompressed_size as u64;
            dst.write_all(&out_data[HISTORY_SIZE..HISTORY_SIZE + decompressed_size])
                .map_err(Status::Destination)?;

            if !independent_blocks {
                prev_decompressed = decompressed_size.min(HISTORY_SIZE);
                prev_data_size = decompressed_size;
            } else {
                prev_decompressed = 0;
            }
        }
        num_blocks += 1;
    }

    Ok(stats)
}

/// File-level wrapper: opens input, output, and optional dictionary, then
/// runs [`decompress_stream`].
pub fn decompress_file(
    in_path: &Path,
    out_path: &Path,
    dictionary_path: Option<&Path>,
    settings: &Settings,
) -> Result<StreamStats, Status> {
    let mut src = BufReader::new(File::open(in_path).map_err(Status::Source)?);
    let mut dst = BufWriter::new(File::create(out_path).map_err(Status::Destination)?);

    let dictionary = match dictionary_path {
        Some(path) => Some(load_dictionary(path).map_err(Status::Dictionary)?),
        None => None,
    };

    let stats = decompress_stream(&mut src, &mut dst, dictionary.as_deref(), settings)?;
    dst.flush().map_err(Status::Destination)?;
    Ok(stats)
}
