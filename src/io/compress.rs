//! Streaming compression driver.
//!
//! Owns the window buffer: 64 KiB of history in front of one block-sized
//! read area. In dependent mode the tail of the previous block (or, for the
//! first block, the dictionary) is copied into the history region before
//! each block is compressed, so the match finder sees one logically
//! contiguous window.
//!
//! The first block is preloaded before the frame header goes out: when the
//! whole input turns out to be smaller than the requested block size, the
//! block-max code is reduced to the smallest one that still fits it, keeping
//! scratch allocation proportional to the input.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::compressor::Compressor;
use crate::error::Status;
use crate::format::{
    block_max_size, BLOCK_HEADER_SIZE, FRAME_FOOTER_SIZE, HISTORY_SIZE, MIN_BLOCK_MAX_CODE,
    RAW_FOOTER_SIZE, RAW_MAX_INPUT_SIZE,
};
use crate::frame::{encode_block_header, encode_frame_footer, encode_frame_header};
use crate::io::{load_dictionary, read_fill, ProgressFn, Settings, StartFn, StreamStats};

/// Compresses `src` into `dst` under `settings`.
///
/// `dictionary`, when present, seeds the match history of the first block
/// (dependent mode) or of every block (independent mode).
pub fn compress_stream(
    src: &mut impl Read,
    dst: &mut impl Write,
    dictionary: Option<&[u8]>,
    settings: &Settings,
    mut start: Option<StartFn<'_>>,
    mut progress: Option<ProgressFn<'_>>,
) -> Result<StreamStats, Status> {
    let requested_size = block_max_size(settings.block_max_code);
    let mut in_data = vec![0u8; HISTORY_SIZE + requested_size];

    // Preload the first block so the block-max code can be sized to fit.
    let first_block = read_fill(src, &mut in_data[HISTORY_SIZE..HISTORY_SIZE + requested_size])
        .map_err(Status::Source)?;

    let mut code = settings.block_max_code;
    if settings.raw_block {
        code = MIN_BLOCK_MAX_CODE;
    } else if first_block < requested_size {
        while code > MIN_BLOCK_MAX_CODE && block_max_size(code - 1) > first_block {
            code -= 1;
        }
    }
    let block_size = block_max_size(code);

    let mut compressor = Compressor::new(HISTORY_SIZE + block_size);
    let mut out_data = vec![0u8; block_size];
    let mut frame_buf = [0u8; 8];
    let mut stats = StreamStats::default();

    if !settings.raw_block {
        let n = encode_frame_header(&mut frame_buf, code, settings.independent_blocks);
        dst.write_all(&frame_buf[..n]).map_err(Status::Destination)?;
        stats.compressed_size += n as u64;
    }
    if let Some(cb) = start.as_mut() {
        cb(code, settings.independent_blocks);
    }

    let mut preloaded = Some(first_block);
    let mut prev_block_size = 0usize; // history bytes in front of the block
    let mut prev_data_size = 0usize; // previous block's input size
    let mut dict_len = dictionary.map_or(0, |d| d.len().min(HISTORY_SIZE));
    let mut num_blocks = 0usize;

    loop {
        if prev_block_size > 0 {
            // Slide the previous block's tail into the history region.
            in_data.copy_within(
                HISTORY_SIZE + prev_data_size - prev_block_size
                    ..HISTORY_SIZE + prev_data_size,
                HISTORY_SIZE - prev_block_size,
            );
        } else if let Some(dict) = dictionary.filter(|_| dict_len > 0) {
            in_data[HISTORY_SIZE - dict_len..HISTORY_SIZE]
                .copy_from_slice(&dict[dict.len() - dict_len..]);
            prev_block_size = dict_len;
        }

        let in_size = match preloaded.take() {
            Some(n) => n,
            None => read_fill(src, &mut in_data[HISTORY_SIZE..HISTORY_SIZE + block_size])
                .map_err(Status::Source)?,
        };
        if in_size == 0 {
            break;
        }

        if settings.raw_block && (num_blocks > 0 || in_size > RAW_MAX_INPUT_SIZE) {
            return Err(Status::RawTooLarge);
        }
        if !settings.independent_blocks {
            dict_len = 0;
        }

        let window_start = HISTORY_SIZE - prev_block_size;
        let budget = in_size.min(block_size);
        let compressed = compressor.shrink_block(
            &in_data[window_start..HISTORY_SIZE + in_size],
            prev_block_size,
            &mut out_data[..budget],
        );

        match compressed {
            Some(out_size) => {
                if !settings.raw_block {
                    encode_block_header(&mut frame_buf, out_size as u32, false);
                    dst.write_all(&frame_buf[..BLOCK_HEADER_SIZE])
                        .map_err(Status::Destination)?;
                    stats.compressed_size += BLOCK_HEADER_SIZE as u64;
                }
                dst.write_all(&out_data[..out_size])
                    .map_err(Status::Destination)?;
                stats.original_size += in_size as u64;
                stats.compressed_size += out_size as u64;
            }
            None => {
                // Block did not fit its own size: store it verbatim.
                if settings.raw_block {
                    return Err(Status::RawUncompressed);
                }
                encode_block_header(&mut frame_buf, in_size as u32, true);
                dst.write_all(&frame_buf[..BLOCK_HEADER_SIZE])
                    .map_err(Status::Destination)?;
                dst.write_all(&in_data[HISTORY_SIZE..HISTORY_SIZE + in_size])
                    .map_err(Status::Destination)?;
                stats.original_size += in_size as u64;
                stats.compressed_size += (BLOCK_HEADER_SIZE + in_size) as u64;
            }
        }

        if settings.independent_blocks {
            prev_block_size = 0;
        } else {
            prev_block_size = in_size.min(HISTORY_SIZE);
            prev_data_size = in_size;
        }
        num_blocks += 1;

        if let Some(cb) = progress.as_mut() {
            cb(stats.original_size, stats.compressed_size);
        }
    }

    let footer_size = if settings.raw_block {
        frame_buf[..RAW_FOOTER_SIZE].fill(0);
        RAW_FOOTER_SIZE
    } else {
        encode_frame_footer(&mut frame_buf)
    };
    debug_assert!(footer_size <= FRAME_FOOTER_SIZE);
    dst.write_all(&frame_buf[..footer_size])
        .map_err(Status::Destination)?;
    stats.compressed_size += footer_size as u64;

    if let Some(cb) = progress.as_mut() {
        cb(stats.original_size, stats.compressed_size);
    }

    stats.command_count = compressor.command_count();
    Ok(stats)
}

/// File-level wrapper: opens input, output, and optional dictionary, then
/// runs [`compress_stream`].
pub fn compress_file(
    in_path: &Path,
    out_path: &Path,
    dictionary_path: Option<&Path>,
    settings: &Settings,
    start: Option<StartFn<'_>>,
    progress: Option<ProgressFn<'_>>,
) -> Result<StreamStats, Status> {
    let mut src = BufReader::new(File::open(in_path).map_err(Status::Source)?);
    let mut dst = BufWriter::new(File::create(out_path).map_err(Status::Destination)?);

    let dictionary = match dictionary_path {
        Some(path) => Some(load_dictionary(path).map_err(Status::Dictionary)?),
        None => None,
    };

    let stats = compress_stream(
        &mut src,
        &mut dst,
        dictionary.as_deref(),
        settings,
        start,
        progress,
    )?;
    dst.flush().map_err(Status::Destination)?;
    Ok(stats)
}
