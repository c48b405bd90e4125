//! Block encoder: serializes the chosen parse into the block byte stream.
//!
//! Each match command becomes one sequence: token byte, optional literal-run
//! extension bytes, the pending literals, a 2-byte little-endian offset, and
//! optional match-length extension bytes. The residual literals at block end
//! form a final, match-less token.
//!
//! The encoder never grows the output past the caller's budget: every
//! command's size is computed up front, and exceeding the budget returns the
//! incompressibility sentinel (`None`) so the frame layer can fall back to an
//! uncompressed-literal block.

use crate::format::{
    literals_run_extra_size, match_run_extra_size, write_le16, LITERALS_RUN_LEN, MATCH_RUN_LEN,
    MAX_OFFSET, MIN_MATCH_SIZE, MIN_OFFSET, ML_BITS,
};
use crate::matchfinder::MatchTable;

/// Appends the extension bytes of a literal run, returning the new write
/// position. The caller has already verified the room.
#[inline]
fn write_literals_run(out: &mut [u8], mut pos: usize, mut len: usize) -> usize {
    if len >= LITERALS_RUN_LEN {
        len -= LITERALS_RUN_LEN;
        while len >= 255 {
            out[pos] = 255;
            pos += 1;
            len -= 255;
        }
        out[pos] = len as u8;
        pos += 1;
    }
    pos
}

/// Appends the extension bytes of an encoded match length (actual length
/// minus [`MIN_MATCH_SIZE`]), returning the new write position.
#[inline]
fn write_match_run(out: &mut [u8], mut pos: usize, mut encoded_len: usize) -> usize {
    if encoded_len >= MATCH_RUN_LEN {
        encoded_len -= MATCH_RUN_LEN;
        while encoded_len >= 255 {
            out[pos] = 255;
            pos += 1;
            encoded_len -= 255;
        }
        out[pos] = encoded_len as u8;
        pos += 1;
    }
    pos
}

/// Serializes the chosen parse for window positions `start..end` into `out`.
///
/// Returns `(bytes_written, command_count)`, or `None` when the encoded form
/// would not fit in `out` (the caller treats the block as incompressible) or
/// a chosen offset falls outside the representable range.
pub fn write_block(
    window: &[u8],
    table: &MatchTable,
    start: usize,
    end: usize,
    out: &mut [u8],
) -> Option<(usize, usize)> {
    let mut num_literals = 0usize;
    let mut first_literal = 0usize;
    let mut out_pos = 0usize;
    let mut num_commands = 0usize;

    let mut i = start;
    while i < end {
        let chosen = table.chosen(i);

        if chosen.length >= MIN_MATCH_SIZE as u32 {
            let match_offset = chosen.offset as usize;
            let match_len = chosen.length as usize;
            let encoded_len = match_len - MIN_MATCH_SIZE;
            let token_literals = num_literals.min(LITERALS_RUN_LEN);
            let token_match = encoded_len.min(MATCH_RUN_LEN);
            let command_size = 1
                + literals_run_extra_size(num_literals)
                + num_literals
                + 2
                + match_run_extra_size(encoded_len);

            if out_pos + command_size > out.len() {
                return None;
            }
            if !(MIN_OFFSET..=MAX_OFFSET).contains(&match_offset) {
                return None;
            }

            out[out_pos] = ((token_literals << ML_BITS) | token_match) as u8;
            out_pos += 1;
            out_pos = write_literals_run(out, out_pos, num_literals);

            if num_literals != 0 {
                out[out_pos..out_pos + num_literals]
                    .copy_from_slice(&window[first_literal..first_literal + num_literals]);
                out_pos += num_literals;
                num_literals = 0;
            }

            write_le16(out, out_pos, match_offset as u16);
            out_pos += 2;
            out_pos = write_match_run(out, out_pos, encoded_len);

            i += match_len;
            num_commands += 1;
        } else {
            if num_literals == 0 {
                first_literal = i;
            }
            num_literals += 1;
            i += 1;
        }
    }

    // Final literal-only token carrying the residual run.
    {
        let token_literals = num_literals.min(LITERALS_RUN_LEN);
        let command_size = 1 + literals_run_extra_size(num_literals) + num_literals;

        if out_pos + command_size > out.len() {
            return None;
        }

        out[out_pos] = (token_literals << ML_BITS) as u8;
        out_pos += 1;
        out_pos = write_literals_run(out, out_pos, num_literals);

        if num_literals != 0 {
            out[out_pos..out_pos + num_literals]
                .copy_from_slice(&window[first_literal..first_literal + num_literals]);
            out_pos += num_literals;
        }

        num_commands += 1;
    }

    Some((out_pos, num_commands))
}
