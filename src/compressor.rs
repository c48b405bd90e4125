//! Per-stream compression context.
//!
//! Owns every piece of O(window) scratch — the suffix index, the candidate
//! table, and the parser's cost array — allocated once for the largest window
//! the stream can produce and reused for every block. A block is compressed
//! by running the full pipeline over the window: index build, history skip,
//! candidate discovery, cost optimization, command reduction, serialization.

use crate::block::write_block;
use crate::matchfinder::{find_all_matches, skip_matches, MatchTable};
use crate::parser::{optimize_matches, reduce_command_count};
use crate::sa::SuffixIndex;

pub struct Compressor {
    index: SuffixIndex,
    table: MatchTable,
    cost: Vec<i32>,
    num_commands: usize,
}

impl Compressor {
    /// Allocates a context for windows up to `max_window_size` bytes
    /// (history plus one block).
    pub fn new(max_window_size: usize) -> Self {
        Compressor {
            index: SuffixIndex::new(max_window_size),
            table: MatchTable::new(max_window_size),
            cost: vec![0; max_window_size],
            num_commands: 0,
        }
    }

    /// Compresses the block occupying `window[previous_block_size..]`, with
    /// the first `previous_block_size` bytes serving as match history.
    ///
    /// Returns the payload size written into `out`, or `None` when the block
    /// does not fit the output budget (incompressible).
    pub fn shrink_block(
        &mut self,
        window: &[u8],
        previous_block_size: usize,
        out: &mut [u8],
    ) -> Option<usize> {
        let end = window.len();
        debug_assert!(previous_block_size < end);

        self.index.build(window);
        if previous_block_size > 0 {
            skip_matches(&mut self.index, 0, previous_block_size);
        }
        find_all_matches(&mut self.index, &mut self.table, previous_block_size, end);
        optimize_matches(&mut self.table, &mut self.cost, previous_block_size, end);
        reduce_command_count(&mut self.table, previous_block_size, end);

        let (written, commands) = write_block(window, &self.table, previous_block_size, end, out)?;
        self.num_commands += commands;
        Some(written)
    }

    /// Total number of commands (tokens) emitted across all blocks so far.
    pub fn command_count(&self) -> usize {
        self.num_commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::expand_block;
    use crate::format::{LAST_LITERALS, MIN_MATCH_SIZE};

    fn roundtrip_block(data: &[u8]) -> Vec<u8> {
        let mut comp = Compressor::new(data.len());
        let mut out = vec![0u8; data.len().max(16) * 2];
        let n = comp
            .shrink_block(data, 0, &mut out)
            .expect("block should fit a double-size budget");
        let mut decoded = vec![0u8; data.len()];
        let m = expand_block(&out[..n], &mut decoded, 0, data.len()).unwrap();
        decoded.truncate(m);
        decoded
    }

    #[test]
    fn repetitive_block_roundtrips() {
        let data: Vec<u8> = b"ABCDEFGH".iter().cycle().take(1024).copied().collect();
        assert_eq!(roundtrip_block(&data), data);
    }

    #[test]
    fn rle_block_roundtrips_and_shrinks() {
        let data = vec![b'a'; 4096];
        let mut comp = Compressor::new(data.len());
        let mut out = vec![0u8; data.len()];
        let n = comp.shrink_block(&data, 0, &mut out).unwrap();
        assert!(n < 64, "4096 identical bytes should shrink well, got {n}");

        let mut decoded = vec![0u8; data.len()];
        let m = expand_block(&out[..n], &mut decoded, 0, data.len()).unwrap();
        assert_eq!(m, data.len());
        assert_eq!(decoded, data);
    }

    #[test]
    fn structured_text_roundtrips() {
        let data: Vec<u8> = b"the quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(10_000)
            .copied()
            .collect();
        assert_eq!(roundtrip_block(&data), data);
    }

    #[test]
    fn tiny_blocks_fall_back_to_literals() {
        // Too short for any usable match; payload must be token + literals.
        let data = b"aaaaaaaa";
        let mut comp = Compressor::new(data.len());
        let mut out = vec![0u8; 32];
        let n = comp.shrink_block(data, 0, &mut out).unwrap();
        assert_eq!(&out[..n], &[0x80, b'a', b'a', b'a', b'a', b'a', b'a', b'a', b'a']);
    }

    #[test]
    fn incompressible_budget_returns_none() {
        // Pseudo-random bytes with an output budget equal to input size.
        let mut state = 0x2545F491u32;
        let data: Vec<u8> = (0..512)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();
        let mut comp = Compressor::new(data.len());
        let mut out = vec![0u8; data.len()];
        assert!(comp.shrink_block(&data, 0, &mut out).is_none());
    }

    #[test]
    fn history_enables_cross_block_matches() {
        // The history half repeats in the block; the block must compress to
        // a handful of bytes referencing back across the boundary.
        let history: Vec<u8> = b"0123456789abcdef".iter().cycle().take(256).copied().collect();
        let mut window = history.clone();
        window.extend_from_slice(&history);

        let mut comp = Compressor::new(window.len());
        let mut out = vec![0u8; 256];
        let n = comp
            .shrink_block(&window, 256, &mut out)
            .expect("repeating block must compress");
        assert!(n < 32, "expected a short payload, got {n}");

        // Decode with the same history in front.
        let mut decoded = vec![0u8; 512];
        decoded[..256].copy_from_slice(&history);
        let m = expand_block(&out[..n], &mut decoded, 256, 256).unwrap();
        assert_eq!(m, 256);
        assert_eq!(&decoded[256..], &history[..]);
    }

    #[test]
    fn literal_tail_is_preserved() {
        // Decode commands back out of the payload and confirm no match
        // covers the final LAST_LITERALS bytes.
        let data = vec![b'z'; 512];
        let mut comp = Compressor::new(data.len());
        let mut out = vec![0u8; 512];
        let n = comp.shrink_block(&data, 0, &mut out).unwrap();

        // Walk the sequences, tracking decoded position.
        let payload = &out[..n];
        let mut ip = 0usize;
        let mut pos = 0usize;
        while ip < payload.len() {
            let token = payload[ip];
            ip += 1;
            let mut lits = (token >> 4) as usize;
            if lits == 15 {
                loop {
                    let b = payload[ip];
                    ip += 1;
                    lits += b as usize;
                    if b != 255 {
                        break;
                    }
                }
            }
            ip += lits;
            pos += lits;
            if ip + 2 > payload.len() {
                break;
            }
            ip += 2;
            let mut mlen = (token & 0x0F) as usize + MIN_MATCH_SIZE;
            if mlen == 19 {
                loop {
                    let b = payload[ip];
                    ip += 1;
                    mlen += b as usize;
                    if b != 255 {
                        break;
                    }
                }
            }
            pos += mlen;
            assert!(
                pos <= data.len() - LAST_LITERALS,
                "a match covers the literal tail (ends at {pos})"
            );
        }
        assert_eq!(pos, data.len(), "commands must cover the block exactly");
    }

    #[test]
    fn command_count_accumulates() {
        let data = vec![b'a'; 1024];
        let mut comp = Compressor::new(data.len());
        let mut out = vec![0u8; 1024];
        comp.shrink_block(&data, 0, &mut out).unwrap();
        let after_one = comp.command_count();
        assert!(after_one >= 2, "at least a match and the trailing token");
        comp.shrink_block(&data, 0, &mut out).unwrap();
        assert_eq!(comp.command_count(), after_one * 2);
    }
}
