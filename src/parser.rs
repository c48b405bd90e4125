//! Minimum-cost parse selection over the candidate table.
//!
//! Two passes run after match discovery:
//!
//!   1. [`optimize_matches`] — right-to-left dynamic programming. `cost[p]`
//!      holds the minimum number of output bytes for the window suffix
//!      starting at `p`; the winning choice (literal continuation or one of
//!      the candidates, possibly shortened) is written into slot 0 of the
//!      candidate table.
//!   2. [`reduce_command_count`] — left-to-right cleanup that removes matches
//!      whose removal cannot grow the output, and joins adjacent offset-1
//!      matches that were truncated by the LCP field width. Fewer tokens,
//!      same or better size.
//!
//! Literal-run cost is amortized: a literal step costs one byte, and the
//! extra run-extension byte is charged exactly when the run length crosses a
//! 255-step boundary, so the cost accumulates correctly down the chain
//! without tracking run lengths in a second table.

use crate::format::{
    literals_run_extra_size, match_run_extra_size, LAST_LITERALS, LITERALS_RUN_LEN,
    MATCH_RUN_LEN, MIN_MATCH_SIZE,
};
use crate::matchfinder::{Match, MatchTable, NMATCHES_PER_OFFSET};

/// Matches at least this long skip the per-length scan; shortening them is
/// never worth the extension bytes saved.
const LEAVE_ALONE_MATCH_SIZE: u32 = 1000;

/// Selects the cheapest parse for window positions `start..end`.
///
/// `cost` must be at least `end` entries long; its contents are scratch.
/// On return, slot 0 of the table at each position holds the chosen command:
/// a zero length means "emit a literal here".
pub fn optimize_matches(table: &mut MatchTable, cost: &mut [i32], start: usize, end: usize) {
    debug_assert!(end > start);

    cost[end - 1] = 1;
    let mut last_literals_offset = end;

    for i in (start..end.saturating_sub(1)).rev() {
        let literals_len = last_literals_offset - i;
        let mut best_cost = 1 + cost[i + 1];
        if literals_len >= LITERALS_RUN_LEN && (literals_len - LITERALS_RUN_LEN) % 255 == 0 {
            // The literal run below this position just crossed a run-encoding
            // boundary; charge the extension byte here so it accumulates.
            best_cost += 1;
        }
        let mut best_len: u32 = 0;
        let mut best_offset: u32 = 0;

        for m in 0..NMATCHES_PER_OFFSET {
            let cand = table.at(i)[m];

            if cand.length >= LEAVE_ALONE_MATCH_SIZE {
                let mut match_len = cand.length as usize;
                if i + match_len > end - LAST_LITERALS {
                    match_len = end - LAST_LITERALS - i;
                }

                let cur_cost = 1 + 2
                    + match_run_extra_size(match_len - MIN_MATCH_SIZE) as i32
                    + cost[i + match_len];
                if best_cost >= cur_cost {
                    best_cost = cur_cost;
                    best_len = match_len as u32;
                    best_offset = cand.offset;
                }
            } else if cand.length >= MIN_MATCH_SIZE as u32 {
                let mut match_len = cand.length as usize;
                if i + match_len > end - LAST_LITERALS {
                    match_len = end - LAST_LITERALS - i;
                }

                // Shortened variants whose reduced length still fits the
                // token nibble cost no extension bytes.
                let match_run_len = match_len.min(MATCH_RUN_LEN);
                for k in MIN_MATCH_SIZE..match_run_len {
                    let cur_cost = 1 + 2 + cost[i + k];
                    if best_cost >= cur_cost {
                        best_cost = cur_cost;
                        best_len = k as u32;
                        best_offset = cand.offset;
                    }
                }
                for k in match_run_len.max(MIN_MATCH_SIZE)..=match_len {
                    let cur_cost =
                        1 + 2 + match_run_extra_size(k - MIN_MATCH_SIZE) as i32 + cost[i + k];
                    if best_cost >= cur_cost {
                        best_cost = cur_cost;
                        best_len = k as u32;
                        best_offset = cand.offset;
                    }
                }
            }
        }

        if best_len >= MIN_MATCH_SIZE as u32 {
            last_literals_offset = i;
        }
        cost[i] = best_cost;
        table.set_chosen(
            i,
            Match {
                length: best_len,
                offset: best_offset,
            },
        );
    }
}

/// Removes or merges chosen matches so the block decodes with fewer tokens
/// without growing the encoded size.
pub fn reduce_command_count(table: &mut MatchTable, start: usize, end: usize) {
    let mut num_literals = 0usize;
    let mut i = start;

    while i < end {
        let chosen = table.chosen(i);

        if chosen.length >= MIN_MATCH_SIZE as u32 {
            let match_len = chosen.length as usize;
            let mut reduce = false;

            if chosen.length <= 19 && i + match_len < end {
                let encoded_len = match_len - MIN_MATCH_SIZE;
                let command_size = 1
                    + literals_run_extra_size(num_literals)
                    + 2
                    + match_run_extra_size(encoded_len);

                if table.chosen(i + match_len).length >= MIN_MATCH_SIZE as u32 {
                    // Match followed directly by another match. Replacing
                    // this one with literals shifts the literal-encoding cost
                    // onto the next command; if the bytes saved cover it, one
                    // token disappears for free.
                    if command_size
                        >= match_len + literals_run_extra_size(num_literals + match_len)
                    {
                        reduce = true;
                    }
                } else {
                    // Match followed by literals, then another match or the
                    // block end. Count the trailing literals to price the
                    // merged run.
                    let mut cur_index = i + match_len;
                    let mut next_literals = 0usize;
                    loop {
                        cur_index += 1;
                        next_literals += 1;
                        if cur_index >= end
                            || table.chosen(cur_index).length >= MIN_MATCH_SIZE as u32
                        {
                            break;
                        }
                    }
                    if command_size
                        >= match_len
                            + literals_run_extra_size(num_literals + next_literals + match_len)
                            - literals_run_extra_size(next_literals)
                    {
                        reduce = true;
                    }
                }
            }

            if reduce {
                for j in 0..match_len {
                    let mut m = table.chosen(i + j);
                    m.length = 0;
                    table.set_chosen(i + j, m);
                }
                num_literals += match_len;
                i += match_len;
            } else {
                if i + match_len < end
                    && chosen.length >= crate::sa::LCP_MAX as u32
                    && chosen.offset == 1
                    && table.chosen(i + match_len).offset == 1
                    && table.chosen(i + match_len).length >= MIN_MATCH_SIZE as u32
                {
                    // Join two offset-1 matches split by the LCP field width.
                    // The consumed slot keeps a sentinel length so forward
                    // scans treat it as occupied.
                    let absorbed = table.chosen(i + match_len).length;
                    table.set_chosen(
                        i,
                        Match {
                            length: chosen.length + absorbed,
                            offset: 1,
                        },
                    );
                    table.set_chosen(
                        i + match_len,
                        Match {
                            length: u32::MAX,
                            offset: 0,
                        },
                    );
                    continue;
                }

                num_literals = 0;
                i += match_len;
            }
        } else {
            num_literals += 1;
            i += 1;
        }
    }
}
