//! Match discovery over the suffix-array interval index.
//!
//! Queries must be issued for every window position in increasing order: each
//! query performs a lazy update that re-links the visited intervals to the
//! querying position, which is exactly what lets later positions discover the
//! nearest earlier occurrence in O(1) amortized per interval. History
//! positions (previous block tail, dictionary) are walked by
//! [`skip_matches`] so the structure stays consistent without recording
//! candidates for them.

use crate::format::{LAST_LITERALS, LAST_MATCH_OFFSET, MAX_OFFSET};
use crate::sa::{SuffixIndex, LCP_MASK, LCP_SHIFT, POS_MASK};

/// Candidates recorded per window position for the parser to choose from.
pub const NMATCHES_PER_OFFSET: usize = 8;

/// One match candidate: a back-reference distance and the number of bytes it
/// covers. A zero length marks an empty slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Match {
    pub length: u32,
    pub offset: u32,
}

/// Per-position candidate table, stored flat and indexed by window position.
///
/// The parser later overwrites slot 0 of each position with its chosen
/// command, so the table doubles as the parse output.
pub struct MatchTable {
    entries: Vec<Match>,
}

impl MatchTable {
    pub fn new(max_window_size: usize) -> Self {
        MatchTable {
            entries: vec![Match::default(); max_window_size * NMATCHES_PER_OFFSET],
        }
    }

    #[inline]
    pub fn at(&self, pos: usize) -> &[Match] {
        let start = pos * NMATCHES_PER_OFFSET;
        &self.entries[start..start + NMATCHES_PER_OFFSET]
    }

    #[inline]
    pub fn at_mut(&mut self, pos: usize) -> &mut [Match] {
        let start = pos * NMATCHES_PER_OFFSET;
        &mut self.entries[start..start + NMATCHES_PER_OFFSET]
    }

    /// The chosen command slot for `pos` (slot 0).
    #[inline]
    pub fn chosen(&self, pos: usize) -> Match {
        self.entries[pos * NMATCHES_PER_OFFSET]
    }

    #[inline]
    pub fn set_chosen(&mut self, pos: usize, m: Match) {
        self.entries[pos * NMATCHES_PER_OFFSET] = m;
    }
}

/// Finds matches for the suffix starting at window position `pos`.
///
/// Ascends from the deepest interval containing the suffix toward the root,
/// re-linking intervals to `pos` as it goes. Every interval visited yields at
/// most one candidate: the most recent earlier position that shares that
/// interval's LCP with `pos`. Candidates therefore come out longest-first.
///
/// Visitor positions are stored with a +1 bias: a visited-interval record is
/// always non-zero, so it can never be confused with the root's zero record
/// and window position 0 remains a valid match source (a dictionary's first
/// byte, in particular).
///
/// Returns the number of candidates stored into `matches`.
pub fn find_matches_at(index: &mut SuffixIndex, pos: usize, matches: &mut [Match]) -> usize {
    let visitor = pos as u64 + 1;
    let mut r = index.pos_data[pos];
    index.pos_data[pos] = 0;

    // Ascend until we reach a visited interval or a child of the root,
    // linking unvisited intervals to the current suffix as we go.
    let mut super_ref = index.intervals[(r & POS_MASK) as usize];
    while super_ref & LCP_MASK != 0 {
        index.intervals[(r & POS_MASK) as usize] = visitor;
        r = super_ref;
        super_ref = index.intervals[(r & POS_MASK) as usize];
    }

    if super_ref == 0 {
        // The root, or an unvisited child of the root: no earlier occurrence.
        if r != 0 {
            index.intervals[(r & POS_MASK) as usize] = visitor;
        }
        return 0;
    }

    // Ascend indirectly through the per-position links, emitting the most
    // recent visitor of each interval on the way up.
    let mut match_pos = (super_ref - 1) as usize;
    let mut count = 0usize;
    loop {
        loop {
            super_ref = index.pos_data[match_pos];
            if super_ref <= r {
                break;
            }
            match_pos = (index.intervals[(super_ref & POS_MASK) as usize] - 1) as usize;
        }
        index.intervals[(r & POS_MASK) as usize] = visitor;
        index.pos_data[match_pos] = r;

        if count < matches.len() {
            let offset = pos - match_pos;
            if offset <= MAX_OFFSET {
                matches[count] = Match {
                    length: (r >> LCP_SHIFT) as u32,
                    offset: offset as u32,
                };
                count += 1;
            }
        }

        if super_ref == 0 {
            break;
        }
        r = super_ref;
        match_pos = (index.intervals[(r & POS_MASK) as usize] - 1) as usize;
    }

    count
}

/// Walks history positions `start..end` without recording candidates.
///
/// The walk still performs the interval re-linking, which is required so
/// that positions inside the block proper can reference the history.
pub fn skip_matches(index: &mut SuffixIndex, start: usize, end: usize) {
    for pos in start..end {
        find_matches_at(index, pos, &mut []);
    }
}

/// Fills the candidate table for every position of the block proper
/// (`start..end` in window coordinates), applying the end-of-block parsing
/// restrictions: no candidate may start within the final
/// [`LAST_MATCH_OFFSET`] bytes, and every candidate is clamped so the final
/// [`LAST_LITERALS`] bytes stay literal.
pub fn find_all_matches(
    index: &mut SuffixIndex,
    table: &mut MatchTable,
    start: usize,
    end: usize,
) {
    for pos in start..end {
        let found = find_matches_at(index, pos, table.at_mut(pos));
        let max_len = end.saturating_sub(LAST_LITERALS).saturating_sub(pos) as u32;
        let in_tail = pos + LAST_MATCH_OFFSET > end;

        for (m, slot) in table.at_mut(pos).iter_mut().enumerate() {
            if m >= found || in_tail {
                *slot = Match::default();
            } else if slot.length > max_len {
                slot.length = max_len;
            }
        }
    }
}
