//! Thin wrapper around the `xxhash-rust` crate providing the XXH32 one-shot
//! hash used for the frame header checksum byte.

/// One-shot XXH32 hash of `data` with the given `seed`.
///
/// # Parity vectors
/// * `xxh32_oneshot(b"", 0)` == `0x02CC5D05`
#[inline]
pub fn xxh32_oneshot(data: &[u8], seed: u32) -> u32 {
    xxhash_rust::xxh32::xxh32(data, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_known_vector() {
        assert_eq!(xxh32_oneshot(b"", 0), 0x02CC_5D05);
    }

    #[test]
    fn deterministic() {
        assert_eq!(xxh32_oneshot(b"window", 7), xxh32_oneshot(b"window", 7));
    }

    #[test]
    fn seed_changes_hash() {
        assert_ne!(xxh32_oneshot(b"window", 0), xxh32_oneshot(b"window", 1));
    }
}
