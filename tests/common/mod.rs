//! Shared helpers for the integration suites.
#![allow(dead_code)]

/// Deterministic pseudo-random bytes (xorshift32), so failures reproduce.
pub fn pseudo_random(seed: u32, len: usize) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Compresses `data` in memory with the given settings.
pub fn compress_bytes(data: &[u8], settings: &lz4opt::Settings) -> Vec<u8> {
    let mut src = data;
    let mut out = Vec::new();
    lz4opt::compress_stream(&mut src, &mut out, None, settings, None, None).unwrap();
    out
}

/// Decompresses a framed or raw stream in memory.
pub fn decompress_bytes(stream: &[u8], settings: &lz4opt::Settings) -> Vec<u8> {
    let mut src = stream;
    let mut out = Vec::new();
    lz4opt::decompress_stream(&mut src, &mut out, None, settings).unwrap();
    out
}
