//! Block byte-stream serialization and parsing.
//!
//! `compress` turns the chosen parse into token / run / offset bytes;
//! `decompress` is the verification-path decoder that reverses it.

pub mod compress;
pub mod decompress;

pub use compress::write_block;
pub use decompress::{expand_block, DecompressError};
