//! `lz4opt` — an optimal LZ4 compressor and verifier.
//!
//! Match discovery runs over a suffix array (per-block, with a sliding
//! 64 KiB history window), an exact dynamic program picks the cheapest
//! sequence of literal runs and matches under the token encoding, and the
//! result is emitted as standard frames or a single raw block. A built-in
//! decoder re-expands the output for self-verification.
//!
//! # Crate layout
//!
//! | Module        | Contents |
//! |---------------|----------|
//! | `format`      | Block/frame constants, run-size arithmetic, LE helpers. |
//! | `sa`          | Suffix array + LCP-interval index over the window. |
//! | `matchfinder` | Per-position match candidates from the interval index. |
//! | `parser`      | Minimum-cost parse DP and command-count reduction. |
//! | `block`       | Block encoder and the verification decoder. |
//! | `frame`       | Frame header / block header / footer codec. |
//! | `compressor`  | Per-stream context tying the pipeline together. |
//! | `io`          | Stream and file drivers, dictionary loading, verify. |
//! | `stream`      | Comparing sink used by the verify path. |
//! | `xxhash`      | XXH32 wrapper (header checksum). |
//! | `error`       | `Status` error taxonomy. |
//! | `cli`         | Argument parsing and display macros. |

pub mod block;
pub mod cli;
pub mod compressor;
pub mod error;
pub mod format;
pub mod frame;
pub mod io;
pub mod matchfinder;
pub mod parser;
pub mod sa;
pub mod stream;
pub mod xxhash;

pub use compressor::Compressor;
pub use error::Status;
pub use io::{
    compress_file, compress_stream, decompress_file, decompress_stream, verify_file, Settings,
    StreamStats,
};
