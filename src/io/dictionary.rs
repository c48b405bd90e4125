//! Dictionary loading: the final 64 KiB of a file, used as initial match
//! history on both the compress and decompress sides.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use crate::format::HISTORY_SIZE;
use crate::io::read_fill;

/// Reads the last [`HISTORY_SIZE`] bytes of `path` (the whole file when it is
/// shorter).
pub fn load_dictionary(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();

    if file_size > HISTORY_SIZE as u64 {
        file.seek(SeekFrom::End(-(HISTORY_SIZE as i64)))?;
    }

    let mut data = vec![0u8; HISTORY_SIZE];
    let n = read_fill(&mut file, &mut data)?;
    data.truncate(n);
    Ok(data)
}
