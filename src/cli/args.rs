//! Command-line argument parsing.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit tests).
//! Option repetition and conflicting commands are errors, matching the
//! strictness of the usage line:
//!
//! ```text
//! lz4opt [-c] [-d] [-v] [-r] [-B4..7] [-BD|-BI] [-D <dict>] <in> <out>
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::format::{MAX_BLOCK_MAX_CODE, MIN_BLOCK_MAX_CODE};
use crate::io::Settings;

/// Selected top-level operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Compress,
    Decompress,
}

/// Complete set of options and filenames produced by the parsing loop.
#[derive(Debug)]
pub struct ParsedArgs {
    pub command: Command,
    /// Re-decode the output and compare against the source (`-c`).
    pub verify: bool,
    /// Print block configuration, live progress, and a summary (`-v`).
    pub verbose: bool,
    pub settings: Settings,
    pub dictionary: Option<PathBuf>,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Parses `std::env::args()`, skipping argv[0].
pub fn parse_args() -> Result<ParsedArgs> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&argv)
}

/// Parses an explicit argument list.
pub fn parse_args_from(argv: &[String]) -> Result<ParsedArgs> {
    let mut command: Option<Command> = None;
    let mut verify = false;
    let mut verbose = false;
    let mut raw_block = false;
    let mut block_max_code: Option<u8> = None;
    let mut block_dependence: Option<bool> = None; // true = independent
    let mut dictionary: Option<PathBuf> = None;
    let mut files: Vec<PathBuf> = Vec::new();

    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-z" => {
                if command.is_some() {
                    return Err(anyhow!("conflicting command: {}", arg));
                }
                command = Some(Command::Compress);
            }
            "-d" => {
                if command.is_some() {
                    return Err(anyhow!("conflicting command: {}", arg));
                }
                command = Some(Command::Decompress);
            }
            "-c" => {
                if verify {
                    return Err(anyhow!("duplicate option: -c"));
                }
                verify = true;
            }
            "-v" => {
                if verbose {
                    return Err(anyhow!("duplicate option: -v"));
                }
                verbose = true;
            }
            "-r" => {
                if raw_block {
                    return Err(anyhow!("duplicate option: -r"));
                }
                raw_block = true;
            }
            "-BD" => {
                if block_dependence.is_some() {
                    return Err(anyhow!("conflicting option: -BD"));
                }
                block_dependence = Some(false);
            }
            "-BI" => {
                if block_dependence.is_some() {
                    return Err(anyhow!("conflicting option: -BI"));
                }
                block_dependence = Some(true);
            }
            "-D" => {
                if dictionary.is_some() {
                    return Err(anyhow!("duplicate option: -D"));
                }
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("-D requires a dictionary filename"))?;
                dictionary = Some(PathBuf::from(path));
            }
            s if s.starts_with("-B") && s.len() == 3 => {
                if block_max_code.is_some() {
                    return Err(anyhow!("duplicate option: {}", s));
                }
                let code = s.as_bytes()[2].wrapping_sub(b'0');
                if !(MIN_BLOCK_MAX_CODE..=MAX_BLOCK_MAX_CODE).contains(&code) {
                    return Err(anyhow!("invalid block size code: {}", s));
                }
                block_max_code = Some(code);
            }
            s if s.starts_with('-') => {
                return Err(anyhow!("unknown option: {}", s));
            }
            s => {
                if files.len() == 2 {
                    return Err(anyhow!("too many filenames: {}", s));
                }
                files.push(PathBuf::from(s));
            }
        }
    }

    if files.len() != 2 {
        return Err(anyhow!("input and output filenames are required"));
    }
    let output = files.pop().unwrap();
    let input = files.pop().unwrap();

    Ok(ParsedArgs {
        command: command.unwrap_or(Command::Compress),
        verify,
        verbose,
        settings: Settings {
            raw_block,
            independent_blocks: block_dependence.unwrap_or(false),
            block_max_code: block_max_code.unwrap_or(MAX_BLOCK_MAX_CODE),
        },
        dictionary,
        input,
        output,
    })
}

/// Prints the usage synopsis to stderr.
pub fn print_usage(exe_name: &str) {
    crate::display!("usage: {} [-c] [-d] [-v] [-r] [-B4..7] [-BD|-BI] [-D <dict>] <infile> <outfile>\n", exe_name);
    crate::display!("       -c: check resulting stream after compressing\n");
    crate::display!("       -d: decompress (default: compress)\n");
    crate::display!("       -v: be verbose\n");
    crate::display!("       -r: raw block format (max. 64 Kb files)\n");
    crate::display!("   -B4..7: maximum block size 64 Kb..4 Mb (default: 4 Mb)\n");
    crate::display!("      -BD: blocks depend on the previous block (default)\n");
    crate::display!("      -BI: blocks are independent\n");
    crate::display!(" -D <dict>: use dictionary file\n");
}
