//! Command-line front end: argument parsing and output macros.

pub mod args;
pub mod display;

pub use args::{parse_args, parse_args_from, print_usage, Command, ParsedArgs};
