//! Binary entry point for the `lz4opt` command-line tool.
//!
//! Dispatches to the file-level drivers and turns every [`Status`] failure
//! into a diagnostic on stderr and exit code 100. Progress and summaries go
//! to stdout, gated on `-v`.

use std::io::Write as _;
use std::process::exit;
use std::time::Instant;

use lz4opt::cli::display::set_display_level;
use lz4opt::cli::{parse_args, print_usage, Command, ParsedArgs};
use lz4opt::error::Status;
use lz4opt::format::block_max_size;
use lz4opt::io::{compress_file, decompress_file, verify_file};
use lz4opt::{display, displaylevel};

const EXIT_ERROR: i32 = 100;

fn main() {
    exit(run());
}

fn run() -> i32 {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            display!("{}\n", e);
            let exe = std::env::args().next().unwrap_or_else(|| "lz4opt".to_string());
            print_usage(&exe);
            return EXIT_ERROR;
        }
    };

    if args.verbose {
        set_display_level(4);
    }

    match args.command {
        Command::Compress => run_compress(&args),
        Command::Decompress => run_decompress(&args),
    }
}

fn run_compress(args: &ParsedArgs) -> i32 {
    let start_time = Instant::now();

    let mut start_cb = |code: u8, independent: bool| {
        displaylevel!(
            4,
            "Block size: {} Kb, {} blocks\n",
            block_max_size(code) >> 10,
            if independent { "independent" } else { "dependent" }
        );
    };
    let mut progress_cb = |original: u64, compressed: u64| {
        if original >= 1024 * 1024 {
            displaylevel!(
                4,
                "\r{} => {} ({:.2} %)",
                original,
                compressed,
                compressed as f64 * 100.0 / original as f64
            );
            let _ = std::io::stdout().flush();
        }
    };

    let stats = match compress_file(
        &args.input,
        &args.output,
        args.dictionary.as_deref(),
        &args.settings,
        Some(&mut start_cb),
        Some(&mut progress_cb),
    ) {
        Ok(stats) => stats,
        Err(status) => return report_error(&status),
    };

    let delta = start_time.elapsed().as_secs_f64().max(1e-9);
    let speed = (stats.original_size as f64 / 1_048_576.0) / delta;
    let tokens = stats.command_count.max(1) as u64;
    displaylevel!(
        4,
        "\rCompressed '{}' in {:.3} seconds, {:.2} Mb/s, {} tokens ({} bytes/token), {} into {} bytes ==> {:.2} %\n",
        args.input.display(),
        delta,
        speed,
        stats.command_count,
        stats.original_size / tokens,
        stats.original_size,
        stats.compressed_size,
        stats.compressed_size as f64 * 100.0 / (stats.original_size.max(1)) as f64
    );

    if args.verify {
        let verify_start = Instant::now();
        match verify_file(
            &args.output,
            &args.input,
            args.dictionary.as_deref(),
            &args.settings,
        ) {
            Ok(vstats) => {
                let delta = verify_start.elapsed().as_secs_f64().max(1e-9);
                displaylevel!(
                    4,
                    "Compared '{}' in {:.3} seconds, {:.2} Mb/s\n",
                    args.output.display(),
                    delta,
                    (vstats.original_size as f64 / 1_048_576.0) / delta
                );
            }
            Err(status) => return report_error(&status),
        }
    }

    0
}

fn run_decompress(args: &ParsedArgs) -> i32 {
    let start_time = Instant::now();

    let stats = match decompress_file(
        &args.input,
        &args.output,
        args.dictionary.as_deref(),
        &args.settings,
    ) {
        Ok(stats) => stats,
        Err(status) => return report_error(&status),
    };

    let delta = start_time.elapsed().as_secs_f64().max(1e-9);
    displaylevel!(
        4,
        "Decompressed '{}' in {:.3} seconds, {:.2} Mb/s\n",
        args.input.display(),
        delta,
        (stats.original_size as f64 / 1_048_576.0) / delta
    );

    0
}

fn report_error(status: &Status) -> i32 {
    display!("{}\n", status);
    EXIT_ERROR
}
