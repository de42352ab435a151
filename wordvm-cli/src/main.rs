//! wordvm CLI — check and run program images.
//!
//! Exit codes:
//! - 0: Clean halt
//! - 1: Usage/input/decode error
//! - 2: Step limit reached
//! - 3: Runtime fault

use std::process;

use wordvm_cli::{commands, logging};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    logging::init(args.iter().any(|a| a == "-v" || a == "--verbose"));

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: wordvm <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <image.bin> [options]    Execute a program image");
    eprintln!("  check <image.bin>            Decode an image and report its size");
    eprintln!();
    eprintln!("Run options:");
    eprintln!("  --trace FILE                 Write an execution trace to FILE");
    eprintln!("  --max-steps N                Stop after N instructions (exit 2)");
    eprintln!("  --echo | --no-echo           Echo input characters (default: when stdin is not a terminal)");
    eprintln!("  --patch ADDR=VALUE           Write a memory cell before running");
    eprintln!("  --register N=VALUE           Preset register N before running");
    eprintln!("  -v, --verbose                Debug logging on stderr (RUST_LOG overrides)");
}
