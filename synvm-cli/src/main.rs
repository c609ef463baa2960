//! synvm CLI: run, assemble, and disassemble word programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage/input/decode/assembly error
//! - 3: Runtime error
//! - 4: Step budget exhausted

mod commands;

use std::process;

use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "assemble" => commands::assemble(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
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

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
///
/// Stdout belongs to the running program's console.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("Usage: synvm <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <image.bin> [--max-steps N]         Execute a program image");
    eprintln!("  assemble <input.asm> [-o output.bin]    Assemble text to an image");
    eprintln!("  disassemble <image.bin>                 Print an annotated listing");
    eprintln!();
    eprintln!("Set RUST_LOG=debug (or trace) for execution logs on stderr.");
}
