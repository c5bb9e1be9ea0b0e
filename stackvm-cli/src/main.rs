//! stackvm CLI: assemble, disassemble and execute bytecode programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage/input/decode/assembly error
//! - 10..=24: Runtime error, one code per fault kind (see `commands::exit_code`)

mod commands;
mod logging;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "assemble" => commands::assemble(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "run" => commands::run(&args[2..]),
        "exec" => commands::exec(&args[2..]),
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
    eprintln!("Usage: stackvm <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  assemble <input.asm> [-o output.bin]   Assemble text to bytecode");
    eprintln!("  disassemble <input.bin> [--offsets]    Disassemble bytecode to text");
    eprintln!("  run <input.bin> [options]              Execute a bytecode program");
    eprintln!("  exec <input.asm> [options]             Assemble and execute in one step");
    eprintln!();
    eprintln!("Options for run/exec:");
    eprintln!("  --stack-size N    Operand stack capacity (default 1024)");
    eprintln!("  --env-size N      Environment slots (default 1024)");
    eprintln!("  --heap-size N     Maximum number of arrays (default 256)");
    eprintln!("  --call-depth N    Maximum call nesting (default 256)");
    eprintln!("  --strict          Fail HALT unless exactly one value and no open calls remain");
    eprintln!("  --trace           Log every dispatched instruction to stderr");
}
