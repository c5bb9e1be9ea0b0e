//! CLI command implementations.

use std::fs;

use stackvm_common::Program;
use stackvm_vm::{Config, HaltPolicy, RuntimeError};
use tracing::debug;

/// Assemble a .asm text file to a .bin bytecode file.
pub fn assemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: assemble requires an input file");
        eprintln!("Usage: stackvm assemble <input.asm> [-o output.bin]");
        return Err(1);
    }

    let input = &args[0];

    let output = match &args[1..] {
        [] => default_output(input),
        [flag, path] if flag == "-o" => path.clone(),
        _ => {
            eprintln!("error: unexpected arguments after '{input}'");
            eprintln!("Usage: stackvm assemble <input.asm> [-o output.bin]");
            return Err(1);
        }
    };

    let program = read_source(input)?;

    fs::write(&output, program.as_bytes()).map_err(|e| {
        eprintln!("error: cannot write '{output}': {e}");
        1
    })?;

    eprintln!("assembled {} bytes -> {output}", program.len());
    Ok(())
}

/// Disassemble a .bin bytecode file to text.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    let (input, offsets) = match args {
        [input] => (input, false),
        [input, flag] if flag == "--offsets" => (input, true),
        _ => {
            eprintln!("error: disassemble requires an input file");
            eprintln!("Usage: stackvm disassemble <input.bin> [--offsets]");
            return Err(1);
        }
    };

    let program = read_binary(input)?;
    let text = if offsets {
        stackvm_assembler::listing(&program)
    } else {
        stackvm_assembler::disassemble(&program)
    };
    let text = text.map_err(|e| {
        eprintln!("error: invalid bytecode: {e}");
        1
    })?;
    print!("{text}");
    Ok(())
}

/// Execute a .bin bytecode file.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: stackvm run <input.bin> [options]");
        return Err(1);
    }

    let options = parse_run_options(&args[1..])?;
    crate::logging::init(options.trace);
    let program = read_binary(&args[0])?;
    execute(&program, options.config)
}

/// Assemble a .asm file in memory and execute it.
pub fn exec(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: exec requires an input file");
        eprintln!("Usage: stackvm exec <input.asm> [options]");
        return Err(1);
    }

    let options = parse_run_options(&args[1..])?;
    crate::logging::init(options.trace);
    let program = read_source(&args[0])?;
    execute(&program, options.config)
}

/// Settings shared by `run` and `exec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RunOptions {
    config: Config,
    trace: bool,
}

fn parse_run_options(args: &[String]) -> Result<RunOptions, i32> {
    let mut options = RunOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--strict" => options.config = options.config.with_halt_policy(HaltPolicy::Strict),
            "--trace" => options.trace = true,
            "--stack-size" => {
                options.config = options.config.with_stack_size(flag_value(arg, iter.next())?)
            }
            "--env-size" => {
                options.config = options.config.with_env_size(flag_value(arg, iter.next())?)
            }
            "--heap-size" => {
                options.config = options.config.with_heap_size(flag_value(arg, iter.next())?)
            }
            "--call-depth" => {
                options.config = options.config.with_call_depth(flag_value(arg, iter.next())?)
            }
            other => {
                eprintln!("error: unknown option '{other}'");
                return Err(1);
            }
        }
    }

    Ok(options)
}

fn flag_value(flag: &str, value: Option<&String>) -> Result<usize, i32> {
    let Some(value) = value else {
        eprintln!("error: {flag} requires a value");
        return Err(1);
    };
    value.parse().map_err(|_| {
        eprintln!("error: {flag} expects a non-negative integer, got '{value}'");
        1
    })
}

fn execute(program: &Program, config: Config) -> Result<(), i32> {
    debug!(bytes = program.len(), ?config, "starting execution");
    match stackvm_vm::run_with_config(program, config) {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(exit_code(&e))
        }
    }
}

/// Process exit code for a runtime fault.
pub fn exit_code(err: &RuntimeError) -> i32 {
    match err {
        RuntimeError::StackOverflow { .. } => 10,
        RuntimeError::StackUnderflow { .. } => 11,
        RuntimeError::CallStackOverflow { .. } => 12,
        RuntimeError::CallStackUnderflow { .. } => 13,
        RuntimeError::EnvironmentIndexOutOfBounds { .. } => 14,
        RuntimeError::HeapExhausted { .. } => 15,
        RuntimeError::InvalidArraySize { .. } => 16,
        RuntimeError::InvalidArrayId { .. } => 17,
        RuntimeError::ArrayIndexOutOfBounds { .. } => 18,
        RuntimeError::DivisionByZero { .. } => 19,
        RuntimeError::ModuloByZero { .. } => 20,
        RuntimeError::InvalidCallTarget { .. } => 21,
        RuntimeError::UnknownOpcode { .. } => 22,
        RuntimeError::UnexpectedEndOfProgram { .. } => 23,
        RuntimeError::UnbalancedHalt { .. } => 24,
    }
}

/// `prog.asm` → `prog.bin`; anything else gets `.bin` appended.
fn default_output(input: &str) -> String {
    match input.strip_suffix(".asm") {
        Some(stem) => format!("{stem}.bin"),
        None => format!("{input}.bin"),
    }
}

fn read_source(path: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    stackvm_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {path}: {e}");
        1
    })
}

fn read_binary(path: &str) -> Result<Program, i32> {
    let bytes = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;
    Ok(Program::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_options() {
        let options = parse_run_options(&[]).unwrap();
        assert_eq!(options, RunOptions::default());
    }

    #[test]
    fn parse_all_options() {
        let options = parse_run_options(&args(&[
            "--stack-size",
            "16",
            "--env-size",
            "8",
            "--heap-size",
            "2",
            "--call-depth",
            "4",
            "--strict",
            "--trace",
        ]))
        .unwrap();
        assert_eq!(options.config.limits.stack_size, 16);
        assert_eq!(options.config.limits.env_size, 8);
        assert_eq!(options.config.limits.heap_size, 2);
        assert_eq!(options.config.limits.call_depth, 4);
        assert_eq!(options.config.halt, HaltPolicy::Strict);
        assert!(options.trace);
    }

    #[test]
    fn missing_flag_value() {
        assert_eq!(parse_run_options(&args(&["--stack-size"])), Err(1));
    }

    #[test]
    fn bad_flag_value() {
        assert_eq!(parse_run_options(&args(&["--heap-size", "-3"])), Err(1));
    }

    #[test]
    fn unknown_option() {
        assert_eq!(parse_run_options(&args(&["--fast"])), Err(1));
    }

    #[test]
    fn default_output_names() {
        assert_eq!(default_output("prog.asm"), "prog.bin");
        assert_eq!(default_output("prog"), "prog.bin");
    }

    #[test]
    fn exit_codes_are_distinct() {
        let errors = [
            RuntimeError::StackOverflow { at: 0 },
            RuntimeError::StackUnderflow { at: 0 },
            RuntimeError::CallStackOverflow { at: 0 },
            RuntimeError::CallStackUnderflow { at: 0 },
            RuntimeError::EnvironmentIndexOutOfBounds {
                at: 0,
                index: 0,
                capacity: 0,
            },
            RuntimeError::HeapExhausted { at: 0, capacity: 0 },
            RuntimeError::InvalidArraySize { at: 0, size: 0 },
            RuntimeError::InvalidArrayId { at: 0, id: 0 },
            RuntimeError::ArrayIndexOutOfBounds {
                at: 0,
                index: 0,
                length: 0,
            },
            RuntimeError::DivisionByZero { at: 0 },
            RuntimeError::ModuloByZero { at: 0 },
            RuntimeError::InvalidCallTarget {
                at: 0,
                address: 0,
                num_args: 0,
            },
            RuntimeError::UnknownOpcode { at: 0, opcode: 0 },
            RuntimeError::UnexpectedEndOfProgram { at: 0 },
            RuntimeError::UnbalancedHalt {
                at: 0,
                stack_depth: 0,
                call_depth: 0,
            },
        ];
        let codes: Vec<i32> = errors.iter().map(exit_code).collect();
        assert_eq!(codes, (10..=24).collect::<Vec<_>>());
    }
}
