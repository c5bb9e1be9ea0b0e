//! stackvm virtual machine: executes bytecode programs over 32-bit words.
//!
//! The machine has four mutable components:
//! - An operand stack for intermediate values
//! - A flat variable environment with a live high-water mark
//! - A heap of fixed-length integer arrays, addressed by id
//! - A call-frame stack for CALL/RET
//!
//! # Usage
//!
//! ```
//! use stackvm_common::{Instruction, Opcode, Program};
//! use stackvm_vm::run;
//!
//! let program = Program::from_instructions(&[
//!     Instruction::new(Opcode::Push, 2),
//!     Instruction::new(Opcode::Push, 2),
//!     Instruction::bare(Opcode::Add),
//!     Instruction::bare(Opcode::Halt),
//! ]);
//!
//! assert_eq!(run(&program), Ok(4));
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod execute;
pub mod frames;
pub mod heap;
pub mod machine;
pub mod stack;

pub use config::{Config, HaltPolicy, Limits};
pub use error::RuntimeError;
pub use execute::Step;
pub use machine::VM;

use stackvm_common::{Program, Word};

/// Execute a program with the default configuration and return its result.
///
/// # Errors
///
/// Returns [`RuntimeError`] on the first fault (stack underflow, division by
/// zero, bad array access, running off the end, etc.).
pub fn run(program: &Program) -> Result<Word, RuntimeError> {
    run_with_config(program, Config::default())
}

/// Execute a program with explicit limits and halt policy.
pub fn run_with_config(program: &Program, config: Config) -> Result<Word, RuntimeError> {
    let mut vm = VM::with_config(program, config);
    vm.execute()
}
