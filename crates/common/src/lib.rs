//! stackvm common types and instruction encoding.
//!
//! This crate provides the foundational data structures for the stackvm
//! instruction set:
//!
//! - [`Opcode`]: the 27 opcodes and their operand widths
//! - [`Instruction`]: one decoded instruction with encode/decode
//! - [`Program`]: an immutable byte sequence with positional decoding
//! - [`DecodeError`]: errors from decoding byte streams
//! - [`Word`]: the machine's integer type

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;

/// The only value type the machine operates on.
pub type Word = i32;
