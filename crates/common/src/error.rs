//! Decode errors for stackvm byte streams.

use thiserror::Error;

/// Errors that occur while decoding an instruction from raw bytes.
///
/// Every variant carries the byte offset of the instruction's opcode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The opcode byte is not part of the instruction set.
    #[error("unknown opcode {byte} at offset {at}")]
    UnknownOpcode { at: usize, byte: u8 },

    /// The offset is at or past the end of the program.
    #[error("unexpected end of program at offset {at}")]
    EndOfProgram { at: usize },

    /// The program ends before all operand bytes of the opcode.
    #[error("truncated operand for {opcode} at offset {at}")]
    TruncatedOperand { at: usize, opcode: &'static str },
}

impl DecodeError {
    /// Byte offset of the instruction that failed to decode.
    pub fn at(&self) -> usize {
        match self {
            DecodeError::UnknownOpcode { at, .. }
            | DecodeError::EndOfProgram { at }
            | DecodeError::TruncatedOperand { at, .. } => *at,
        }
    }
}
