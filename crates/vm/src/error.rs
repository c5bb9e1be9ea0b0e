//! Runtime errors for the stackvm engine.
//!
//! Every error is fatal to the current execution and carries the byte offset
//! of the faulting instruction (`at`). The engine never recovers locally; the
//! host decides what to do with the failed run.

use stackvm_common::{DecodeError, Word};
use thiserror::Error;

/// Errors that end an execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Push onto a full operand stack.
    #[error("stack overflow at offset {at}")]
    StackOverflow { at: usize },

    /// Pop from an empty operand stack, or a DUP/SWAPDUP offset below the bottom.
    #[error("stack underflow at offset {at}")]
    StackUnderflow { at: usize },

    /// CALL with the call-frame stack at capacity.
    #[error("call stack overflow at offset {at}")]
    CallStackOverflow { at: usize },

    /// RET with no matching CALL.
    #[error("return without call at offset {at}")]
    CallStackUnderflow { at: usize },

    /// LOAD or STORE at or beyond the environment capacity.
    #[error("environment index {index} out of bounds (capacity {capacity}) at offset {at}")]
    EnvironmentIndexOutOfBounds {
        at: usize,
        index: usize,
        capacity: usize,
    },

    /// ARRAY with the heap already holding `capacity` arrays.
    #[error("heap exhausted ({capacity} arrays) at offset {at}")]
    HeapExhausted { at: usize, capacity: usize },

    /// ARRAY with a size that is not strictly positive.
    #[error("invalid array size {size} at offset {at}")]
    InvalidArraySize { at: usize, size: Word },

    /// ALOAD/ASTORE with an id that names no array.
    #[error("invalid array id {id} at offset {at}")]
    InvalidArrayId { at: usize, id: Word },

    /// ALOAD/ASTORE with an element index outside the array.
    #[error("array index {index} out of bounds (length {length}) at offset {at}")]
    ArrayIndexOutOfBounds {
        at: usize,
        index: Word,
        length: usize,
    },

    /// DIV with a zero divisor.
    #[error("division by zero at offset {at}")]
    DivisionByZero { at: usize },

    /// MOD with a zero divisor.
    #[error("modulo by zero at offset {at}")]
    ModuloByZero { at: usize },

    /// CALL with a negative address or argument count, or too little
    /// environment room for the arguments.
    #[error("invalid call to address {address} with {num_args} argument(s) at offset {at}")]
    InvalidCallTarget {
        at: usize,
        address: Word,
        num_args: Word,
    },

    /// Opcode byte outside the instruction set.
    #[error("unknown opcode {opcode} at offset {at}")]
    UnknownOpcode { at: usize, opcode: u8 },

    /// Instruction pointer ran off the program, or an operand is cut short.
    #[error("unexpected end of program at offset {at}")]
    UnexpectedEndOfProgram { at: usize },

    /// HALT under the strict halt policy with leftover stack values or open calls.
    #[error("unbalanced HALT at offset {at}: {stack_depth} value(s) on stack, {call_depth} open call(s)")]
    UnbalancedHalt {
        at: usize,
        stack_depth: usize,
        call_depth: usize,
    },
}

impl RuntimeError {
    /// Byte offset of the faulting instruction.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::StackOverflow { at }
            | RuntimeError::StackUnderflow { at }
            | RuntimeError::CallStackOverflow { at }
            | RuntimeError::CallStackUnderflow { at }
            | RuntimeError::EnvironmentIndexOutOfBounds { at, .. }
            | RuntimeError::HeapExhausted { at, .. }
            | RuntimeError::InvalidArraySize { at, .. }
            | RuntimeError::InvalidArrayId { at, .. }
            | RuntimeError::ArrayIndexOutOfBounds { at, .. }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::ModuloByZero { at }
            | RuntimeError::InvalidCallTarget { at, .. }
            | RuntimeError::UnknownOpcode { at, .. }
            | RuntimeError::UnexpectedEndOfProgram { at }
            | RuntimeError::UnbalancedHalt { at, .. } => *at,
        }
    }
}

impl From<DecodeError> for RuntimeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownOpcode { at, byte } => RuntimeError::UnknownOpcode { at, opcode: byte },
            DecodeError::EndOfProgram { at } | DecodeError::TruncatedOperand { at, .. } => {
                RuntimeError::UnexpectedEndOfProgram { at }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at offset 5"
        );
        assert_eq!(
            RuntimeError::ArrayIndexOutOfBounds {
                at: 12,
                index: 3,
                length: 3
            }
            .to_string(),
            "array index 3 out of bounds (length 3) at offset 12"
        );
        assert_eq!(
            RuntimeError::UnbalancedHalt {
                at: 7,
                stack_depth: 2,
                call_depth: 0
            }
            .to_string(),
            "unbalanced HALT at offset 7: 2 value(s) on stack, 0 open call(s)"
        );
    }

    #[test]
    fn at_reads_every_variant() {
        assert_eq!(RuntimeError::CallStackUnderflow { at: 9 }.at(), 9);
        assert_eq!(
            RuntimeError::InvalidCallTarget {
                at: 4,
                address: -1,
                num_args: 0
            }
            .at(),
            4
        );
    }

    #[test]
    fn decode_errors_map_to_runtime_kinds() {
        assert_eq!(
            RuntimeError::from(DecodeError::UnknownOpcode { at: 3, byte: 77 }),
            RuntimeError::UnknownOpcode { at: 3, opcode: 77 }
        );
        assert_eq!(
            RuntimeError::from(DecodeError::TruncatedOperand {
                at: 6,
                opcode: "JMPT"
            }),
            RuntimeError::UnexpectedEndOfProgram { at: 6 }
        );
        assert_eq!(
            RuntimeError::from(DecodeError::EndOfProgram { at: 10 }),
            RuntimeError::UnexpectedEndOfProgram { at: 10 }
        );
    }
}
