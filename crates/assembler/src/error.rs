//! Error types for the stackvm assembler.

use thiserror::Error;

/// Errors produced during assembly of text to bytecode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode that takes an operand had none.
    #[error("line {line}: {opcode} expects an operand")]
    MissingArgument { line: usize, opcode: &'static str },

    /// A numeric literal could not be parsed.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A resolved operand does not fit the opcode's operand width.
    #[error("line {line}: operand {value} out of range for {opcode} (max {max})")]
    OperandOutOfRange {
        line: usize,
        opcode: &'static str,
        value: u64,
        max: u16,
    },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A label was defined twice.
    #[error("line {line}: label '{label}' already defined on line {first}")]
    DuplicateLabel {
        line: usize,
        label: String,
        first: usize,
    },

    /// An operand names a label that is never defined.
    #[error("line {line}: undefined label '{label}'")]
    UndefinedLabel { line: usize, label: String },
}

impl AsmError {
    /// Source line the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownOpcode { line, .. }
            | AsmError::MissingArgument { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::OperandOutOfRange { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::UndefinedLabel { line, .. } => *line,
        }
    }
}
