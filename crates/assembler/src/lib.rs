//! stackvm assembler: text ↔ bytecode translation.
//!
//! One instruction per line, a mnemonic followed by at most one operand.
//! Mnemonics are case-insensitive, `;` starts a comment, and `name:` defines
//! a label at the current byte offset. PUSH and the jump opcodes may take a
//! label name as their operand.
//!
//! # Usage
//!
//! ```
//! use stackvm_assembler::{assemble, disassemble};
//!
//! let text = "PUSH 2\nPUSH 3\nADD\nHALT\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 6);
//! assert_eq!(disassemble(&program).unwrap(), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program))` reproduces the same bytes for every
//! program that decodes by linear sweep. The disassembler emits canonical
//! text; the assembler also accepts hex operands, labels and comments.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::{disassemble, listing};
pub use error::AsmError;

use lexer::tokenize_line;
use parser::{parse_line, resolve, LabelTable};
use stackvm_common::{Instruction, Program};

/// Assemble text into a bytecode program.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    // Pass 1: parse every line and assign label offsets.
    let mut labels = LabelTable::new();
    let mut statements = Vec::new();
    let mut offset = 0;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        let parsed = parse_line(&tokens, line_num)?;

        for label in parsed.labels {
            if let Some(&(_, first)) = labels.get(&label) {
                return Err(AsmError::DuplicateLabel {
                    line: line_num,
                    label,
                    first,
                });
            }
            labels.insert(label, (offset, line_num));
        }

        if let Some(stmt) = parsed.statement {
            offset += 1 + stmt.opcode.operand_width();
            statements.push(stmt);
        }
    }

    // Pass 2: resolve operands now that every label has an offset.
    let instructions = statements
        .iter()
        .map(|stmt| resolve(stmt, &labels))
        .collect::<Result<Vec<Instruction>, _>>()?;

    Ok(Program::from_instructions(&instructions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackvm_common::Opcode;

    #[test]
    fn assemble_minimal() {
        let program = assemble("PUSH 42\nHALT\n").unwrap();
        assert_eq!(program.as_bytes(), &[Opcode::Push as u8, 42, Opcode::Halt as u8]);
    }

    #[test]
    fn disassemble_minimal() {
        let program = Program::from_instructions(&[
            Instruction::new(Opcode::Push, 42),
            Instruction::bare(Opcode::Halt),
        ]);
        assert_eq!(disassemble(&program).unwrap(), "PUSH 42\nHALT\n");
    }

    #[test]
    fn assemble_with_comments_and_blanks() {
        let text = "\
; This is a comment
PUSH 0x2a  ; push 42

  HALT
";
        let program = assemble(text).unwrap();
        assert_eq!(program.len(), 3);
    }

    #[test]
    fn decimal_and_hex_produce_same_result() {
        let hex = assemble("JMP 0x012c\n").unwrap();
        let dec = assemble("JMP 300\n").unwrap();
        assert_eq!(hex, dec);
        assert_eq!(dec.as_bytes(), &[Opcode::Jmp as u8, 0x01, 0x2c]);
    }

    #[test]
    fn forward_and_backward_labels() {
        let text = "\
top:
    PUSH 1
    JMPT done
    JMP top
done: HALT
";
        let program = assemble(text).unwrap();
        assert_eq!(
            disassemble(&program).unwrap(),
            "PUSH 1\nJMPT 8\nJMP 0\nHALT\n"
        );
    }

    #[test]
    fn label_as_push_operand() {
        let program = assemble("PUSH f\nHALT\nf: RET\n").unwrap();
        assert_eq!(program.as_bytes()[1], 3);
    }

    #[test]
    fn error_duplicate_label() {
        let err = assemble("a: NOP\nNOP\na: HALT\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::DuplicateLabel {
                line: 3,
                label: "a".to_string(),
                first: 1
            }
        );
    }

    #[test]
    fn error_undefined_label() {
        let err = assemble("HALT\nJMP nowhere\n").unwrap_err();
        assert!(matches!(err, AsmError::UndefinedLabel { line: 2, .. }));
    }

    #[test]
    fn error_unknown_opcode() {
        let err = assemble("FOOBAR\n").unwrap_err();
        assert!(matches!(err, AsmError::UnknownOpcode { line: 1, .. }));
    }

    #[test]
    fn error_reports_correct_line() {
        let err = assemble("HALT\nPUSH\n").unwrap_err();
        assert!(matches!(err, AsmError::MissingArgument { line: 2, .. }));
    }

    #[test]
    fn all_opcodes_roundtrip() {
        for &opcode in &stackvm_common::opcode::ALL_OPCODES {
            let text = match opcode.operand_width() {
                0 => format!("{}\n", opcode.mnemonic()),
                _ => format!("{} 7\n", opcode.mnemonic()),
            };
            let program = assemble(&text).unwrap();
            assert_eq!(disassemble(&program).unwrap(), text, "roundtrip failed for {opcode:?}");
        }
    }
}
