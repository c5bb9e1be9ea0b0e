//! Parser for stackvm assembly tokens → statements.
//!
//! A line is zero or more label definitions followed by an optional
//! instruction. Operands may be numbers or, for PUSH and the jumps, label
//! names; labels are resolved in a second pass once every offset is known.

use std::collections::HashMap;

use crate::error::AsmError;
use crate::lexer::Token;
use stackvm_common::{Instruction, Opcode};

/// An instruction operand before label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    None,
    Number(u64),
    Label(String),
}

/// One parsed instruction with its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    pub opcode: Opcode,
    pub operand: Operand,
    pub line: usize,
}

/// Everything found on one line.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedLine {
    pub labels: Vec<String>,
    pub statement: Option<Statement>,
}

/// Label name → (byte offset, defining line).
pub(crate) type LabelTable = HashMap<String, (usize, usize)>;

/// Parse the tokens of a single line.
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<ParsedLine, AsmError> {
    let mut parsed = ParsedLine::default();

    let mut rest = tokens;
    while let Some((Token::Label(name), tail)) = rest.split_first() {
        parsed.labels.push(name.clone());
        rest = tail;
    }

    let Some((head, args)) = rest.split_first() else {
        return Ok(parsed);
    };

    let mnemonic = match head {
        Token::Ident(s) => s,
        other => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: token_text(other),
            })
        }
    };

    let opcode =
        Opcode::from_mnemonic(&mnemonic.to_uppercase()).ok_or_else(|| AsmError::UnknownOpcode {
            line: line_num,
            token: mnemonic.clone(),
        })?;

    let operand = if opcode.operand_width() == 0 {
        expect_end(args, line_num)?;
        Operand::None
    } else {
        let operand = expect_operand(args, opcode, line_num)?;
        expect_end(&args[1..], line_num)?;
        operand
    };

    parsed.statement = Some(Statement {
        opcode,
        operand,
        line: line_num,
    });
    Ok(parsed)
}

/// Turn a statement into an instruction, looking labels up in `labels`.
pub(crate) fn resolve(stmt: &Statement, labels: &LabelTable) -> Result<Instruction, AsmError> {
    let value = match &stmt.operand {
        Operand::None => return Ok(Instruction::bare(stmt.opcode)),
        Operand::Number(n) => *n,
        Operand::Label(name) => match labels.get(name) {
            Some(&(offset, _)) => offset as u64,
            None => {
                return Err(AsmError::UndefinedLabel {
                    line: stmt.line,
                    label: name.clone(),
                })
            }
        },
    };

    let max = match stmt.opcode.operand_width() {
        1 => u8::MAX as u16,
        _ => u16::MAX,
    };
    if value > max as u64 {
        return Err(AsmError::OperandOutOfRange {
            line: stmt.line,
            opcode: stmt.opcode.mnemonic(),
            value,
            max,
        });
    }
    Ok(Instruction::new(stmt.opcode, value as u16))
}

/// Extract the operand at the head of `args`.
fn expect_operand(args: &[Token], opcode: Opcode, line: usize) -> Result<Operand, AsmError> {
    match args.first() {
        Some(Token::Number(n)) => Ok(Operand::Number(*n)),
        Some(Token::Ident(name)) if accepts_label(opcode) => Ok(Operand::Label(name.clone())),
        Some(other) => Err(AsmError::UnexpectedToken {
            line,
            token: token_text(other),
        }),
        None => Err(AsmError::MissingArgument {
            line,
            opcode: opcode.mnemonic(),
        }),
    }
}

fn accepts_label(opcode: Opcode) -> bool {
    opcode == Opcode::Push || opcode.is_jump()
}

/// Check that there are no extra tokens.
fn expect_end(remaining: &[Token], line: usize) -> Result<(), AsmError> {
    match remaining.first() {
        Some(tok) => Err(AsmError::UnexpectedToken {
            line,
            token: token_text(tok),
        }),
        None => Ok(()),
    }
}

fn token_text(token: &Token) -> String {
    match token {
        Token::Label(s) => format!("{s}:"),
        Token::Ident(s) => s.clone(),
        Token::Number(n) => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    fn label(s: &str) -> Token {
        Token::Label(s.to_string())
    }

    fn num(n: u64) -> Token {
        Token::Number(n)
    }

    fn stmt(opcode: Opcode, operand: Operand) -> Option<Statement> {
        Some(Statement {
            opcode,
            operand,
            line: 1,
        })
    }

    #[test]
    fn parse_empty_tokens() {
        assert_eq!(parse_line(&[], 1).unwrap(), ParsedLine::default());
    }

    #[test]
    fn parse_bare_opcode() {
        let parsed = parse_line(&[ident("add")], 1).unwrap();
        assert_eq!(parsed.statement, stmt(Opcode::Add, Operand::None));
    }

    #[test]
    fn parse_bare_opcode_rejects_extra_args() {
        let err = parse_line(&[ident("ADD"), num(5)], 1).unwrap_err();
        assert!(matches!(err, AsmError::UnexpectedToken { .. }));
    }

    #[test]
    fn parse_numeric_operand() {
        let parsed = parse_line(&[ident("LOAD"), num(3)], 1).unwrap();
        assert_eq!(parsed.statement, stmt(Opcode::Load, Operand::Number(3)));
    }

    #[test]
    fn parse_label_only_line() {
        let parsed = parse_line(&[label("top")], 1).unwrap();
        assert_eq!(parsed.labels, vec!["top".to_string()]);
        assert!(parsed.statement.is_none());
    }

    #[test]
    fn parse_labelled_jump() {
        let parsed = parse_line(&[label("a"), label("b"), ident("JMP"), ident("a")], 1).unwrap();
        assert_eq!(parsed.labels.len(), 2);
        assert_eq!(
            parsed.statement,
            stmt(Opcode::Jmp, Operand::Label("a".to_string()))
        );
    }

    #[test]
    fn label_operand_only_for_push_and_jumps() {
        let err = parse_line(&[ident("LOAD"), ident("x")], 1).unwrap_err();
        assert!(matches!(err, AsmError::UnexpectedToken { .. }));
        assert!(parse_line(&[ident("PUSH"), ident("x")], 1).is_ok());
    }

    #[test]
    fn missing_operand() {
        let err = parse_line(&[ident("STORE")], 4).unwrap_err();
        assert_eq!(
            err,
            AsmError::MissingArgument {
                line: 4,
                opcode: "STORE"
            }
        );
    }

    #[test]
    fn number_in_opcode_position() {
        let err = parse_line(&[num(1)], 1).unwrap_err();
        assert!(matches!(err, AsmError::UnexpectedToken { .. }));
    }

    #[test]
    fn resolve_checks_operand_width() {
        let labels = LabelTable::new();
        let push = Statement {
            opcode: Opcode::Push,
            operand: Operand::Number(256),
            line: 2,
        };
        assert!(matches!(
            resolve(&push, &labels),
            Err(AsmError::OperandOutOfRange { max: 255, .. })
        ));

        let jmp = Statement {
            opcode: Opcode::Jmp,
            operand: Operand::Number(256),
            line: 2,
        };
        assert_eq!(resolve(&jmp, &labels), Ok(Instruction::new(Opcode::Jmp, 256)));
    }

    #[test]
    fn resolve_looks_up_labels() {
        let mut labels = LabelTable::new();
        labels.insert("end".to_string(), (12, 5));
        let jmpf = Statement {
            opcode: Opcode::Jmpf,
            operand: Operand::Label("end".to_string()),
            line: 1,
        };
        assert_eq!(resolve(&jmpf, &labels), Ok(Instruction::new(Opcode::Jmpf, 12)));

        let missing = Statement {
            opcode: Opcode::Jmp,
            operand: Operand::Label("nowhere".to_string()),
            line: 3,
        };
        assert_eq!(
            resolve(&missing, &labels),
            Err(AsmError::UndefinedLabel {
                line: 3,
                label: "nowhere".to_string()
            })
        );
    }
}
