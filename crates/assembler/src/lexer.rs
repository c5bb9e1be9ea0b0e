//! Tokenizer for stackvm assembly text.

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A label definition (`name:`), without the colon.
    Label(String),
    /// An identifier: opcode mnemonic or label reference, as written.
    Ident(String),
    /// A numeric literal (decimal or hex).
    Number(u64),
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        let token = if let Some(name) = word.strip_suffix(':') {
            if !is_identifier(name) {
                return Err(AsmError::UnexpectedToken {
                    line: line_num,
                    token: word.to_string(),
                });
            }
            Token::Label(name.to_string())
        } else if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
            let value = u64::from_str_radix(hex, 16).map_err(|_| AsmError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?;
            Token::Number(value)
        } else if word.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
            let value: u64 = word.parse().map_err(|_| AsmError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?;
            Token::Number(value)
        } else if is_identifier(word) {
            Token::Ident(word.to_string())
        } else {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: word.to_string(),
            });
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Letters, digits and underscores, not starting with a digit.
fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
