//! Instruction encoding and decoding.
//!
//! Instructions are variable length: one opcode byte followed by the
//! opcode's fixed number of operand bytes.
//! ```text
//! width 0:  [opcode]
//! width 1:  [opcode] [operand u8]
//! width 2:  [opcode] [target hi] [target lo]     (big-endian)
//! ```

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Immediate operand. Zero for opcodes without one; at most `u8::MAX`
    /// for one-byte operands.
    pub operand: u16,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(opcode: Opcode, operand: u16) -> Self {
        Self { opcode, operand }
    }

    /// Create an instruction that takes no operand.
    pub fn bare(opcode: Opcode) -> Self {
        Self { opcode, operand: 0 }
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        1 + self.opcode.operand_width()
    }

    /// Append the encoded bytes to `buf`.
    ///
    /// One-byte operands are truncated to their low byte.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.opcode as u8);
        match self.opcode.operand_width() {
            1 => buf.push(self.operand as u8),
            2 => buf.extend_from_slice(&self.operand.to_be_bytes()),
            _ => {}
        }
    }

    /// Encode this instruction to a fresh buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Decode the instruction whose opcode byte sits at offset `at`.
    pub fn decode(bytes: &[u8], at: usize) -> Result<Self, DecodeError> {
        let byte = *bytes.get(at).ok_or(DecodeError::EndOfProgram { at })?;
        let opcode = Opcode::decode(byte, at)?;

        let width = opcode.operand_width();
        let operands = bytes
            .get(at + 1..at + 1 + width)
            .ok_or(DecodeError::TruncatedOperand {
                at,
                opcode: opcode.mnemonic(),
            })?;

        let operand = match *operands {
            [] => 0,
            [b] => b as u16,
            [hi, lo] => u16::from_be_bytes([hi, lo]),
            _ => unreachable!("operand width is at most 2"),
        };

        Ok(Self { opcode, operand })
    }
}
