//! Program representation for stackvm byte streams.
//!
//! A program is a raw byte sequence with no header. Offset 0 is the entry
//! point. Decoding is positional and happens on demand: jumps may land on any
//! offset, so there is no single authoritative instruction list.

use crate::error::DecodeError;
use crate::instruction::Instruction;

/// A stackvm program: an immutable byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Wrap raw bytes as a program. No validation happens here.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Encode a sequence of instructions into a program.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let size: usize = instructions.iter().map(Instruction::encoded_len).sum();
        let mut bytes = Vec::with_capacity(size);
        for instr in instructions {
            instr.encode_into(&mut bytes);
        }
        Self { bytes }
    }

    /// Decode the instruction at byte offset `at`.
    pub fn decode_at(&self, at: usize) -> Result<Instruction, DecodeError> {
        Instruction::decode(&self.bytes, at)
    }

    /// Decode the whole program by linear sweep from offset 0.
    ///
    /// Returns `(offset, instruction)` pairs. This is a display view: it
    /// assumes no jump lands in the middle of an instruction.
    pub fn instructions(&self) -> Result<Vec<(usize, Instruction)>, DecodeError> {
        let mut out = Vec::new();
        let mut at = 0;
        while at < self.bytes.len() {
            let instr = self.decode_at(at)?;
            out.push((at, instr));
            at += instr.encoded_len();
        }
        Ok(out)
    }

    /// The raw program bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Program length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the program has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for Program {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for Program {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    #[test]
    fn empty_program() {
        let program = Program::default();
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
        assert_eq!(program.instructions().unwrap(), vec![]);
    }

    #[test]
    fn from_instructions_concatenates() {
        let program = Program::from_instructions(&[
            Instruction::new(Opcode::Push, 2),
            Instruction::new(Opcode::Jmp, 6),
            Instruction::bare(Opcode::Nop),
            Instruction::bare(Opcode::Halt),
        ]);
        assert_eq!(program.as_bytes(), &[1, 2, 11, 0, 6, 20, 0]);
    }

    #[test]
    fn linear_sweep_reports_offsets() {
        let program = Program::new(vec![1, 7, 1, 5, 10, 0]);
        let instrs = program.instructions().unwrap();
        let offsets: Vec<usize> = instrs.iter().map(|(at, _)| *at).collect();
        assert_eq!(offsets, vec![0, 2, 4, 5]);
        assert_eq!(instrs[2].1, Instruction::bare(Opcode::Gt));
    }

    #[test]
    fn linear_sweep_propagates_errors() {
        let program = Program::new(vec![0, 0, 42]);
        assert_eq!(
            program.instructions(),
            Err(DecodeError::UnknownOpcode { at: 2, byte: 42 })
        );
    }

    #[test]
    fn decode_at_middle_of_instruction() {
        // Offset 1 is PUSH's operand byte; positional decoding reads it as an opcode.
        let program = Program::new(vec![1, 3, 0]);
        assert_eq!(
            program.decode_at(1).unwrap(),
            Instruction::bare(Opcode::Add)
        );
    }
}
