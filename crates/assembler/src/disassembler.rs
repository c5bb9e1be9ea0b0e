//! Disassembler: bytecode → canonical assembly text.
//!
//! Output is flat text, one instruction per line, operands in decimal. No
//! labels are synthesized; jump targets appear as raw offsets.

use stackvm_common::{DecodeError, Instruction, Program};

/// Disassemble a program into canonical assembly text.
///
/// `assemble(&disassemble(program)?)` reproduces the same bytes.
pub fn disassemble(program: &Program) -> Result<String, DecodeError> {
    let mut out = String::new();
    for (_, instr) in program.instructions()? {
        out.push_str(&render(&instr));
        out.push('\n');
    }
    Ok(out)
}

/// Offset-annotated dump, one `OFFSET: MNEMONIC [OPERAND]` line per instruction.
pub fn listing(program: &Program) -> Result<String, DecodeError> {
    let mut out = String::new();
    for (at, instr) in program.instructions()? {
        out.push_str(&format!("{at:04}: {}", render(&instr)));
        out.push('\n');
    }
    Ok(out)
}

fn render(instr: &Instruction) -> String {
    let mnemonic = instr.opcode.mnemonic();
    if instr.opcode.operand_width() == 0 {
        mnemonic.to_string()
    } else {
        format!("{mnemonic} {}", instr.operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackvm_common::Opcode;

    #[test]
    fn render_with_and_without_operand() {
        assert_eq!(render(&Instruction::new(Opcode::Push, 10)), "PUSH 10");
        assert_eq!(render(&Instruction::new(Opcode::Jmpt, 300)), "JMPT 300");
        assert_eq!(render(&Instruction::bare(Opcode::SwapDup)), "SWAPDUP 0");
        assert_eq!(render(&Instruction::bare(Opcode::Astore)), "ASTORE");
    }

    #[test]
    fn listing_pads_offsets() {
        let program = Program::from_instructions(&[
            Instruction::new(Opcode::Push, 10),
            Instruction::new(Opcode::Jmp, 0),
            Instruction::bare(Opcode::Halt),
        ]);
        assert_eq!(
            listing(&program).unwrap(),
            "0000: PUSH 10\n0002: JMP 0\n0005: HALT\n"
        );
    }

    #[test]
    fn undecodable_bytes_are_reported() {
        let program = Program::new(vec![Opcode::Push as u8]);
        assert!(matches!(
            disassemble(&program),
            Err(DecodeError::TruncatedOperand { at: 0, .. })
        ));
    }
}
