//! Opcode definitions for the stackvm instruction set.
//!
//! Byte values are fixed: programs assembled elsewhere depend on them.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute gives each variant its stable byte value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Stop execution. Top of stack is the program result.
    Halt = 0,
    /// Push the one-byte immediate, zero-extended.
    Push = 1,
    /// Discard the top of stack.
    Pop = 2,

    /// Pop r, pop l, push l + r.
    Add = 3,
    /// Pop r, pop l, push l - r.
    Sub = 4,
    /// Pop r, pop l, push l * r.
    Mul = 5,
    /// Pop r, pop l, push l / r. Zero divisor is fatal.
    Div = 6,
    /// Pop one value, push its negation.
    Neg = 7,

    /// Push 1 if l == r, else 0.
    Eq = 8,
    /// Push 1 if l < r, else 0.
    Lt = 9,
    /// Push 1 if l > r, else 0.
    Gt = 10,

    /// Jump to the two-byte big-endian target.
    Jmp = 11,
    /// Pop condition, jump if it is zero.
    Jmpf = 12,

    /// Push environment slot `operand`.
    Load = 13,
    /// Pop into environment slot `operand`.
    Store = 14,

    /// Pop function address, pop argument count, enter the function.
    Call = 15,
    /// Pop return value, leave the current function.
    Ret = 16,

    /// Pop element count and that many values, push the new array id.
    Array = 17,
    /// Pop index, pop array id, push the element.
    Aload = 18,
    /// Pop value, pop index, pop array id, store and push the value back.
    Astore = 19,

    /// No operation.
    Nop = 20,

    /// Pop r, pop l, push l % r. Zero divisor is fatal.
    Mod = 21,
    /// Push 1 if l <= r, else 0.
    Le = 22,
    /// Push 1 if l >= r, else 0.
    Ge = 23,

    /// Push a copy of the value `operand` slots below the top.
    Dup = 24,
    /// Swap the top with the value `operand` slots below it, then duplicate the top.
    SwapDup = 25,
    /// Pop condition, jump if it is non-zero.
    Jmpt = 26,
}

/// All valid opcodes, in byte order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 27] = [
    Opcode::Halt,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Neg,
    Opcode::Eq,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Jmp,
    Opcode::Jmpf,
    Opcode::Load,
    Opcode::Store,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Array,
    Opcode::Aload,
    Opcode::Astore,
    Opcode::Nop,
    Opcode::Mod,
    Opcode::Le,
    Opcode::Ge,
    Opcode::Dup,
    Opcode::SwapDup,
    Opcode::Jmpt,
];

impl TryFrom<u8> for Opcode {
    type Error = u8;

    /// Returns the rejected byte on failure; callers attach the offset.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_OPCODES.get(value as usize).copied().ok_or(value)
    }
}

impl Opcode {
    /// Decode the opcode byte found at `at`.
    pub fn decode(byte: u8, at: usize) -> Result<Self, DecodeError> {
        Opcode::try_from(byte).map_err(|byte| DecodeError::UnknownOpcode { at, byte })
    }

    /// Number of operand bytes that follow the opcode byte.
    pub fn operand_width(&self) -> usize {
        match self {
            Opcode::Push | Opcode::Load | Opcode::Store | Opcode::Dup | Opcode::SwapDup => 1,
            Opcode::Jmp | Opcode::Jmpf | Opcode::Jmpt => 2,
            _ => 0,
        }
    }

    /// True for the three jump opcodes, whose operand is a code offset.
    pub fn is_jump(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Jmpf | Opcode::Jmpt)
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Neg => "NEG",
            Opcode::Eq => "EQ",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Jmp => "JMP",
            Opcode::Jmpf => "JMPF",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Array => "ARRAY",
            Opcode::Aload => "ALOAD",
            Opcode::Astore => "ASTORE",
            Opcode::Nop => "NOP",
            Opcode::Mod => "MOD",
            Opcode::Le => "LE",
            Opcode::Ge => "GE",
            Opcode::Dup => "DUP",
            Opcode::SwapDup => "SWAPDUP",
            Opcode::Jmpt => "JMPT",
        }
    }

    /// Look up an opcode by its (uppercase) mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }
}
