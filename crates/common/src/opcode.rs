//! Opcode definitions for the wordvm instruction set.
//!
//! The table is closed: 22 opcodes numbered `0..=21`, each with a fixed
//! operand count.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u16)]` attribute pins each variant to its opcode word.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Stop execution.
    Halt = 0,
    /// `set a b`: register a = b.
    Set = 1,
    /// `push a`: push a onto the stack.
    Push = 2,
    /// `pop a`: pop the stack into register a. Empty stack is a fault.
    Pop = 3,
    /// `eq a b c`: register a = 1 if b == c, else 0.
    Eq = 4,
    /// `gt a b c`: register a = 1 if b > c, else 0.
    Gt = 5,
    /// `jmp a`: jump to a.
    Jmp = 6,
    /// `jt a b`: jump to b if a is nonzero.
    Jt = 7,
    /// `jf a b`: jump to b if a is zero.
    Jf = 8,
    /// `add a b c`: register a = (b + c) mod 32768.
    Add = 9,
    /// `mult a b c`: register a = (b * c) mod 32768.
    Mult = 10,
    /// `mod a b c`: register a = b mod c. Zero divisor is a fault.
    Mod = 11,
    /// `and a b c`: register a = b & c.
    And = 12,
    /// `or a b c`: register a = b | c.
    Or = 13,
    /// `not a b`: register a = 15-bit complement of b.
    Not = 14,
    /// `rmem a b`: register a = memory[b].
    Rmem = 15,
    /// `wmem a b`: memory[a] = b.
    Wmem = 16,
    /// `call a`: push the return address, jump to a.
    Call = 17,
    /// `ret`: pop the return address and jump to it; halt on empty stack.
    Ret = 18,
    /// `out a`: emit the character with code point a.
    Out = 19,
    /// `in a`: read one character into register a.
    In = 20,
    /// No operation.
    Noop = 21,
}

/// All opcodes, in table order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 22] = [
    Opcode::Halt,
    Opcode::Set,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Eq,
    Opcode::Gt,
    Opcode::Jmp,
    Opcode::Jt,
    Opcode::Jf,
    Opcode::Add,
    Opcode::Mult,
    Opcode::Mod,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Rmem,
    Opcode::Wmem,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Out,
    Opcode::In,
    Opcode::Noop,
];

/// Largest operand count of any opcode.
pub const MAX_ARITY: usize = 3;

impl TryFrom<u16> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ALL_OPCODES
            .get(value as usize)
            .copied()
            .ok_or(DecodeError::InvalidOpcode(value))
    }
}

impl Opcode {
    /// Number of operand words following the opcode word.
    pub fn arity(self) -> usize {
        match self {
            Opcode::Halt | Opcode::Ret | Opcode::Noop => 0,
            Opcode::Push
            | Opcode::Pop
            | Opcode::Jmp
            | Opcode::Call
            | Opcode::Out
            | Opcode::In => 1,
            Opcode::Set
            | Opcode::Jt
            | Opcode::Jf
            | Opcode::Not
            | Opcode::Rmem
            | Opcode::Wmem => 2,
            Opcode::Eq
            | Opcode::Gt
            | Opcode::Add
            | Opcode::Mult
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or => 3,
        }
    }

    /// Returns the mnemonic used in traces.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Set => "set",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Eq => "eq",
            Opcode::Gt => "gt",
            Opcode::Jmp => "jmp",
            Opcode::Jt => "jt",
            Opcode::Jf => "jf",
            Opcode::Add => "add",
            Opcode::Mult => "mult",
            Opcode::Mod => "mod",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Not => "not",
            Opcode::Rmem => "rmem",
            Opcode::Wmem => "wmem",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Out => "out",
            Opcode::In => "in",
            Opcode::Noop => "noop",
        }
    }
}
