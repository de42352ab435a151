//! Operand encoding: literals and register references.
//!
//! ```text
//! 0     ..= 32767   literal value
//! 32768 ..= 32775   register 0..=7
//! 32776 ..= 65535   invalid
//! ```

use std::fmt;

use crate::error::DecodeError;
use crate::word::Word;

/// Number of general registers.
pub const REGISTER_COUNT: usize = 8;

/// Raw encoding of register 0.
pub const REGISTER_BASE: u16 = 32768;

/// First raw value that is neither a literal nor a register.
pub const INVALID_OPERAND_START: u16 = REGISTER_BASE + REGISTER_COUNT as u16;

/// A decoded operand word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A literal word value.
    Literal(Word),
    /// A register index in `0..REGISTER_COUNT`.
    Register(u8),
}

impl Operand {
    /// Encode back to the raw operand word.
    pub fn encode(self) -> u16 {
        match self {
            Operand::Literal(value) => value,
            Operand::Register(index) => REGISTER_BASE + index as u16,
        }
    }

    /// Register index of a destination operand.
    ///
    /// Destinations must be register references; literals and invalid words
    /// are both rejected.
    pub fn register_index(raw: u16) -> Result<usize, DecodeError> {
        match Operand::try_from(raw)? {
            Operand::Register(index) => Ok(index as usize),
            Operand::Literal(_) => Err(DecodeError::InvalidOperand(raw)),
        }
    }
}

impl TryFrom<u16> for Operand {
    type Error = DecodeError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            0..REGISTER_BASE => Ok(Operand::Literal(raw)),
            REGISTER_BASE..INVALID_OPERAND_START => Ok(Operand::Register((raw - REGISTER_BASE) as u8)),
            _ => Err(DecodeError::InvalidOperand(raw)),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{value}"),
            Operand::Register(index) => write!(f, "r{index}"),
        }
    }
}
