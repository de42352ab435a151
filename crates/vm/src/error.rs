//! Runtime faults for the wordvm engine.
//!
//! Every fault is fatal to the run and carries the program counter (`at`) of
//! the instruction that raised it.

use thiserror::Error;
use wordvm_common::DecodeError;

/// Conditions that abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Operand word of 32776 or above, or a literal used as a destination register.
    #[error("invalid operand {value} at address {at}")]
    InvalidOperand { at: usize, value: u16 },

    /// POP with an empty stack.
    #[error("stack underflow at address {at}")]
    StackUnderflow { at: usize },

    /// MOD with a zero divisor.
    #[error("division by zero at address {at}")]
    DivideByZero { at: usize },

    /// Opcode word outside the table.
    #[error("invalid opcode {opcode} at address {at}")]
    InvalidOpcode { at: usize, opcode: u16 },

    /// Fetch, RMEM or WMEM touched an address outside memory.
    #[error("memory address {address} out of bounds at address {at}")]
    MemoryOutOfBounds { at: usize, address: usize },

    /// The input source closed while IN was waiting.
    #[error("input exhausted at address {at}")]
    InputExhausted { at: usize },

    /// IN read a character whose code point does not fit a word.
    #[error("input character U+{code:04X} outside the word range at address {at}")]
    InvalidInput { at: usize, code: u32 },

    /// The input source or output sink failed.
    #[error("i/o error at address {at}: {message}")]
    Io { at: usize, message: String },
}

impl Fault {
    /// Program counter of the faulting instruction.
    pub fn at(&self) -> usize {
        match self {
            Fault::InvalidOperand { at, .. }
            | Fault::StackUnderflow { at }
            | Fault::DivideByZero { at }
            | Fault::InvalidOpcode { at, .. }
            | Fault::MemoryOutOfBounds { at, .. }
            | Fault::InputExhausted { at }
            | Fault::InvalidInput { at, .. }
            | Fault::Io { at, .. } => *at,
        }
    }

    /// Attach a program counter to a decode error.
    ///
    /// A truncated instruction is reported as a fetch past the end of memory,
    /// at the first missing word.
    pub(crate) fn from_decode(at: usize, error: DecodeError) -> Self {
        match error {
            DecodeError::InvalidOpcode(opcode) => Fault::InvalidOpcode { at, opcode },
            DecodeError::InvalidOperand(value) => Fault::InvalidOperand { at, value },
            DecodeError::Truncated { found, .. } => Fault::MemoryOutOfBounds {
                at,
                address: at + found,
            },
            DecodeError::InvalidLength(_) | DecodeError::ImageTooLarge(_) => Fault::Io {
                at,
                message: error.to_string(),
            },
        }
    }

    pub(crate) fn io(at: usize, error: std::io::Error) -> Self {
        Fault::Io {
            at,
            message: error.to_string(),
        }
    }
}
