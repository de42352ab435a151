//! Decode errors for wordvm images and instruction words.

use thiserror::Error;

/// Errors that occur while decoding images, opcodes and operands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Opcode word outside the defined table (`0..=21`).
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u16),

    /// Operand word of 32776 or above, or a literal where a register is required.
    #[error("invalid operand: {0}")]
    InvalidOperand(u16),

    /// Image byte count is not a multiple of 2.
    #[error("invalid image length: {0} bytes (must be a multiple of 2)")]
    InvalidLength(usize),

    /// Image holds more words than the 15-bit address space.
    #[error("image too large: {0} words (address space is 32768)")]
    ImageTooLarge(usize),

    /// An instruction's operand words run past the end of the word slice.
    #[error("truncated instruction: expected {expected} words, found {found}")]
    Truncated { expected: usize, found: usize },
}
