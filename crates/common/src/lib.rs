//! wordvm common types and instruction encoding.
//!
//! This crate provides the foundational data structures for the wordvm
//! instruction set:
//!
//! - [`word`] — the 15-bit word domain and modulo-32768 arithmetic
//! - [`Operand`] — literal / register operand encoding
//! - [`Opcode`] — the 22 opcodes and their arities
//! - [`Instruction`] — an opcode with its raw operand words
//! - [`Image`] — a program image of little-endian words
//! - [`DecodeError`] — errors from decoding images and words
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime cost)
//! and has no other dependencies.

pub mod error;
pub mod image;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod word;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use image::Image;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::{Operand, REGISTER_COUNT};
pub use word::{Word, ADDRESS_SPACE, MAX_WORD};
