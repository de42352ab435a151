//! Instruction decoding for the wordvm instruction set.
//!
//! An instruction is one opcode word followed by `arity` raw operand words:
//! ```text
//! word 0:       opcode (0..=21)
//! words 1..=n:  raw operands, n = opcode.arity()
//! ```
//! Operands are kept raw here. Whether a slot is a destination register or a
//! resolved value depends on the opcode, so classification happens at
//! execution time.

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::{Opcode, MAX_ARITY};
use crate::operand::Operand;

/// A single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Raw operand words. Only the first `opcode.arity()` are meaningful.
    args: [u16; MAX_ARITY],
}

impl Instruction {
    /// Create an instruction from an opcode and its raw operands.
    ///
    /// Operands beyond the opcode's arity are ignored; missing ones are zero.
    pub fn new(opcode: Opcode, operands: &[u16]) -> Self {
        let mut args = [0u16; MAX_ARITY];
        for (slot, &raw) in args.iter_mut().zip(operands.iter().take(opcode.arity())) {
            *slot = raw;
        }
        Self { opcode, args }
    }

    /// Decode the instruction starting at `words[0]`.
    pub fn decode(words: &[u16]) -> Result<Self, DecodeError> {
        let (&first, rest) = words.split_first().ok_or(DecodeError::Truncated {
            expected: 1,
            found: 0,
        })?;
        let opcode = Opcode::try_from(first)?;
        let arity = opcode.arity();

        if rest.len() < arity {
            return Err(DecodeError::Truncated {
                expected: 1 + arity,
                found: 1 + rest.len(),
            });
        }

        Ok(Self::new(opcode, &rest[..arity]))
    }

    /// Encode to words: the opcode followed by its operands.
    pub fn encode(&self) -> Vec<u16> {
        let mut words = Vec::with_capacity(self.len());
        words.push(self.opcode as u16);
        words.extend_from_slice(self.operands());
        words
    }

    /// The raw operand words, exactly `arity` long.
    pub fn operands(&self) -> &[u16] {
        &self.args[..self.opcode.arity()]
    }

    /// All operand slots, zero-padded past the arity.
    pub fn args(&self) -> [u16; MAX_ARITY] {
        self.args
    }

    /// Number of words this instruction occupies.
    pub fn len(&self) -> usize {
        1 + self.opcode.arity()
    }

    /// Always false: every instruction has at least the opcode word.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for &raw in self.operands() {
            match Operand::try_from(raw) {
                Ok(operand) => write!(f, " {operand}")?,
                Err(_) => write!(f, " <{raw}>")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_add_with_register_operands() {
        let words = [9, 32768, 32769, 4, 19, 32768];
        let instr = Instruction::decode(&words).unwrap();
        assert_eq!(instr.opcode, Opcode::Add);
        assert_eq!(instr.operands(), &[32768, 32769, 4]);
        assert_eq!(instr.len(), 4);
    }

    #[test]
    fn decode_ignores_trailing_words() {
        let instr = Instruction::decode(&[19, 65, 0, 0]).unwrap();
        assert_eq!(instr.opcode, Opcode::Out);
        assert_eq!(instr.operands(), &[65]);
    }

    #[test]
    fn decode_zero_arity() {
        let instr = Instruction::decode(&[21]).unwrap();
        assert_eq!(instr.opcode, Opcode::Noop);
        assert!(instr.operands().is_empty());
        assert_eq!(instr.len(), 1);
    }

    #[test]
    fn decode_invalid_opcode() {
        assert_eq!(
            Instruction::decode(&[22, 0, 0]),
            Err(DecodeError::InvalidOpcode(22))
        );
    }

    #[test]
    fn decode_truncated() {
        assert_eq!(
            Instruction::decode(&[9, 32768]),
            Err(DecodeError::Truncated {
                expected: 4,
                found: 2
            })
        );
        assert_eq!(
            Instruction::decode(&[]),
            Err(DecodeError::Truncated {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn encode_uses_arity() {
        let instr = Instruction::new(Opcode::Set, &[32768, 7, 99]);
        assert_eq!(instr.encode(), vec![1, 32768, 7]);
        assert_eq!(Instruction::new(Opcode::Halt, &[]).encode(), vec![0]);
    }

    #[test]
    fn display_renders_registers_and_literals() {
        let instr = Instruction::new(Opcode::Add, &[32768, 32769, 4]);
        assert_eq!(instr.to_string(), "add r0 r1 4");
        assert_eq!(Instruction::new(Opcode::Ret, &[]).to_string(), "ret");
        let bad = Instruction::new(Opcode::Out, &[40000]);
        assert_eq!(bad.to_string(), "out <40000>");
    }
}
