//! Machine state: memory, registers, stack and program counter.

use wordvm_common::operand::{Operand, REGISTER_BASE};
use wordvm_common::word::{self, Word};
use wordvm_common::{Instruction, REGISTER_COUNT};

use crate::error::Fault;

/// Run state of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More instructions can execute.
    Running,
    /// HALT executed, or RET found an empty stack.
    Halted,
    /// A fault stopped the run.
    Faulted,
}

impl Status {
    /// Returns true for `Halted` and `Faulted`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }
}

/// The complete state of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// Word memory, fixed size for the lifetime of the run.
    pub(crate) memory: Vec<u16>,
    /// General registers r0..r7.
    pub(crate) registers: [Word; REGISTER_COUNT],
    /// Unbounded LIFO stack.
    pub(crate) stack: Vec<Word>,
    /// Address of the instruction being (or about to be) executed.
    pub(crate) pc: usize,
    pub(crate) status: Status,
}

impl Machine {
    /// Create a machine over `memory` with zeroed registers, an empty stack
    /// and the program counter at 0.
    pub fn new(memory: Vec<u16>) -> Self {
        Self {
            memory,
            registers: [0; REGISTER_COUNT],
            stack: Vec::new(),
            pc: 0,
            status: Status::Running,
        }
    }

    pub fn memory(&self) -> &[u16] {
        &self.memory
    }

    pub fn registers(&self) -> &[Word; REGISTER_COUNT] {
        &self.registers
    }

    /// Value of register `index`, or `None` if `index >= 8`.
    pub fn register(&self, index: usize) -> Option<Word> {
        self.registers.get(index).copied()
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[Word] {
        &self.stack
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Preset a register. The value is reduced modulo 32768.
    pub fn set_register(&mut self, index: usize, value: Word) -> Result<(), Fault> {
        let slot = self
            .registers
            .get_mut(index)
            .ok_or(Fault::InvalidOperand {
                at: self.pc,
                value: REGISTER_BASE.saturating_add(u16::try_from(index).unwrap_or(u16::MAX)),
            })?;
        *slot = word::wrap(value as u32);
        Ok(())
    }

    /// Overwrite one memory cell outside of normal execution.
    pub fn poke(&mut self, address: usize, value: Word) -> Result<(), Fault> {
        self.write_memory(address, value)
    }

    // ---- Operand resolution ----

    /// Resolve a raw operand to its value: registers read through, literals
    /// pass unchanged.
    pub(crate) fn resolve(&self, raw: u16) -> Result<Word, Fault> {
        match Operand::try_from(raw) {
            Ok(Operand::Literal(value)) => Ok(value),
            Ok(Operand::Register(index)) => Ok(self.registers[index as usize]),
            Err(_) => Err(Fault::InvalidOperand {
                at: self.pc,
                value: raw,
            }),
        }
    }

    /// Register index named by a destination operand.
    pub(crate) fn register_index(&self, raw: u16) -> Result<usize, Fault> {
        Operand::register_index(raw).map_err(|_| Fault::InvalidOperand {
            at: self.pc,
            value: raw,
        })
    }

    /// Write `value` (mod 32768) to the register named by `dest`.
    pub(crate) fn store(&mut self, dest: u16, value: u32) -> Result<(), Fault> {
        let index = self.register_index(dest)?;
        self.registers[index] = word::wrap(value);
        Ok(())
    }

    // ---- Memory ----

    pub(crate) fn read_memory(&self, address: usize) -> Result<u16, Fault> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Fault::MemoryOutOfBounds { at: self.pc, address })
    }

    pub(crate) fn write_memory(&mut self, address: usize, value: Word) -> Result<(), Fault> {
        let at = self.pc;
        let cell = self
            .memory
            .get_mut(address)
            .ok_or(Fault::MemoryOutOfBounds { at, address })?;
        *cell = value;
        Ok(())
    }

    /// Decode the instruction at the program counter.
    pub(crate) fn fetch(&self) -> Result<Instruction, Fault> {
        let words = self.memory.get(self.pc..).unwrap_or(&[]);
        if words.is_empty() {
            return Err(Fault::MemoryOutOfBounds {
                at: self.pc,
                address: self.pc,
            });
        }
        Instruction::decode(words).map_err(|e| Fault::from_decode(self.pc, e))
    }

    // ---- Stack ----

    pub(crate) fn push(&mut self, value: Word) {
        self.stack.push(value);
    }

    /// Pop the stack. Empty stack is a fault.
    pub(crate) fn pop(&mut self) -> Result<Word, Fault> {
        self.stack
            .pop()
            .ok_or(Fault::StackUnderflow { at: self.pc })
    }
}
