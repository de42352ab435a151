//! Per-instruction observation hooks.
//!
//! Observers see every decoded instruction before it executes and every
//! character consumed by `IN`. They get read-only access to the machine and
//! have no effect on execution.

use tracing::trace;
use wordvm_common::Instruction;

use crate::machine::Machine;

/// Hook invoked by the engine while a program runs.
pub trait Observer {
    /// Called once per decoded instruction, before it is dispatched.
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, machine: &Machine);

    /// Called with each input character after carriage-return normalization.
    fn on_input(&mut self, _pc: usize, _c: char) {}
}

/// The default observer: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl Observer for NoObserver {
    fn on_instruction(&mut self, _: usize, _: &Instruction, _: &Machine) {}
}

/// Emits a `trace`-level event for every instruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, machine: &Machine) {
        trace!(
            pc,
            %instr,
            registers = ?machine.registers(),
            stack_depth = machine.stack().len(),
            "step"
        );
    }

    fn on_input(&mut self, pc: usize, c: char) {
        trace!(pc, input = ?c, "input");
    }
}

/// Records instructions and input in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recorder {
    /// `(pc, instruction)` in execution order.
    pub instructions: Vec<(usize, Instruction)>,
    /// Consumed input characters.
    pub input: Vec<char>,
}

impl Observer for Recorder {
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, _machine: &Machine) {
        self.instructions.push((pc, *instr));
    }

    fn on_input(&mut self, _pc: usize, c: char) {
        self.input.push(c);
    }
}

impl<T: Observer + ?Sized> Observer for &mut T {
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, machine: &Machine) {
        (**self).on_instruction(pc, instr, machine);
    }

    fn on_input(&mut self, pc: usize, c: char) {
        (**self).on_input(pc, c);
    }
}

impl<T: Observer + ?Sized> Observer for Box<T> {
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, machine: &Machine) {
        (**self).on_instruction(pc, instr, machine);
    }

    fn on_input(&mut self, pc: usize, c: char) {
        (**self).on_input(pc, c);
    }
}

/// An optional observer; `None` observes nothing.
impl<T: Observer> Observer for Option<T> {
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, machine: &Machine) {
        if let Some(inner) = self {
            inner.on_instruction(pc, instr, machine);
        }
    }

    fn on_input(&mut self, pc: usize, c: char) {
        if let Some(inner) = self {
            inner.on_input(pc, c);
        }
    }
}

/// Two observers, notified in order.
impl<A: Observer, B: Observer> Observer for (A, B) {
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, machine: &Machine) {
        self.0.on_instruction(pc, instr, machine);
        self.1.on_instruction(pc, instr, machine);
    }

    fn on_input(&mut self, pc: usize, c: char) {
        self.0.on_input(pc, c);
        self.1.on_input(pc, c);
    }
}
