//! Main execution loop and opcode dispatch for the wordvm engine.

use tracing::{debug, warn};
use wordvm_common::word::{self, Word};
use wordvm_common::{Instruction, Opcode};

use crate::config::Config;
use crate::error::Fault;
use crate::io::{Input, Output};
use crate::machine::{Machine, Status};
use crate::observer::{NoObserver, Observer};

/// Why a run stopped without faulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// HALT executed.
    Halt,
    /// RET executed with an empty stack.
    ReturnOnEmptyStack,
    /// The configured step limit was reached. The machine is still running.
    StepLimit,
}

/// Summary of a completed [`Vm::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub reason: HaltReason,
    /// Instructions executed by this call to `run`.
    pub steps: u64,
}

/// Where the program counter goes after an instruction.
enum Flow {
    /// Fall through past the instruction's words.
    Next,
    /// Replace the program counter.
    Jump(usize),
    /// Stop cleanly.
    Halt(HaltReason),
}

/// The execution engine: owns a [`Machine`] and its I/O for one run.
pub struct Vm<I, O, T = NoObserver> {
    machine: Machine,
    input: I,
    output: O,
    observer: T,
    config: Config,
    /// Instructions executed over the lifetime of this VM.
    steps: u64,
    halt: Option<HaltReason>,
    fault: Option<Fault>,
}

impl<I: Input, O: Output> Vm<I, O, NoObserver> {
    /// Create a VM over `memory` with the default configuration.
    pub fn new(memory: Vec<u16>, input: I, output: O) -> Self {
        Self::with_config(memory, input, output, Config::default())
    }

    pub fn with_config(memory: Vec<u16>, input: I, output: O, config: Config) -> Self {
        Self {
            machine: Machine::new(memory),
            input,
            output,
            observer: NoObserver,
            config,
            steps: 0,
            halt: None,
            fault: None,
        }
    }
}

impl<I: Input, O: Output, T: Observer> Vm<I, O, T> {
    /// Replace the observer.
    pub fn with_observer<U: Observer>(self, observer: U) -> Vm<I, O, U> {
        Vm {
            machine: self.machine,
            input: self.input,
            output: self.output,
            observer,
            config: self.config,
            steps: self.steps,
            halt: self.halt,
            fault: self.fault,
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Mutable access for patching state between steps.
    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn observer(&self) -> &T {
        &self.observer
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Instructions executed so far, across all calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn into_parts(self) -> (Machine, I, O, T) {
        (self.machine, self.input, self.output, self.observer)
    }

    /// Execute until HALT, RET on an empty stack, a fault, or the step limit.
    pub fn run(&mut self) -> Result<Exit, Fault> {
        debug!(
            memory_words = self.machine.memory.len(),
            pc = self.machine.pc,
            "run started"
        );

        let mut steps = 0u64;
        while !self.machine.status.is_terminal() {
            if self.config.max_steps.is_some_and(|max| steps >= max) {
                debug!(steps, pc = self.machine.pc, "step limit reached");
                return Ok(Exit {
                    reason: HaltReason::StepLimit,
                    steps,
                });
            }
            self.step()?;
            steps += 1;
        }

        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        Ok(Exit {
            reason: self.halt.unwrap_or(HaltReason::Halt),
            steps,
        })
    }

    /// Execute exactly one instruction.
    ///
    /// On a halted or faulted machine this does nothing and reports the
    /// current status.
    pub fn step(&mut self) -> Result<Status, Fault> {
        if self.machine.status.is_terminal() {
            return Ok(self.machine.status);
        }

        match self.cycle() {
            Ok(()) => Ok(self.machine.status),
            Err(fault) => {
                warn!(%fault, steps = self.steps, "run faulted");
                self.machine.status = Status::Faulted;
                self.fault = Some(fault.clone());
                Err(fault)
            }
        }
    }

    /// Fetch, decode, dispatch, and move the program counter.
    fn cycle(&mut self) -> Result<(), Fault> {
        let pc = self.machine.pc;
        let instr = self.machine.fetch()?;
        self.observer.on_instruction(pc, &instr, &self.machine);

        let next = pc + instr.len();
        let flow = self.dispatch(&instr, next)?;
        self.steps += 1;

        let target = match flow {
            Flow::Next => next,
            Flow::Jump(target) => target,
            Flow::Halt(reason) => {
                debug!(pc, steps = self.steps, ?reason, "halted");
                self.machine.status = Status::Halted;
                self.halt = Some(reason);
                return Ok(());
            }
        };

        // The program counter must name a memory cell at every boundary.
        if target >= self.machine.memory.len() {
            return Err(Fault::MemoryOutOfBounds {
                at: pc,
                address: target,
            });
        }
        self.machine.pc = target;
        Ok(())
    }

    fn dispatch(&mut self, instr: &Instruction, next: usize) -> Result<Flow, Fault> {
        let [a, b, c] = instr.args();

        match instr.opcode {
            Opcode::Halt => Ok(Flow::Halt(HaltReason::Halt)),
            Opcode::Noop => Ok(Flow::Next),

            // Registers & stack
            Opcode::Set => {
                let value = self.machine.resolve(b)?;
                self.machine.store(a, value as u32)?;
                Ok(Flow::Next)
            }
            Opcode::Push => {
                let value = self.machine.resolve(a)?;
                self.machine.push(value);
                Ok(Flow::Next)
            }
            Opcode::Pop => {
                self.machine.register_index(a)?;
                let value = self.machine.pop()?;
                self.machine.store(a, value as u32)?;
                Ok(Flow::Next)
            }

            // Comparison
            Opcode::Eq => self.exec_binary(a, b, c, |x, y| Word::from(x == y)),
            Opcode::Gt => self.exec_binary(a, b, c, |x, y| Word::from(x > y)),

            // Control transfer
            Opcode::Jmp => Ok(Flow::Jump(self.machine.resolve(a)? as usize)),
            Opcode::Jt => self.exec_branch(a, b, true),
            Opcode::Jf => self.exec_branch(a, b, false),

            // Arithmetic & bitwise
            Opcode::Add => self.exec_binary(a, b, c, word::add),
            Opcode::Mult => self.exec_binary(a, b, c, word::mul),
            Opcode::Mod => self.exec_mod(a, b, c),
            Opcode::And => self.exec_binary(a, b, c, word::and),
            Opcode::Or => self.exec_binary(a, b, c, word::or),
            Opcode::Not => {
                let value = self.machine.resolve(b)?;
                self.machine.store(a, word::not(value) as u32)?;
                Ok(Flow::Next)
            }

            // Memory
            Opcode::Rmem => self.exec_rmem(a, b),
            Opcode::Wmem => {
                let address = self.machine.resolve(a)?;
                let value = self.machine.resolve(b)?;
                self.machine.write_memory(address as usize, value)?;
                Ok(Flow::Next)
            }

            // Subroutines
            Opcode::Call => self.exec_call(a, next),
            Opcode::Ret => Ok(match self.machine.stack.pop() {
                Some(address) => Flow::Jump(address as usize),
                None => Flow::Halt(HaltReason::ReturnOnEmptyStack),
            }),

            // I/O
            Opcode::Out => self.exec_out(a),
            Opcode::In => self.exec_in(a),
        }
    }

    // ---- Handlers ----

    /// `op a b c`: register a = f(b, c).
    fn exec_binary(
        &mut self,
        dest: u16,
        lhs: u16,
        rhs: u16,
        op: fn(Word, Word) -> Word,
    ) -> Result<Flow, Fault> {
        let x = self.machine.resolve(lhs)?;
        let y = self.machine.resolve(rhs)?;
        self.machine.store(dest, op(x, y) as u32)?;
        Ok(Flow::Next)
    }

    fn exec_mod(&mut self, dest: u16, lhs: u16, rhs: u16) -> Result<Flow, Fault> {
        let x = self.machine.resolve(lhs)?;
        let y = self.machine.resolve(rhs)?;
        let remainder = word::rem(x, y).ok_or(Fault::DivideByZero {
            at: self.machine.pc,
        })?;
        self.machine.store(dest, remainder as u32)?;
        Ok(Flow::Next)
    }

    /// JT (`jump_if_nonzero`) and JF. Both operands resolve even when the
    /// branch is not taken.
    fn exec_branch(&mut self, test: u16, target: u16, jump_if_nonzero: bool) -> Result<Flow, Fault> {
        let value = self.machine.resolve(test)?;
        let target = self.machine.resolve(target)?;
        if (value != 0) == jump_if_nonzero {
            Ok(Flow::Jump(target as usize))
        } else {
            Ok(Flow::Next)
        }
    }

    /// `rmem a b`: the cell at b is itself an operand, so a cell holding a
    /// register reference reads that register.
    fn exec_rmem(&mut self, dest: u16, address: u16) -> Result<Flow, Fault> {
        let address = self.machine.resolve(address)?;
        let cell = self.machine.read_memory(address as usize)?;
        let value = self.machine.resolve(cell)?;
        self.machine.store(dest, value as u32)?;
        Ok(Flow::Next)
    }

    fn exec_call(&mut self, target: u16, next: usize) -> Result<Flow, Fault> {
        let target = self.machine.resolve(target)?;
        let return_address = Word::try_from(next)
            .ok()
            .filter(|&address| word::is_word(address))
            .ok_or(Fault::MemoryOutOfBounds {
                at: self.machine.pc,
                address: next,
            })?;
        self.machine.push(return_address);
        Ok(Flow::Jump(target as usize))
    }

    fn exec_out(&mut self, operand: u16) -> Result<Flow, Fault> {
        let code = self.machine.resolve(operand)?;
        let c = char::from_u32(code as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
        let at = self.machine.pc;
        self.output
            .write_char(c)
            .map_err(|e| Fault::io(at, e))?;
        Ok(Flow::Next)
    }

    /// `in a`: block for one character, normalize CR to LF, optionally echo,
    /// store its code point. Characters beyond the word range fault.
    fn exec_in(&mut self, dest: u16) -> Result<Flow, Fault> {
        let at = self.machine.pc;
        self.machine.register_index(dest)?;

        self.output.flush().map_err(|e| Fault::io(at, e))?;
        let c = match self.input.read_char().map_err(|e| Fault::io(at, e))? {
            Some('\r') => '\n',
            Some(c) => c,
            None => return Err(Fault::InputExhausted { at }),
        };
        let code = u32::from(c);
        if code > u32::from(word::MAX_WORD) {
            return Err(Fault::InvalidInput { at, code });
        }

        self.observer.on_input(at, c);
        if self.config.echo_input {
            self.output.write_char(c).map_err(|e| Fault::io(at, e))?;
        }

        self.machine.store(dest, code)?;
        Ok(Flow::Next)
    }
}
