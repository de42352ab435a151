//! wordvm engine — executes 15-bit word programs.
//!
//! The machine has:
//! - Eight general registers holding 15-bit words
//! - One unbounded stack of words
//! - A flat word memory loaded from the program image
//!
//! Character I/O goes through the injected [`Input`] and [`Output`]
//! boundaries; tracing goes through an optional [`Observer`].
//!
//! # Usage
//!
//! ```
//! use wordvm_vm::{run, HaltReason, NoInput};
//!
//! // add r0 r1 4; out r0; halt  (r0 = 4, emitted as U+0004)
//! let memory = vec![9, 32768, 32769, 4, 19, 32768, 0];
//! let mut output = String::new();
//!
//! let exit = run(memory, NoInput, &mut output).unwrap();
//! assert_eq!(exit.reason, HaltReason::Halt);
//! assert_eq!(output, "\u{4}");
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod io;
pub mod machine;
pub mod observer;

pub use config::Config;
pub use error::Fault;
pub use execute::{Exit, HaltReason, Vm};
pub use io::{Input, NoInput, NoOutput, Output, ReadInput, WriteOutput};
pub use machine::{Machine, Status};
pub use observer::{LogObserver, NoObserver, Observer, Recorder};

/// Execute a program to completion with the default configuration.
///
/// # Errors
///
/// Returns the [`Fault`] that stopped the run (invalid operand, stack
/// underflow, division by zero, invalid opcode, out-of-bounds memory access,
/// exhausted input, an input character beyond the word range or an I/O
/// failure).
pub fn run<I: Input, O: Output>(memory: Vec<u16>, input: I, output: O) -> Result<Exit, Fault> {
    let mut vm = Vm::new(memory, input, output);
    vm.run()
}
