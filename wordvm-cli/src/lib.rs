//! wordvm command-line runner.
//!
//! Loads program images from disk, wires the terminal to the engine's
//! character boundaries, and optionally writes an execution trace.

pub mod commands;
pub mod logging;
pub mod trace_file;
