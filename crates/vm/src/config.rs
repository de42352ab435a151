//! Run configuration.

/// Knobs that change how a run interacts with its environment.
///
/// None of these alter instruction semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Write each character consumed by `IN` back to the output.
    pub echo_input: bool,
    /// Stop [`Vm::run`](crate::Vm::run) after this many instructions.
    pub max_steps: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            echo_input: true,
            max_steps: None,
        }
    }
}

impl Config {
    pub fn with_echo(mut self, echo_input: bool) -> Self {
        self.echo_input = echo_input;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }
}
