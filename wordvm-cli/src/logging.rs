//! Diagnostic logging setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Default filter with `-v`.
const VERBOSE_FILTER: &str = "warn,wordvm_cli=debug,wordvm_vm=debug";

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default filter. Stdout carries program output
/// only, so diagnostics never interleave with it.
pub fn init(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed (e.g. when embedded); keep it.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
