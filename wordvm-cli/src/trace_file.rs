//! Execution trace written to a file.
//!
//! One line per executed instruction (`<pc>: <instruction>`) and one per
//! consumed input character (`input: '<c>'`). Lines are buffered and flushed
//! every [`FLUSH_EVERY`] entries and when the writer is dropped, so a trace of
//! a crashed or interrupted run is at most that many lines short.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::warn;
use wordvm_common::Instruction;
use wordvm_vm::{Machine, Observer};

/// Entries written between flushes.
pub const FLUSH_EVERY: usize = 10;

/// An [`Observer`] that writes trace lines to `W`.
///
/// Observers cannot fail a run, so the first write error is kept, logged,
/// and returned from [`TraceWriter::finish`]; later entries are dropped.
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    /// Taken by `finish`; `None` only afterwards.
    writer: Option<W>,
    pending: usize,
    error: Option<io::Error>,
}

/// A trace written to a file on disk.
pub type TraceFile = TraceWriter<BufWriter<File>>;

impl TraceFile {
    /// Create (or truncate) the trace file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(TraceWriter::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            pending: 0,
            error: None,
        }
    }

    /// Flush remaining entries and return the writer, or the first error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| io::Error::other("trace already finished"))?;
        writer.flush()?;
        Ok(writer)
    }

    fn record(&mut self, line: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        let Some(writer) = self.writer.as_mut() else {
            return;
        };

        let result = writeln!(writer, "{line}").and_then(|()| {
            self.pending += 1;
            if self.pending >= FLUSH_EVERY {
                self.pending = 0;
                writer.flush()
            } else {
                Ok(())
            }
        });

        if let Err(error) = result {
            warn!(%error, "trace disabled after write failure");
            self.error = Some(error);
        }
    }
}

impl<W: Write> Drop for TraceWriter<W> {
    fn drop(&mut self) {
        if self.error.is_some() {
            return;
        }
        if let Some(writer) = self.writer.as_mut() {
            if let Err(error) = writer.flush() {
                warn!(%error, "trace flush failed");
            }
        }
    }
}

impl<W: Write> Observer for TraceWriter<W> {
    fn on_instruction(&mut self, pc: usize, instr: &Instruction, _machine: &Machine) {
        self.record(format_args!("{pc}: {instr}"));
    }

    fn on_input(&mut self, _pc: usize, c: char) {
        self.record(format_args!("input: {c:?}"));
    }
}
