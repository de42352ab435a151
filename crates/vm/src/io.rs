//! Character I/O boundaries.
//!
//! The engine never touches a terminal directly. `OUT` writes through an
//! [`Output`] and `IN` reads through an [`Input`]; both are injected when the
//! [`Vm`](crate::Vm) is built.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// A source of input characters.
pub trait Input {
    /// Block until one character is available.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

/// A sink for output characters.
pub trait Output {
    /// Emit one character.
    fn write_char(&mut self, c: char) -> io::Result<()>;

    /// Push buffered characters to the underlying device.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Input + ?Sized> Input for &mut T {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        (**self).read_char()
    }
}

impl<T: Output + ?Sized> Output for &mut T {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        (**self).write_char(c)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Queued characters, consumed front first.
impl Input for VecDeque<char> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.pop_front())
    }
}

/// Collects output in memory.
impl Output for String {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        self.push(c);
        Ok(())
    }
}

/// An input that is always exhausted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl Input for NoInput {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(None)
    }
}

/// An output that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutput;

impl Output for NoOutput {
    fn write_char(&mut self, _: char) -> io::Result<()> {
        Ok(())
    }
}

/// Reads one byte per character from any [`Read`].
///
/// Bytes map to the code point of the same value.
#[derive(Debug)]
pub struct ReadInput<R> {
    inner: R,
}

impl<R: Read> ReadInput<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Input for ReadInput<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0] as char)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Writes characters UTF-8 encoded to any [`Write`].
#[derive(Debug)]
pub struct WriteOutput<W> {
    inner: W,
}

impl<W: Write> WriteOutput<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Output for WriteOutput<W> {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.inner.write_all(c.encode_utf8(&mut buf).as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
