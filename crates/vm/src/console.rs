//! Character I/O collaborators for the `in` and `out` instructions.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// The machine's view of a terminal: one character in, one character out.
pub trait Console {
    /// Block until one character is available and return it.
    ///
    /// End of input is an error of kind [`io::ErrorKind::UnexpectedEof`].
    fn read_char(&mut self) -> io::Result<char>;

    /// Write one character.
    fn write_char(&mut self, c: char) -> io::Result<()>;

    /// Push any buffered output to its destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_char(&mut self) -> io::Result<char> {
        (**self).read_char()
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        (**self).write_char(c)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// A console over any byte reader and writer, speaking UTF-8.
///
/// Output is flushed at every newline and before each blocking read, so a
/// prompt printed without a trailing newline is visible while the machine
/// waits for input.
#[derive(Debug)]
pub struct IoConsole<R, W> {
    reader: R,
    writer: W,
}

/// Console attached to the process's stdin and stdout.
pub type StdConsole = IoConsole<io::StdinLock<'static>, io::StdoutLock<'static>>;

impl StdConsole {
    pub fn stdio() -> Self {
        IoConsole::new(io::stdin().lock(), io::stdout().lock())
    }
}

impl<R: Read, W: Write> IoConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the console, returning the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> Console for IoConsole<R, W> {
    fn read_char(&mut self) -> io::Result<char> {
        self.writer.flush()?;

        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf[..1])?;
        let width = utf8_width(buf[0]).ok_or_else(|| invalid_utf8(&buf[..1]))?;
        self.reader.read_exact(&mut buf[1..width])?;

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| invalid_utf8(&buf[..width]))
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.writer.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        if c == '\n' {
            self.writer.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Length of the UTF-8 sequence introduced by `lead`.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8(bytes: &[u8]) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid UTF-8 input {bytes:02x?}"),
    )
}

/// An in-memory console: scripted input, captured output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferConsole {
    input: VecDeque<char>,
    output: String,
}

impl BufferConsole {
    /// Create a console whose input is the characters of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            output: String::new(),
        }
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Characters not yet read.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for BufferConsole {
    fn read_char(&mut self) -> io::Result<char> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input exhausted"))
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        self.output.push(c);
        Ok(())
    }
}
