use crate::buffer::ShellBuffer;
use std::io::{Result as IoResult, Write};

/// Where a command writes its output.
///
/// Intermediate pipeline stages get a [`BufferOutput`]; the last stage writes to
/// the terminal through a [`TerminalOutput`].
pub trait Output {
    /// Print text without ending the current line.
    fn print(&mut self, text: &str) -> IoResult<()>;

    /// Print `line` and end it.
    fn println(&mut self, line: &str) -> IoResult<()>;

    /// Print an empty line.
    fn newline(&mut self) -> IoResult<()> {
        self.println("")
    }
}

/// Memory-backed output collecting lines into a [`ShellBuffer`].
///
/// Text passed to [`Output::print`] is held until the line is ended, so
/// `print("a"); println("b")` produces the single line `ab`. Embedded `\n`
/// characters end lines too: the buffer holds one entry per line.
#[derive(Debug, Default)]
pub struct BufferOutput {
    buffer: ShellBuffer,
    pending: String,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, not counting an unfinished `print`.
    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    /// Finish writing and hand over the collected lines.
    ///
    /// An unfinished line is kept as the last line.
    pub fn into_buffer(mut self) -> ShellBuffer {
        if !self.pending.is_empty() {
            self.buffer.push_line(std::mem::take(&mut self.pending));
        }
        self.buffer
    }

    // Move every newline-terminated piece of `pending` into the buffer.
    fn take_complete_lines(&mut self) {
        while let Some(pos) = self.pending.find('\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.pop();
            self.buffer.push_line(line);
        }
    }
}

impl Output for BufferOutput {
    fn print(&mut self, text: &str) -> IoResult<()> {
        self.pending.push_str(text);
        self.take_complete_lines();
        Ok(())
    }

    fn println(&mut self, line: &str) -> IoResult<()> {
        self.pending.push_str(line);
        self.take_complete_lines();
        self.buffer.push_line(std::mem::take(&mut self.pending));
        Ok(())
    }
}

/// Output going straight to a writer, normally standard output.
pub struct TerminalOutput<W: Write> {
    out: W,
}

impl<W: Write> TerminalOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalOutput<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Output for TerminalOutput<W> {
    fn print(&mut self, text: &str) -> IoResult<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    fn println(&mut self, line: &str) -> IoResult<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}
