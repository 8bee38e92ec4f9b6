//! Line sources and output sinks.
//!
//! The interpreter never touches the terminal directly.  It pulls lines from
//! a [`LineSource`] (function bodies and `INPUT` values) and writes rendered
//! `DISPLAY` text to an [`OutputSink`].  The binary wires both to the process's
//! stdin/stdout; tests and embedders use [`ScriptedInput`] and `Vec<String>`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

// ── Traits ────────────────────────────────────────────────────────────────────

/// Supplies one line per request.
pub trait LineSource {
    /// Present `prompt` (if any) and read one line without its terminator.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<Option<String>>;
}

/// Receives rendered output, one line at a time.
pub trait OutputSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl OutputSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_owned());
        Ok(())
    }
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<Option<String>> {
        (**self).read_line(prompt)
    }
}

/// Strip a trailing `\n` or `\r\n`.
fn chomp(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

// ── Stdin / stdout ────────────────────────────────────────────────────────────

/// Reads from the process's stdin, printing prompts to stdout.
#[derive(Debug)]
pub struct StdinSource {
    show_prompts: bool,
}

impl StdinSource {
    pub fn new(show_prompts: bool) -> Self {
        Self { show_prompts }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<Option<String>> {
        if let Some(p) = prompt.filter(|p| self.show_prompts && !p.is_empty()) {
            let mut out = io::stdout().lock();
            out.write_all(p.as_bytes())?;
            out.flush()?;
        }
        let mut buf = String::new();
        match io::stdin().lock().read_line(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(chomp(buf))),
        }
    }
}

/// Writes each line to stdout and flushes, so output interleaves with
/// prompts in the right order.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}

// ── In-memory source ──────────────────────────────────────────────────────────

/// A fixed queue of lines.  Every prompt presented is recorded in
/// [`ScriptedInput::prompts`].
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<Option<String>> {
        if let Some(p) = prompt {
            self.prompts.push(p.to_owned());
        }
        Ok(self.lines.pop_front())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
