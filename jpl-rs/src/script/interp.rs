//! JPL interpreter session.
//!
//! The [`Interpreter`] owns the variable store, the function table and the
//! program frame, and executes source lines one at a time.  Two line streams
//! feed it: the program source handed to [`Interpreter::run_reader`] (or one
//! of its wrappers), and an independent [`LineSource`] that supplies
//! function bodies and `INPUT` values.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::{debug, trace};

use crate::config::Config;
use crate::console::{LineSource, OutputSink};
use crate::error::{CommandError, Error, FrameError, FunctionError};
use crate::frame::ProgramFrame;
use crate::function::{Function, FunctionTable};
use crate::var::{VarStore, INPUT_VAR};

use super::command::Command;

/// Default maximum nesting of function calls.
pub const DEFAULT_MAX_DEPTH: usize = 500;

/// Line that terminates a function body on the secondary source.
const BODY_END: &str = "}";

/// Grow the stack when less than this remains before entering a call.
const STACK_RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_GROW_SIZE: usize = 1024 * 1024;

// ── Interpreter ───────────────────────────────────────────────────────────────

/// A JPL session.
pub struct Interpreter<I, O> {
    vars: VarStore,
    functions: FunctionTable,
    frame: ProgramFrame,
    /// Secondary line source: function bodies and `INPUT`.
    input: I,
    /// Receives `DISPLAY` output.
    output: O,
    /// Prompt presented before each function-body line.
    body_prompt: Option<String>,
    /// Number of function calls currently executing.
    depth: usize,
    max_depth: usize,
}

impl<I: LineSource, O: OutputSink> Interpreter<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Interpreter {
            vars: VarStore::new(),
            functions: FunctionTable::new(),
            frame: ProgramFrame::new(),
            input,
            output,
            body_prompt: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Apply the interpreter-level settings from `config`.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.body_prompt = Some(config.body_prompt.clone()).filter(|p| !p.is_empty());
        self.max_depth = config.max_depth;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn vars(&self) -> &VarStore {
        &self.vars
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn frame(&self) -> &ProgramFrame {
        &self.frame
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Consume the session, returning its line source and output sink.
    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }

    // ── Program execution ─────────────────────────────────────────────────────

    /// Run the program in the file at `path`.
    pub fn run_file(&mut self, path: &Path) -> Result<(), Error> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), "running program");
        self.run_reader(BufReader::new(file))
    }

    /// Run a program held in memory.
    pub fn run_str(&mut self, src: &str) -> Result<(), Error> {
        self.run_lines(src.lines().map(|l| Ok(l.to_owned())))
    }

    /// Run a program read line by line from `reader`.
    ///
    /// Lines are pulled lazily, one per dispatch.
    pub fn run_reader<R: BufRead>(&mut self, reader: R) -> Result<(), Error> {
        self.run_lines(reader.lines())
    }

    fn run_lines<L>(&mut self, lines: L) -> Result<(), Error>
    where
        L: IntoIterator<Item = std::io::Result<String>>,
    {
        for (i, line) in lines.into_iter().enumerate() {
            let lineno = i + 1;
            let line = line.map_err(|e| Error::from(e).at_line(lineno))?;
            self.exec_line(&line).map_err(|e| e.at_line(lineno))?;
        }
        self.finish()
    }

    /// Check the end-of-program post-condition: the frame must be closed.
    pub fn finish(&self) -> Result<(), Error> {
        match self.frame.name() {
            Some(name) => Err(FrameError::Unterminated { name: name.to_owned() }.into()),
            None => Ok(()),
        }
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Execute one source line.
    pub fn exec_line(&mut self, raw: &str) -> Result<(), Error> {
        let cmd = Command::classify(raw);
        debug!(depth = self.depth, line = raw.trim(), "dispatch");

        if cmd.requires_frame() {
            self.frame.require_open()?;
        }

        match cmd {
            Command::Blank | Command::Comment => {}

            Command::Start { name } => self.frame.open(name)?,

            Command::End { name } => self.frame.close(&name)?,

            Command::DefineFunction { name, params } => {
                let body = self.read_body(&name)?;
                debug!(%name, params = params.len(), lines = body.len(), "define function");
                self.functions.define(Function::new(name, params, body))?;
            }

            Command::Call { name, args } => self.call_function(&name, args)?,

            Command::Display { message } => {
                let rendered = self.vars.render(&message);
                self.output.write_line(&rendered)?;
            }

            Command::Define { name, value } => self.vars.set(name, value),

            Command::Input { prompt } => {
                let value = self
                    .input
                    .read_line(Some(prompt.as_str()))?
                    .ok_or_else(|| Error::InputExhausted {
                        context: "reading INPUT".to_owned(),
                    })?;
                trace!(%value, "input");
                self.vars.set(INPUT_VAR, value);
            }

            Command::Malformed { keyword, reason } => {
                return Err(CommandError::Malformed {
                    keyword,
                    reason,
                    line: raw.trim().to_owned(),
                }
                .into());
            }

            Command::Unknown => {
                return Err(CommandError::Unknown { line: raw.trim().to_owned() }.into());
            }
        }
        Ok(())
    }

    /// Collect a function body from the secondary source, up to a line that
    /// is exactly `}` (after trimming).
    fn read_body(&mut self, name: &str) -> Result<Vec<String>, Error> {
        let mut body = Vec::new();
        loop {
            let line = self
                .input
                .read_line(self.body_prompt.as_deref())?
                .ok_or_else(|| Error::InputExhausted {
                    context: format!("reading body of function {name}"),
                })?;
            let line = line.trim();
            if line == BODY_END {
                return Ok(body);
            }
            body.push(line.to_owned());
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────────────

    /// Call function `name` with `args`.
    ///
    /// Parameters are bound over the caller's variables for the duration of
    /// the call.  Whatever happens in the body, the caller's variables are
    /// restored exactly when the call ends.
    pub fn call_function(&mut self, name: &str, args: Vec<String>) -> Result<(), Error> {
        let func = self.functions.resolve(name, args.len())?;
        if self.depth >= self.max_depth {
            return Err(FunctionError::DepthExceeded {
                name: name.to_owned(),
                limit: self.max_depth,
            }
            .into());
        }

        debug!(%name, depth = self.depth + 1, "call");
        ensure_sufficient_stack(|| -> Result<(), Error> {
            let mut scope = CallScope::enter(self);
            for (param, arg) in func.params.iter().zip(args) {
                scope.vars.set(param.as_str(), arg);
            }
            for line in &func.body {
                scope.exec_line(line)?;
            }
            Ok(())
        })
    }
}

/// Run `f` on a stack with at least [`STACK_RED_ZONE`] bytes free, so deep
/// call chains reach the depth limit instead of overflowing the thread stack.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

// ── CallScope ─────────────────────────────────────────────────────────────────

/// Guard for one function activation.
///
/// Entering saves the variable table and bumps the call depth; dropping
/// restores both.  The body runs through the guard, so every exit path
/// (normal return, `?` propagation, unwinding) goes through the restore.
struct CallScope<'a, I: LineSource, O: OutputSink> {
    interp: &'a mut Interpreter<I, O>,
}

impl<'a, I: LineSource, O: OutputSink> CallScope<'a, I, O> {
    fn enter(interp: &'a mut Interpreter<I, O>) -> Self {
        interp.vars.push_scope();
        interp.depth += 1;
        CallScope { interp }
    }
}

impl<I: LineSource, O: OutputSink> Drop for CallScope<'_, I, O> {
    fn drop(&mut self) {
        let restored = self.interp.vars.pop_scope();
        debug_assert!(restored, "call scope dropped without a saved scope");
        self.interp.depth -= 1;
        trace!(depth = self.interp.depth, "return");
    }
}

impl<I: LineSource, O: OutputSink> Deref for CallScope<'_, I, O> {
    type Target = Interpreter<I, O>;

    fn deref(&self) -> &Self::Target {
        &*self.interp
    }
}

impl<I: LineSource, O: OutputSink> DerefMut for CallScope<'_, I, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.interp
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
