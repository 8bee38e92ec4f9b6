//! Error taxonomy.
//!
//! Every failure is fatal to the running program: the session stops at the
//! first error and hands it back to the caller, which decides how to report
//! it.  The variants carry the offending line text or the mismatched names so
//! a diagnostic can be printed without re-deriving anything.

use std::path::PathBuf;

use thiserror::Error;

use crate::script::command::Keyword;

// ── Frame errors ──────────────────────────────────────────────────────────────

/// Violations of the `START … END` program framing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("program '{open}' is already started; cannot start '{requested}'")]
    AlreadyOpen { open: String, requested: String },

    #[error("END for program '{name}' without a matching START")]
    NotOpen { name: String },

    #[error("program end name '{found}' does not match start name '{expected}'")]
    NameMismatch { expected: String, found: String },

    #[error("program must start with a START command")]
    NotStarted,

    #[error("program '{name}' ended without END command")]
    Unterminated { name: String },
}

// ── Function errors ───────────────────────────────────────────────────────────

/// Failures defining or calling a user function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("function {name} not defined")]
    Undefined { name: String },

    #[error("function {name} expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("function {name} is already defined")]
    Redefined { name: String },

    #[error("call to {name} exceeds the maximum call depth ({limit})")]
    DepthExceeded { name: String, limit: usize },
}

// ── Command errors ────────────────────────────────────────────────────────────

/// A line that could not be turned into an executable command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {line}")]
    Unknown { line: String },

    #[error("malformed {keyword} command ({reason}): {line}")]
    Malformed {
        keyword: Keyword,
        reason: &'static str,
        line: String,
    },
}

// ── Umbrella error ────────────────────────────────────────────────────────────

/// Any failure surfaced by the interpreter.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Function(#[from] FunctionError),

    #[error(transparent)]
    Command(#[from] CommandError),

    /// The secondary line source ran dry while a line was required.
    #[error("input exhausted while {context}")]
    InputExhausted { context: String },

    #[error("{}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure attributed to a line of the program source (1-based).
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the program line number on which this error was detected.
    ///
    /// An error that already carries a line number is returned unchanged, so
    /// the innermost attribution wins.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            located @ Error::AtLine { .. } => located,
            other => Error::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// The line number this error is attributed to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The underlying error with any line attribution peeled off.
    pub fn root(&self) -> &Error {
        match self {
            Error::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
