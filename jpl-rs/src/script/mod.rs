//! JPL command language.
//!
//! A JPL program is a sequence of line-oriented commands:
//!
//! - Program framing: `START *name {` … `} END *name`
//! - Variables: `DEFINE name value…`, `INPUT prompt`
//! - Functions: `DEFINE FUNCTION name(p1, p2)` (body read from the secondary
//!   line source up to a lone `}`), `CALL name(a1, a2)`
//! - Output: `DISPLAY text`, with every variable name in `text` replaced by
//!   its value
//! - `#` comments and blank lines
//!
//! # Quick start
//!
//! ```rust
//! use jpl::console::ScriptedInput;
//! use jpl::script::Interpreter;
//!
//! let mut interp = Interpreter::new(ScriptedInput::default(), Vec::<String>::new());
//! interp
//!     .run_str("START *Demo {\nDEFINE NAME World\nDISPLAY Hello NAME\n} END *Demo")
//!     .unwrap();
//! assert_eq!(interp.output(), &["Hello World"]);
//! ```
//!
//! Substitution is plain text replacement, so names collide with ordinary
//! words: after `DEFINE A 1`, `DISPLAY BANANA` prints `B1N1N1`.

pub mod command;
pub mod interp;

// Re-exports for convenience.
pub use command::{Command, Keyword};
pub use interp::Interpreter;
