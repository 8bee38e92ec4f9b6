//! JPL: an interpreter for line-oriented command scripts.
//!
//! The library is the execution engine; the `jpl` binary adds argument
//! handling, configuration and the terminal.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod frame;
pub mod function;
pub mod script;
pub mod var;

pub use error::Error;
pub use script::Interpreter;
