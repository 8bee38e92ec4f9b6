//! User-defined functions.
//!
//! A function is a name, an ordered parameter list, and the raw text of its
//! body lines.  Bodies are stored unparsed; each line goes through the
//! dispatcher when the function is called.  Functions live for the whole
//! session and cannot be redefined or removed.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::FunctionError;

// ── Function ──────────────────────────────────────────────────────────────────

/// A function defined by a `DEFINE FUNCTION name(p1, p2, …)` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    /// Trimmed body lines, in source order.
    pub body: Vec<String>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
            body,
        }
    }

    /// Number of arguments a call must supply.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

// ── FunctionTable ─────────────────────────────────────────────────────────────

/// Registry of every function defined in the session.
///
/// Entries are reference-counted so a call can hold its function while the
/// body runs, even though that body may define further functions.
#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Rc<Function>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func`.  A name can only be defined once.
    pub fn define(&mut self, func: Function) -> Result<(), FunctionError> {
        if self.functions.contains_key(&func.name) {
            return Err(FunctionError::Redefined { name: func.name });
        }
        self.functions.insert(func.name.clone(), Rc::new(func));
        Ok(())
    }

    /// Look up `name` and check that `argc` arguments fit its parameter list.
    pub fn resolve(&self, name: &str, argc: usize) -> Result<Rc<Function>, FunctionError> {
        let func = self
            .functions
            .get(name)
            .ok_or_else(|| FunctionError::Undefined { name: name.to_owned() })?;
        if func.arity() != argc {
            return Err(FunctionError::ArityMismatch {
                name: name.to_owned(),
                expected: func.arity(),
                found: argc,
            });
        }
        Ok(Rc::clone(func))
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name).map(Rc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Names of all defined functions, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
