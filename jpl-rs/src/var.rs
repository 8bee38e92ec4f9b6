//! Variable store.
//!
//! A flat name → string table.  Bindings are kept in insertion order because
//! [`VarStore::render`] substitutes them in that order, and the order is
//! observable whenever one variable name occurs inside another name or value.
//!
//! Function calls use dynamic scoping: [`VarStore::push_scope`] saves the
//! whole table and [`VarStore::pop_scope`] reinstates it verbatim.

use aho_corasick::AhoCorasick;
use tracing::trace;

/// Name of the variable written by `INPUT`.
pub const INPUT_VAR: &str = "input";

// ── Binding ───────────────────────────────────────────────────────────────────

/// One `name = value` pair plus a matcher for `name`, built once at insertion.
#[derive(Debug, Clone)]
struct Binding {
    name: String,
    value: String,
    finder: AhoCorasick,
}

impl Binding {
    fn new(name: String, value: String) -> Self {
        let finder = AhoCorasick::new([name.as_str()]);
        Self { name, value, finder }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// An independent copy of every binding in a [`VarStore`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    bindings: Vec<Binding>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ── VarStore ──────────────────────────────────────────────────────────────────

/// Insertion-ordered variable table with a stack of saved scopes.
#[derive(Debug, Default)]
pub struct VarStore {
    bindings: Vec<Binding>,
    saved: Vec<Snapshot>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a variable.
    ///
    /// A new name is appended to the iteration order; overwriting an existing
    /// name keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.bindings.iter_mut().find(|b| b.name == name) {
            Some(slot) => slot.value = value,
            None => self.bindings.push(Binding::new(name, value)),
        }
    }

    /// Get the value of a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.value.as_str())
    }

    /// Returns `true` if the variable is set.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    /// Iterate over all variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|b| (b.name.as_str(), b.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    // ── Substitution ──────────────────────────────────────────────────────────

    /// Substitute every variable into `message`.
    ///
    /// For each binding in insertion order, every non-overlapping occurrence
    /// of the name is replaced by the value, and the result feeds the next
    /// pass.  Matching is plain substring matching: `A` is replaced inside
    /// `BANANA`, inside literal text, and inside values substituted by an
    /// earlier pass.  There is no escape syntax.
    pub fn render(&self, message: &str) -> String {
        let mut out = message.to_owned();
        for b in &self.bindings {
            if b.name.is_empty() || !b.finder.is_match(&out) {
                continue;
            }
            out = b.finder.replace_all(&out, &[b.value.as_str()]);
            trace!(name = %b.name, result = %out, "substituted");
        }
        out
    }

    // ── Scoping ───────────────────────────────────────────────────────────────

    /// Copy every binding.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bindings: self.bindings.clone(),
        }
    }

    /// Replace the whole table with `snapshot`.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.bindings = snapshot.bindings;
    }

    /// Save the current table on the scope stack.
    pub fn push_scope(&mut self) {
        let snap = self.snapshot();
        self.saved.push(snap);
    }

    /// Reinstate the most recently saved table.  Returns `false` if no scope
    /// was saved.
    pub fn pop_scope(&mut self) -> bool {
        match self.saved.pop() {
            Some(snap) => {
                self.restore(snap);
                true
            }
            None => false,
        }
    }

    /// Number of saved scopes (i.e. active calls).
    pub fn scope_depth(&self) -> usize {
        self.saved.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
