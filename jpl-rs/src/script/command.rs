//! Line classification.
//!
//! Every source line maps to exactly one [`Command`].  Keywords are literal,
//! case-sensitive and matched by prefix, tested in this order:
//!
//! | Prefix | Command |
//! |--------|---------|
//! | *(blank)* / `#` | no-op |
//! | `START` | `START *name {` |
//! | `} END` | `} END *name` |
//! | `DEFINE FUNCTION` | `DEFINE FUNCTION name(p1, p2, …)` |
//! | `CALL` | `CALL name(a1, a2, …)` |
//! | `DISPLAY` | `DISPLAY text` |
//! | `DEFINE` | `DEFINE name value…` |
//! | `INPUT` | `INPUT prompt` |
//!
//! A line whose keyword is recognised but whose arguments are not is
//! classified as [`Command::Malformed`] rather than failing outright, so the
//! dispatcher can still apply the "program not started" check first.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

// ── Keyword ───────────────────────────────────────────────────────────────────

/// The command keywords, used to label malformed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Start,
    End,
    DefineFunction,
    Call,
    Display,
    Define,
    Input,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Start => "START",
            Keyword::End => "END",
            Keyword::DefineFunction => "DEFINE FUNCTION",
            Keyword::Call => "CALL",
            Keyword::Display => "DISPLAY",
            Keyword::Define => "DEFINE",
            Keyword::Input => "INPUT",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

/// A classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Empty or whitespace-only.
    Blank,
    /// `# …`
    Comment,
    /// `START *name {`
    Start { name: String },
    /// `} END *name`
    End { name: String },
    /// `DEFINE FUNCTION name(p1, p2, …)`; the body follows on the secondary source.
    DefineFunction { name: String, params: Vec<String> },
    /// `CALL name(a1, a2, …)`
    Call { name: String, args: Vec<String> },
    /// `DISPLAY text`
    Display { message: String },
    /// `DEFINE name value…`
    Define { name: String, value: String },
    /// `INPUT prompt`
    Input { prompt: String },
    /// A recognised keyword with unusable arguments.
    Malformed { keyword: Keyword, reason: &'static str },
    /// No keyword matched.
    Unknown,
}

impl Command {
    /// Classify one raw source line.
    pub fn classify(raw: &str) -> Command {
        let line = raw.trim();

        if line.is_empty() {
            return Command::Blank;
        }
        if line.starts_with('#') {
            return Command::Comment;
        }
        if line.starts_with("START") {
            return parse_start(line);
        }
        if line.starts_with("} END") {
            return parse_end(line);
        }
        if let Some(rest) = line.strip_prefix("DEFINE FUNCTION") {
            return match parse_signature(rest) {
                Ok((_, params)) if params.iter().any(String::is_empty) => {
                    malformed(Keyword::DefineFunction, "empty parameter name")
                }
                Ok((name, params)) => Command::DefineFunction { name, params },
                Err(reason) => malformed(Keyword::DefineFunction, reason),
            };
        }
        if let Some(rest) = line.strip_prefix("CALL") {
            return match parse_signature(rest) {
                Ok((name, args)) => Command::Call { name, args },
                Err(reason) => malformed(Keyword::Call, reason),
            };
        }
        if let Some(rest) = line.strip_prefix("DISPLAY") {
            return Command::Display { message: rest.trim().to_owned() };
        }
        if line.starts_with("DEFINE") {
            return parse_define(line);
        }
        if let Some(rest) = line.strip_prefix("INPUT") {
            return Command::Input { prompt: rest.trim().to_owned() };
        }
        Command::Unknown
    }

    /// Whether this line is rejected when no program frame is open.
    ///
    /// Blank lines, comments and the framing commands themselves (well-formed
    /// or not) are exempt.
    pub fn requires_frame(&self) -> bool {
        match self {
            Command::Blank | Command::Comment | Command::Start { .. } | Command::End { .. } => false,
            Command::Malformed { keyword, .. } => !matches!(keyword, Keyword::Start | Keyword::End),
            _ => true,
        }
    }
}

// ── Parsers ───────────────────────────────────────────────────────────────────

fn malformed(keyword: Keyword, reason: &'static str) -> Command {
    Command::Malformed { keyword, reason }
}

/// Drop the leading sigil character (`*` in `*name`).
fn strip_sigil(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next();
    chars.as_str()
}

/// `START *name {`: the name is the second word minus its sigil.
fn parse_start(line: &str) -> Command {
    let Some(token) = line.split_whitespace().nth(1) else {
        return malformed(Keyword::Start, "missing program name");
    };
    if !line.ends_with('{') {
        return malformed(Keyword::Start, "expected '{' at end of line");
    }
    Command::Start { name: strip_sigil(token).to_owned() }
}

/// `} END *name`: the name is the third word minus its sigil.
fn parse_end(line: &str) -> Command {
    match line.split_whitespace().nth(2) {
        Some(token) => Command::End { name: strip_sigil(token).to_owned() },
        None => malformed(Keyword::End, "missing program name"),
    }
}

/// `DEFINE name value…`: the value is the remaining words joined by single
/// spaces, and may be empty.
fn parse_define(line: &str) -> Command {
    let mut words = line.split_whitespace().skip(1);
    let Some(name) = words.next() else {
        return malformed(Keyword::Define, "missing variable name");
    };
    let value = words.collect::<Vec<_>>().join(" ");
    Command::Define { name: name.to_owned(), value }
}

fn signature_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<name>[^\s(),]+)\s*\((?P<list>[^()]*)\)")
            .expect("signature regex is valid")
    })
}

/// Parse `name(a, b, …)` into the name and its trimmed list items.
///
/// `name()` has an empty list.  Anything after the closing `)` is ignored.
pub fn parse_signature(s: &str) -> Result<(String, Vec<String>), &'static str> {
    let caps = signature_re()
        .captures(s)
        .ok_or("expected name(arg, ...)")?;
    let name = caps["name"].to_owned();
    let list = caps["list"].trim();
    let items = if list.is_empty() {
        Vec::new()
    } else {
        list.split(',').map(|item| item.trim().to_owned()).collect()
    };
    Ok((name, items))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
