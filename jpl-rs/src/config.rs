//! `.jplrc` configuration file parser.
//!
//! A config file is a list of settings:
//!
//! | Line | Action |
//! |------|--------|
//! | `set <name>=<value>` or `set <name> <value>` | change a setting |
//! | Lines starting with `#` or `;` | comment, ignored |
//!
//! Values may be double-quoted to keep surrounding spaces (`set body_prompt="> "`).
//!
//! | Setting | Meaning | Default |
//! |---------|---------|---------|
//! | `extensions` | accepted program file extensions | `jpl jake` |
//! | `prompts` | echo `INPUT` prompts on the terminal | `on` |
//! | `body_prompt` | prompt before each function-body line | *(none)* |
//! | `max_depth` | maximum function call nesting | `500` |

use std::path::Path;

use thiserror::Error;

use crate::script::interp::DEFAULT_MAX_DEPTH;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Interpreter and front-end settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program file extensions the binary accepts (without the dot).
    pub extensions: Vec<String>,
    /// Whether the terminal line source shows `INPUT` prompts.
    pub show_prompts: bool,
    /// Shown before each function-body line; empty means no prompt.
    pub body_prompt: String,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            extensions: vec!["jpl".to_owned(), "jake".to_owned()],
            show_prompts: true,
            body_prompt: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config string on top of the defaults.
    ///
    /// Bad lines are reported and skipped; the remaining lines still apply.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let (cmd, args_str) = line
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((line, ""));

            let result = match cmd {
                "set" => parse_set(&split_args(args_str.trim()))
                    .and_then(|(name, value)| config.apply(&name, &value)),
                other => Err(format!("unknown directive '{other}'")),
            };
            if let Err(message) = result {
                errors.push(ConfigError { line: lineno, message });
            }
        }

        (config, errors)
    }

    /// Read and parse a config file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Change one setting.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), String> {
        match name {
            "extensions" => {
                let exts: Vec<String> = value
                    .split(|c: char| c == ',' || c.is_ascii_whitespace())
                    .map(|e| e.trim_start_matches('.'))
                    .filter(|e| !e.is_empty())
                    .map(str::to_owned)
                    .collect();
                if exts.is_empty() {
                    return Err("extensions: at least one extension is required".into());
                }
                self.extensions = exts;
            }
            "prompts" => self.show_prompts = parse_bool(value)?,
            "body_prompt" => self.body_prompt = value.to_owned(),
            "max_depth" => {
                self.max_depth = value
                    .parse()
                    .map_err(|_| format!("max_depth: invalid number '{value}'"))?;
            }
            other => return Err(format!("unknown setting '{other}'")),
        }
        Ok(())
    }

    /// Whether `path` has one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// The accepted extensions as `.a and .b` (or `.a, .b and .c`).
    pub fn extension_list(&self) -> String {
        let dotted: Vec<String> = self.extensions.iter().map(|e| format!(".{e}")).collect();
        match dotted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

// ── Argument tokenizer ────────────────────────────────────────────────────────

/// Split `s` into whitespace-delimited tokens, honouring double-quoted strings
/// and `\"` escapes within them.
fn split_args(s: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    cur.push(escaped);
                }
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if !cur.is_empty() || quoted {
                    args.push(std::mem::take(&mut cur));
                }
                quoted = false;
            }
            c => cur.push(c),
        }
    }
    if !cur.is_empty() || quoted {
        args.push(cur);
    }
    args
}

// ── set ───────────────────────────────────────────────────────────────────────

/// Parse `set <name>=<value>` or `set <name> <value>`.
fn parse_set(tokens: &[String]) -> Result<(String, String), String> {
    if tokens.is_empty() {
        return Err("set: requires an argument".into());
    }

    let (name, value) = if let Some((name, value)) = tokens[0].split_once('=') {
        (name.to_owned(), value.to_owned())
    } else if tokens.len() >= 2 {
        (tokens[0].clone(), tokens[1..].join(" "))
    } else {
        return Err(format!("set: missing value for '{}'", tokens[0]));
    };

    if name.is_empty() {
        return Err("set: setting name cannot be empty".into());
    }
    Ok((name, value))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Ok(true),
        "0" | "off" | "false" | "no" => Ok(false),
        _ => Err(format!("expected a boolean, got '{value}'")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
