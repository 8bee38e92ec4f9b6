//! Command-line argument parsing.
//!
//! Usage:
//!   jpl [-dq] [-f[<file>]] <program.jpl>

use std::path::PathBuf;

use directories::ProjectDirs;

/// One-line usage summary printed on argument errors.
pub const USAGE: &str = "Usage: jpl [-dq] [-f[<file>]] <filename.jpl/jake>";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug)]
pub struct CliArgs {
    /// The program to run.
    pub program: PathBuf,
    /// Config-file specification.
    pub config: ConfigFile,
    /// Suppress `INPUT` prompts (`-q`).
    pub quiet: bool,
    /// Debug logging to stderr (`-d`).
    pub debug: bool,
}

/// How to choose the config file.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// Search `$JPLRC`, `./.jplrc`, then the user config directory (default).
    #[default]
    Search,
    /// `-f` with no file argument: use built-in defaults.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut config = ConfigFile::default();
    let mut quiet = false;
    let mut debug = false;
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        // Non-flag argument.
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        // Flag argument: iterate over characters after the leading `-`.
        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => debug = true,
                'q' => quiet = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else {
                        // A bare -f skips the config; a following word is the
                        // program, not a config path.
                        config = ConfigFile::Skip;
                    }
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    let program = match positional.len() {
        0 => return Err("missing program file".to_owned()),
        1 => PathBuf::from(positional.remove(0)),
        n => return Err(format!("too many arguments ({n})")),
    };

    Ok(CliArgs { program, config, quiet, debug })
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Search for the user config file in the standard locations.
///
/// Priority: `JPLRC` env var → `./.jplrc` → `<config dir>/jpl/jplrc`.
/// Returns the first path that exists, or `None`.
pub fn find_user_config() -> Option<PathBuf> {
    let from_env = std::env::var_os("JPLRC").map(PathBuf::from);
    let project = ProjectDirs::from("", "", "jpl").map(|d| d.config_dir().join("jplrc"));
    from_env
        .into_iter()
        .chain(Some(PathBuf::from("./.jplrc")))
        .chain(project)
        .find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
