use jpl::cli::{self, ConfigFile};
use jpl::config::Config;
use jpl::console::{StdinSource, StdoutSink};
use jpl::script::Interpreter;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("jpl: {e}");
            eprintln!("{}", cli::USAGE);
            std::process::exit(1);
        }
    };

    init_tracing(args.debug);

    // ── Load config ───────────────────────────────────────────────────────────
    let path = match args.config {
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path),
        ConfigFile::Search => cli::find_user_config(),
    };
    let config = match path {
        None => Config::default(),
        Some(path) => match Config::load_file(&path) {
            Ok((config, errors)) => {
                for e in errors {
                    tracing::warn!(path = %path.display(), "{e}");
                    eprintln!("jpl: warning: {}: {e}", path.display());
                }
                config
            }
            Err(e) => {
                eprintln!("jpl: warning: {}: {e}", path.display());
                Config::default()
            }
        },
    };

    // ── Check the program file ────────────────────────────────────────────────
    if !config.accepts(&args.program) {
        eprintln!("Error: Only {} files are supported", config.extension_list());
        std::process::exit(1);
    }

    // ── Run ───────────────────────────────────────────────────────────────────
    let input = StdinSource::new(config.show_prompts && !args.quiet);
    let mut interp = Interpreter::new(input, StdoutSink).with_config(&config);
    if let Err(e) = interp.run_file(&args.program) {
        eprintln!("jpl: {e}");
        std::process::exit(1);
    }
}

/// Install a stderr subscriber when `-d` is given or `RUST_LOG` is set.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("jpl=debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}
