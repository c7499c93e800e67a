//! Binary entry point for the ktwalk CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Print every element with its kind, plus Class:/Method: lines
//! ktwalk walk src/Main.kt
//!
//! # Only the declarations below the file node
//! ktwalk walk --children-only --declarations-only src/Main.kt
//!
//! # Report diagnostics, failing if there are any
//! ktwalk check --strict src/*.kt
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use ktwalk::cli::{
    load_config, run_check, run_outline, run_tokens, run_tree, run_walk, Settings, WalkOptions,
};
use ktwalk_core::config::OutputFormat;
use ktwalk_core::error::{KtwalkError, OutputErrorCode};
use ktwalk_core::output::{emit_response, ErrorResponse};
use ktwalk_cst::{PrintStyle, WalkMode};

// ============================================================================
// CLI Structure
// ============================================================================

/// Parse Kotlin-subset sources and walk their concrete syntax trees.
#[derive(Parser, Debug)]
#[command(name = "ktwalk", version, about = "Parse Kotlin-subset sources and walk their syntax trees")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Config file (default: ktwalk.toml in the current directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (default: from config, else text).
    #[arg(long, global = true, value_enum)]
    format: Option<Format>,

    /// Maximum nesting depth before the parser skips a region.
    #[arg(long, global = true)]
    max_depth: Option<usize>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable lines.
    Text,
    /// JSON response with a schema version.
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Line style for `walk`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Style {
    /// `Element: <Kind> -> <text>` with `Class:` and `Method:` lines.
    #[default]
    Kinds,
    /// `Element: <text>`, and `File: <text>` for the root.
    Text,
}

impl From<Style> for PrintStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Kinds => PrintStyle::Kinds,
            Style::Text => PrintStyle::Text,
        }
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List the tokens of a file.
    Tokens {
        file: PathBuf,
        /// Omit whitespace, newline and comment tokens.
        #[arg(long)]
        no_trivia: bool,
    },
    /// Dump the concrete syntax tree of a file.
    Tree { file: PathBuf },
    /// Walk the tree and print one line per element.
    Walk {
        file: PathBuf,
        /// Start below the file node instead of at it.
        #[arg(long)]
        children_only: bool,
        /// Print only `Class:` and `Method:` lines.
        #[arg(long)]
        declarations_only: bool,
        /// Line style.
        #[arg(long, value_enum, default_value = "kinds")]
        style: Style,
        /// Do not descend below the nodes the walk starts from.
        #[arg(long)]
        shallow: bool,
        /// Omit element text.
        #[arg(long)]
        no_text: bool,
        /// Truncate element text to this many characters (0 = no limit).
        #[arg(long)]
        max_width: Option<usize>,
    },
    /// List declarations with their positions.
    Outline { file: PathBuf },
    /// Report lexer and parser diagnostics with source context.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Exit with code 4 if any diagnostic is found.
        #[arg(long)]
        strict: bool,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.global.log_level);

    let mut format = cli.global.format.map(OutputFormat::from).unwrap_or_default();
    let result = resolve_settings(&cli.global).and_then(|settings| {
        format = settings.format;
        execute(cli.command, &settings)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, format);
            ExitCode::from(OutputErrorCode::from(&err).code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Config file values with global flags applied on top.
fn resolve_settings(global: &GlobalArgs) -> Result<Settings, KtwalkError> {
    let cwd = std::env::current_dir().map_err(|e| KtwalkError::io(".", e))?;
    let config = load_config(global.config.as_deref(), &cwd)?;
    let mut settings = Settings::from_config(&config);
    if let Some(format) = global.format {
        settings.format = format.into();
    }
    if let Some(max_depth) = global.max_depth {
        if max_depth == 0 {
            return Err(KtwalkError::invalid_args("--max-depth must be at least 1"));
        }
        settings.max_depth = max_depth;
    }
    debug!(?settings, "resolved settings");
    Ok(settings)
}

/// Execute the CLI command.
fn execute(command: Command, settings: &Settings) -> Result<(), KtwalkError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Tokens { file, no_trivia } => run_tokens(&file, !no_trivia, settings, &mut out),
        Command::Tree { file } => run_tree(&file, settings, &mut out),
        Command::Walk {
            file,
            children_only,
            declarations_only,
            style,
            shallow,
            no_text,
            max_width,
        } => {
            let mut settings = settings.clone();
            if no_text {
                settings.show_text = false;
            }
            if let Some(width) = max_width {
                settings.max_text_width = (width > 0).then_some(width);
            }
            let options = WalkOptions {
                mode: if children_only {
                    WalkMode::ChildrenOnly
                } else {
                    WalkMode::IncludeSelf
                },
                style: style.into(),
                declarations_only,
                shallow,
            };
            run_walk(&file, options, &settings, &mut out)
        }
        Command::Outline { file } => run_outline(&file, settings, &mut out),
        Command::Check { files, strict } => {
            let paths: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
            run_check(&paths, strict, settings, &mut out)
        }
    }?;
    out.flush().map_err(|e| KtwalkError::io("<output>", e))
}

/// Report a failed command in the active output format.
///
/// `check --strict` has already printed its report, so its failure only sets
/// the exit code.
fn report_error(err: &KtwalkError, format: OutputFormat) {
    if let KtwalkError::DiagnosticsFound { file, count } = err {
        debug!(file = %file, count, "strict check failed");
        return;
    }
    match format {
        OutputFormat::Json => {
            let _ = emit_response(&ErrorResponse::new(err), &mut io::stdout());
        }
        OutputFormat::Text => {
            eprintln!("error: {err}");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
