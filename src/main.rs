// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use bidimark::app_config::{self, Config};
use bidimark::app_controller::{Controller, FileOutcome};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add directional marks to subtitle files (default command)
    Mark(MarkArgs),

    /// Generate shell completions for bidimark
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct MarkArgs {
    /// Input subtitle file (.srt, .vtt) or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Directory for the marked file (single file mode, defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Overwrite the input files instead of writing `<name>.<suffix>.<ext>`
    #[arg(short, long)]
    in_place: bool,

    /// Terminate every marked row with POP DIRECTIONAL FORMATTING
    #[arg(long)]
    close_embeddings: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "bidimark.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// bidimark - directional marks for right-to-left subtitle releases
#[derive(Parser, Debug)]
#[command(name = "bidimark")]
#[command(version)]
#[command(about = "Add Unicode directional marks to every subtitle row")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "bidimark prefixes every row of every subtitle entry with LRE (U+202A) or RLE (U+202B)
depending on the row's writing direction, so mixed right-to-left and left-to-right captions
render correctly in players that ignore paragraph direction.

Marking is not idempotent: run it exactly once per release. Documents whose rows are all
marked already are skipped.

EXAMPLES:
    bidimark movie.he.srt                    # Writes movie.he.rtl.srt
    bidimark -i movie.he.vtt                 # Marks the file in place
    bidimark -o release/ movie.he.srt        # Writes release/movie.he.rtl.srt
    bidimark --log-level debug /subs/        # Marks every .srt/.vtt below /subs
    bidimark completions bash > bidimark.bash

CONFIGURATION:
    Configuration is stored in bidimark.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: MarkArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The max level is adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "bidimark", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Mark(args)) => run_mark(args).await,
        None => run_mark(cli.args).await,
    }
}

fn load_config(options: &MarkArgs) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    // Command line flags win over the file
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.in_place {
        config.output.in_place = true;
    }
    if options.close_embeddings {
        config.marking.close_embeddings = true;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_mark(options: MarkArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_path = options.input_path.clone().ok_or_else(|| {
        anyhow!("INPUT_PATH is required")
    })?;

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if input_path.is_file() {
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            input_path.parent().unwrap_or(Path::new(".")).to_path_buf()
        });
        match controller.run(input_path, output_dir, options.force_overwrite).await? {
            FileOutcome::Marked(path) => info!("Marked subtitle written to {}", path.display()),
            FileOutcome::SkippedExisting(path) => info!("Nothing to do, {} exists", path.display()),
            FileOutcome::SkippedAlreadyMarked => info!("Nothing to do, document is already marked"),
        }
    } else if input_path.is_dir() {
        if options.output_dir.is_some() {
            warn!("--output-dir is ignored in folder mode, marked files are written next to their sources");
        }
        let summary = controller.run_folder(input_path, options.force_overwrite).await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) could not be marked", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
