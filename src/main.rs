#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use subsense::app_config::{self, Config, DEFAULT_CONFIG_PATH};
use subsense::app_controller::Controller;

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
    /// Parse a subtitle file and print its cues as JSON
    Parse {
        /// Subtitle file (.srt, .vtt or .txt)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
    },

    /// Rebuild sentences from a subtitle file or every subtitle file in a directory
    Sentences {
        /// Subtitle file or directory
        #[arg(value_name = "PATH")]
        input_path: PathBuf,

        /// Write `<stem>.sentences.json` files into this directory
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Print coarse fallback segments for a subtitle file
    Segments {
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
    },

    /// Analyse sentences with the language model
    Analyze {
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Analyse only the sentence at this index
        #[arg(short, long)]
        index: Option<usize>,

        /// Series name given to the model as context
        #[arg(short, long)]
        series: Option<String>,
    },

    /// Generate shell completions for subsense
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subsense - sentence cards from subtitle files
///
/// Reconstructs whole sentences from subtitle cues, keeps the link back to the
/// cues they came from, and optionally asks a language model to explain them.
#[derive(Parser, Debug)]
#[command(name = "subsense")]
#[command(version)]
#[command(about = "Sentence reconstruction and analysis for subtitle files")]
#[command(long_about = "subsense rebuilds sentences from subtitle cues and optionally analyses them with a language model.

EXAMPLES:
    subsense parse movie.srt                      # Print cues as JSON
    subsense sentences movie.srt                  # Print sentence cards as JSON
    subsense sentences -f /subs/                  # Write <stem>.sentences.json for a directory
    subsense segments movie.vtt                   # Coarse segments without sentence detection
    subsense analyze --index 3 movie.srt          # Analyse one sentence
    subsense completions bash > subsense.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically. The analysis API key can
    also be given through OPENROUTER_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
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
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subsense", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Parse { input_file } => {
            let collection = controller.load_cues(&input_file)?;
            print_json(&collection.cues)
        }
        Commands::Sentences { input_path, output_dir, force_overwrite } => {
            run_sentences(&controller, &input_path, output_dir.as_deref(), force_overwrite)
        }
        Commands::Segments { input_file } => {
            let segments = controller.segments(&input_file)?;
            print_json(&segments)
        }
        Commands::Analyze { input_file, index, series } => {
            let analyzed = controller.analyze(&input_file, index, series.as_deref()).await?;
            print_json(&analyzed)
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn run_sentences(controller: &Controller, input_path: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<()> {
    if input_path.is_dir() {
        let summary = controller.process_folder(input_path, output_dir, force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} of the subtitle files could not be processed", summary.failed));
        }
        return Ok(());
    }

    if !input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    match output_dir {
        Some(dir) => {
            controller.process_file(input_path, dir, force_overwrite)?;
            Ok(())
        }
        None => {
            let cards = controller.sentences(input_path)?;
            info!("{} sentences", cards.len());
            print_json(&cards)
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
