// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use mdtranslate::app_config::{self, Config};
use mdtranslate::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Translate a markdown file or stdin (default command)
    Translate(TranslateArgs),

    /// Check that the Ollama server is reachable
    Check(ConfigArgs),

    /// Generate shell completions for mdtranslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that loads the configuration
#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Ollama chat endpoint
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Markdown file to translate, stdin when absent or `-`
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file, stdout when absent or `-`
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Reject translations whose character count exceeds this multiple of the original
    #[arg(long)]
    max_char_ratio: Option<f64>,

    /// Reject translations whose word count exceeds this multiple of the original
    #[arg(long)]
    max_word_ratio: Option<f64>,

    /// Reject translations whose character count is below this multiple of the original
    #[arg(long)]
    min_char_ratio: Option<f64>,

    /// Number of parts translated concurrently; output order is preserved
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    #[command(flatten)]
    config: ConfigArgs,
}

/// mdtranslate - markdown translation with a local LLM
///
/// Splits markdown into blank-line separated parts, translates the ones that
/// carry natural language through an Ollama chat model and writes the result
/// in the original order.
#[derive(Parser, Debug)]
#[command(name = "mdtranslate")]
#[command(version)]
#[command(about = "Translate markdown documents with a local Ollama model")]
#[command(long_about = "mdtranslate reads markdown, keeps code, URLs, paths and header markers intact and translates the rest with an Ollama model.

EXAMPLES:
    mdtranslate README.md                       # Translate to stdout using conf.json
    cat README.md | mdtranslate > README.en.md  # Stream from stdin to stdout
    mdtranslate -t de -o README.de.md README.md # Translate to German into a file
    mdtranslate -m llama3.2 -j 4 README.md      # Other model, four parts in flight
    mdtranslate check                           # Verify the Ollama server answers
    mdtranslate completions bash > mdt.bash     # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json by default. You can specify a different
    file with --config-path. If the file doesn't exist, defaults are used.

    Diagnostics go to stderr; stdout only carries translated markdown.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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

    // @returns: Tag and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
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
            let (tag, colour) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Accept everything here; the effective level is applied once the config is loaded
    if CustomLogger::init(LevelFilter::Trace).is_err() {
        eprintln!("Failed to initialize logger");
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "mdtranslate", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Check(args)) => run_check(args).await,
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            log::logger().flush();
            ExitCode::FAILURE
        }
    }
}

/// Load the configuration file and apply the shared overrides
fn load_config(args: &ConfigArgs) -> Result<Config> {
    if let Some(level) = args.log_level {
        log::set_max_level(app_config::LogLevel::from(level).into());
    }

    let mut config = Config::load_or_default(&args.config_path)
        .with_context(|| format!("Failed to load configuration from {}", args.config_path.display()))?;

    if let Some(endpoint) = &args.endpoint {
        config.provider.endpoint = endpoint.clone();
    }
    match args.log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.into()),
    }

    Ok(config)
}

async fn run_check(args: ConfigArgs) -> Result<()> {
    let config = load_config(&args)?;
    let controller = Controller::with_config(config)?;
    let version = controller.check().await?;
    println!("{}", version);
    Ok(())
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;

    if let Some(model) = &args.model {
        config.provider.model = model.clone();
    }
    if let Some(target_language) = &args.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(ratio) = args.max_char_ratio {
        config.gate.max_char_ratio = ratio;
    }
    if let Some(ratio) = args.max_word_ratio {
        config.gate.max_word_ratio = ratio;
    }
    if args.min_char_ratio.is_some() {
        config.gate.min_char_ratio = args.min_char_ratio;
    }
    if let Some(concurrency) = args.concurrency {
        config.translation.concurrent_requests = concurrency;
    }

    let controller = Controller::with_config(config)?;
    controller
        .run(args.input.as_deref(), args.output.as_deref(), args.force_overwrite)
        .await?;
    Ok(())
}
