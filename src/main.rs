// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod translation;
mod document;
mod file_utils;
mod app_controller;
mod language_utils;
mod providers;
mod errors;

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
    /// Translate CSV text columns using AI providers (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for tabtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input CSV file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for translated tables (defaults next to the input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language name or ISO code (e.g., 'French', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// API key used to authenticate with the provider
    #[arg(short = 'k', long, env = "TABTRANS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Rows per translation request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Pause between requests, in seconds
    #[arg(long)]
    delay: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// tabtrans - Table Translation with AI
///
/// Translates the text column of CSV tables using AI chat providers
/// (DeepSeek, Gemini, GLM, Kimi) and writes each table back out with the
/// translations appended as an extra column.
#[derive(Parser, Debug)]
#[command(name = "tabtrans")]
#[command(author = "tabtrans team")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered CSV table translation tool")]
#[command(long_about = "tabtrans translates the first column of CSV tables using AI chat providers.

EXAMPLES:
    tabtrans reviews.csv                        # Translate using default config
    tabtrans -t es reviews.csv                  # Translate into Spanish
    tabtrans -m deepseek-chat -k sk-... data/   # Pick the model and key inline
    tabtrans -b 25 --delay 2 reviews.csv        # Smaller chunks, longer pauses
    tabtrans -o out/ reviews.csv                # Write outputs to a directory
    tabtrans --log-level debug /tables/         # Process a directory with debug logging
    tabtrans completions bash > tabtrans.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The API key can also be supplied through the
    TABTRANS_API_KEY environment variable.

SUPPORTED MODELS:
    deepseek-chat      - DeepSeek chat API (requires API key)
    gemini-2.5-flash   - Google Gemini API (requires API key)
    glm-4.6            - Zhipu GLM API (requires API key)
    moonshot-v1-8k     - Moonshot Kimi API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input CSV file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for translated tables (defaults next to the input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language name or ISO code (e.g., 'French', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// API key used to authenticate with the provider
    #[arg(short = 'k', long, env = "TABTRANS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Rows per translation request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Pause between requests, in seconds
    #[arg(long)]
    delay: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
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
            let _ = match record.level() {
                Level::Error => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;31m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Warn => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;33m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Info => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;32m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Debug => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;36m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Trace => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;35m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "tabtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => {
            // Use the explicit translate subcommand args
            run_translate(args).await
        }
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow::anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let translate_args = TranslateArgs {
                input_path,
                output_dir: cli.output_dir,
                model: cli.model,
                target_language: cli.target_language,
                api_key: cli.api_key,
                batch_size: cli.batch_size,
                delay: cli.delay,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        let log_level = match config_log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };
        log::set_max_level(log_level);
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided. The API key is never
    // written back to the config file.
    if let Some(model) = &options.model {
        config.translation.model = model.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }

    if let Some(batch_size) = options.batch_size {
        config.translation.common.batch_size = batch_size;
    }

    if let Some(delay) = options.delay {
        config.translation.common.inter_chunk_delay_secs = delay;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        let log_level = match config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };

        // Just update the max level without reinitializing the logger
        log::set_max_level(log_level);
    }

    // Create controller
    let controller = Controller::with_config(config.clone())?;

    // Resolve the output directory, defaulting next to the input
    let output_dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => {
            if options.input_path.is_file() {
                options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf()
            } else {
                options.input_path.clone()
            }
        }
    };

    // Cooperative cancellation: Ctrl-C stops the run at the next chunk boundary
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested, stopping at the next chunk boundary...");
            cancel_flag.store(true, Ordering::SeqCst);
        }
    });

    // Run the controller with the input file(s) and output directory
    controller.run(options.input_path.clone(), output_dir, cancel).await?;

    Ok(())
}
