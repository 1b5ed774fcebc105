// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use yadt::app_config::{self, Config, TargetVariant};
use yadt::app_controller::{Controller, RunOutcome};
use yadt::providers::mock::MockTranslator;

/// CLI Wrapper for TargetVariant to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliVariant {
    /// American English (EN-US)
    Us,
    /// British English (EN-GB)
    Gb,
}

impl From<CliVariant> for TargetVariant {
    fn from(cli_variant: CliVariant) -> Self {
        match cli_variant {
            CliVariant::Us => TargetVariant::EnUs,
            CliVariant::Gb => TargetVariant::EnGb,
        }
    }
}

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a deck, a notebook or a folder of them (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for yadt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct TranslateArgs {
    /// Input .pptx, .ppt or .ipynb file, or a directory of them
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// English variant to produce
    #[arg(short, long, value_enum)]
    variant: Option<CliVariant>,

    /// Leave slide notes untranslated
    #[arg(long)]
    no_notes: bool,

    /// Directory for translated files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Source language code (e.g., 'fr', 'fra')
    #[arg(short, long)]
    source_language: Option<String>,

    /// DeepL API key
    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// DeepL endpoint override
    #[arg(long, env = "DEEPL_API_URL")]
    api_url: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Run without network access using a placeholder translator
    #[arg(long)]
    dry_run: bool,
}

/// YADT - Yet Another Document Translator
///
/// Translates French slide decks and Jupyter notebooks into English with
/// DeepL, keeping fonts, layout and code intact.
#[derive(Parser, Debug)]
#[command(name = "yadt")]
#[command(author = "YADT Team")]
#[command(version)]
#[command(about = "DeepL-powered slide deck and notebook translation tool")]
#[command(long_about = "YADT translates .pptx/.ppt decks and .ipynb notebooks from French to English with DeepL.

EXAMPLES:
    yadt deck.pptx                          # Translate to American English
    yadt -v gb deck.pptx                    # Translate to British English
    yadt --no-notes deck.ppt                # Skip speaker notes (needs LibreOffice for .ppt)
    yadt notebook.ipynb -o out/             # Write notebook_EN.ipynb into out/
    yadt --dry-run deck.pptx                # Check extraction without calling DeepL
    yadt --log-level debug /courses/        # Process an entire directory with debug logging
    yadt completions bash > yadt.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key is read from --api-key, the
    DEEPL_API_KEY environment variable (a local .env file is loaded), or the
    config file, in that order.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input .pptx, .ppt or .ipynb file, or a directory of them
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// English variant to produce
    #[arg(short, long, value_enum)]
    variant: Option<CliVariant>,

    /// Leave slide notes untranslated
    #[arg(long)]
    no_notes: bool,

    /// Directory for translated files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Source language code (e.g., 'fr', 'fra')
    #[arg(short, long)]
    source_language: Option<String>,

    /// DeepL API key
    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// DeepL endpoint override
    #[arg(long, env = "DEEPL_API_URL")]
    api_url: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Run without network access using a placeholder translator
    #[arg(long)]
    dry_run: bool,
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

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Local .env values become visible to clap's env lookups
    dotenv::dotenv().ok();

    // Initialize with the most verbose level and narrow it with set_max_level later
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yadt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => match cli.input_path {
            // Default behavior: top-level args, same as `translate`
            Some(input_path) => {
                let translate_args = TranslateArgs {
                    input_path,
                    variant: cli.variant,
                    no_notes: cli.no_notes,
                    output_dir: cli.output_dir,
                    force_overwrite: cli.force_overwrite,
                    source_language: cli.source_language,
                    api_key: cli.api_key,
                    api_url: cli.api_url,
                    config_path: cli.config_path,
                    log_level: cli.log_level,
                    dry_run: cli.dry_run,
                };
                run_translate(translate_args).await
            }
            None => Err(anyhow!("INPUT_PATH is required when no subcommand is specified")),
        },
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Load the config file, or write a default one when it does not exist yet
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Command line values win over the file
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(variant) = &options.variant {
        config.target_variant = variant.clone().into();
    }

    if options.no_notes {
        config.include_notes = false;
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(api_key) = &options.api_key {
        config.translation.deepl.api_key = api_key.clone();
    }

    if let Some(api_url) = &options.api_url {
        config.translation.deepl.endpoint = api_url.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it before loading anything
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(level_filter(&config.log_level));

    let controller = if options.dry_run {
        warn!("Dry run: DeepL is not contacted, output contains placeholder text");
        Controller::with_translator(config, Arc::new(MockTranslator::working()))?
    } else {
        Controller::with_config(config)?
    };

    if options.input_path.is_file() {
        let output_dir = match &options.output_dir {
            Some(dir) => dir.clone(),
            None => options.input_path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf(),
        };

        match controller.run(options.input_path.clone(), output_dir, options.force_overwrite).await? {
            RunOutcome::Translated { output, segments } => {
                info!("Translated {} segments into {}", segments, output.display());
            }
            RunOutcome::Skipped(output) => {
                info!("Kept existing {}", output.display());
            }
        }
    } else if options.input_path.is_dir() {
        let summary = controller.run_folder(
            options.input_path.clone(),
            options.output_dir.clone(),
            options.force_overwrite,
        ).await?;

        if summary.failed > 0 {
            return Err(anyhow!("{} of {} files failed", summary.failed,
                summary.translated + summary.skipped + summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
