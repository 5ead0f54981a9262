// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use babelfill::app_config::{self, Config, TranslationProvider};
use babelfill::errors::AppError;
use babelfill::file_utils::FileManager;
use babelfill::language_resolver::StaticLanguageSource;
use babelfill::language_utils;
use babelfill::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract, translate and compile all catalogs (default command)
    Run(RunArgs),

    /// Translate one existing catalog in place without running the catalog tool
    TranslateCatalog(TranslateCatalogArgs),

    /// Generate shell completions for babelfill
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that translates
#[derive(Args, Debug, Clone)]
struct SharedArgs {
    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for providers that need one
    #[arg(long, env = "BABELFILL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep `#, fuzzy` markers instead of removing them
    #[arg(long)]
    keep_fuzzy: bool,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Language to process instead of the application's configured ones (repeatable)
    #[arg(long = "language", value_name = "CODE")]
    languages: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct TranslateCatalogArgs {
    /// Catalog file to translate
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Target language of the catalog
    #[arg(long, value_name = "CODE")]
    language: String,

    #[command(flatten)]
    shared: SharedArgs,
}

/// babelfill - machine translation for gettext catalogs
///
/// Extracts the messages of an application, creates a catalog per target
/// language, fills every empty translation using an AI provider and compiles
/// the result.
#[derive(Parser, Debug)]
#[command(name = "babelfill")]
#[command(version)]
#[command(about = "AI-powered gettext catalog translation tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "babelfill extracts translatable messages, initialises one gettext catalog per language,
fills the empty msgstr entries using an AI provider and compiles the catalogs.

EXAMPLES:
    babelfill                                        # Run the pipeline using conf.json
    babelfill --language es --language it            # Translate into specific languages
    babelfill -p anthropic -m claude-3-5-haiku-latest
    babelfill translate-catalog app/translations/fr/LC_MESSAGES/messages.po --language fr
    babelfill completions bash > babelfill.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

EXIT STATUS:
    0 success (some languages may have been skipped), 2 extraction failed,
    3 compilation failed, 1 any other error")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Custom logger implementation
// The effective level is `log::max_level()`, adjusted after the config is loaded
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // The level is raised or lowered once the config is known
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "babelfill", &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
        Some(Commands::Run(args)) => run_pipeline(args).await,
        Some(Commands::TranslateCatalog(args)) => run_translate_catalog(args).await,
        None => run_pipeline(cli.run).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run_pipeline(args: RunArgs) -> Result<(), AppError> {
    let config = load_config(&args.shared)?;

    let mut controller = Controller::with_config(config)?;
    if !args.languages.is_empty() {
        for code in &args.languages {
            language_utils::validate_locale(code)?;
        }
        controller = controller.with_languages(Arc::new(StaticLanguageSource(args.languages.clone())));
    }

    let report = controller.run().await?;

    let skipped = report.skipped_languages();
    if skipped.is_empty() {
        info!("Done: {}", report.processed_languages().join(", "));
    } else {
        warn!(
            "Done: {} translated, skipped {}",
            report.processed_languages().join(", "),
            skipped.join(", ")
        );
    }
    Ok(())
}

async fn run_translate_catalog(args: TranslateCatalogArgs) -> Result<(), AppError> {
    language_utils::validate_locale(&args.language)?;
    if !FileManager::file_exists(&args.path) {
        return Err(AppError::File(format!("Catalog does not exist: {:?}", args.path)));
    }

    let config = load_config(&args.shared)?;
    let controller = Controller::with_config(config)?;

    let stats = controller.translate_catalog(&args.path, &args.language).await?;
    info!(
        "Translated {} entries in {:?} ({} lines, {} fuzzy markers removed)",
        stats.entries_translated, args.path, stats.lines_read, stats.fuzzy_removed
    );
    Ok(())
}

/// Load or create the configuration, then apply command line overrides
fn load_config(options: &SharedArgs) -> Result<Config> {
    // Apply the command line level right away so config loading is logged at it
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let config = Config::default();
        config
            .save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", options.config_path))?;
        config
    };

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.keep_fuzzy {
        config.remove_fuzzy = false;
    }

    config.validate().context("Configuration validation failed")?;

    log::set_max_level(LevelFilter::from(&config.log_level));
    Ok(config)
}
