// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use dualsrt::app_config::{self, Config, TranslationProvider};
use dualsrt::app_controller::{Controller, RunOutcome};
use dualsrt::timing::PacingBasis;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "deepseek")]
    DeepSeek,
    #[value(name = "openai")]
    OpenAI,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::DeepSeek => TranslationProvider::DeepSeek,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

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

/// CLI Wrapper for PacingBasis to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliBasis {
    Source,
    Target,
}

impl From<CliBasis> for PacingBasis {
    fn from(cli_basis: CliBasis) -> Self {
        match cli_basis {
            CliBasis::Source => PacingBasis::Source,
            CliBasis::Target => PacingBasis::Target,
        }
    }
}

/// Options shared by every command that writes subtitles
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Directory for the generated .srt files (defaults to the input's directory)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long, global = true)]
    force_overwrite: bool,

    /// Source language code (e.g., 'zh', 'en')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'fr')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Language whose reading speed drives the shared timeline
    #[arg(short, long, value_enum, global = true)]
    basis: Option<CliBasis>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// Options for LLM segmentation and translation
#[derive(Args, Debug, Clone, Default)]
struct ProviderArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for segmentation and translation
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment, translate and time a text file or a folder of .txt files (default command)
    Generate {
        /// Input text file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Time pre-aligned source and target files, one segment per line
    Align {
        /// Source language file
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Target language file, line-aligned with SOURCE
        #[arg(value_name = "TARGET")]
        target: PathBuf,
    },

    /// Split a text on punctuation and time it as a single track, offline
    Split {
        /// Input text file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Language of the text (defaults to the source language)
        #[arg(long)]
        language: Option<String>,
    },

    /// Generate shell completions for dualsrt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// dualsrt - bilingual subtitle generation with a shared timeline
///
/// Splits a text into subtitle segments, translates each segment, and times
/// both languages on one timeline so the two .srt files cut at identical points.
#[derive(Parser, Debug)]
#[command(name = "dualsrt")]
#[command(version)]
#[command(about = "Bilingual subtitle generation with a shared timeline")]
#[command(long_about = "dualsrt turns a text into two time-coded subtitle tracks, the original and its translation, sharing one timeline.

EXAMPLES:
    dualsrt story.txt                          # Segment, translate and time using conf.json
    dualsrt -f story.txt                       # Force overwrite existing files
    dualsrt -p ollama -m qwen2.5:7b story.txt  # Use a local model
    dualsrt -s en -t fr -b source story.txt    # English to French, paced by the English text
    dualsrt align story.zh.txt story.en.txt    # Time two pre-aligned files, no network
    dualsrt split --language zh story.txt      # Offline segmentation, single track
    dualsrt completions bash > dualsrt.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. API keys may also be given through DUALSRT_API_KEY.

SUPPORTED PROVIDERS:
    deepseek - DeepSeek API (default, requires API key)
    openai   - OpenAI API (requires API key)
    ollama   - Local Ollama server")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text file or directory (same as the generate command)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    provider: ProviderArgs,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (colour, tag) = Self::style_for_level(record.level());
        let mut stderr = std::io::stderr();

        // Debug and trace lines name their module
        let _ = if record.level() >= Level::Debug {
            writeln!(stderr, "{}{} {} [{}] {}\x1B[0m", colour, now, tag, record.target(), record.args())
        } else {
            writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args())
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();
    let common = cli.common;

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dualsrt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate { input_path, provider }) => run_generate(input_path, provider, common).await,
        Some(Commands::Align { source, target }) => run_align(source, target, common),
        Some(Commands::Split { input, language }) => run_split(input, language, common).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_generate(input_path, cli.provider, common).await
        }
    }
}

/// Load the config file (creating a default one when missing) and apply CLI overrides
fn load_config(common: &CommonArgs, provider: &ProviderArgs) -> Result<Config> {
    if let Some(level) = common.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let config_path = Path::new(&common.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", common.config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(p) = provider.provider {
        config.translation.provider = p.into();
    }
    if let Some(model) = &provider.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(source_language) = &common.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &common.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(basis) = common.basis {
        config.pacing.basis = basis.into();
    }

    match common.log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

fn output_dir_for(common: &CommonArgs, input: &Path) -> PathBuf {
    common.output_dir.clone().unwrap_or_else(|| {
        input.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
    })
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Written { outputs, segments } => {
            for output in outputs {
                info!("Success: {:?} ({} entries)", output, segments);
            }
        }
        RunOutcome::Skipped => {}
    }
}

async fn run_generate(input_path: PathBuf, provider: ProviderArgs, common: CommonArgs) -> Result<()> {
    let config = load_config(&common, &provider)?;
    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;

    if input_path.is_file() {
        let output_dir = output_dir_for(&common, &input_path);
        let outcome = controller.run(input_path, output_dir, common.force_overwrite).await?;
        report(&outcome);
    } else if input_path.is_dir() {
        let outcomes = controller
            .run_folder(input_path, common.output_dir.clone(), common.force_overwrite)
            .await?;
        for outcome in &outcomes {
            report(outcome);
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

fn run_align(source: PathBuf, target: PathBuf, common: CommonArgs) -> Result<()> {
    let config = load_config(&common, &ProviderArgs::default())?;
    let controller = Controller::offline(config).context("Configuration validation failed")?;

    let output_dir = output_dir_for(&common, &source);
    let outcome = controller.run_aligned(&source, &target, &output_dir, common.force_overwrite)?;
    report(&outcome);
    Ok(())
}

async fn run_split(input: PathBuf, language: Option<String>, common: CommonArgs) -> Result<()> {
    let config = load_config(&common, &ProviderArgs::default())?;
    let language = language.unwrap_or_else(|| config.source_language.clone());
    let controller = Controller::offline(config).context("Configuration validation failed")?;

    let output_dir = output_dir_for(&common, &input);
    let outcome = controller
        .run_split(&input, &output_dir, &language, common.force_overwrite)
        .await?;
    report(&outcome);
    Ok(())
}
