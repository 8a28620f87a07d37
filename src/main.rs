// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;

mod animation;
mod app_config;
mod app_controller;
mod assets;
mod audio_mix;
mod captions;
mod composer;
mod errors;
mod file_utils;
mod manifest;
mod media_probe;
mod timing;
mod validation;

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
    /// Assemble timelines from manifests (default command)
    #[command(alias = "assemble")]
    Assemble(AssembleArgs),

    /// Generate shell completions for reelforge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Input manifest file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for single manifest mode (defaults to the manifest's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Peak zoom applied at each image slot midpoint
    #[arg(short, long)]
    zoom_factor: Option<f64>,

    /// Background music gain (0.0 to 1.0)
    #[arg(short = 'g', long)]
    music_gain: Option<f64>,

    /// Directory scanned for background tracks
    #[arg(short, long)]
    music_dir: Option<PathBuf>,

    /// Disable background music entirely
    #[arg(long)]
    no_music: bool,

    /// Skip writing the word-level SRT sidecar
    #[arg(long)]
    no_srt: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// ReelForge - Timeline Composition for Narrated Slideshows
///
/// Assembles generated assets (images, synthesized voice with timing,
/// sound effects and music) into renderer-ready timeline files.
#[derive(Parser, Debug)]
#[command(name = "reelforge")]
#[command(author = "ReelForge Team")]
#[command(version = "0.6.0")]
#[command(about = "Timeline composition tool for narrated slideshows")]
#[command(long_about = "ReelForge assembles generated assets into renderer-ready timelines: it
partitions the voice track into Ken Burns image slots, attaches word-by-word
captions from the synthesis alignment and plans the audio mix.

EXAMPLES:
    reelforge story.manifest.json               # Assemble a single manifest
    reelforge -f story.manifest.json            # Force overwrite existing outputs
    reelforge -z 1.3 -g 0.2 story.manifest.json # Stronger zoom, quieter music
    reelforge -m ~/music /projects/batch/       # Assemble a folder with a music library
    reelforge --no-music story.manifest.json    # Mix voice and effects only
    reelforge --log-level debug /projects/      # Process a directory with debug logging
    reelforge completions bash > reelforge.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

OUTPUTS:
    <name>.timeline.json - the composed timeline for the renderer
    <name>.srt           - word-level caption sidecar (disable with --no-srt)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input manifest file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for single manifest mode (defaults to the manifest's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Peak zoom applied at each image slot midpoint
    #[arg(short, long)]
    zoom_factor: Option<f64>,

    /// Background music gain (0.0 to 1.0)
    #[arg(short = 'g', long)]
    music_gain: Option<f64>,

    /// Directory scanned for background tracks
    #[arg(short, long)]
    music_dir: Option<PathBuf>,

    /// Disable background music entirely
    #[arg(long)]
    no_music: bool,

    /// Skip writing the word-level SRT sidecar
    #[arg(long)]
    no_srt: bool,

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
            let emoji = Self::get_emoji_for_level(record.level());
            let _ = match record.level() {
                Level::Error => {
                    writeln!(stderr, "\x1B[1;31m{} {} {}\x1B[0m", now, emoji, record.args())
                }
                Level::Warn => {
                    writeln!(stderr, "\x1B[1;33m{} {} {}\x1B[0m", now, emoji, record.args())
                }
                Level::Info => {
                    writeln!(stderr, "\x1B[1;32m{} {} {}\x1B[0m", now, emoji, record.args())
                }
                Level::Debug => {
                    writeln!(stderr, "\x1B[1;36m{} {} {}\x1B[0m", now, emoji, record.args())
                }
                Level::Trace => {
                    writeln!(stderr, "\x1B[1;35m{} {} {}\x1B[0m", now, emoji, record.args())
                }
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
            generate(shell, &mut cmd, "reelforge", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Assemble(args)) => run_assemble(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let assemble_args = AssembleArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                zoom_factor: cli.zoom_factor,
                music_gain: cli.music_gain,
                music_dir: cli.music_dir,
                no_music: cli.no_music,
                no_srt: cli.no_srt,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_assemble(assemble_args).await
        }
    }
}

async fn run_assemble(options: AssembleArgs) -> Result<()> {
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
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(zoom_factor) = options.zoom_factor {
        config.render.zoom_factor = zoom_factor;
    }

    if let Some(music_gain) = options.music_gain {
        config.music.gain = music_gain;
    }

    if let Some(music_dir) = &options.music_dir {
        config.music.dir = Some(music_dir.clone());
    }

    if options.no_music {
        config.music.enabled = false;
    }

    if options.no_srt {
        config.assembly.write_srt = false;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

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

    // Run the controller with the input manifest(s)
    if options.input_path.is_file() {
        // Process a single manifest
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            options
                .input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf()
        });
        controller
            .run(options.input_path.clone(), output_dir, options.force_overwrite)
            .await?;
    } else if options.input_path.is_dir() {
        // Process a directory
        controller
            .run_folder(options.input_path.clone(), options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
