// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use scriptpage::app_config::{self, Config};
use scriptpage::app_controller::{Controller, ScriptOperation};
use scriptpage::screenplay::ShiftDirection;

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

/// Outline move to apply
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlineMove {
    Up,
    Down,
    Promote,
    Demote,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the element kind of every line
    Classify {
        /// Screenplay file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print elements as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add scene numbers to a file or every script in a directory
    Number {
        /// Screenplay file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Remove scene numbers instead
        #[arg(short, long, conflicts_with = "renumber")]
        remove: bool,

        /// Remove all scene numbers, then number sequentially
        #[arg(long)]
        renumber: bool,

        /// Write the result to this file, or into this directory, instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Insert page break markers
    Paginate {
        /// Screenplay file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Write the result to this file, or into this directory, instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the page of a line, or force a page break before its block
    Page {
        /// Screenplay file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// 1-based line number
        #[arg(value_name = "LINE")]
        line: usize,

        /// Insert a page break before the block containing the line
        #[arg(short = 'b', long = "break")]
        insert_break: bool,
    },

    /// Move or re-level the scene or section at a line
    Outline {
        /// Screenplay file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// 1-based line number
        #[arg(value_name = "LINE")]
        line: usize,

        /// Move to apply
        #[arg(value_enum)]
        movement: CliOutlineMove,
    },

    /// Expand {{key}} template tokens
    Expand {
        /// Screenplay file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Value for the title key
        #[arg(short, long)]
        title: Option<String>,

        /// Write the result to this file, or into this directory, instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the configured export program on a script
    Export {
        /// Screenplay file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Generate shell completions for scriptpage
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// scriptpage - screenplay markup tooling
///
/// Classifies screenplay markup, numbers scenes, paginates and expands
/// templates in plain-text screenplay files.
#[derive(Parser, Debug)]
#[command(name = "scriptpage")]
#[command(version)]
#[command(about = "Screenplay markup numbering, pagination and outline tool")]
#[command(long_about = "scriptpage works on plain-text screenplay files (.fountain, .spmd).

EXAMPLES:
    scriptpage classify draft.fountain --json   # Element kind of every line
    scriptpage number draft.fountain            # Number unnumbered scenes
    scriptpage number --renumber scripts/       # Renumber every script in a folder
    scriptpage paginate draft.fountain          # Insert page breaks
    scriptpage page draft.fountain 120          # Page of line 120
    scriptpage outline draft.fountain 42 up     # Swap a scene with the previous one
    scriptpage expand -t 'Big Fish' draft.fountain
    scriptpage completions bash > scriptpage.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
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
            let color = Self::color_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                color,
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
    // Full level until the config is known, narrowed below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "scriptpage", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let config = load_config(&cli.config, cli.log_level)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command).await
}

// Load the configuration, creating a default file when missing
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Classify { input, json } => {
            let script = controller.load_script(&input)?;
            let elements = controller.classify(&script);
            if json {
                let output = serde_json::to_string_pretty(&elements)
                    .context("Failed to serialize elements to JSON")?;
                println!("{}", output);
            } else {
                for (element, line) in elements.iter().zip(script.lines()) {
                    println!("{:>5} {:<16} {}", element.line + 1, element.kind, line);
                }
            }
        }
        Commands::Number { input_path, remove, renumber, output } => {
            let operation = if remove {
                ScriptOperation::RemoveSceneNumbers
            } else if renumber {
                ScriptOperation::Renumber
            } else {
                ScriptOperation::AddSceneNumbers
            };
            run_operation(controller, &operation, &input_path, output.as_deref())?;
        }
        Commands::Paginate { input_path, output } => {
            run_operation(controller, &ScriptOperation::Paginate, &input_path, output.as_deref())?;
        }
        Commands::Page { input, line, insert_break } => {
            let script = controller.load_script(&input)?;
            if insert_break {
                let result = controller.insert_page_break(&script, line)?;
                scriptpage::file_utils::FileManager::write_to_file(&input, result.text())?;
                info!("Page break inserted before line {}", line);
            } else {
                let (page, total) = controller.locate_page(&script, line);
                println!("Page {} of {}", page, total);
            }
        }
        Commands::Outline { input, line, movement } => {
            let script = controller.load_script(&input)?;
            let result = match movement {
                CliOutlineMove::Up => controller.shift(&script, line, ShiftDirection::Up)?,
                CliOutlineMove::Down => controller.shift(&script, line, ShiftDirection::Down)?,
                CliOutlineMove::Promote => controller.change_section_level(&script, line, true)?,
                CliOutlineMove::Demote => controller.change_section_level(&script, line, false)?,
            };
            scriptpage::file_utils::FileManager::write_to_file(&input, result.text())?;
        }
        Commands::Expand { input_path, title, output } => {
            let operation = ScriptOperation::ExpandTemplates { title };
            run_operation(controller, &operation, &input_path, output.as_deref())?;
        }
        Commands::Export { input } => {
            let output = controller.export(Some(&input)).await?;
            println!("{}", output.display());
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// Dispatch a text operation to a single file or a folder
fn run_operation(
    controller: &Controller,
    operation: &ScriptOperation,
    input_path: &Path,
    output: Option<&Path>,
) -> Result<()> {
    if input_path.is_file() {
        controller.run(operation, input_path, output)?;
    } else if input_path.is_dir() {
        if output.is_some() {
            return Err(anyhow!("--output cannot be used with a directory"));
        }
        controller.run_folder(operation, input_path)?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }
    Ok(())
}
