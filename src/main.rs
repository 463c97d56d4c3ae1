#![forbid(unsafe_code)]

mod cli;
mod config;
mod constants;
mod gui;
mod hub;
mod tools;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;
use constants::config::{DEFAULT_LOG_LEVEL, ENV_LOG_LEVEL};

#[derive(Debug, Parser)]
#[command(name = "utility-hub", version, about = "Plugin hub and small file tools")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// error, warn, info, debug or trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Plugin directory to scan; repeat to add more. Replaces the configured list.
    #[arg(long = "plugin-dir", global = true)]
    plugin_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Utility hub window (default)
    Hub,
    /// Empty file copier window
    Copier,
    /// Filename exporter window
    Lister,
    /// Print discovered modules and their functions
    List,
    /// Run one function with NAME=VALUE parameters
    Run {
        module: String,
        function: String,
        params: Vec<String>,
    },
    /// Recreate the files of SOURCE as empty files in TARGET
    CopyEmpty { source: String, target: String },
    /// Write the file names of FOLDER to a text file
    ExportNames {
        folder: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let loaded = AppConfig::read(&config_path);

    let level_name = cli
        .log_level
        .clone()
        .or_else(|| std::env::var(ENV_LOG_LEVEL).ok())
        .or_else(|| loaded.log_level().map(String::from))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config::parse_level(&level_name))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let (mut config, file) = AppConfig::resolve(loaded, &config_path);
    if !cli.plugin_dirs.is_empty() {
        config.plugin_dirs = cli.plugin_dirs.clone();
    }
    info!(level = %level_name, "config={:#?}", config);

    match cli.command.unwrap_or(Command::Hub) {
        Command::Hub => gui::run_hub(config.plugin_dirs)?,
        Command::Copier => gui::run_copier(config, file)?,
        Command::Lister => gui::run_lister(config, file)?,
        Command::List => cli::list(&config.plugin_dirs)?,
        Command::Run {
            module,
            function,
            params,
        } => {
            if !cli::run(&config.plugin_dirs, &module, &function, &params)? {
                warn!(module = %module, function = %function, "function did not complete");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::CopyEmpty { source, target } => cli::copy_empty(&source, &target)?,
        Command::ExportNames { folder, output } => {
            cli::export_names(&folder, output.as_deref())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
