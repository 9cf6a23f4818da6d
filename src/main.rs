//! imagedit: interactive image viewer and plugin-driven editor.
//!
//! Main entry point that loads configuration, discovers plugins and runs
//! the editor shell.

mod shell;

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use imagedit_core::config::AppConfig;
use imagedit_core::error::AppError;
use imagedit_plugin::PluginManager;
use imagedit_service::EditorSession;

use shell::{Outcome, Shell};

/// Interactive image editor
#[derive(Debug, Parser)]
#[command(name = "imagedit", version, about)]
struct Args {
    /// Configuration file (falls back to $IMAGEDIT_CONFIG, then config/default.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Image to open on start
    image: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config = match load_configuration(args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, args.image) {
        tracing::error!("Editor error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(path: Option<String>) -> Result<AppConfig, AppError> {
    let path = path.or_else(|| std::env::var("IMAGEDIT_CONFIG").ok());
    AppConfig::load(path.as_deref())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(io::stderr)
                .init();
        }
    }
}

/// Main editor run function
fn run(config: AppConfig, image: Option<PathBuf>) -> Result<(), AppError> {
    tracing::info!("Starting imagedit v{}", env!("CARGO_PKG_VERSION"));

    let mut manager = PluginManager::new();
    for report in manager.discover_all(&config.plugins) {
        for skipped in &report.skipped {
            eprintln!("Skipped plugin {}: {}", skipped.path.display(), skipped.reason);
        }
    }
    tracing::info!(plugins = manager.registry().len(), "Plugins ready");

    let session = EditorSession::new(manager.registry().clone(), config.viewer.clone());
    let mut shell = Shell::new(session, manager.groups().to_vec());

    if let Some(path) = image {
        print_outcome(shell.handle(&format!("open {}", path.display())));
    }

    if io::stdin().is_terminal() {
        println!("Type 'help' for commands.");
        loop {
            let line: String = match dialoguer::Input::new()
                .with_prompt("imagedit")
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                Err(e) => {
                    tracing::debug!(error = %e, "Prompt closed");
                    break;
                }
            };
            if !print_outcome(shell.handle(&line)) {
                break;
            }
        }
    } else {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if !print_outcome(shell.handle(&line)) {
                break;
            }
        }
    }

    tracing::info!("imagedit shut down");
    Ok(())
}

/// Prints any message; returns `false` once the shell should stop.
fn print_outcome(outcome: Outcome) -> bool {
    match outcome {
        Outcome::Continue(Some(message)) => {
            println!("{message}");
            true
        }
        Outcome::Continue(None) => true,
        Outcome::Quit => false,
    }
}
