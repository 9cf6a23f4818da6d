//! CLI command definitions and dispatch.

pub mod apply;
pub mod browse;
pub mod config;
pub mod info;
pub mod plugins;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use imagedit_core::config::AppConfig;
use imagedit_core::error::AppError;
use imagedit_plugin::PluginManager;

/// imagedit: image viewer and plugin-driven editor
#[derive(Debug, Parser)]
#[command(name = "imagedit-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to config/default.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plugin discovery
    Plugins(plugins::PluginsArgs),
    /// Apply a plugin to an image file
    Apply(apply::ApplyArgs),
    /// Find the previous/next image in a file's directory
    Browse(browse::BrowseArgs),
    /// Show image details
    Info(info::InfoArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> Result<(), AppError> {
        let config_path = self.config.as_deref();
        match &self.command {
            Commands::Plugins(args) => plugins::execute(args, config_path, self.format),
            Commands::Apply(args) => apply::execute(args, config_path),
            Commands::Browse(args) => browse::execute(args, config_path, self.format),
            Commands::Info(args) => info::execute(args, self.format),
            Commands::Config(args) => config::execute(args, config_path, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: discover every configured plugin group
pub fn discover_plugins(config: &AppConfig) -> PluginManager {
    let mut manager = PluginManager::new();
    manager.discover_all(&config.plugins);
    manager
}
