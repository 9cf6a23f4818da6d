//! One-shot plugin application.

use std::path::PathBuf;

use clap::Args;

use crate::output;
use imagedit_core::error::AppError;
use imagedit_service::EditorSession;

/// Arguments for the apply command
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Plugin display name
    pub plugin: String,
    /// Image to edit
    pub input: PathBuf,
    /// Where to save the result; the format follows the extension
    #[arg(short, long)]
    pub output: PathBuf,
    /// Overwrite the output without asking
    #[arg(long)]
    pub force: bool,
}

/// Execute the apply command
pub fn execute(args: &ApplyArgs, config_path: Option<&str>) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let manager = super::discover_plugins(&config);

    if args.output.exists() && !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("'{}' exists. Overwrite?", args.output.display()))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut session = EditorSession::new(manager.registry().clone(), config.viewer);
    session.open(&args.input)?;
    session.apply_plugin(&args.plugin)?;
    session.save_as(&args.output)?;

    output::print_success(&format!(
        "'{}' applied to '{}', saved to '{}'",
        args.plugin,
        args.input.display(),
        args.output.display()
    ));
    Ok(())
}
