//! Directory browsing CLI command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use imagedit_core::error::AppError;
use imagedit_service::browser;

/// Arguments for the browse command
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Current image file
    pub path: PathBuf,
    /// Look backwards instead of forwards
    #[arg(short, long)]
    pub previous: bool,
}

/// Browse result
#[derive(Debug, Serialize)]
struct BrowseResult {
    current: PathBuf,
    neighbor: Option<PathBuf>,
    has_previous: bool,
    has_next: bool,
}

/// Execute the browse command
pub fn execute(
    args: &BrowseArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let extensions = &config.viewer.extensions;

    let delta = if args.previous { -1 } else { 1 };
    let neighbor = browser::neighbor(&args.path, delta, extensions);
    let state = browser::navigation_state(&args.path, extensions);

    match format {
        OutputFormat::Json => output::print_item(
            &BrowseResult {
                current: args.path.clone(),
                neighbor,
                has_previous: state.has_previous,
                has_next: state.has_next,
            },
            format,
        ),
        OutputFormat::Table => match neighbor {
            Some(path) => println!("{}", path.display()),
            None => output::print_warning(if args.previous {
                "No previous image"
            } else {
                "No next image"
            }),
        },
    }

    Ok(())
}
