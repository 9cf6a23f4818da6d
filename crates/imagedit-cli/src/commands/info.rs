//! Image details CLI command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use imagedit_core::error::AppError;
use imagedit_plugin::bridge;
use imagedit_service::codec;

/// Arguments for the info command
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Image file
    pub path: PathBuf,
}

/// Image details
#[derive(Debug, Serialize)]
struct ImageInfo {
    path: String,
    width: u32,
    height: u32,
    channels: u8,
    stride: usize,
    file_size: u64,
    plugin_compatible: bool,
}

/// Execute the info command
pub fn execute(args: &InfoArgs, format: OutputFormat) -> Result<(), AppError> {
    let image = codec::load(&args.path)?;
    let info = ImageInfo {
        path: args.path.display().to_string(),
        width: image.width(),
        height: image.height(),
        channels: image.channels(),
        stride: image.stride(),
        file_size: codec::file_size(&args.path)?,
        plugin_compatible: bridge::is_supported(image.channels()),
    };

    match format {
        OutputFormat::Json => output::print_item(&info, format),
        OutputFormat::Table => {
            output::print_kv("Path", &info.path);
            output::print_kv("Dimensions", &format!("{}x{}", info.width, info.height));
            output::print_kv("Channels", &info.channels.to_string());
            output::print_kv("Stride", &format!("{} bytes", info.stride));
            output::print_kv("File size", &format!("{} Bytes", info.file_size));
            output::print_kv(
                "Plugin compatible",
                if info.plugin_compatible { "yes" } else { "no" },
            );
        }
    }

    Ok(())
}
