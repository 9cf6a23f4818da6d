//! Plugin discovery CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use imagedit_core::error::AppError;
use imagedit_plugin::{DiscoveryReport, PluginManager};

/// Arguments for plugin commands
#[derive(Debug, Args)]
pub struct PluginsArgs {
    /// Plugin subcommand
    #[command(subcommand)]
    pub command: PluginsCommand,
}

/// Plugin subcommands
#[derive(Debug, Subcommand)]
pub enum PluginsCommand {
    /// List plugins found in the configured groups
    List,
    /// Scan one directory and report what loads
    Scan {
        /// Directory containing plugin libraries
        directory: PathBuf,
        /// Group label to report under
        #[arg(short, long, default_value = "basic")]
        group: String,
    },
}

/// Plugin display row
#[derive(Debug, Serialize, Tabled)]
struct PluginRow {
    /// Display name
    name: String,
    /// Group
    group: String,
    /// Library path
    origin: String,
}

/// Scan result row
#[derive(Debug, Serialize, Tabled)]
struct CandidateRow {
    /// Library path
    path: String,
    /// Outcome
    status: String,
    /// Plugin name or failure reason
    detail: String,
}

/// Execute plugin commands
pub fn execute(
    args: &PluginsArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        PluginsCommand::List => {
            let config = super::load_config(config_path)?;
            let manager = super::discover_plugins(&config);

            let rows: Vec<PluginRow> = manager
                .list_plugins()
                .into_iter()
                .map(|info| PluginRow {
                    name: info.name,
                    group: info.group,
                    origin: info.origin,
                })
                .collect();

            output::print_list(&rows, format);

            let skipped: usize = manager.reports().iter().map(|r| r.skipped.len()).sum();
            if skipped > 0 && format == OutputFormat::Table {
                output::print_warning(&format!(
                    "{skipped} plugin librar{} failed to load; run `plugins scan` for details",
                    if skipped == 1 { "y" } else { "ies" }
                ));
            }
        }
        PluginsCommand::Scan { directory, group } => {
            let mut manager = PluginManager::new();
            let report = manager.discover_group(group, directory);
            output::print_list(&candidate_rows(report), format);
        }
    }

    Ok(())
}

fn candidate_rows(report: &DiscoveryReport) -> Vec<CandidateRow> {
    let loaded = report.loaded.iter().map(|p| CandidateRow {
        path: p.path.display().to_string(),
        status: "loaded".to_string(),
        detail: p.name.clone(),
    });
    let skipped = report.skipped.iter().map(|s| CandidateRow {
        path: s.path.display().to_string(),
        status: "skipped".to_string(),
        detail: s.reason.clone(),
    });
    loaded.chain(skipped).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagedit_plugin::{LoadedPlugin, SkippedPlugin};

    #[test]
    fn test_candidate_rows_show_library_paths() {
        let report = DiscoveryReport {
            directory: PathBuf::from("/plugins/basic"),
            group: "basic".to_string(),
            loaded: vec![LoadedPlugin {
                name: "Sepia".to_string(),
                path: PathBuf::from("/plugins/basic/libsepia.so"),
            }],
            skipped: vec![SkippedPlugin {
                path: PathBuf::from("/plugins/basic/junk.so"),
                reason: "bad library".to_string(),
            }],
        };

        let rows = candidate_rows(&report);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].path, "/plugins/basic/libsepia.so");
        assert_eq!(rows[0].status, "loaded");
        assert_eq!(rows[0].detail, "Sepia");
        assert_eq!(rows[1].path, "/plugins/basic/junk.so");
        assert_eq!(rows[1].status, "skipped");
    }
}
