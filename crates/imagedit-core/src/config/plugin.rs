//! Plugin system configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Plugin system configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PluginConfig {
    /// Plugin groups, scanned in order into one registry.
    #[serde(default = "default_groups")]
    #[validate(nested)]
    pub groups: Vec<PluginGroupConfig>,
    /// Whether to automatically load plugins on startup.
    #[serde(default = "default_true")]
    pub auto_load: bool,
}

/// A named directory of plugin libraries.
///
/// Plugins from every group share one name space; the group only decides
/// where a front end lists them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PluginGroupConfig {
    /// Group label, e.g. `"basic"`.
    #[validate(length(min = 1))]
    pub name: String,
    /// Directory containing plugin shared libraries.
    pub directory: PathBuf,
}

impl PluginGroupConfig {
    /// Creates a group entry.
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            auto_load: true,
        }
    }
}

fn default_groups() -> Vec<PluginGroupConfig> {
    vec![
        PluginGroupConfig::new("basic", "./plugins/basic"),
        PluginGroupConfig::new("advanced", "./plugins/advanced"),
    ]
}

fn default_true() -> bool {
    true
}
