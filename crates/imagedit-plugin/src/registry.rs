//! Plugin registry: loaded plugins keyed by display name.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::traits::EditPlugin;

/// A registered plugin and where it came from.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    /// Display name, also the registry key.
    pub name: String,
    /// Group (menu) the plugin was discovered in.
    pub group: String,
    /// Library path; `None` for compiled-in plugins.
    pub origin: Option<PathBuf>,
    /// The transform capability.
    pub plugin: Arc<dyn EditPlugin>,
}

impl PluginDescriptor {
    /// Describes a plugin under the name it reports.
    pub fn new(plugin: Arc<dyn EditPlugin>, group: impl Into<String>, origin: Option<PathBuf>) -> Self {
        Self {
            name: plugin.name().to_string(),
            group: group.into(),
            origin,
            plugin,
        }
    }

    /// Serializable summary for listings.
    pub fn info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name.clone(),
            group: self.group.clone(),
            origin: self
                .origin
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string()),
        }
    }
}

/// Summary of a registered plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    /// Display name.
    pub name: String,
    /// Group label.
    pub group: String,
    /// Library path or `(built-in)`.
    pub origin: String,
}

/// Registry of all loaded plugins.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    /// Display name → descriptor.
    plugins: HashMap<String, PluginDescriptor>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Registers a plugin under its display name.
    ///
    /// A plugin with the same name replaces the earlier entry, which is
    /// returned.
    pub fn register(&mut self, descriptor: PluginDescriptor) -> Option<PluginDescriptor> {
        let name = descriptor.name.clone();
        info!(plugin = %name, group = %descriptor.group, "Registering plugin");

        let previous = self.plugins.insert(name.clone(), descriptor);
        if let Some(previous) = &previous {
            warn!(
                plugin = %name,
                replaced_group = %previous.group,
                replaced_origin = ?previous.origin,
                "Plugin name already registered; later plugin wins"
            );
        }
        previous
    }

    /// Registers a compiled-in plugin.
    pub fn register_builtin(
        &mut self,
        plugin: Arc<dyn EditPlugin>,
        group: impl Into<String>,
    ) -> Option<PluginDescriptor> {
        self.register(PluginDescriptor::new(plugin, group, None))
    }

    /// Gets a plugin by display name.
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.get(name)
    }

    /// Checks whether a plugin is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Returns plugin count.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Lists all registered plugins, sorted by name.
    pub fn list(&self) -> Vec<PluginInfo> {
        let mut infos: Vec<PluginInfo> = self.plugins.values().map(PluginDescriptor::info).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Names of the plugins in one group, sorted.
    pub fn names_in_group(&self, group: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .plugins
            .values()
            .filter(|d| d.group == group)
            .map(|d| d.name.clone())
            .collect();
        names.sort();
        names
    }
}
