//! Plugin manager: builds the shared registry from the configured groups.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use imagedit_core::config::plugin::PluginConfig;
use tracing::info;

use crate::discovery::{DiscoveryReport, discover_into};
use crate::dispatcher::PluginDispatcher;
use crate::loader::{DynamicLoader, PluginLoader};
use crate::registry::{PluginInfo, PluginRegistry};
use crate::traits::EditPlugin;

/// Owns plugin discovery for the lifetime of the process.
///
/// Every group is scanned into the same registry, so display names are
/// global across groups.
pub struct PluginManager {
    /// Plugin registry.
    registry: Arc<PluginRegistry>,
    /// Loader used for library candidates.
    loader: Box<dyn PluginLoader>,
    /// One report per scanned directory.
    reports: Vec<DiscoveryReport>,
    /// Group labels in the order they were first seen.
    groups: Vec<String>,
}

impl PluginManager {
    /// Creates a manager backed by the dynamic loader.
    pub fn new() -> Self {
        Self::with_loader(Box::new(DynamicLoader::new()))
    }

    /// Creates a manager backed by a custom loader.
    pub fn with_loader(loader: Box<dyn PluginLoader>) -> Self {
        Self {
            registry: Arc::new(PluginRegistry::new()),
            loader,
            reports: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Scans every configured group, in order.
    ///
    /// Does nothing when `auto_load` is off.
    pub fn discover_all(&mut self, config: &PluginConfig) -> &[DiscoveryReport] {
        if !config.auto_load {
            info!("Plugin auto-load disabled, skipping discovery");
            return &self.reports;
        }

        for group in &config.groups {
            self.discover_group(&group.name, &group.directory);
        }

        info!(
            groups = config.groups.len(),
            plugins = self.registry.len(),
            "All plugin groups scanned"
        );

        &self.reports
    }

    /// Scans one directory into the registry under `group`.
    pub fn discover_group(&mut self, group: &str, directory: &Path) -> &DiscoveryReport {
        self.note_group(group);
        let registry = Arc::make_mut(&mut self.registry);
        let report = discover_into(directory, group, self.loader.as_mut(), registry);
        self.reports.push(report);
        &self.reports[self.reports.len() - 1]
    }

    /// Registers a compiled-in plugin under `group`.
    pub fn register_builtin(&mut self, plugin: Arc<dyn EditPlugin>, group: &str) {
        self.note_group(group);
        Arc::make_mut(&mut self.registry).register_builtin(plugin, group);
    }

    fn note_group(&mut self, group: &str) {
        if !self.groups.iter().any(|g| g == group) {
            self.groups.push(group.to_string());
        }
    }

    /// Returns the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Returns a dispatcher over the current registry.
    pub fn dispatcher(&self) -> PluginDispatcher {
        PluginDispatcher::new(self.registry.clone())
    }

    /// Discovery reports, one per scanned directory.
    pub fn reports(&self) -> &[DiscoveryReport] {
        &self.reports
    }

    /// Group labels, in configuration order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Lists all registered plugins, sorted by name.
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.registry.list()
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginManager")
            .field("plugins", &self.registry.len())
            .field("groups", &self.groups)
            .field("reports", &self.reports.len())
            .finish()
    }
}
