//! Application configuration schemas.
//!
//! Configuration is read from an optional TOML file via the `config`
//! crate, overlaid with `IMAGEDIT__<SECTION>__<KEY>` environment variables.
//! Every field has a default, so an empty source yields a usable config.

pub mod logging;
pub mod plugin;
pub mod viewer;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use self::logging::LoggingConfig;
use self::plugin::PluginConfig;
use self::viewer::ViewerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Plugin discovery settings.
    #[serde(default)]
    #[validate(nested)]
    pub plugins: PluginConfig,
    /// Image view and browsing settings.
    #[serde(default)]
    #[validate(nested)]
    pub viewer: ViewerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// With `path == None` only `config/default.toml` is consulted, and only
    /// if it exists. An explicit path must exist.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        match path {
            Some(path) => info!(path = %path, "Loading configuration file"),
            None => debug!("Loading default configuration"),
        }

        let file = match path {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name("config/default").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("IMAGEDIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app_config.validate().map_err(|e| {
            warn!(error = %e, "Configuration failed validation");
            e
        })?;

        debug!(
            groups = app_config.plugins.groups.len(),
            auto_load = app_config.plugins.auto_load,
            "Configuration loaded"
        );
        Ok(app_config)
    }
}
