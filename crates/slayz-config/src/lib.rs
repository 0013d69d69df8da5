//! Slayz server configuration.
//!
//! TOML-based configuration with serde defaults on every section, so a
//! partial (or missing) file still yields a runnable server.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use slayz_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("listening on {}", config.server.listen_addr());
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LoggingConfig, ServerConfig, SlayzConfig, StoreBackend, StoreConfig};

use std::path::Path;

use slayz_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default path is created with a documented template if it does not
/// exist yet. Unlike the loaders, this fails on invalid values.
pub fn load_config(path: Option<&Path>) -> Result<SlayzConfig, ConfigError> {
    let config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &SlayzConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
