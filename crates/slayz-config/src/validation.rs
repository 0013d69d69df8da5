//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` rather than stopping
//! at the first one.

use slayz_common::ConfigError;

use crate::schema::SlayzConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SlayzConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.server.port == 0 {
        errors.push("server.port must be non-zero".into());
    }
    if config.server.bind.trim().is_empty() {
        errors.push("server.bind must not be empty".into());
    }
    if config.server.outbox_capacity == 0 {
        errors.push("server.outbox_capacity must be at least 1".into());
    }
    if config.store.data_dir.trim().is_empty() {
        errors.push("store.data_dir must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
