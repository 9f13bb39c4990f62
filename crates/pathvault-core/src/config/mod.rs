//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. The loaded [`AppConfig`] is immutable; services receive the
//! pieces they need at construction.

pub mod database;
pub mod hierarchy;
pub mod logging;
pub mod storage;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use self::database::{DatabaseConfig, StoreBackend};
pub use self::hierarchy::{CascadeMode, ConflictPolicy, HierarchyConfig};
pub use self::logging::LoggingConfig;
pub use self::storage::{LocalStorageConfig, StorageConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay) and
/// `PATHVAULT__*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Metadata store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Hierarchy behaviour.
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    /// Logical field name to storage field name.
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the given file with an optional environment-specific overlay
    /// that sits next to it (`<dir>/<env>.toml`) and environment variables
    /// prefixed with `PATHVAULT__`.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            let overlay = std::path::Path::new(path)
                .with_file_name(env)
                .to_string_lossy()
                .to_string();
            builder = builder.add_source(config::File::with_name(&overlay).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("PATHVAULT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("does/not/exist.toml", None).unwrap();
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert_eq!(config.storage.provider, "local");
        assert_eq!(config.hierarchy.cascade, CascadeMode::Subtree);
        assert!(config.field_mappings.is_empty());
    }
}
