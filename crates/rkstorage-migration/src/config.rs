//! Migration configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{LEGACY_NAME_PREFIX, TARGET_FILE_NAME};
use crate::errors::MigrationResult;

/// Which filesystem timestamp decides the "most recent" legacy database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSource {
    /// Creation time when the filesystem reports it, modification time otherwise.
    #[default]
    Auto,
    /// Creation time only. Files without one never win selection.
    Creation,
    /// Last modification time.
    Modification,
}

impl TimestampSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Creation => "creation",
            Self::Modification => "modification",
        }
    }
}

/// Configuration for a migration run. Defaults match the scoped naming scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// File name prefix shared by all legacy databases and their sidecars.
    pub legacy_prefix: String,
    /// File name of the current engine's primary database.
    pub target_file_name: String,
    /// Timestamp used to pick among several legacy databases.
    pub timestamp_source: TimestampSource,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            legacy_prefix: LEGACY_NAME_PREFIX.to_string(),
            target_file_name: TARGET_FILE_NAME.to_string(),
            timestamp_source: TimestampSource::Auto,
        }
    }
}

impl MigrationConfig {
    pub fn new(legacy_prefix: impl Into<String>, target_file_name: impl Into<String>) -> Self {
        Self {
            legacy_prefix: legacy_prefix.into(),
            target_file_name: target_file_name.into(),
            ..Self::default()
        }
    }

    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> MigrationResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn with_timestamp_source(mut self, source: TimestampSource) -> Self {
        self.timestamp_source = source;
        self
    }

    /// Path of the target database inside `storage_dir`.
    pub fn target_path(&self, storage_dir: &Path) -> PathBuf {
        storage_dir.join(&self.target_file_name)
    }
}
