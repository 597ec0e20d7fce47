//! Metadata retrieval settings
//!
//! Settings are read from a TOML file:
//!
//! ```toml
//! debug_metadata_sql = true
//! partial_failure = "embed_diagnostic"
//! native_ddl = ["materialized_view"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{DbError, ObjectType, Result};

const SETTINGS_FILE: &str = "db_settings.toml";

/// What to do when a catalog query that feeds part of a definition fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFailurePolicy {
    /// Abort the whole reconstruction with the query error
    #[default]
    Abort,
    /// Substitute the error text for the missing fragment and continue
    EmbedDiagnostic,
}

/// Per-connection metadata settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbSettings {
    /// Log every metadata query with its parameters inlined
    #[serde(default)]
    pub debug_metadata_sql: bool,
    /// Handling of failed option/body/index queries
    #[serde(default)]
    pub partial_failure: PartialFailurePolicy,
    /// Object types whose source is taken from the backend's native DDL
    /// function before falling back to catalog queries
    #[serde(default)]
    pub native_ddl: Vec<ObjectType>,
}

impl DbSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DbError::Configuration(e.to_string()))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Default settings location: `<config dir>/mvsource/db_settings.toml`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("mvsource").join(SETTINGS_FILE))
            .ok_or_else(|| DbError::Configuration("Could not determine config directory".into()))
    }

    /// Whether the native DDL function should be tried first for `object_type`
    pub fn use_native_ddl(&self, object_type: ObjectType) -> bool {
        self.native_ddl.contains(&object_type)
    }

    pub fn with_native_ddl(mut self, object_type: ObjectType) -> Self {
        if !self.native_ddl.contains(&object_type) {
            self.native_ddl.push(object_type);
        }
        self
    }

    pub fn with_partial_failure(mut self, policy: PartialFailurePolicy) -> Self {
        self.partial_failure = policy;
        self
    }

    pub fn with_debug_metadata_sql(mut self, enabled: bool) -> Self {
        self.debug_metadata_sql = enabled;
        self
    }
}
