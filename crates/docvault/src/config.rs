//! Registry configuration.

use std::path::Path;

use docvault_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Configuration for a [`crate::Registry`].
///
/// ```json
/// { "store": { "backend": "sqlite", "path": "docvault.db" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Storage backend.
    pub store: StoreConfig,
}

impl RegistryConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RegistryError::Config(e.to_string()))
    }

    /// Read and parse a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
