//! Configuration loading for the reconciler.

use std::fs;
use std::path::{Path as FsPath, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use record_pointer::{parse_json_pointer, Path, PointerError};

use crate::diff::DEFAULT_MAX_DEPTH;
use crate::extract::ID_KEY;

/// Environment variable naming a TOML config file for the binary.
pub const CONFIG_ENV: &str = "RECORD_RECONCILE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid canonical_id_pointer {pointer:?}: {source}")]
    Pointer {
        pointer: String,
        #[source]
        source: PointerError,
    },
}

/// Reconciler configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Field name treated as a server-managed identifier.
    pub identifier_key: String,

    /// Container nesting allowed before a diff fails.
    pub max_depth: usize,

    /// Where the canonical resource id is written after merging.
    pub canonical_id_pointer: String,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            identifier_key: ID_KEY.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            canonical_id_pointer: "/resourceInfo/id".to_string(),
        }
    }
}

impl ReconcileConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReconcileConfig = toml::from_str(content)?;
        config.canonical_id_path()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from the file named by [`CONFIG_ENV`], or use defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn canonical_id_path(&self) -> Result<Path, ConfigError> {
        parse_json_pointer(&self.canonical_id_pointer).map_err(|source| ConfigError::Pointer {
            pointer: self.canonical_id_pointer.clone(),
            source,
        })
    }
}
