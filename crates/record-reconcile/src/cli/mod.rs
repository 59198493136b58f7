//! Logic behind the `record-reconcile` binary.
//!
//! Reads a remote record and a locally edited description (both JSON),
//! merges them and optionally stamps the canonical resource id.

use std::fs;
use std::path::Path as FsPath;

use serde_json::Value;

use crate::config::{ConfigError, ReconcileConfig};
use crate::reconciler::{ReconcileOptions, Reconciler};
use crate::types::{MergeError, StructuralError};
use crate::workflow::{apply_canonical_id, UpdateError};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Io(String, std::io::Error),
    Json(serde_json::Error),
    Config(ConfigError),
    Structural(StructuralError),
    Update(UpdateError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(path, e) => write!(f, "{path}: {e}"),
            CliError::Json(e)       => write!(f, "{e}"),
            CliError::Config(e)     => write!(f, "{e}"),
            CliError::Structural(e) => write!(f, "{e}"),
            CliError::Update(e)     => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self { CliError::Json(e) }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self { CliError::Config(e) }
}

impl From<StructuralError> for CliError {
    fn from(e: StructuralError) -> Self { CliError::Structural(e) }
}

impl From<UpdateError> for CliError {
    fn from(e: UpdateError) -> Self { CliError::Update(e) }
}

// ── Output ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CliOutput {
    /// Merged record, pretty-printed.
    pub json: String,
    pub warnings: Vec<MergeError>,
}

// ── Commands ──────────────────────────────────────────────────────────────

/// Interpret a resource id given on the command line.
///
/// Canonical decimal ids become JSON numbers. Anything that would not
/// format back to the same text (`0042`, `+7`, overflow) stays a string.
pub fn parse_resource_id(raw: &str) -> Value {
    match raw.parse::<u64>() {
        Ok(n) if n.to_string() == raw => Value::from(n),
        _ => Value::String(raw.to_string()),
    }
}

/// Merge two JSON documents.
///
/// `remote_json`: the server's record.
/// `local_json`: the edited description.
/// `id`: canonical resource id to stamp after merging, if any.
pub fn reconcile_documents(
    remote_json: &str,
    local_json: &str,
    id: Option<&str>,
    config: &ReconcileConfig,
) -> Result<CliOutput, CliError> {
    let remote: Value = serde_json::from_str(remote_json)?;
    let local: Value = serde_json::from_str(local_json)?;

    let reconciler = Reconciler::new(ReconcileOptions::from(config));
    let outcome = reconciler.reconcile(&remote, &local)?;

    let mut merged = outcome.merged;
    if let Some(id) = id {
        apply_canonical_id(&mut merged, &config.canonical_id_path()?, parse_resource_id(id))?;
    }

    Ok(CliOutput {
        json: serde_json::to_string_pretty(&merged)?,
        warnings: outcome.warnings,
    })
}

/// Same as [`reconcile_documents`], reading both documents from disk.
pub fn reconcile_files(
    remote: &FsPath,
    local: &FsPath,
    id: Option<&str>,
    config: &ReconcileConfig,
) -> Result<CliOutput, CliError> {
    let read = |p: &FsPath| {
        fs::read_to_string(p).map_err(|e| CliError::Io(p.display().to_string(), e))
    };
    reconcile_documents(&read(remote)?, &read(local)?, id, config)
}
