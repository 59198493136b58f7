//! The reconciliation pipeline: diff, extract identifiers, merge.

use tracing::debug;

use crate::config::ReconcileConfig;
use crate::diff::{diff_with_limit, DEFAULT_MAX_DEPTH};
use crate::extract::{extract_identifiers, ID_KEY};
use crate::merge::merge;
use crate::types::{kind_name, MergeOutcome, Record, StructuralError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub identifier_key: String,
    pub max_depth: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            identifier_key: ID_KEY.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&ReconcileConfig> for ReconcileOptions {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            identifier_key: config.identifier_key.clone(),
            max_depth: config.max_depth,
        }
    }
}

/// Merges a locally edited record with the server's copy.
///
/// Local edits always win. Identifier fields that only the remote record
/// carries are copied into the merged record at the same path.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn reconcile(&self, remote: &Record, local: &Record) -> Result<MergeOutcome, StructuralError> {
        ensure_record(remote)?;
        ensure_record(local)?;

        let entries = diff_with_limit(local, remote, self.options.max_depth)?;
        let pairs = extract_identifiers(&entries, &self.options.identifier_key);
        debug!(
            differences = entries.len(),
            identifiers = pairs.len(),
            "reconciling record"
        );

        let outcome = merge(local, &pairs);
        debug!(
            applied = outcome.applied.len(),
            skipped = outcome.warnings.len(),
            "merge finished"
        );
        Ok(outcome)
    }
}

/// Reconcile with default options.
pub fn reconcile(remote: &Record, local: &Record) -> Result<MergeOutcome, StructuralError> {
    Reconciler::default().reconcile(remote, local)
}

fn ensure_record(val: &Record) -> Result<(), StructuralError> {
    if val.is_object() {
        Ok(())
    } else {
        Err(StructuralError::NotARecord {
            found: kind_name(val),
        })
    }
}
