//! Update workflow around the reconciler.
//!
//! Fetching the remote record and submitting the merged one are I/O and
//! belong to the caller; they plug in through [`FetchById`] and
//! [`SubmitUpdate`]. Session state (cookies, CSRF tokens) lives inside
//! those implementations.

mod response;

pub use response::{FetchError, SubmitOutcome, SubmitResponse};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, ReconcileConfig};
use crate::reconciler::{ReconcileOptions, Reconciler};
use crate::types::{IdPair, MergeError, Path, PathStep, Record, StructuralError};

/// Fetches the server's copy of a record.
pub trait FetchById {
    fn fetch(&self, id: &Value) -> Result<Record, FetchError>;
}

/// Sends a merged record back to the server.
pub trait SubmitUpdate {
    type Error: std::error::Error + Send + Sync + 'static;

    fn submit(&self, id: &Value, record: &Record) -> Result<SubmitResponse, Self::Error>;
}

impl<T: FetchById + ?Sized> FetchById for &T {
    fn fetch(&self, id: &Value) -> Result<Record, FetchError> {
        (**self).fetch(id)
    }
}

impl<T: SubmitUpdate + ?Sized> SubmitUpdate for &T {
    type Error = T::Error;

    fn submit(&self, id: &Value, record: &Record) -> Result<SubmitResponse, Self::Error> {
        (**self).submit(id, record)
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("could not fetch resource {id}: {source}")]
    Fetch {
        id: Value,
        #[source]
        source: FetchError,
    },
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error("cannot set canonical id: no parent object for {path}")]
    CanonicalIdParent { path: Path },
    #[error("submit failed: {0}")]
    Submit(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A merged record ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedUpdate {
    pub id: Value,
    pub record: Record,
    pub applied: Vec<IdPair>,
    pub warnings: Vec<MergeError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub prepared: PreparedUpdate,
    pub response: SubmitResponse,
    pub outcome: SubmitOutcome,
}

/// Write the canonical id at `path`.
///
/// Only the final key may be created; its parent must already be an
/// object.
pub fn apply_canonical_id(record: &mut Record, path: &Path, id: Value) -> Result<(), UpdateError> {
    let missing = || UpdateError::CanonicalIdParent { path: path.clone() };
    let (step, parent_path) = path.split_last().ok_or_else(missing)?;
    match (record_pointer::get_mut(record, parent_path), step) {
        (Some(Value::Object(map)), PathStep::Key(key)) => {
            map.insert(key.clone(), id);
            Ok(())
        }
        _ => Err(missing()),
    }
}

pub struct UpdateWorkflow<F, S> {
    fetcher: F,
    submitter: S,
    reconciler: Reconciler,
    canonical_id_path: Path,
}

impl<F: FetchById, S: SubmitUpdate> UpdateWorkflow<F, S> {
    pub fn new(fetcher: F, submitter: S) -> Self {
        Self {
            fetcher,
            submitter,
            reconciler: Reconciler::default(),
            canonical_id_path: record_pointer::path!["resourceInfo", "id"],
        }
    }

    pub fn from_config(fetcher: F, submitter: S, config: &ReconcileConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            submitter,
            reconciler: Reconciler::new(ReconcileOptions::from(config)),
            canonical_id_path: config.canonical_id_path()?,
        })
    }

    /// Fetch the remote record, merge identifiers into `local` and set the
    /// canonical id.
    pub fn prepare(&self, id: &Value, local: &Record) -> Result<PreparedUpdate, UpdateError> {
        let remote = self.fetcher.fetch(id).map_err(|source| UpdateError::Fetch {
            id: id.clone(),
            source,
        })?;
        let outcome = self.reconciler.reconcile(&remote, local)?;

        // Must run after the merge so a remote id pair cannot overwrite it.
        let mut record = outcome.merged;
        apply_canonical_id(&mut record, &self.canonical_id_path, id.clone())?;

        Ok(PreparedUpdate {
            id: id.clone(),
            record,
            applied: outcome.applied,
            warnings: outcome.warnings,
        })
    }

    /// Prepare and submit an update.
    pub fn run(&self, id: &Value, local: &Record) -> Result<UpdateReport, UpdateError> {
        let prepared = self.prepare(id, local)?;
        let response = self
            .submitter
            .submit(id, &prepared.record)
            .map_err(|e| UpdateError::Submit(Box::new(e)))?;
        let outcome = SubmitOutcome::from(&response);
        if outcome.is_success() {
            info!(resource = %id, "resource updated");
        } else {
            warn!(resource = %id, status = response.status, "could not update resource");
        }
        Ok(UpdateReport {
            prepared,
            response,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_pointer::path;
    use serde_json::json;

    #[test]
    fn canonical_id_overwrites_existing() {
        let mut record = json!({"resourceInfo": {"id": 1, "name": "A"}});
        apply_canonical_id(&mut record, &path!["resourceInfo", "id"], json!(42)).unwrap();
        assert_eq!(record, json!({"resourceInfo": {"id": 42, "name": "A"}}));
    }

    #[test]
    fn canonical_id_needs_parent_object() {
        let mut record = json!({"other": {}});
        let err = apply_canonical_id(&mut record, &path!["resourceInfo", "id"], json!(1)).unwrap_err();
        assert!(matches!(err, UpdateError::CanonicalIdParent { .. }));

        let mut record = json!({"resourceInfo": []});
        assert!(apply_canonical_id(&mut record, &path!["resourceInfo", "id"], json!(1)).is_err());
        assert!(apply_canonical_id(&mut record, &Path::root(), json!(1)).is_err());
    }
}
