//! record-reconcile — merge a locally edited resource description with the
//! server's copy before an update.
//!
//! The pipeline is pure and synchronous:
//!
//! 1. [`diff`] finds paths present in one record and not the other,
//! 2. [`extract`] keeps the identifier fields only the remote record has,
//! 3. [`merge`] copies them into a clone of the local record.
//!
//! [`reconciler::Reconciler`] runs the three steps; [`workflow`] wraps them
//! with fetch/submit seams and the canonical id override.
//!
//! ```
//! use serde_json::json;
//!
//! let remote = json!({"resourceInfo": {"id": 42, "name": "A"}});
//! let local = json!({"resourceInfo": {"name": "A-edited"}});
//!
//! let out = record_reconcile::reconcile(&remote, &local).unwrap();
//! assert_eq!(out.merged, json!({"resourceInfo": {"id": 42, "name": "A-edited"}}));
//! ```

pub mod types;
pub mod diff;
pub mod extract;
pub mod merge;
pub mod reconciler;
pub mod config;
pub mod workflow;
pub mod cli;

pub use record_pointer::{path, Path, PathStep};
pub use reconciler::{reconcile, ReconcileOptions, Reconciler};
pub use types::{
    DiffEntry, IdPair, MergeError, MergeOutcome, PresenceKind, Record, StructuralError,
};
