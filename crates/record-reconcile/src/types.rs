//! Core types shared by the differ, extractor and merger.

use serde_json::Value;
use thiserror::Error;

pub use record_pointer::{Path, PathStep};

/// A resource description: an ordered tree of named fields.
pub type Record = Value;

// ── Errors ────────────────────────────────────────────────────────────────

/// Malformed input tree. Fatal to the single diff or reconcile call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("record root must be an object, found {found}")]
    NotARecord { found: &'static str },
    #[error("record nesting exceeds {limit} levels at {path}")]
    DepthExceeded { path: Path, limit: usize },
}

/// Per-pair merge failure. Reported as a warning; the batch continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("dangling parent for {path}")]
    DanglingParent { path: Path },
}

impl MergeError {
    pub fn path(&self) -> &Path {
        match self {
            MergeError::DanglingParent { path } => path,
        }
    }
}

// ── Diff output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceKind {
    /// Path exists in the candidate but not in the reference.
    AddedInCandidate,
    /// Path exists in the reference but not in the candidate.
    RemovedFromCandidate,
}

/// One presence difference, with the value found in the tree where the
/// path exists.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry<'a> {
    pub path: Path,
    pub kind: PresenceKind,
    pub value: &'a Value,
}

// ── Extractor / merger ────────────────────────────────────────────────────

/// An identifier to copy from the remote record into the local one.
#[derive(Debug, Clone, PartialEq)]
pub struct IdPair {
    pub path: Path,
    pub value: Value,
}

/// Result of applying identifier pairs onto a local record.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub merged: Record,
    /// Pairs that were inserted, in application order.
    pub applied: Vec<IdPair>,
    /// Pairs that were skipped.
    pub warnings: Vec<MergeError>,
}

impl MergeOutcome {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Name of the JSON type of `val`, for error messages.
pub fn kind_name(val: &Value) -> &'static str {
    match val {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
