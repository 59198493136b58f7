//! Apply identifier pairs onto a copy of the local record.
//!
//! No intermediate containers are ever created. A pair whose parent chain
//! does not resolve in the copy is skipped and reported.

use serde_json::Value;
use tracing::warn;

use record_pointer::get_mut;

use crate::types::{IdPair, MergeError, MergeOutcome, PathStep, Record};

/// Merge `pairs` into a copy of `local`. `local` is left untouched.
pub fn merge(local: &Record, pairs: &[IdPair]) -> MergeOutcome {
    let mut merged = local.clone();
    let mut applied = Vec::with_capacity(pairs.len());
    let mut warnings = Vec::new();

    for pair in pairs {
        match apply_pair(&mut merged, pair) {
            Ok(()) => applied.push(pair.clone()),
            Err(err) => {
                warn!(path = %pair.path, "skipping identifier: {err}");
                warnings.push(err);
            }
        }
    }

    MergeOutcome {
        merged,
        applied,
        warnings,
    }
}

/// Assign one pair in place.
///
/// Object parents take key steps, list parents take in-range index steps.
/// Anything else is a dangling parent.
pub fn apply_pair(doc: &mut Value, pair: &IdPair) -> Result<(), MergeError> {
    let dangling = || MergeError::DanglingParent {
        path: pair.path.clone(),
    };
    let (step, parent_path) = pair.path.split_last().ok_or_else(dangling)?;
    let parent = get_mut(doc, parent_path).ok_or_else(dangling)?;

    match (parent, step) {
        (Value::Object(map), PathStep::Key(key)) => {
            map.insert(key.clone(), pair.value.clone());
            Ok(())
        }
        (Value::Array(arr), PathStep::Index(idx)) => {
            let slot = arr.get_mut(*idx).ok_or_else(dangling)?;
            *slot = pair.value.clone();
            Ok(())
        }
        _ => Err(dangling()),
    }
}
