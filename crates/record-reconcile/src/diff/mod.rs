//! Structural presence diff between two records.
//!
//! Reports paths that exist in one tree but not the other. Value changes at
//! a path present on both sides are not reported. Lists are compared by
//! position: element `i` of one side is only ever matched against element
//! `i` of the other.

use serde_json::{Map, Value};

use crate::types::{DiffEntry, Path, PresenceKind, StructuralError};

/// Container nesting allowed before a diff gives up.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ── Public API ────────────────────────────────────────────────────────────

/// Diff `candidate` against `reference` with the default depth bound.
pub fn diff<'a>(
    reference: &'a Value,
    candidate: &'a Value,
) -> Result<Vec<DiffEntry<'a>>, StructuralError> {
    diff_with_limit(reference, candidate, DEFAULT_MAX_DEPTH)
}

/// Diff `candidate` against `reference`, failing once more than
/// `max_depth` container levels would be entered.
///
/// A subtree that exists on one side only is reported once, at its root.
pub fn diff_with_limit<'a>(
    reference: &'a Value,
    candidate: &'a Value,
    max_depth: usize,
) -> Result<Vec<DiffEntry<'a>>, StructuralError> {
    let mut differ = Differ {
        entries: Vec::new(),
        max_depth,
    };
    let mut path = Path::root();
    differ.diff_at_path(&mut path, reference, candidate)?;
    Ok(differ.entries)
}

// ── Core recursive differ ─────────────────────────────────────────────────

struct Differ<'a> {
    entries: Vec<DiffEntry<'a>>,
    max_depth: usize,
}

impl<'a> Differ<'a> {
    fn diff_at_path(
        &mut self,
        path: &mut Path,
        reference: &'a Value,
        candidate: &'a Value,
    ) -> Result<(), StructuralError> {
        match (reference, candidate) {
            (Value::Object(r), Value::Object(c)) => {
                self.enter(path)?;
                self.diff_obj(path, r, c)
            }
            (Value::Array(r), Value::Array(c)) => {
                self.enter(path)?;
                self.diff_arr(path, r, c)
            }
            // Scalars and kind changes are value differences, not presence.
            _ => Ok(()),
        }
    }

    fn enter(&self, path: &Path) -> Result<(), StructuralError> {
        if path.len() >= self.max_depth {
            return Err(StructuralError::DepthExceeded {
                path: path.clone(),
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn record(&mut self, path: Path, kind: PresenceKind, value: &'a Value) {
        self.entries.push(DiffEntry { path, kind, value });
    }

    fn diff_obj(
        &mut self,
        path: &mut Path,
        reference: &'a Map<String, Value>,
        candidate: &'a Map<String, Value>,
    ) -> Result<(), StructuralError> {
        for (key, value) in reference {
            if !candidate.contains_key(key) {
                self.record(
                    path.child(key.as_str()),
                    PresenceKind::RemovedFromCandidate,
                    value,
                );
            }
        }
        for (key, c_val) in candidate {
            match reference.get(key) {
                None => self.record(
                    path.child(key.as_str()),
                    PresenceKind::AddedInCandidate,
                    c_val,
                ),
                Some(r_val) => {
                    path.push(key.as_str());
                    let res = self.diff_at_path(path, r_val, c_val);
                    path.pop();
                    res?;
                }
            }
        }
        Ok(())
    }

    fn diff_arr(
        &mut self,
        path: &mut Path,
        reference: &'a [Value],
        candidate: &'a [Value],
    ) -> Result<(), StructuralError> {
        let common = reference.len().min(candidate.len());
        for (i, (r_val, c_val)) in reference.iter().zip(candidate).enumerate() {
            path.push(i);
            let res = self.diff_at_path(path, r_val, c_val);
            path.pop();
            res?;
        }
        for (i, value) in candidate.iter().enumerate().skip(common) {
            self.record(path.child(i), PresenceKind::AddedInCandidate, value);
        }
        for (i, value) in reference.iter().enumerate().skip(common) {
            self.record(path.child(i), PresenceKind::RemovedFromCandidate, value);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
