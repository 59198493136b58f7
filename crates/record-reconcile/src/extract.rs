//! Identifier extraction from a presence diff.

use serde_json::Value;

use crate::types::{DiffEntry, IdPair, Path, PresenceKind};

/// Default name of the server-managed identifier field.
pub const ID_KEY: &str = "id";

/// Select the identifier fields the candidate has and the reference lacks.
///
/// An added entry ending in `key` is kept as is. An added container is
/// searched for `key` fields, outermost first; those land under a parent
/// the reference does not have, and the merger reports them as dangling.
/// Values come from the candidate tree. Order follows the diff output, then
/// document order within each added subtree.
pub fn extract_identifiers(entries: &[DiffEntry<'_>], key: &str) -> Vec<IdPair> {
    let mut pairs = Vec::new();
    for entry in entries {
        if entry.kind != PresenceKind::AddedInCandidate {
            continue;
        }
        if entry.path.last().is_some_and(|step| step.is_key(key)) {
            pairs.push(IdPair {
                path: entry.path.clone(),
                value: entry.value.clone(),
            });
        } else {
            collect_nested(&entry.path, entry.value, key, &mut pairs);
        }
    }
    pairs
}

/// Walk an added subtree without recursion. Fields named `key` are not
/// descended into.
fn collect_nested(root: &Path, value: &Value, key: &str, pairs: &mut Vec<IdPair>) {
    let mut stack = vec![(root.clone(), value)];
    while let Some((path, value)) = stack.pop() {
        match value {
            Value::Object(map) => {
                for (k, v) in map.iter().rev() {
                    if k == key {
                        continue;
                    }
                    stack.push((path.child(k.as_str()), v));
                }
                if let Some(id) = map.get(key) {
                    pairs.push(IdPair {
                        path: path.child(key),
                        value: id.clone(),
                    });
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter().enumerate().rev() {
                    stack.push((path.child(i), v));
                }
            }
            _ => {}
        }
    }
}
