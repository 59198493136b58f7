use serde_json::Value;

use crate::types::PathStep;
use crate::util::is_valid_index;

/// Resolve a step against a list. Key steps only match canonical indices.
fn list_index(step: &PathStep) -> Option<usize> {
    match step {
        PathStep::Index(i) => Some(*i),
        PathStep::Key(k) if is_valid_index(k) => k.parse().ok(),
        PathStep::Key(_) => None,
    }
}

/// Get a value from a record by path.
pub fn get<'a>(val: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Array(arr) => arr.get(list_index(step)?)?,
            Value::Object(map) => map.get(step.as_key()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to a value in a record by path.
pub fn get_mut<'a>(val: &'a mut Value, path: &[PathStep]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Array(arr) => arr.get_mut(list_index(step)?)?,
            Value::Object(map) => map.get_mut(step.as_key()?)?,
            _ => return None,
        };
    }
    Some(current)
}
