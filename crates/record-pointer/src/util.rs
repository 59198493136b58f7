use crate::types::{Path, PathStep};
use crate::PointerError;

/// Unescapes a JSON Pointer path component.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into a path.
///
/// Every component becomes a [`PathStep::Key`]; lookups resolve canonical
/// decimal keys against lists.
pub fn parse_json_pointer(pointer: &str) -> Result<Path, PointerError> {
    if pointer.is_empty() {
        return Ok(Path::root());
    }
    let rest = pointer
        .strip_prefix('/')
        .ok_or(PointerError::PointerInvalid)?;
    Ok(rest
        .split('/')
        .map(|c| PathStep::Key(unescape_component(c)))
        .collect())
}

/// Format path steps into a JSON Pointer string.
pub fn format_json_pointer(path: &[PathStep]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for step in path {
        out.push('/');
        match step {
            PathStep::Key(k) => out.push_str(&escape_component(k)),
            PathStep::Index(i) => out.push_str(&i.to_string()),
        }
    }
    out
}

/// Check if a string represents a valid non-negative integer list index.
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}
