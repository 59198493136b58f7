//! Typed paths into JSON records.
//!
//! A [`Path`] is a sequence of [`PathStep`]s, each an object key or a list
//! index. Paths display as [JSON Pointers (RFC 6901)](https://tools.ietf.org/html/rfc6901).
//!
//! # Example
//!
//! ```
//! use record_pointer::{get, parse_json_pointer, path};
//!
//! let doc = serde_json::json!({"resourceInfo": {"id": 42, "tags": ["a", "b"]}});
//!
//! let id = path!["resourceInfo", "id"];
//! assert_eq!(id.to_string(), "/resourceInfo/id");
//! assert_eq!(get(&doc, id.steps()), Some(&serde_json::json!(42)));
//!
//! let tag = parse_json_pointer("/resourceInfo/tags/1").unwrap();
//! assert_eq!(get(&doc, tag.steps()), Some(&serde_json::json!("b")));
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathStep};

mod get;
pub use get::{get, get_mut};

mod util;
pub use util::{
    escape_component, format_json_pointer, is_valid_index, parse_json_pointer, unescape_component,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("POINTER_INVALID")]
    PointerInvalid,
}
