//! Type definitions for record paths.

use std::fmt;

use crate::util::{escape_component, format_json_pointer};

/// A step in a record path.
///
/// Either an object key or a list index. `Key("0")` and `Index(0)` are
/// different steps, but lookups on a list also accept a key step holding a
/// canonical decimal index. An index step never matches an object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    /// Field name inside an object.
    Key(String),
    /// Position inside a list.
    Index(usize),
}

impl PathStep {
    /// The key name, if this is a key step.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(k) => Some(k),
            PathStep::Index(_) => None,
        }
    }

    /// Check if this is the key step `name`.
    pub fn is_key(&self, name: &str) -> bool {
        self.as_key() == Some(name)
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) => f.write_str(&escape_component(k)),
            PathStep::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A path addressing one location inside a record.
///
/// Displays as a JSON Pointer (`/resourceInfo/id`, `/tags/0`). The empty
/// path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<PathStep>);

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, step: impl Into<PathStep>) {
        self.0.push(step.into());
    }

    pub fn pop(&mut self) -> Option<PathStep> {
        self.0.pop()
    }

    /// A new path one step below this one.
    pub fn child(&self, step: impl Into<PathStep>) -> Path {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(step.into());
        Path(steps)
    }

    /// The final step, `None` for the root.
    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }

    /// Split into the final step and the parent steps.
    pub fn split_last(&self) -> Option<(&PathStep, &[PathStep])> {
        self.0.split_last()
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Path(steps)
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_json_pointer(&self.0))
    }
}

/// Build a [`Path`] from a list of keys and indices.
///
/// ```
/// use record_pointer::{path, PathStep};
///
/// let p = path!["tags", 0usize, "id"];
/// assert_eq!(p.to_string(), "/tags/0/id");
/// assert_eq!(p.last(), Some(&PathStep::Key("id".into())));
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::Path::root() };
    ($($step:expr),+ $(,)?) => {
        $crate::Path::from(vec![$($crate::PathStep::from($step)),+])
    };
}
