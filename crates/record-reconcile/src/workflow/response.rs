//! Status classification for fetch and submit responses.

use serde_json::Value;
use thiserror::Error;

/// Marker the repository puts in a 500 body when the update re-inserts
/// rows it already has. The update itself went through.
const DUPLICATE_MARKER: &str = "duplicate key value";

/// Why a remote record could not be fetched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("401 Unauthorized Request")]
    Unauthorized,
    #[error("400 Bad Request")]
    BadRequest,
    #[error("404 Not Found")]
    NotFound,
    #[error("unexpected status {status}")]
    Unexpected { status: u16 },
}

impl FetchError {
    /// Map an HTTP status to a fetch failure, `None` for success.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 | 403 => Some(FetchError::Unauthorized),
            400 => Some(FetchError::BadRequest),
            404 => Some(FetchError::NotFound),
            status => Some(FetchError::Unexpected { status }),
        }
    }
}

/// Raw answer to an update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: String,
}

impl SubmitResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Updated,
    /// Server complained about duplicate keys; the record is updated.
    Duplicate,
    /// Validation errors, one message per rejected field.
    Rejected { messages: Vec<String> },
    ServerError { body: String },
    Failed { status: u16 },
}

impl SubmitOutcome {
    pub fn classify(status: u16, body: &str) -> Self {
        match status {
            200..=299 => SubmitOutcome::Updated,
            500 if body.contains(DUPLICATE_MARKER) => SubmitOutcome::Duplicate,
            500 => SubmitOutcome::ServerError {
                body: body.to_string(),
            },
            status => match validation_messages(body) {
                Some(messages) => SubmitOutcome::Rejected { messages },
                None => SubmitOutcome::Failed { status },
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Updated | SubmitOutcome::Duplicate)
    }
}

impl From<&SubmitResponse> for SubmitOutcome {
    fn from(response: &SubmitResponse) -> Self {
        SubmitOutcome::classify(response.status, &response.body)
    }
}

/// Parse `{"field": ["msg", ...], ...}` into one line per field.
fn validation_messages(body: &str) -> Option<Vec<String>> {
    let Value::Object(fields) = serde_json::from_str::<Value>(body).ok()? else {
        return None;
    };
    if fields.is_empty() {
        return None;
    }
    let messages = fields
        .values()
        .map(|v| match v {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    Some(messages)
}
