use crate::errors::{FieldError, ServerError};
use std::error::Error;
use std::fmt;

/// Failures at the backend REST boundary, classified the way the screens
/// need to react to them: network problems banner, 401 redirects, 404
/// toasts naming the record, validation re-renders the form inline.
#[derive(Debug)]
pub enum ApiError {
    Network(String),
    /// Session missing/expired/rejected. Handled process-wide.
    Unauthorized,
    /// Targeted mutation hit a record that no longer exists (or the user
    /// may not touch). Carries a human-readable subject for the toast.
    NotFound(String),
    /// Backend rejected a create/update with field-level messages.
    Validation(Vec<FieldError>),
    /// 5xx or other unexpected status.
    Backend { status: u16, body: String },
    UnexpectedShape(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
            ApiError::Unauthorized => write!(f, "Session expired or not signed in"),
            ApiError::NotFound(what) => write!(f, "{what} was not found"),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed ({} field(s))", errors.len())
            }
            ApiError::Backend { status, body } => write!(f, "Backend HTTP {status}: {body}"),
            ApiError::UnexpectedShape(msg) => write!(f, "Unexpected response shape: {msg}"),
        }
    }
}

impl Error for ApiError {}

impl From<ApiError> for ServerError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Unauthorized => {
                ServerError::Unauthorized("please sign in again".to_string())
            }
            ApiError::Validation(errors) => ServerError::Validation(errors),
            ApiError::NotFound(what) => {
                ServerError::Backend(format!("{what} was not found; it may have been deleted"))
            }
            other => ServerError::Backend(other.to_string()),
        }
    }
}
