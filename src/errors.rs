use astra::Response;
use std::fmt;

/// Errors originating from the portal itself (routing, bad query strings,
/// the preferences store) or from the backend API boundary.
///
/// Backend validation failures carry field-level messages so forms can
/// re-render inline without losing user input.
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    /// Missing/expired session, or the backend rejected ours. Rendered as a
    /// redirect to /login rather than an error page.
    Unauthorized(String),
    /// Backend fetch/mutation failure (network, timeout, 5xx). Non-fatal:
    /// screens keep their last-good data and show a banner.
    Backend(String),
    /// Field-level rejection of a create/update, as reported by the backend.
    Validation(Vec<FieldError>),
    PrefsError(String),
    XlsxError(String),
    InternalError,
}

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ServerError::Backend(msg) => write!(f, "Backend error: {msg}"),
            ServerError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", e.field, e.message)?;
                }
                Ok(())
            }
            ServerError::PrefsError(msg) => write!(f, "Preferences store error: {msg}"),
            ServerError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}
