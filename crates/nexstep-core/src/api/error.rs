use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend refused the request and said why
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    #[error("Request failed with status {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("Unauthorized - please log in again")]
    Unauthorized(Option<String>),

    #[error("Resource not found: {detail}")]
    NotFound { detail: String, message: Option<String> },

    #[error("Rate limited - please wait before retrying")]
    RateLimited(Option<String>),

    #[error("Server error: {detail}")]
    ServerError { detail: String, message: Option<String> },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The backend reports failures as `message`, or as `error` holding a string
/// or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Single(String),
    List(Vec<String>),
}

impl ErrorDetail {
    pub(crate) fn into_message(self) -> Option<String> {
        let message = match self {
            ErrorDetail::Single(s) => s,
            ErrorDetail::List(items) => items.join("; "),
        };
        (!message.trim().is_empty()).then_some(message)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull the human-readable message out of an error response body.
    fn body_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| parsed.error.and_then(ErrorDetail::into_message))
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::body_message(body);
        let detail = message.clone().unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound { detail, message },
            429 => ApiError::RateLimited(message),
            500..=599 => ApiError::ServerError { detail, message },
            code => match message {
                Some(message) => ApiError::Rejected {
                    status: Some(code),
                    message,
                },
                None => ApiError::Http { status: code, detail },
            },
        }
    }

    /// The message the backend attached to this error, if any.
    pub fn payload_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => Some(message),
            ApiError::Unauthorized(message) | ApiError::RateLimited(message) => message.as_deref(),
            ApiError::NotFound { message, .. } | ApiError::ServerError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Display string for the front end: the backend's own message when it
    /// sent one, whatever the status, otherwise `fallback`. Transport
    /// details stay in the logs.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.payload_message() {
            Some(message) if !message.trim().is_empty() => message.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
