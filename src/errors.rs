//! Error types shared across the client. Transport failures, local field
//! rejections, and backend business rejections are deliberately distinct so
//! callers never have to guess whether retrying, editing a field, or reading
//! the server's message is the right move.

use std::fmt;

/// Transport-level failure talking to the dashboard API.
///
/// An expected `401` from the session probe is not represented here; the
/// probe surfaces it as an anonymous session instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(message) => write!(formatter, "Config error: {message}"),
            ApiError::Network(message) => write!(formatter, "Network error: {message}"),
            ApiError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ApiError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            ApiError::Parse(message) => write!(formatter, "Response error: {message}"),
            ApiError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_builder() {
            ApiError::Config(format!("Failed to build request: {err}"))
        } else if err.is_decode() {
            ApiError::Parse(format!("Failed to decode response: {err}"))
        } else {
            ApiError::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// A field-level rejection raised before any network call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Failure taxonomy for the auth and bank flows.
#[derive(Debug)]
pub enum FlowError {
    /// Local field rejection; nothing was sent to the backend.
    Validation(ValidationError),
    /// The backend understood the request and said no. The server's message
    /// is kept verbatim for display.
    Rejected(String),
    /// Verification needs a stored registration draft and none exists.
    MissingDraft,
    /// Client-side state could not be read or written.
    Storage(String),
    /// The transport failed; the step did not advance.
    Api(ApiError),
}

impl FlowError {
    /// Classify a transport error for a mutation: a client-status response
    /// carries the backend's rejection message, everything else stays a
    /// transport failure.
    #[must_use]
    pub fn from_api(err: ApiError) -> Self {
        match err {
            ApiError::Http { status, message } if (400..500).contains(&status) => {
                Self::Rejected(message)
            }
            other => Self::Api(other),
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Validation(err) => write!(formatter, "{err}"),
            FlowError::Rejected(message) => write!(formatter, "{message}"),
            FlowError::MissingDraft => {
                write!(formatter, "No registration in progress. Sign up first.")
            }
            FlowError::Storage(message) => write!(formatter, "State error: {message}"),
            FlowError::Api(err) => write!(formatter, "{err}"),
        }
    }
}

impl std::error::Error for FlowError {}

impl From<ValidationError> for FlowError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
