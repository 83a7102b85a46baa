use serde_json::Value;

/// Client-specific result type
pub type Result<T> = std::result::Result<T, BibleError>;

/// Errors reported by a [`crate::Fetcher`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Remote answered with a non-success status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, JSON when it parsed as such
        body: Value,
        /// Generic message describing the failure
        message: String,
    },

    /// Request host is not one of the declared network domains
    #[error("host '{host}' is not an allowed network domain")]
    DomainNotAllowed {
        /// Host that was refused
        host: String,
    },

    /// Connection, TLS, URL or body read failure
    #[error("{0}")]
    Transport(String),

    /// Fetcher could not be constructed
    #[error("invalid fetcher configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// Build a status error, deriving the generic message from status and body
    ///
    /// The body is rendered as compact JSON, so a plain-text body shows quoted.
    pub fn status(status: u16, body: Value) -> Self {
        Self::Status {
            status,
            message: format!("{status} - {body}"),
            body,
        }
    }

    /// `detail` carried by a status error body, if it is a non-empty string
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => body
                .get("detail")
                .and_then(Value::as_str)
                .filter(|detail| !detail.is_empty()),
            _ => None,
        }
    }
}

/// Failures of a single `Bible` formula invocation
#[derive(Debug, thiserror::Error)]
pub enum BibleError {
    /// No verse reference was supplied
    #[error("Must contain verses.")]
    MissingParameter,

    /// The fetch capability failed
    #[error(transparent)]
    Upstream(#[from] FetchError),
}

/// Error whose message is shown directly to the end user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DisplayError {
    message: String,
}

impl DisplayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<BibleError> for DisplayError {
    fn from(error: BibleError) -> Self {
        normalize(&error)
    }
}

/// Reduce any invocation failure to the message the user should see
///
/// A status error whose body carries a non-empty `detail` shows that detail.
/// Everything else shows its own message.
pub fn normalize(error: &BibleError) -> DisplayError {
    if let BibleError::Upstream(fetch_error) = error
        && let Some(detail) = fetch_error.detail()
    {
        return DisplayError::new(detail);
    }

    DisplayError::new(error.to_string())
}
