use thiserror::Error;

/// All errors that can occur when talking to SharpAPI.
#[derive(Error, Debug)]
pub enum SharpApiError {
    /// The client configuration is unusable (empty API key, bad polling bounds).
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// The API key was rejected (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// A non-2xx response with the HTTP status code and response body.
    #[error("API error {status_code}: {message}")]
    Api {
        status_code: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O error, typically from reading the resume file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A 2xx response whose body is missing a field the protocol requires.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// The remote service reported the job as failed.
    #[error("job failed: {reason}")]
    JobFailed { reason: String },

    /// Polling did not observe a terminal status within the configured wait.
    #[error("poll timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl SharpApiError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        SharpApiError::Configuration {
            message: message.into(),
        }
    }
}

/// A convenience alias for `Result<T, SharpApiError>`.
pub type Result<T> = std::result::Result<T, SharpApiError>;
