//! Errors returned by a CRM backend.

use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// The key already exists for that entity (creation conflict).
    #[error("{message}")]
    Duplicate { message: String },

    /// The server answered with a non-success status.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Message suitable for showing to the person running the import.
    ///
    /// Server-provided messages are passed through verbatim.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Duplicate { message } | Self::Rejected { message, .. } => message,
            Self::Network(_) => "Could not reach the CRM server. Please check your connection.",
            Self::Decode(_) => "The CRM server returned an unexpected response.",
        }
    }

    /// Returns whether the same call could succeed if retried later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::Duplicate { .. } | Self::Decode(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
