//! Bridge-specific error types.

use thiserror::Error;

use crate::application::ports::TerminalError;

/// Errors from the terminal bridge adapter.
#[derive(Debug, Error, Clone)]
pub enum BridgeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The bridge returned an error payload.
    #[error("bridge error: {code} - {message}")]
    Api {
        /// Error code from the bridge.
        code: String,
        /// Error message from the bridge.
        message: String,
    },

    /// The requested resource does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// Path of the missing resource.
        resource: String,
    },

    /// Network error (retryable).
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
    },
}

impl From<BridgeError> for TerminalError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Http(message)
            | BridgeError::Network(message)
            | BridgeError::JsonParse(message) => Self::Unavailable { message },
            BridgeError::Api { code, message } => Self::Rejected { code, message },
            BridgeError::NotFound { resource } => Self::Unavailable {
                message: format!("{resource} not found"),
            },
            BridgeError::MaxRetriesExceeded { attempts } => Self::Unavailable {
                message: format!("max retries exceeded after {attempts} attempts"),
            },
        }
    }
}
