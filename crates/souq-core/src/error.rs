//! Error types for marketplace client operations.

use thiserror::Error;

/// Top-level error type for the marketplace client.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication or session failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Input rejected at construction time.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// The API rejected the request.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code of the rejected response.
        status: u16,
        /// Server-provided message, or the raw body when unstructured.
        message: String,
    },

    /// Network or protocol-level failure before a response was obtained.
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Wrap a transport-layer error.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the supplied credentials.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The access token was rejected and could not be renewed.
    #[error("session expired and could not be renewed")]
    SessionExpired,
}

/// Invalid input errors, carrying the offending value and a reason.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// A malformed or unsupported API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A request body that could not be serialized.
    #[error("invalid request body: {reason}")]
    Body {
        /// Why serialization failed.
        reason: String,
    },
}
