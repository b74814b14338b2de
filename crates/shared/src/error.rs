//! Shared error types for the REST and push-channel surfaces.

use thiserror::Error;

/// API error type for client-side use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Network(String),
    Http { status: u16, body: String },
    Deserialize(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Deserialize(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors from the push-channel lifecycle.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// No bearer token available; without credentials the channel does
    /// nothing.
    #[error("missing bearer token")]
    MissingToken,

    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    #[error("invalid channel url: {0}")]
    InvalidUrl(String),
}
