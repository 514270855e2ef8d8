//! Error types returned by the Mandrill client.

use crate::models::ApiError;
use reqwest::StatusCode;

/// Errors that can occur while building, sending, or decoding a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure: connection, TLS, timeout, or body read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not the JSON shape expected for its status.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Mandrill rejected the call as a whole.
    #[error("Mandrill API error {} ({}, HTTP {}): {}", .error.code, .error.name, .status, .error.message)]
    Api { status: StatusCode, error: ApiError },

    /// An attachment stream failed before it was fully read.
    #[error("failed to read attachment: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The structured API error, if the service returned one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Request(e) if e.is_timeout())
    }
}
