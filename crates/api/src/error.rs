//! Error types for remote API calls.

use savevault_protocol::ErrorBody;

/// Errors produced by [`Client`](crate::Client) calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response arrived but its body could not be read in full.
    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session token is not a valid header value")]
    InvalidToken,
}

impl ApiError {
    /// HTTP status of an [`ApiError::Http`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `error` field of a JSON error body, when the server sent one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Http { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}
