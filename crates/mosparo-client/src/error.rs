//! Error type for the mosparo HTTP client.

use mosparo_core::{ErrorKind, MosparoError};

/// Errors returned by [`MosparoClient`](crate::MosparoClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input or trust failure from the protocol layer.
    #[error(transparent)]
    Mosparo(#[from] MosparoError),

    /// The request could not be sent or the connection failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status other than `200 OK`.
    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    /// The response body is not the expected JSON document.
    #[error("Response from API invalid.")]
    InvalidResponse {
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Mosparo(e) => e.kind(),
            Self::Http(_) | Self::Status(_) => ErrorKind::Transport,
            Self::InvalidResponse { .. } => ErrorKind::Protocol,
        }
    }

    /// Whether the verdict must be treated as a possible attack.
    #[must_use]
    pub fn is_trust_failure(&self) -> bool {
        self.kind() == ErrorKind::Trust
    }
}

/// Convenience result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
