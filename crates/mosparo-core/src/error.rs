//! Error types for the mosparo verification protocol.

/// Broad category of a failure.
///
/// [`ErrorKind::Trust`] is the security-relevant one: the server's answer
/// could not be authenticated or does not cover the fields the caller relies
/// on. Callers should treat it as a possible attack rather than an outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller's input is unusable. Detected before any network call.
    Input,
    /// The request could not be delivered or the server answered with a
    /// non-success status.
    Transport,
    /// The server answered, but the body could not be decoded.
    Protocol,
    /// The verdict cannot be trusted.
    Trust,
}

/// Core error type for the mosparo protocol.
#[derive(Debug, thiserror::Error)]
pub enum MosparoError {
    /// A protocol token is missing from the form data.
    #[error("{key} must be provided.")]
    MissingToken {
        /// Name of the reserved form key.
        key: &'static str,
    },

    /// A protocol token is present but is not a string.
    #[error("{key} must be a String value.")]
    InvalidToken {
        /// Name of the reserved form key.
        key: &'static str,
    },

    /// A required-field check was requested with an empty field set.
    #[error("Required fields must be non null and non empty")]
    EmptyRequiredFields,

    /// The private key cannot initialise HMAC-SHA256.
    #[error("private key cannot be used for HMAC-SHA256")]
    InvalidKey,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The hashed form data could not be serialized.
    #[error("failed to serialize form data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server flagged the request as erroneous. Carries its message verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The server claims a valid submission but its verification signature
    /// does not match the locally computed one.
    #[error(
        "Verification signatures mismatch. Request '{expected}' - Response '{}'",
        .actual.as_deref().unwrap_or_default()
    )]
    SignatureMismatch {
        /// Signature computed locally.
        expected: String,
        /// Signature returned by the server, if any.
        actual: Option<String>,
    },

    /// A field the caller requires was never evaluated by the server.
    #[error("Required field '{0}' not verified")]
    RequiredFieldNotVerified(String),
}

impl MosparoError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingToken { .. }
            | Self::InvalidToken { .. }
            | Self::EmptyRequiredFields
            | Self::InvalidKey
            | Self::Config(_)
            | Self::Serialization(_) => ErrorKind::Input,
            Self::Rejected(_) | Self::SignatureMismatch { .. } | Self::RequiredFieldNotVerified(_) => {
                ErrorKind::Trust
            }
        }
    }
}

/// Convenience result type for mosparo operations.
pub type MosparoResult<T> = Result<T, MosparoError>;
