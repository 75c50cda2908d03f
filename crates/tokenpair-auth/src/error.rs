//! Errors raised by the token layer.

use thiserror::Error;

use tokenpair_core::error::{AppError, ErrorKind};

/// Failures of token transcoding, signing, and hashing.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The encoded token text was empty.
    #[error("empty token input")]
    EmptyInput,
    /// The encoded token text was not valid base64.
    #[error("invalid base64 in token: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// The decoded bytes did not parse into the expected token shape.
    #[error("token does not have the expected shape: {0}")]
    InvalidShape(#[source] serde_json::Error),
    /// A token could not be serialized.
    #[error("failed to serialize token: {0}")]
    Encoding(#[source] serde_json::Error),
    /// An uninitialized token was passed where a complete one is required.
    #[error("invalid token input: {0}")]
    InvalidInput(&'static str),
    /// The slow hash primitive failed.
    #[error("refresh token hashing failed: {0}")]
    Hash(String),
    /// A stored digest is not a recognizable encoded hash.
    #[error("malformed stored digest: {0}")]
    MalformedDigest(String),
}

impl TokenError {
    /// Whether the error stems from caller-supplied token text.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::InvalidBase64(_) | Self::InvalidShape(_)
        )
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let kind = if err.is_decode() {
            ErrorKind::Validation
        } else {
            ErrorKind::Internal
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
