//! Outcomes of a refused rotation.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use tokenpair_core::error::{AppError, ErrorKind};

use crate::error::TokenError;

/// Outward message for every integrity failure.
pub const INVALID_REFRESH_TOKEN: &str = "invalid refresh token";

/// Why a rotation attempt was refused.
///
/// The variants keep the exact cause for logging. Outward, every integrity
/// failure collapses to the same [`INVALID_REFRESH_TOKEN`] signal so a
/// caller cannot probe which check a forged pair failed.
#[derive(Debug, Error)]
pub enum RotationRejection {
    /// The request body was not a token pair.
    #[error("request body is not a token pair: {0}")]
    MalformedPair(#[source] TokenError),
    /// The refresh token text could not be decoded.
    #[error("malformed refresh token: {0}")]
    MalformedToken(#[source] TokenError),
    /// The refresh token has expired.
    #[error("refresh token expired at {0}")]
    Expired(DateTime<Utc>),
    /// The access token's signature does not match its content.
    #[error("access token signature does not match its content")]
    SignatureMismatch,
    /// The refresh token was issued alongside a different access token.
    #[error("refresh token is not bound to the presented access token")]
    BindingMismatch,
    /// No session row exists for the access token's session.
    #[error("session '{0}' does not exist")]
    UnknownSession(String),
    /// The refresh token does not match the session's current digest.
    #[error("refresh token does not match the stored digest: {0}")]
    DigestMismatch(String),
    /// The session store failed.
    #[error("session store failure: {0}")]
    Storage(#[source] AppError),
    /// Token processing failed on the server side.
    #[error("token processing failure: {0}")]
    Internal(#[source] TokenError),
}

impl RotationRejection {
    /// Whether the rejection is an integrity or replay failure.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::SignatureMismatch
                | Self::BindingMismatch
                | Self::UnknownSession(_)
                | Self::DigestMismatch(_)
        )
    }

    /// Records the specific cause before it is generalized outward.
    pub fn log(&self, session_id: &str) {
        match self {
            Self::Storage(_) | Self::Internal(_) => {
                error!(session_id, error = %self, "Token rotation failed");
            }
            _ if self.is_integrity_failure() => {
                warn!(session_id, reason = %self, "Token rotation rejected");
            }
            _ => {
                info!(session_id, reason = %self, "Token rotation rejected");
            }
        }
    }

    /// Converts the rejection into the outward error.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::MalformedPair(_) => {
                AppError::validation("there is no Refresh Access token pair in request")
            }
            Self::MalformedToken(_) => {
                AppError::validation("there is incorrect Refresh token in request")
            }
            Self::Expired(_) => AppError::unauthorized("passed expired refresh token"),
            Self::SignatureMismatch
            | Self::BindingMismatch
            | Self::UnknownSession(_)
            | Self::DigestMismatch(_) => AppError::unauthorized(INVALID_REFRESH_TOKEN),
            Self::Storage(e) => {
                let kind = if e.kind.is_server_side() {
                    e.kind
                } else {
                    ErrorKind::Database
                };
                AppError::with_source(kind, "session store failure", e)
            }
            Self::Internal(e) => AppError::with_source(ErrorKind::Internal, "token failure", e),
        }
    }
}

impl From<RotationRejection> for AppError {
    fn from(rejection: RotationRejection) -> Self {
        rejection.into_app_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_failures_look_identical() {
        let rejections = vec![
            RotationRejection::SignatureMismatch,
            RotationRejection::BindingMismatch,
            RotationRejection::UnknownSession("s".to_string()),
            RotationRejection::DigestMismatch("mismatch".to_string()),
        ];

        for rejection in rejections {
            assert!(rejection.is_integrity_failure());
            let err = rejection.into_app_error();
            assert_eq!(err.kind, ErrorKind::Unauthorized);
            assert_eq!(err.message, INVALID_REFRESH_TOKEN);
        }
    }

    #[test]
    fn test_expired_is_distinct() {
        let err = RotationRejection::Expired(Utc::now()).into_app_error();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_ne!(err.message, INVALID_REFRESH_TOKEN);
    }

    #[test]
    fn test_malformed_is_client_error() {
        let err = RotationRejection::MalformedToken(TokenError::EmptyInput).into_app_error();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_storage_is_server_error() {
        let rejection = RotationRejection::Storage(AppError::database("connection reset"));
        let err = rejection.into_app_error();
        assert!(err.kind.is_server_side());
        assert!(!err.message.contains("connection reset"));
    }
}
