//! Long-lived refresh token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Refresh token handed to the client as an opaque base64 blob.
///
/// It carries no secret: its authenticity is established only by matching
/// the digest held in the session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshToken {
    /// Token metadata.
    pub header: RefreshTokenHeader,
    /// Token claims.
    pub payload: RefreshTokenPayload,
}

/// Refresh token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshTokenHeader {
    /// Expiration timestamp.
    #[serde(rename = "exp")]
    pub expires_at: DateTime<Utc>,
}

/// Refresh token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshTokenPayload {
    /// Signature of the access token issued alongside this refresh token.
    pub access_token_signature: String,
    /// Address observed when the token was issued.
    pub source_address: String,
}

impl RefreshToken {
    /// Creates a refresh token bound to one access-token signature.
    pub fn new(
        access_token_signature: impl Into<String>,
        expires_at: DateTime<Utc>,
        source_address: impl Into<String>,
    ) -> Self {
        Self {
            header: RefreshTokenHeader { expires_at },
            payload: RefreshTokenPayload {
                access_token_signature: access_token_signature.into(),
                source_address: source_address.into(),
            },
        }
    }

    /// Returns the expiration timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.header.expires_at
    }

    /// Checks whether the token had expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.header.expires_at
    }

    /// Whether the token was issued to a different address than `address`.
    pub fn is_from_other_address(&self, address: &str) -> bool {
        self.payload.source_address != address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = RefreshToken::new("sig", now, "127.0.0.1");
        assert!(!token.is_expired_at(now));
        assert!(token.is_expired_at(now + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_address_change() {
        let token = RefreshToken::new("sig", Utc::now(), "127.0.0.1");
        assert!(!token.is_from_other_address("127.0.0.1"));
        assert!(token.is_from_other_address("0.0.0.1"));
    }
}
