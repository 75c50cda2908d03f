//! Short-lived access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value of the `typ` header field.
pub const TOKEN_TYPE: &str = "JWT";

/// Value of the `alg` header field.
pub const SIGNATURE_ALGORITHM: &str = "HS512";

/// Access token handed to the client. Never persisted server-side.
///
/// `signature` is an HMAC over `header` and `payload` only, so it can
/// always be recomputed from the other two fields and the server secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Token metadata.
    pub header: AccessTokenHeader,
    /// Token claims.
    pub payload: AccessTokenPayload,
    /// Base64 signature over header and payload.
    #[serde(default)]
    pub signature: String,
}

/// Access token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenHeader {
    /// Token type tag.
    #[serde(rename = "typ")]
    pub token_type: String,
    /// Signature algorithm tag.
    #[serde(rename = "alg")]
    pub algorithm: String,
    /// Expiration timestamp.
    #[serde(rename = "exp")]
    pub expires_at: DateTime<Utc>,
}

/// Access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenPayload {
    /// Session the token belongs to. Joins the token to its session row.
    pub session: String,
}

impl AccessToken {
    /// Creates an unsigned access token for the given session.
    pub fn new(expires_at: DateTime<Utc>, session: impl Into<String>) -> Self {
        Self {
            header: AccessTokenHeader {
                token_type: TOKEN_TYPE.to_string(),
                algorithm: SIGNATURE_ALGORITHM.to_string(),
                expires_at,
            },
            payload: AccessTokenPayload {
                session: session.into(),
            },
            signature: String::new(),
        }
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> &str {
        &self.payload.session
    }

    /// Whether the token has been signed at least once.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_header_constants() {
        let token = AccessToken::new(Utc::now(), "session");
        assert_eq!(token.header.token_type, "JWT");
        assert_eq!(token.header.algorithm, "HS512");
        assert_eq!(token.session_id(), "session");
        assert!(!token.is_signed());
    }

    #[test]
    fn test_wire_field_names() {
        let token = AccessToken::new(Utc::now(), "abc");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["header"]["typ"], "JWT");
        assert_eq!(json["header"]["alg"], "HS512");
        assert!(json["header"].get("exp").is_some());
        assert_eq!(json["payload"]["session"], "abc");
        assert_eq!(json["signature"], "");
    }
}
