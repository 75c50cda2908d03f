//! Persisted session row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the session table.
///
/// The row is the single source of truth for which refresh token is
/// currently valid for a session: `token_digest` always holds the digest
/// of the most recently issued refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique session key, shared with the access token payload.
    pub session_id: String,
    /// Client identifier the session was issued to.
    pub client_id: String,
    /// Encoded slow-hash digest of the current refresh token.
    pub token_digest: String,
    /// Expiry of the current refresh token.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Creates a new session record.
    pub fn new(
        session_id: impl Into<String>,
        client_id: impl Into<String>,
        token_digest: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            client_id: client_id.into(),
            token_digest: token_digest.into(),
            expires_at,
        }
    }
}
