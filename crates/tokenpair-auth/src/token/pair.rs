//! Wire record carrying an access/refresh pair.

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

use super::access::AccessToken;
use super::codec;
use super::refresh::RefreshToken;

/// Pair of access and refresh tokens returned by issue and rotate, and
/// presented back on rotate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token.
    pub access_token: AccessToken,
    /// Base64-encoded refresh token.
    pub refresh_token: String,
}

impl TokenPair {
    /// Builds a pair, encoding the refresh token for transport.
    pub fn new(access_token: AccessToken, refresh_token: &RefreshToken) -> Result<Self, TokenError> {
        Ok(Self {
            access_token,
            refresh_token: codec::encode(refresh_token)?,
        })
    }

    /// Parses a pair from a request body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.is_empty() {
            return Err(TokenError::EmptyInput);
        }
        serde_json::from_slice(bytes).map_err(TokenError::InvalidShape)
    }

    /// Serializes the pair to its canonical JSON body.
    pub fn to_vec(&self) -> Result<Vec<u8>, TokenError> {
        serde_json::to_vec(self).map_err(TokenError::Encoding)
    }

    /// Decodes the refresh half of the pair.
    pub fn refresh(&self) -> Result<RefreshToken, TokenError> {
        codec::decode(&self.refresh_token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_body_round_trip() {
        let access = AccessToken::new(Utc::now(), "session-1");
        let refresh = RefreshToken::new("sig", Utc::now(), "127.0.0.1");
        let pair = TokenPair::new(access, &refresh).unwrap();

        let parsed = TokenPair::from_slice(&pair.to_vec().unwrap()).unwrap();
        assert_eq!(parsed, pair);
        assert_eq!(parsed.refresh().unwrap(), refresh);
    }

    #[test]
    fn test_empty_body() {
        assert!(matches!(
            TokenPair::from_slice(b""),
            Err(TokenError::EmptyInput)
        ));
    }

    #[test]
    fn test_body_without_pair() {
        assert!(TokenPair::from_slice(br#"{"refresh_token":"abc"}"#).is_err());
    }
}
