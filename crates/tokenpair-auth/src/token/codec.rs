//! Transport encoding of refresh tokens.
//!
//! A refresh token travels as URL-safe base64 over its JSON serialization.
//! This layer only transcodes; expiry and binding are checked elsewhere.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

use crate::error::TokenError;

use super::refresh::RefreshToken;

/// Encodes a refresh token for transport.
pub fn encode(token: &RefreshToken) -> Result<String, TokenError> {
    let json = serde_json::to_vec(token).map_err(TokenError::Encoding)?;
    Ok(URL_SAFE.encode(json))
}

/// Decodes a refresh token from its transport text.
pub fn decode(text: &str) -> Result<RefreshToken, TokenError> {
    if text.is_empty() {
        return Err(TokenError::EmptyInput);
    }

    let json = URL_SAFE.decode(text)?;
    serde_json::from_slice(&json).map_err(TokenError::InvalidShape)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sample() -> RefreshToken {
        RefreshToken::new("hello", Utc::now(), "your ip")
    }

    #[test]
    fn test_encode_is_not_empty() {
        let encoded = encode(&sample()).unwrap();
        assert!(!encoded.is_empty());
    }

    #[test]
    fn test_decode_restores_token() {
        let token = sample();
        let decoded = decode(&encode(&token).unwrap()).unwrap();
        assert_eq!(decoded, token);
        assert_eq!(decoded.header.expires_at, token.header.expires_at);
    }

    #[test]
    fn test_reencoding_is_stable() {
        let first = encode(&sample()).unwrap();
        let second = encode(&decode(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(decode(""), Err(TokenError::EmptyInput)));
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode("not base64!!").unwrap_err();
        assert!(matches!(err, TokenError::InvalidBase64(_)));
        assert!(err.is_decode());
    }

    #[test]
    fn test_wrong_shape() {
        let text = URL_SAFE.encode(br#"{"header":{"exp":"2030-01-01T00:00:00Z"}}"#);
        assert!(matches!(decode(&text), Err(TokenError::InvalidShape(_))));

        let text = URL_SAFE.encode(b"[1, 2, 3]");
        assert!(matches!(decode(&text), Err(TokenError::InvalidShape(_))));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let text = URL_SAFE.encode(
            br#"{"header":{"exp":"2030-01-01T00:00:00Z"},"payload":{"access_token_signature":"s","source_address":"a","client":"x"}}"#,
        );
        assert!(matches!(decode(&text), Err(TokenError::InvalidShape(_))));
    }
}
