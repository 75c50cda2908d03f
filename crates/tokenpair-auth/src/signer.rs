//! Access-token signatures.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha512;

use tokenpair_core::config::AuthConfig;

use crate::error::TokenError;
use crate::token::AccessToken;

type HmacSha512 = Hmac<Sha512>;

/// Computes and checks HMAC-SHA512 signatures over access-token content.
///
/// The digest input is the JSON of the header followed by the JSON of the
/// payload. The token's own `signature` field never takes part, so signing
/// an already-signed token yields the same signature again.
#[derive(Clone)]
pub struct AccessTokenSigner {
    /// HMAC key.
    key: Vec<u8>,
}

impl std::fmt::Debug for AccessTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenSigner")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl AccessTokenSigner {
    /// Creates a signer keyed by `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
        }
    }

    /// Creates a signer from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.token_secret.as_bytes())
    }

    /// Returns the signature for `token`, ignoring its current signature field.
    pub fn sign(&self, token: &AccessToken) -> Result<String, TokenError> {
        let mac = self.mac_over(token)?;
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Signs `token` and stores the signature in it.
    ///
    /// Rejects tokens that were never bound to a session.
    pub fn sign_and_embed(&self, token: &mut AccessToken) -> Result<(), TokenError> {
        if token.payload.session.is_empty() {
            return Err(TokenError::InvalidInput(
                "access token has no session identifier",
            ));
        }

        token.signature = self.sign(token)?;
        Ok(())
    }

    /// Checks that `signature` is exactly the signature of `token`.
    pub fn verify(&self, token: &AccessToken, signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature) else {
            return false;
        };

        match self.mac_over(token) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }

    /// Checks the signature embedded in `token`.
    pub fn verify_embedded(&self, token: &AccessToken) -> bool {
        self.verify(token, &token.signature)
    }

    fn mac_over(&self, token: &AccessToken) -> Result<HmacSha512, TokenError> {
        let header = serde_json::to_vec(&token.header).map_err(TokenError::Encoding)?;
        let payload = serde_json::to_vec(&token.payload).map_err(TokenError::Encoding)?;

        let mut mac = HmacSha512::new_from_slice(&self.key)
            .map_err(|_| TokenError::InvalidInput("unusable signing key"))?;
        mac.update(&header);
        mac.update(&payload);
        Ok(mac)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn signer() -> AccessTokenSigner {
        AccessTokenSigner::new("my interesting secret")
    }

    fn token() -> AccessToken {
        AccessToken::new(Utc::now() + Duration::hours(2), "session-1")
    }

    #[test]
    fn test_sign_produces_signature() {
        let signature = signer().sign(&token()).unwrap();
        assert!(!signature.is_empty());
    }

    #[test]
    fn test_sign_then_verify() {
        let signer = signer();
        let token = token();
        let signature = signer.sign(&token).unwrap();
        assert!(signer.verify(&token, &signature));
    }

    #[test]
    fn test_signature_field_is_excluded() {
        let signer = signer();
        let mut token = token();
        signer.sign_and_embed(&mut token).unwrap();
        let first = token.signature.clone();

        signer.sign_and_embed(&mut token).unwrap();
        assert_eq!(token.signature, first);
        assert!(signer.verify_embedded(&token));
    }

    #[test]
    fn test_header_change_breaks_signature() {
        let signer = signer();
        let mut token = token();
        signer.sign_and_embed(&mut token).unwrap();

        token.header.expires_at += Duration::hours(1);
        assert!(!signer.verify_embedded(&token));
    }

    #[test]
    fn test_payload_change_breaks_signature() {
        let signer = signer();
        let mut token = token();
        signer.sign_and_embed(&mut token).unwrap();

        token.payload.session = "session-2".to_string();
        assert!(!signer.verify_embedded(&token));
    }

    #[test]
    fn test_algorithm_tag_is_signed() {
        let signer = signer();
        let mut token = token();
        signer.sign_and_embed(&mut token).unwrap();

        token.header.algorithm = "none".to_string();
        assert!(!signer.verify_embedded(&token));
    }

    #[test]
    fn test_other_secret_rejects() {
        let mut token = token();
        signer().sign_and_embed(&mut token).unwrap();
        assert!(!AccessTokenSigner::new("another secret").verify_embedded(&token));
    }

    #[test]
    fn test_prefix_does_not_verify() {
        let signer = signer();
        let mut token = token();
        signer.sign_and_embed(&mut token).unwrap();

        let truncated = &token.signature[..token.signature.len() - 4];
        assert!(!signer.verify(&token, truncated));
        assert!(!signer.verify(&token, ""));
        assert!(!signer.verify(&token, "%%%"));
    }

    #[test]
    fn test_unbound_token_rejected() {
        let mut token = AccessToken::new(Utc::now(), "");
        let err = signer().sign_and_embed(&mut token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidInput(_)));
        assert!(!token.is_signed());
    }
}
