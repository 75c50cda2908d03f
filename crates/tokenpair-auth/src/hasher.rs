//! Client-bound refresh-token digests for at-rest storage.
//!
//! A digest is computed in two stages:
//!
//! 1. SHA-256 over the refresh token's JSON followed by the raw client
//!    identifier bytes. The fixed 32-byte output keeps the slow stage's
//!    input bounded regardless of token size.
//! 2. Argon2id with a random salt over that pre-digest, stored as the
//!    base64 of the PHC string.
//!
//! Binding the client identifier into stage 1 means a stolen token replayed
//! under another client identifier never verifies, even though the token
//! bytes are identical.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

use tokenpair_core::config::AuthConfig;

use crate::error::TokenError;
use crate::token::RefreshToken;

/// Hashes and verifies refresh tokens with Argon2id.
#[derive(Debug, Clone)]
pub struct RefreshTokenHasher {
    /// Argon2 cost parameters used for new digests.
    params: Params,
}

impl RefreshTokenHasher {
    /// Creates a hasher with explicit Argon2 parameters.
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Creates a hasher from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| TokenError::Hash(format!("invalid Argon2 parameters: {e}")))?;

        Ok(Self::new(params))
    }

    /// Computes a salted digest of `token` bound to `client_id`.
    pub fn hash(&self, token: &RefreshToken, client_id: &str) -> Result<String, TokenError> {
        let pre_digest = pre_digest(token, client_id)?;
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(&pre_digest, &salt)
            .map_err(|e| TokenError::Hash(e.to_string()))?;

        Ok(STANDARD.encode(hash.to_string()))
    }

    /// Verifies `token` presented by `client_id` against a stored digest.
    ///
    /// Returns `Ok(false)` on a mismatch and an error only when
    /// `stored_digest` is not a recognizable encoded hash.
    pub fn verify(
        &self,
        token: &RefreshToken,
        client_id: &str,
        stored_digest: &str,
    ) -> Result<bool, TokenError> {
        let pre_digest = pre_digest(token, client_id)?;

        let raw = STANDARD
            .decode(stored_digest)
            .map_err(|e| TokenError::MalformedDigest(format!("not base64: {e}")))?;
        let phc = String::from_utf8(raw)
            .map_err(|_| TokenError::MalformedDigest("not UTF-8".to_string()))?;
        let parsed =
            PasswordHash::new(&phc).map_err(|e| TokenError::MalformedDigest(e.to_string()))?;

        match self.argon2().verify_password(&pre_digest, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(TokenError::Hash(e.to_string())),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

/// Fast client-bound pre-digest fed to the slow hash.
pub fn pre_digest(token: &RefreshToken, client_id: &str) -> Result<Vec<u8>, TokenError> {
    let json = serde_json::to_vec(token).map_err(TokenError::Encoding)?;

    let mut hasher = Sha256::new();
    hasher.update(&json);
    hasher.update(client_id.as_bytes());
    Ok(hasher.finalize().to_vec())
}
