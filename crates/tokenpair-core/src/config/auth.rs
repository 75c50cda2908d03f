//! Token signing and hashing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted access token lifetime, in minutes (one week).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 7 * 24 * 60;

/// Longest accepted refresh token lifetime, in hours (ten years).
pub const MAX_REFRESH_TTL_HOURS: u64 = 10 * 365 * 24;

/// Token credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access-token signatures (HMAC-SHA512).
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
    /// Argon2 memory cost in KiB for refresh-token digests.
    #[serde(default = "default_hash_memory")]
    pub hash_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2 degree of parallelism.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

impl AuthConfig {
    /// Access token lifetime.
    ///
    /// Fails when the configured value does not fit a `chrono::Duration`.
    pub fn access_ttl(&self) -> Result<chrono::Duration, AppError> {
        i64::try_from(self.access_ttl_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .ok_or_else(|| AppError::configuration("auth.access_ttl_minutes is out of range"))
    }

    /// Refresh token lifetime.
    ///
    /// Fails when the configured value does not fit a `chrono::Duration`.
    pub fn refresh_ttl(&self) -> Result<chrono::Duration, AppError> {
        i64::try_from(self.refresh_ttl_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .ok_or_else(|| AppError::configuration("auth.refresh_ttl_hours is out of range"))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
            hash_memory_kib: default_hash_memory(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

fn default_token_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    120
}

fn default_refresh_ttl() -> u64 {
    24 * 30
}

fn default_hash_memory() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}
