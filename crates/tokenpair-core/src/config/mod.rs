//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod notify;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AuthConfig, MAX_ACCESS_TTL_MINUTES, MAX_REFRESH_TTL_HOURS};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::notify::NotifyConfig;

use crate::error::AppError;

/// Minimum accepted length of the token signing secret, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token signing and hashing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Hijack warning delivery settings.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `TOKENPAIR__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TOKENPAIR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Checks the invariants the token core relies on but does not enforce itself.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.token_secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "auth.token_secret must be at least {MIN_SECRET_LENGTH} bytes long"
            )));
        }

        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.auth.access_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }

        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&self.auth.refresh_ttl_hours) {
            return Err(AppError::configuration(format!(
                "auth.refresh_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}"
            )));
        }

        if self.notify.provider == "webhook" && self.notify.webhook_url.is_none() {
            return Err(AppError::configuration(
                "notify.webhook_url is required when notify.provider = \"webhook\"",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.token_secret = "0123456789abcdef0123456789abcdef".to_string();
        config
    }

    #[test]
    fn test_default_secret_is_rejected() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("token_secret"));
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let mut config = valid_config();
        config.auth.refresh_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_ttl_is_rejected() {
        let mut config = valid_config();
        config.auth.refresh_ttl_hours = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.auth.refresh_ttl_hours = MAX_REFRESH_TTL_HOURS + 1;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.auth.access_ttl_minutes = MAX_ACCESS_TTL_MINUTES + 1;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.auth.access_ttl_minutes = MAX_ACCESS_TTL_MINUTES;
        config.auth.refresh_ttl_hours = MAX_REFRESH_TTL_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_webhook_requires_url() {
        let mut config = valid_config();
        config.notify.provider = "webhook".to_string();
        assert!(config.validate().is_err());

        config.notify.webhook_url = Some("http://localhost:9000/hooks".to_string());
        assert!(config.validate().is_ok());
    }
}
