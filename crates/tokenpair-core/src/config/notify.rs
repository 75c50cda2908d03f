//! Hijack warning delivery configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the warning channel used when a refresh arrives
/// from an unexpected address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Delivery backend: `"log"` or `"webhook"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Sender address placed on every warning.
    #[serde(default = "default_from")]
    pub from: String,
    /// Recipient address placed on every warning.
    #[serde(default = "default_to")]
    pub to: String,
    /// Endpoint receiving warnings when `provider = "webhook"`.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Optional HMAC secret used to sign webhook bodies.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Delivery timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            from: default_from(),
            to: default_to(),
            webhook_url: None,
            webhook_secret: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from() -> String {
    "authwarning@example.com".to_string()
}

fn default_to() -> String {
    "user@example.com".to_string()
}

fn default_timeout() -> u64 {
    5
}
