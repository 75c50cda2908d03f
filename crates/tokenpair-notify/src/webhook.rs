//! Warning channel that POSTs JSON to an HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use tokenpair_core::error::{AppError, ErrorKind};
use tokenpair_core::result::AppResult;
use tokenpair_core::traits::WarningNotifier;
use tokenpair_core::types::SecurityWarning;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature when a secret is configured.
pub const SIGNATURE_HEADER: &str = "X-Signature-256";

/// Delivers warnings to a webhook.
pub struct WebhookNotifier {
    http_client: Client,
    url: String,
    secret: Option<String>,
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("url", &self.url)
            .field("signed", &self.secret.is_some())
            .finish()
    }
}

impl WebhookNotifier {
    /// Create a webhook notifier with a per-request timeout.
    pub fn new(url: impl Into<String>, secret: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;

        Ok(Self {
            http_client,
            url: url.into(),
            secret,
        })
    }

    fn sign_payload(&self, payload: &str, secret: &str) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::internal(format!("Invalid webhook secret: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl WarningNotifier for WebhookNotifier {
    async fn send_warning(&self, warning: &SecurityWarning) -> AppResult<()> {
        let payload = json!({
            "from": warning.from,
            "to": warning.to,
            "subject": warning.subject(),
            "body": warning.message(),
            "session_id": warning.session_id,
            "previous_address": warning.previous_address,
            "current_address": warning.current_address,
        });
        let payload_str = serde_json::to_string(&payload)?;

        let mut request = self
            .http_client
            .post(&self.url)
            .header("Content-Type", "application/json");

        if let Some(secret) = &self.secret {
            let signature = self.sign_payload(&payload_str, secret)?;
            request = request.header(SIGNATURE_HEADER, format!("sha256={signature}"));
        }

        let response = request.body(payload_str).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Webhook delivery failed", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Webhook responded with status {status}"
            )));
        }

        debug!(session_id = %warning.session_id, "Delivered warning to webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning() -> SecurityWarning {
        SecurityWarning {
            from: "authwarning@example.com".to_string(),
            to: "user@example.com".to_string(),
            session_id: "s-1".to_string(),
            previous_address: "127.0.0.1".to_string(),
            current_address: "10.0.0.7".to_string(),
        }
    }

    #[test]
    fn test_webhook_signature() {
        let notifier =
            WebhookNotifier::new("http://127.0.0.1:1/hook", None, Duration::from_secs(1)).unwrap();
        let signature = notifier.sign_payload(r#"{"test": "data"}"#, "secret123").unwrap();
        assert!(!signature.is_empty());
        let again = notifier.sign_payload(r#"{"test": "data"}"#, "secret123").unwrap();
        assert_eq!(signature, again);
        let other = notifier.sign_payload(r#"{"test": "data"}"#, "secret456").unwrap();
        assert_ne!(signature, other);
    }

    #[test]
    fn test_debug_hides_secret() {
        let notifier = WebhookNotifier::new(
            "http://127.0.0.1:1/hook",
            Some("hunter2".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{notifier:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_external_error() {
        let notifier =
            WebhookNotifier::new("http://127.0.0.1:1/hook", None, Duration::from_secs(2)).unwrap();
        let err = notifier.send_warning(&warning()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
