//! Warning channel selection.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tokenpair_core::config::NotifyConfig;
use tokenpair_core::error::AppError;
use tokenpair_core::result::AppResult;
use tokenpair_core::traits::WarningNotifier;

use crate::log::LogNotifier;
use crate::webhook::WebhookNotifier;

/// Build the warning channel named by `config.provider`.
pub fn build_notifier(config: &NotifyConfig) -> AppResult<Arc<dyn WarningNotifier>> {
    let notifier: Arc<dyn WarningNotifier> = match config.provider.as_str() {
        "log" => {
            info!("Initializing log warning channel");
            Arc::new(LogNotifier::new())
        }
        "webhook" => {
            let url = config.webhook_url.as_deref().ok_or_else(|| {
                AppError::configuration("notify.webhook_url is required for the webhook provider")
            })?;
            info!(url = %url, "Initializing webhook warning channel");
            Arc::new(WebhookNotifier::new(
                url,
                config.webhook_secret.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?)
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown notify provider: '{other}'. Supported: log, webhook"
            )));
        }
    };

    Ok(notifier)
}

#[cfg(test)]
mod tests {
    use tokenpair_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_default_is_log() {
        let notifier = build_notifier(&NotifyConfig::default()).unwrap();
        assert!(format!("{notifier:?}").contains("LogNotifier"));
    }

    #[test]
    fn test_webhook_requires_url() {
        let config = NotifyConfig {
            provider: "webhook".to_string(),
            ..NotifyConfig::default()
        };
        let err = build_notifier(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_unknown_provider() {
        let config = NotifyConfig {
            provider: "smtp".to_string(),
            ..NotifyConfig::default()
        };
        assert!(build_notifier(&config).is_err());
    }
}
