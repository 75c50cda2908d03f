//! Warning channel that writes to the application log.

use async_trait::async_trait;
use tracing::warn;

use tokenpair_core::result::AppResult;
use tokenpair_core::traits::WarningNotifier;
use tokenpair_core::types::SecurityWarning;

/// Emits every warning as a structured `WARN` event.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a new log notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WarningNotifier for LogNotifier {
    async fn send_warning(&self, warning: &SecurityWarning) -> AppResult<()> {
        warn!(
            from = %warning.from,
            to = %warning.to,
            session_id = %warning.session_id,
            subject = warning.subject(),
            message = %warning.message(),
            "Security warning"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let warning = SecurityWarning {
            from: "authwarning@example.com".to_string(),
            to: "user@example.com".to_string(),
            session_id: "s-1".to_string(),
            previous_address: "127.0.0.1".to_string(),
            current_address: "10.0.0.7".to_string(),
        };
        assert!(LogNotifier::new().send_warning(&warning).await.is_ok());
    }
}
