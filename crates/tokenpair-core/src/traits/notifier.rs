//! Outbound warning channel.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::SecurityWarning;

/// Delivers security warnings to the account owner.
///
/// Callers treat delivery as fire-and-forget: an error is logged and
/// never fails the operation that raised the warning.
#[async_trait]
pub trait WarningNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Sends a single warning.
    async fn send_warning(&self, warning: &SecurityWarning) -> AppResult<()>;
}
