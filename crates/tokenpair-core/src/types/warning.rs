//! Security warnings raised during refresh.

use serde::{Deserialize, Serialize};

/// A possible-hijack warning, raised when a refresh arrives from an
/// address other than the one the refresh token was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityWarning {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Session the refresh was attempted on.
    pub session_id: String,
    /// Address recorded in the refresh token at issuance.
    pub previous_address: String,
    /// Address the refresh request arrived from.
    pub current_address: String,
}

impl SecurityWarning {
    /// Short subject line for the warning.
    pub fn subject(&self) -> &'static str {
        "Token refresh from a new address"
    }

    /// Human-readable warning body.
    pub fn message(&self) -> String {
        format!(
            "warning attempting token refresh from another IP.\nOld ip: {}\nNew ip: {}",
            self.previous_address, self.current_address
        )
    }
}
