//! # tokenpair-notify
//!
//! Delivery channels for the warning raised when a refresh request arrives
//! from an address other than the one its refresh token was issued to.

pub mod log;
pub mod provider;
pub mod webhook;

pub use log::LogNotifier;
pub use provider::build_notifier;
pub use webhook::WebhookNotifier;
