//! Core traits defined in `tokenpair-core` and implemented by other crates.

pub mod notifier;
pub mod session_store;

pub use notifier::WarningNotifier;
pub use session_store::{SessionStore, SessionTransaction};
