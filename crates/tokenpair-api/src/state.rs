//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tokenpair_auth::SessionManager;
use tokenpair_core::config::AppConfig;

/// Shared state threaded through every route.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded application configuration.
    pub config: Arc<AppConfig>,
    /// Issue and rotate flows.
    pub session_manager: Arc<SessionManager>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: Arc<AppConfig>, session_manager: Arc<SessionManager>) -> Self {
        Self {
            config,
            session_manager,
        }
    }
}
