//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use tokenpair_api::{AppState, build_app};
use tokenpair_auth::{AccessTokenSigner, RefreshTokenHasher, SessionManager, TokenPair};
use tokenpair_core::config::AppConfig;
use tokenpair_core::result::AppResult;
use tokenpair_core::traits::WarningNotifier;
use tokenpair_core::types::SecurityWarning;
use tokenpair_database::MemorySessionStore;

/// Peer address used when a test does not pick one.
pub const DEFAULT_PEER: &str = "127.0.0.1";

/// Notifier that keeps every warning it is handed.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    warnings: Mutex<Vec<SecurityWarning>>,
}

impl RecordingNotifier {
    /// Warnings delivered so far.
    pub fn warnings(&self) -> Vec<SecurityWarning> {
        self.warnings.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarningNotifier for RecordingNotifier {
    async fn send_warning(&self, warning: &SecurityWarning) -> AppResult<()> {
        self.warnings.lock().unwrap().push(warning.clone());
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// Shared handler state
    pub state: AppState,
    /// Session rows, for direct inspection
    pub store: MemorySessionStore,
    /// Every warning raised
    pub notifier: Arc<RecordingNotifier>,
}

/// Parsed response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Parses the body as a token pair.
    pub fn pair(&self) -> TokenPair {
        serde_json::from_value(self.body.clone()).expect("Response is not a token pair")
    }

    /// The `message` field of an error body.
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Configuration with a valid secret and cheap hashing.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = "memory".to_string();
    config.auth.token_secret = "integration-test-secret-0123456789abcdef".to_string();
    config.auth.hash_memory_kib = 8;
    config.auth.hash_iterations = 1;
    config.auth.hash_parallelism = 1;
    config
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        config.validate().expect("Invalid test config");

        let store = MemorySessionStore::new();
        let notifier = Arc::new(RecordingNotifier::default());

        let session_manager = SessionManager::new(
            Arc::new(AccessTokenSigner::from_config(&config.auth)),
            Arc::new(RefreshTokenHasher::from_config(&config.auth).expect("Invalid hash params")),
            Arc::new(store.clone()),
            notifier.clone(),
            &config.auth,
            &config.notify,
        )
        .expect("Invalid token lifetimes");

        let state = AppState::new(Arc::new(config), Arc::new(session_manager));

        Self {
            state,
            store,
            notifier,
        }
    }

    /// Send a request from `peer` with the given `Guid` headers.
    pub async fn request_from(
        &self,
        peer: &str,
        method: &str,
        path: &str,
        guids: &[&str],
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> TestResponse {
        let peer: SocketAddr = format!("{peer}:40000").parse().expect("Invalid peer");
        let router = build_app(self.state.clone()).layer(MockConnectInfo(peer));

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for guid in guids {
            req = req.header("Guid", *guid);
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = router.oneshot(req).await.expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST /v1/auth
    pub async fn issue(&self, guid: &str) -> TestResponse {
        self.request_from(DEFAULT_PEER, "POST", "/v1/auth", &[guid], &[], Vec::new())
            .await
    }

    /// POST /v1/auth/refresh from the default peer
    pub async fn rotate(&self, guid: &str, pair: &TokenPair) -> TestResponse {
        self.rotate_from(DEFAULT_PEER, guid, pair).await
    }

    /// POST /v1/auth/refresh from `peer`
    pub async fn rotate_from(&self, peer: &str, guid: &str, pair: &TokenPair) -> TestResponse {
        let body = serde_json::to_vec(pair).expect("Failed to serialize pair");
        self.request_from(peer, "POST", "/v1/auth/refresh", &[guid], &[], body)
            .await
    }

    /// Waits for spawned warning deliveries to land.
    pub async fn settle(&self) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
