//! # tokenpair-api
//!
//! HTTP API layer for TokenPair built on Axum.
//!
//! Provides the issue and rotate endpoints, the health endpoint, the client
//! identity extractor, request logging, and error mapping.

pub mod app;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
