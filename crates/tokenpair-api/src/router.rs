//! Route definitions for the TokenPair HTTP API.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/v1", auth_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Token endpoints: issue, refresh. Only POST is routed.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(handlers::auth::issue))
        .route("/auth/refresh", post(handlers::auth::rotate))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
