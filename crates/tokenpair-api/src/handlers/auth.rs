//! Token pair handlers: issue and rotate.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use tokenpair_auth::TokenPair;

use crate::error::ApiError;
use crate::extractors::ClientIdentity;
use crate::state::AppState;

/// POST /v1/auth
pub async fn issue(
    State(state): State<AppState>,
    client: ClientIdentity,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = state
        .session_manager
        .issue(&client.client_id, &client.origin)
        .await?;

    Ok(Json(pair))
}

/// POST /v1/auth/refresh
///
/// The body is taken raw so that an unparsable pair gets the same error
/// body as every other rejection.
pub async fn rotate(
    State(state): State<AppState>,
    client: ClientIdentity,
    body: Bytes,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = state
        .session_manager
        .rotate_body(&client.client_id, &client.origin, &body)
        .await?;

    Ok(Json(pair))
}
