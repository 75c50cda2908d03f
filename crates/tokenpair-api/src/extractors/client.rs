//! `ClientIdentity` extractor: the caller's GUID header and origin address.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use tracing::debug;

use tokenpair_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the client identifier.
pub const GUID_HEADER: &str = "guid";

/// Header set by reverse proxies with the original client address.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Origin reported when the peer address is unavailable.
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// Who is calling and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Value of the single `Guid` header.
    pub client_id: String,
    /// Caller's network address, without port.
    pub origin: String,
}

impl FromRequestParts<AppState> for ClientIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let client_id = client_id_from_headers(&parts.headers)?;

        let forwarded = if state.config.server.trust_forwarded_for {
            forwarded_for(&parts.headers)
        } else {
            None
        };

        let origin = match forwarded {
            Some(origin) => origin,
            None => match ConnectInfo::<SocketAddr>::from_request_parts(parts, state).await {
                Ok(ConnectInfo(addr)) => addr.ip().to_string(),
                Err(_) => {
                    debug!("Peer address unavailable");
                    UNKNOWN_ORIGIN.to_string()
                }
            },
        };

        Ok(Self { client_id, origin })
    }
}

/// Reads exactly one non-empty `Guid` header.
pub fn client_id_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let mut values = headers.get_all(GUID_HEADER).iter();

    let first = values
        .next()
        .ok_or_else(|| AppError::validation("no GUID in request"))?;

    if values.next().is_some() {
        return Err(AppError::validation("too much GUID in request"));
    }

    match first.to_str() {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::validation("no GUID in request")),
    }
}

/// First address listed in `X-Forwarded-For`, if any.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
