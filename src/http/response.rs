//! Response relaying and error surface.
//!
//! # Responsibilities
//! - Map gateway failures to their JSON wire shapes
//! - Relay the upstream response (status, content-type, body) verbatim
//! - Stream the upstream body without buffering it fully
//!
//! # Design Decisions
//! - Commit-point semantics: the first body read happens before the gateway
//!   response is built, so a failure there still yields a full 502; once
//!   streaming has begun a failure truncates the already-committed response
//! - Upstream 4xx/5xx are relayed as-is, never reinterpreted

use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use futures_util::stream;
use futures_util::StreamExt;
use hyper::body::Incoming;
use serde_json::json;
use thiserror::Error;

/// Request-level failures surfaced by the gateway itself.
///
/// Upstream application errors (their own 4xx/5xx) are not represented
/// here; those pass through `relay_response` untouched.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No query text resolvable from the client input.
    #[error("missing query")]
    MissingQuery,

    /// Transport-level failure reaching the rag-service.
    #[error("rag-service unreachable: {0}")]
    Unreachable(String),

    /// The upstream response body failed before any bytes were relayed.
    #[error("failed to read rag response: {0}")]
    RelayRead(axum::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            ApiError::MissingQuery => (
                StatusCode::BAD_REQUEST,
                json!({"error": "missing query"}),
            ),
            ApiError::Unreachable(detail) => (
                StatusCode::BAD_GATEWAY,
                json!({"error": "rag-service unreachable", "detail": detail}),
            ),
            ApiError::RelayRead(_) => (
                StatusCode::BAD_GATEWAY,
                json!({"error": "failed to read rag response"}),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Relay an upstream response to the client.
///
/// Copies the upstream status and content-type verbatim and streams the
/// body. The first chunk is read eagerly: if that read fails, nothing has
/// been committed yet and a full `ApiError::RelayRead` response is still
/// possible. Errors on later chunks truncate the stream (the status line
/// is already on the wire) and are logged by the body adapter.
pub async fn relay_response(upstream: Response<Incoming>) -> Result<axum::response::Response, ApiError> {
    let (parts, body) = upstream.into_parts();

    let mut data = Body::new(body).into_data_stream();
    let first = match data.next().await {
        Some(Err(error)) => return Err(ApiError::RelayRead(error)),
        first => first,
    };

    let relayed = stream::iter(first)
        .chain(data)
        .map(|chunk| {
            chunk.inspect_err(|error| {
                tracing::warn!(%error, "rag response stream failed mid-relay; truncating");
            })
        });

    let mut builder = Response::builder().status(parts.status);
    if let Some(content_type) = parts.headers.get(header::CONTENT_TYPE) {
        builder = builder.header(header::CONTENT_TYPE, content_type.clone());
    }

    builder
        .body(Body::from_stream(relayed))
        // Status and content-type come from a response hyper already parsed.
        .map_err(|e| ApiError::Unreachable(e.to_string()))
}
