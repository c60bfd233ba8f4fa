//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Normalize client input and dispatch to the upstream relay
//! - Serve until the shutdown signal fires

use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::request::{normalize, SearchParams};
use crate::http::response::{relay_response, ApiError};
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, TRACEPARENT};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let state = AppState {
            upstream: UpstreamClient::new(config.upstream.base_url.as_deref()),
        };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(healthz))
            .route("/api/resources/search", get(search_get).post(search_post))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness probe. No dependency checks: a gateway with an unreachable
/// upstream is still alive.
async fn healthz() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn search_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    search(state, headers, params, "GET").await
}

async fn search_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(params): Json<SearchParams>,
) -> Response {
    search(state, headers, params, "POST").await
}

async fn search(
    state: AppState,
    headers: HeaderMap,
    params: SearchParams,
    method: &'static str,
) -> Response {
    let start = Instant::now();
    let response = match handle_search(&state, &headers, params).await {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!(%error, "search request failed");
            error.into_response()
        }
    };
    metrics::record_request(method, response.status().as_u16(), start);
    response
}

/// Normalize → dispatch → relay. Client errors short-circuit before any
/// upstream call happens.
async fn handle_search(
    state: &AppState,
    headers: &HeaderMap,
    params: SearchParams,
) -> Result<Response, ApiError> {
    let request = normalize(params)?;

    let traceparent = headers.get(TRACEPARENT);
    let upstream_response = state
        .upstream
        .search(&request, traceparent)
        .await
        .map_err(|e| ApiError::Unreachable(e.to_string()))?;

    tracing::debug!(
        status = %upstream_response.status(),
        "relaying rag-service response"
    );
    relay_response(upstream_response).await
}
