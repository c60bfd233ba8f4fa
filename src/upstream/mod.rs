//! Outbound client for the rag-service.
//!
//! # Data Flow
//! ```text
//! SearchRequest
//!     → serialize to JSON
//!     → POST <base>/search (traceparent copied through when present)
//!     → raw upstream response handed back to the HTTP layer for relaying
//! ```
//!
//! # Design Decisions
//! - One dispatch per request: no retries, no failover
//! - The client holds whatever pooling the hyper-util legacy client
//!   provides by default; dropping the request future releases the
//!   in-flight connection

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::http::request::SearchRequest;

/// Trace-propagation header copied verbatim from inbound to outbound.
pub const TRACEPARENT: &str = "traceparent";

/// Errors dispatching a search to the rag-service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream base URL not configured")]
    NotConfigured,

    #[error("failed to encode search payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("{0}")]
    Dispatch(#[from] hyper_util::client::legacy::Error),
}

/// HTTP client for the upstream search service.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    search_uri: Option<Uri>,
}

impl UpstreamClient {
    /// Build a client for the given base URL.
    ///
    /// `base_url` was already sanity-checked at config load; if it still
    /// fails to parse as a URI the client degrades to unconfigured.
    pub fn new(base_url: Option<&str>) -> Self {
        let search_uri = base_url.and_then(|base| {
            let uri = format!("{}/search", base.trim_end_matches('/'));
            match uri.parse::<Uri>() {
                Ok(uri) => Some(uri),
                Err(error) => {
                    tracing::warn!(base_url = %base, %error, "unusable upstream base URL");
                    None
                }
            }
        });

        Self {
            client: Client::builder(TokioExecutor::new()).build(HttpConnector::new()),
            search_uri,
        }
    }

    /// Whether a search endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.search_uri.is_some()
    }

    /// Dispatch one search and return the raw upstream response.
    ///
    /// No retry on failure; transport errors surface to the caller as-is.
    pub async fn search(
        &self,
        request: &SearchRequest,
        traceparent: Option<&HeaderValue>,
    ) -> Result<Response<Incoming>, UpstreamError> {
        let uri = self
            .search_uri
            .clone()
            .ok_or(UpstreamError::NotConfigured)?;

        let payload = serde_json::to_vec(request)?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = traceparent {
            builder = builder.header(TRACEPARENT, value.clone());
        }
        let outbound = builder.body(Body::from(payload))?;

        tracing::debug!(
            query = %request.query,
            top_k = request.top_k,
            has_filters = request.filters.is_some(),
            "dispatching search to rag-service"
        );

        Ok(self.client.request(outbound).await?)
    }
}
