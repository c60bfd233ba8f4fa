//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use resource_gateway::config::GatewayConfig;
use resource_gateway::http::HttpServer;
use resource_gateway::lifecycle::Shutdown;

/// One request captured by the mock rag-service.
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    content_type: String,
    body: String,
}

/// Mock rag-service answering `POST /search` with a canned response and
/// capturing everything it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockUpstream {
    pub async fn start(status: u16, content_type: &str, body: &str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            status: StatusCode::from_u16(status).unwrap(),
            content_type: content_type.to_string(),
            body: body.to_string(),
        };

        let app = Router::new()
            .route("/search", post(mock_search))
            .with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> MutexGuard<'_, Vec<CapturedRequest>> {
        self.requests.lock().unwrap()
    }
}

async fn mock_search(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state
        .requests
        .lock()
        .unwrap()
        .push(CapturedRequest { headers, body });

    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type.clone())],
        state.body.clone(),
    )
        .into_response()
}

/// Spawn a gateway on an ephemeral port.
///
/// The returned `Shutdown` must stay alive for the gateway's lifetime;
/// dropping it stops the server.
pub async fn spawn_gateway(upstream_base: Option<String>) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.upstream.base_url = upstream_base;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Start a raw-TCP upstream that answers with response headers promising a
/// body and then drops the connection before sending any of it.
pub async fn start_truncating_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket
                            .write_all(
                                b"HTTP/1.1 200 OK\r\n\
                                  Content-Type: application/json\r\n\
                                  Content-Length: 1000\r\n\r\n",
                            )
                            .await;
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
