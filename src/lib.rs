//! Edge gateway for the resource search API.
//!
//! Accepts client search requests (query string or JSON body), normalizes
//! them into the canonical upstream request shape, forwards them to the
//! rag-service and relays the upstream response back verbatim.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
