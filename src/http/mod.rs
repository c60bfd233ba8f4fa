//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (normalize client input into SearchRequest)
//!     → [upstream relay dispatches the search]
//!     → response.rs (stream upstream response back, error shapes)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{csv_list, normalize, SearchFilters, SearchParams, SearchRequest, DEFAULT_TOP_K};
pub use response::ApiError;
pub use server::HttpServer;
