//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RAG_BASE_URL env override (loader::resolve_upstream)
//!     → GatewayConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the gateway runs with no config file
//! - A missing upstream base URL is a warning, not a startup failure

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_upstream, ConfigError, RAG_BASE_URL_VAR};
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::TimeoutConfig;
pub use schema::UpstreamConfig;
