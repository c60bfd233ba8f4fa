//! Lifecycle management.
//!
//! Startup order is config → observability → listener → serve; shutdown is
//! signal → stop accepting → drain in-flight requests → exit.

pub mod shutdown;

pub use shutdown::Shutdown;
