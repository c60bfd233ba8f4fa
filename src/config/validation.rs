//! Configuration validation.
//!
//! Serde handles syntactic checks; this module covers semantic ones.
//! Returns all validation errors, not just the first. A missing upstream
//! base URL is deliberately *not* an error here; the gateway must start
//! without one (see `loader::resolve_upstream`).

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address {0:?}")]
    BadBindAddress(String),

    #[error("invalid metrics address {0:?}")]
    BadMetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::BadMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn missing_upstream_is_not_an_error() {
        let config = GatewayConfig::default();
        assert!(config.upstream.base_url.is_none());
        assert!(validate_config(&config).is_ok());
    }
}
