//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the upstream rag-service base URL.
/// Takes precedence over the config file.
pub const RAG_BASE_URL_VAR: &str = "RAG_BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the upstream base URL from the environment and the config file.
///
/// The environment variable wins when set. An unset or unparsable base URL
/// is a startup warning, not a failure: the gateway still serves `/healthz`
/// and search calls fail at dispatch time.
pub fn resolve_upstream(config: &mut GatewayConfig, env_base: Option<String>) {
    if let Some(base) = env_base {
        config.upstream.base_url = Some(base);
    }

    match config.upstream.base_url.as_deref() {
        None => {
            tracing::warn!(
                var = RAG_BASE_URL_VAR,
                "upstream base URL not configured; search requests will return 502"
            );
        }
        Some(base) => {
            if let Err(error) = Url::parse(base) {
                tracing::warn!(
                    base_url = %base,
                    %error,
                    "upstream base URL is not a valid URL; search requests will return 502"
                );
                config.upstream.base_url = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.upstream.base_url.is_none());
    }

    #[test]
    fn parses_full_config() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [upstream]
            base_url = "http://rag-service:8000"

            [timeouts]
            request_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(
            config.upstream.base_url.as_deref(),
            Some("http://rag-service:8000")
        );
        assert_eq!(config.timeouts.request_secs, 10);
    }

    #[test]
    fn rejects_invalid_config() {
        let result = parse_config(
            r#"
            [timeouts]
            request_secs = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn env_overrides_config_file() {
        let mut config = GatewayConfig::default();
        config.upstream.base_url = Some("http://from-file:8000".into());

        resolve_upstream(&mut config, Some("http://from-env:8000".into()));
        assert_eq!(
            config.upstream.base_url.as_deref(),
            Some("http://from-env:8000")
        );
    }

    #[test]
    fn invalid_base_url_is_dropped() {
        let mut config = GatewayConfig::default();
        resolve_upstream(&mut config, Some("not a url".into()));
        assert!(config.upstream.base_url.is_none());
    }

    #[test]
    fn absent_base_url_is_kept_absent() {
        let mut config = GatewayConfig::default();
        resolve_upstream(&mut config, None);
        assert!(config.upstream.base_url.is_none());
    }
}
