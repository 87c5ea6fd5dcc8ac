//! Configuration loading from the process environment.

use std::env;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),

    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the environment.
///
/// Recognized variables, all optional:
/// - `PORT`: listener port (default 3000)
/// - `BYBIT_BASE_URL`: upstream API base URL
/// - `IP_ECHO_URL`: IP-echo service queried by `/ip`
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    let mut config = ProxyConfig::default();

    if let Ok(port) = env::var("PORT") {
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Ok(base_url) = env::var("BYBIT_BASE_URL") {
        config.upstream.base_url = base_url;
    }
    if let Ok(ip_echo_url) = env::var("IP_ECHO_URL") {
        config.upstream.ip_echo_url = ip_echo_url;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
