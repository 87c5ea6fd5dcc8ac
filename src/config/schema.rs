//! Configuration schema definitions.
//!
//! All types derive Serde traits and carry defaults so a bare environment
//! still produces a runnable configuration.

use serde::{Deserialize, Serialize};

/// Default listener port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Root configuration for the signing proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API and auxiliary service endpoints.
    pub upstream: UpstreamConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{DEFAULT_PORT}"),
        }
    }
}

/// Upstream endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the exchange REST API, without a trailing slash.
    pub base_url: String,

    /// Full URL of the public IP-echo service used by `/ip`.
    pub ip_echo_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.bybit.com".to_string(),
            ip_echo_url: "https://api.ipify.org?format=json".to_string(),
        }
    }
}
