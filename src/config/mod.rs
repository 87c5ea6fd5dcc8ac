//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (PORT, BYBIT_BASE_URL, IP_ECHO_URL)
//!     → loader.rs (read & apply defaults)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - All fields have defaults so an empty environment still boots
//! - Validation separates syntactic (parsing) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError};
pub use schema::{ListenerConfig, ProxyConfig, UpstreamConfig};
