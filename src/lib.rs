//! Bybit API signing proxy library.
//!
//! A credential-forwarding reverse proxy in front of the Bybit v5 REST
//! API. Three modes over one upstream base URL: transparent forwarding of
//! caller-signed requests, and signed GET/POST where the proxy computes
//! the HMAC-SHA256 signature on the caller's behalf.

pub mod config;
pub mod http;
pub mod signing;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::HttpServer;
