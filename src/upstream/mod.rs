//! Outbound HTTP client for the exchange API.
//!
//! # Responsibilities
//! - Hold the shared reqwest client and upstream base URL
//! - Issue one outbound call per inbound request and decode the JSON reply
//! - Surface transport and decode failures as a single error type
//!
//! # Design Decisions
//! - One `reqwest::Client` for the process; cloning is cheap (Arc inside)
//! - The upstream's HTTP status is captured alongside the body so each
//!   route decides for itself whether to mirror it or flatten to 200
//! - No retries and no explicit timeout beyond reqwest's defaults; a
//!   failed call maps to exactly one error response

use reqwest::header::{HeaderMap, HeaderName};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// The four Bybit authentication headers. These are the entire auth
/// contract with the upstream; canonically `X-BAPI-API-KEY`,
/// `X-BAPI-SIGN`, `X-BAPI-TIMESTAMP`, `X-BAPI-RECV-WINDOW` (HTTP header
/// names are case-insensitive on the wire).
pub const H_API_KEY: HeaderName = HeaderName::from_static("x-bapi-api-key");
pub const H_SIGN: HeaderName = HeaderName::from_static("x-bapi-sign");
pub const H_TIMESTAMP: HeaderName = HeaderName::from_static("x-bapi-timestamp");
pub const H_RECV_WINDOW: HeaderName = HeaderName::from_static("x-bapi-recv-window");

/// Auth headers in signing order.
pub const AUTH_HEADERS: [HeaderName; 4] = [H_API_KEY, H_SIGN, H_TIMESTAMP, H_RECV_WINDOW];

/// Failure while talking to the upstream (or the IP-echo service).
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
}

/// Status and decoded JSON body of an upstream reply.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Client for the single upstream host.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Base URL this client targets, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request to `<base_url><path_and_query>` and decode the JSON
    /// reply. A non-JSON body is a transport-level failure, not an upstream
    /// application error.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<UpstreamReply, UpstreamError> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await?;

        Ok(UpstreamReply { status, body })
    }

    /// GET an absolute URL and decode the JSON reply. Used for the IP-echo
    /// service, which is not under the upstream base URL.
    pub async fn get_json(&self, url: &str) -> Result<Value, UpstreamError> {
        let response = self.http.get(url).send().await?;
        Ok(response.json::<Value>().await?)
    }
}
