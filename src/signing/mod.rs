//! Bybit v5 request signing.
//!
//! # Responsibilities
//! - Compute HMAC-SHA256 signatures over the Bybit signing message
//! - Assemble the signing message: timestamp + apiKey + recvWindow + payload
//! - Build the query string for signed GET requests
//!
//! # Design Decisions
//! - `sign` is a pure function; the clock is injected (see [`clock`]) so
//!   signatures are deterministic under test
//! - The query string applies NO percent-encoding: values are inserted
//!   verbatim in caller order. Callers verify signatures against the exact
//!   string form, so encoding (or re-sorting) here would break them.
//! - Digest is lowercase hex, no padding or truncation

pub mod clock;

use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;

pub use clock::{Clock, FixedClock, SystemClock};

type HmacSha256 = Hmac<Sha256>;

/// Receive window sent with every signed request, in milliseconds.
pub const RECV_WINDOW: &str = "20000";

/// Everything that goes into a signature, in signing order.
pub struct SignatureInput {
    /// Wall-clock milliseconds since epoch, as a decimal string.
    pub timestamp: String,
    pub api_key: String,
    /// Either the un-encoded query string (GET) or the serialized JSON
    /// body (POST). Empty string when there is nothing to sign over.
    pub payload: String,
}

impl SignatureInput {
    pub fn new(
        timestamp: impl Into<String>,
        api_key: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            api_key: api_key.into(),
            payload: payload.into(),
        }
    }

    /// The exact byte sequence the upstream verifies: a delimiter-free
    /// concatenation of timestamp, API key, receive window, and payload.
    pub fn message(&self) -> String {
        format!(
            "{}{}{}{}",
            self.timestamp, self.api_key, RECV_WINDOW, self.payload
        )
    }
}

/// HMAC-SHA256 over `message`, keyed by `secret`, as lowercase hex.
pub fn sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Join `params` as `key=value` pairs with `&`, in map order.
///
/// No percent-encoding is applied. String values are inserted without JSON
/// quotes; other JSON scalars use their JSON rendering (`2`, `true`).
pub fn build_query_string(params: &Map<String, Value>) -> String {
    params
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join("&")
}
