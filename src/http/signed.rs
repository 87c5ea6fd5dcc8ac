//! Signed request modes.
//!
//! Callers hand over raw credentials and the proxy computes the upstream
//! signature on their behalf.
//!
//! # Responsibilities
//! - Validate signed-mode payloads before any outbound call
//! - Build the signature input (query string for GET, JSON body for POST)
//! - Perform the upstream call with the four auth headers
//! - Relay the upstream JSON body with status 200
//!
//! # Design Decisions
//! - Credentials live only in the deserialized request value; they are
//!   never stored in state and never logged (no Debug derive here)
//! - Replies are flattened to 200 even when the upstream signals an
//!   application error, unlike transparent mode which mirrors the status
//! - Timestamps come from the injected clock, so signatures are
//!   deterministic under test

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::http::response::{self, ApiError};
use crate::http::server::AppState;
use crate::signing::{self, Clock, SignatureInput};
use crate::upstream::{UpstreamError, H_API_KEY, H_RECV_WINDOW, H_SIGN, H_TIMESTAMP};

/// Payload for `POST /signed-request` (signed GET).
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignedGetRequest {
    pub api_key: String,
    pub api_secret: String,
    pub endpoint: String,
    pub params: Map<String, Value>,
}

/// Payload for `POST /signed-post` (signed POST).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignedPostRequest {
    pub api_key: String,
    pub api_secret: String,
    pub endpoint: String,
    pub body: Value,
}

impl Default for SignedPostRequest {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            endpoint: String::new(),
            body: Value::Object(Map::new()),
        }
    }
}

impl SignedGetRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_fields(&self.api_key, &self.api_secret, &self.endpoint)
    }

    fn signature_input(&self, clock: &dyn Clock) -> SignatureInput {
        SignatureInput::new(
            clock.now_millis().to_string(),
            self.api_key.as_str(),
            signing::build_query_string(&self.params),
        )
    }
}

impl SignedPostRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_fields(&self.api_key, &self.api_secret, &self.endpoint)
    }

    /// The exact string that is both signed and sent as the request body.
    fn body_string(&self) -> String {
        self.body.to_string()
    }

    fn signature_input(&self, clock: &dyn Clock) -> SignatureInput {
        SignatureInput::new(
            clock.now_millis().to_string(),
            self.api_key.as_str(),
            self.body_string(),
        )
    }
}

fn validate_fields(api_key: &str, api_secret: &str, endpoint: &str) -> Result<(), ApiError> {
    if api_key.is_empty() || api_secret.is_empty() || endpoint.is_empty() {
        return Err(ApiError::MissingFields);
    }
    Ok(())
}

/// Handler for `POST /signed-request`: sign and perform an upstream GET.
pub async fn signed_get_handler(
    State(state): State<AppState>,
    Json(request): Json<SignedGetRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let input = request.signature_input(state.clock.as_ref());
    let signature = signing::sign(&request.api_secret, &input.message());
    let headers = auth_headers(&request.api_key, &signature, &input.timestamp, false)?;

    let path_and_query = if input.payload.is_empty() {
        request.endpoint.clone()
    } else {
        format!("{}?{}", request.endpoint, input.payload)
    };

    tracing::debug!(endpoint = %request.endpoint, "signed GET");

    let reply = state
        .upstream
        .forward(Method::GET, &path_and_query, headers, None)
        .await
        .map_err(|e| {
            tracing::error!(endpoint = %request.endpoint, error = %e, "signed GET failed");
            ApiError::Signed(e)
        })?;

    tracing::debug!(
        status = %reply.status,
        ret_code = ?reply.body.get("retCode"),
        "upstream replied"
    );

    Ok(response::flatten(reply))
}

/// Handler for `POST /signed-post`: sign the JSON body and POST it upstream.
pub async fn signed_post_handler(
    State(state): State<AppState>,
    Json(request): Json<SignedPostRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let input = request.signature_input(state.clock.as_ref());
    let signature = signing::sign(&request.api_secret, &input.message());
    let headers = auth_headers(&request.api_key, &signature, &input.timestamp, true)?;

    tracing::debug!(endpoint = %request.endpoint, "signed POST");

    let reply = state
        .upstream
        .forward(
            Method::POST,
            &request.endpoint,
            headers,
            Some(input.payload.clone()),
        )
        .await
        .map_err(|e| {
            tracing::error!(endpoint = %request.endpoint, error = %e, "signed POST failed");
            ApiError::Signed(e)
        })?;

    tracing::debug!(
        status = %reply.status,
        ret_code = ?reply.body.get("retCode"),
        "upstream replied"
    );

    Ok(response::flatten(reply))
}

/// Build the four auth headers for a signed call.
fn auth_headers(
    api_key: &str,
    signature: &str,
    timestamp: &str,
    json_body: bool,
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        H_API_KEY,
        HeaderValue::from_str(api_key)
            .map_err(|_| ApiError::Signed(UpstreamError::InvalidHeader("x-bapi-api-key")))?,
    );
    headers.insert(
        H_SIGN,
        HeaderValue::from_str(signature)
            .map_err(|_| ApiError::Signed(UpstreamError::InvalidHeader("x-bapi-sign")))?,
    );
    headers.insert(
        H_TIMESTAMP,
        HeaderValue::from_str(timestamp)
            .map_err(|_| ApiError::Signed(UpstreamError::InvalidHeader("x-bapi-timestamp")))?,
    );
    headers.insert(H_RECV_WINDOW, HeaderValue::from_static(signing::RECV_WINDOW));
    if json_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::FixedClock;
    use serde_json::json;

    fn get_request(api_key: &str, api_secret: &str, endpoint: &str) -> SignedGetRequest {
        SignedGetRequest {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            endpoint: endpoint.into(),
            params: Map::new(),
        }
    }

    #[test]
    fn test_validation_rejects_each_missing_field() {
        assert!(get_request("", "secret", "/v5/account").validate().is_err());
        assert!(get_request("key", "", "/v5/account").validate().is_err());
        assert!(get_request("key", "secret", "").validate().is_err());
        assert!(get_request("key", "secret", "/v5/account").validate().is_ok());
    }

    #[test]
    fn test_get_signature_message_over_query_string() {
        let mut request = get_request("key", "secret", "/v5/account/wallet-balance");
        let Value::Object(params) = json!({"b": "2", "a": "1"}) else {
            unreachable!()
        };
        request.params = params;

        let clock = FixedClock(1_700_000_000_000);
        let input = request.signature_input(&clock);
        assert_eq!(input.message(), "1700000000000key20000b=2&a=1");
    }

    #[test]
    fn test_post_signature_message_over_json_body() {
        let request = SignedPostRequest {
            api_key: "key".into(),
            api_secret: "secret".into(),
            endpoint: "/v5/order/create".into(),
            body: json!({"x": 1}),
        };

        let clock = FixedClock(1_700_000_000_000);
        let input = request.signature_input(&clock);
        assert_eq!(input.message(), "1700000000000key20000{\"x\":1}");
    }

    #[test]
    fn test_post_body_defaults_to_empty_object() {
        let request: SignedPostRequest = serde_json::from_value(json!({
            "apiKey": "key",
            "apiSecret": "secret",
            "endpoint": "/v5/order/create"
        }))
        .unwrap();
        assert_eq!(request.body_string(), "{}");
    }

    #[test]
    fn test_auth_headers_carry_fixed_recv_window() {
        let headers = auth_headers("key", "abc123", "1700000000000", true).unwrap();
        assert_eq!(headers.get(H_RECV_WINDOW).unwrap(), "20000");
        assert_eq!(headers.get(H_API_KEY).unwrap(), "key");
        assert_eq!(headers.get(H_SIGN).unwrap(), "abc123");
        assert_eq!(headers.get(H_TIMESTAMP).unwrap(), "1700000000000");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }
}
