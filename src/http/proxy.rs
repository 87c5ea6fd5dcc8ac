//! Transparent proxy mode.
//!
//! # Responsibilities
//! - Forward `/proxy/<rest>` to `<base>/<rest>`, method and query preserved
//! - Copy caller-supplied auth headers through unmodified
//! - Mirror the upstream's literal HTTP status and JSON body
//!
//! # Design Decisions
//! - Only the four recognized auth headers are forwarded; absent headers
//!   are never synthesized
//! - The query string is passed through byte-for-byte (callers may have
//!   signed the exact string form)
//! - A body is forwarded only for POST, re-serialized from the parsed JSON

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Method, Request};
use axum::response::Response;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use crate::http::response::{self, ApiError};
use crate::http::server::AppState;
use crate::upstream::AUTH_HEADERS;

/// Largest request body we will buffer for forwarding.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Handler for `ANY /proxy/{*path}`.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let query = request
        .uri()
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for name in AUTH_HEADERS {
        if let Some(value) = request.headers().get(&name) {
            headers.insert(name, value.clone());
        }
    }

    let body = if method == Method::POST {
        let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|_| ApiError::InvalidBody)?;
        if bytes.is_empty() {
            None
        } else {
            let value: Value =
                serde_json::from_slice(&bytes).map_err(|_| ApiError::InvalidBody)?;
            Some(value.to_string())
        }
    } else {
        None
    };

    let path_and_query = format!("/{path}{query}");
    tracing::debug!(method = %method, path = %path_and_query, "proxying request");

    let reply = state
        .upstream
        .forward(method, &path_and_query, headers, body)
        .await
        .map_err(|e| {
            tracing::error!(path = %path_and_query, error = %e, "upstream call failed");
            ApiError::Proxy(e)
        })?;

    tracing::debug!(
        status = %reply.status,
        ret_code = ?reply.body.get("retCode"),
        "upstream replied"
    );

    Ok(response::mirror(reply))
}
