//! Response shaping and the error taxonomy.
//!
//! # Responsibilities
//! - Map each failure class to its HTTP status and JSON body
//! - Relay upstream replies (mirrored status or flattened to 200)
//!
//! # Design Decisions
//! - Validation failures answer 400 before any outbound call is made
//! - Upstream transport failures answer 500 with a local description;
//!   they are never retried
//! - Upstream application errors (an error retCode inside a decoded
//!   reply) pass through uninterpreted
//! - `/ip` keeps its own `{error}` body shape; every other failure uses
//!   `{retCode:-1, retMsg}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::upstream::{UpstreamError, UpstreamReply};

/// Structured error body: `{retCode: -1, retMsg: "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg")]
    pub ret_msg: String,
}

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A signed-mode request is missing apiKey, apiSecret, or endpoint.
    #[error("Missing required fields: apiKey, apiSecret, endpoint")]
    MissingFields,

    /// Transparent-mode POST carried a body that is not valid JSON.
    #[error("Proxy error: request body is not valid JSON")]
    InvalidBody,

    /// Transparent-mode failure while contacting the upstream.
    #[error("Proxy error: {0}")]
    Proxy(#[source] UpstreamError),

    /// Signed-mode failure while contacting the upstream.
    #[error("Request error: {0}")]
    Signed(#[source] UpstreamError),

    /// `/ip` could not reach or decode the IP-echo service.
    #[error("{0}")]
    IpLookup(#[source] UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingFields | ApiError::InvalidBody => {
                (StatusCode::BAD_REQUEST, ret_body(&self))
            }
            ApiError::Proxy(_) | ApiError::Signed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ret_body(&self))
            }
            ApiError::IpLookup(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })).into_response(),
            ),
        };
        (status, body).into_response()
    }
}

fn ret_body(error: &ApiError) -> Response {
    Json(ErrorBody {
        ret_code: -1,
        ret_msg: error.to_string(),
    })
    .into_response()
}

/// Relay an upstream reply, mirroring its literal HTTP status.
pub fn mirror(reply: UpstreamReply) -> Response {
    (reply.status, Json(reply.body)).into_response()
}

/// Relay an upstream reply body with status 200, regardless of the
/// upstream's HTTP status or embedded retCode. Signed modes answer this
/// way; transparent mode mirrors instead.
pub fn flatten(reply: UpstreamReply) -> Response {
    (StatusCode::OK, Json(reply.body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_is_400_with_ret_body() {
        let response = ApiError::MissingFields.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["retCode"], -1);
        assert_eq!(
            body["retMsg"],
            "Missing required fields: apiKey, apiSecret, endpoint"
        );
    }

    #[tokio::test]
    async fn test_mirror_preserves_upstream_status() {
        let reply = UpstreamReply {
            status: StatusCode::FORBIDDEN,
            body: serde_json::json!({"retCode": 10003, "retMsg": "bad sig"}),
        };
        let response = mirror(reply);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["retCode"], 10003);
    }

    #[tokio::test]
    async fn test_flatten_answers_200_despite_upstream_status() {
        let reply = UpstreamReply {
            status: StatusCode::FORBIDDEN,
            body: serde_json::json!({"retCode": 10003, "retMsg": "bad sig"}),
        };
        let response = flatten(reply);
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["retCode"], 10003);
        assert_eq!(body["retMsg"], "bad sig");
    }
}
