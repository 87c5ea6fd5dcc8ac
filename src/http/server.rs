//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, CORS, request ID)
//! - Bind the server to a listener and serve until shutdown
//! - Host the liveness and egress-IP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::proxy::proxy_handler;
use crate::http::response::ApiError;
use crate::http::signed::{signed_get_handler, signed_post_handler};
use crate::signing::{Clock, SystemClock};
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
///
/// Holds only process-wide, credential-free values: per-request
/// credentials never land here.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: UpstreamClient,
    pub clock: Arc<dyn Clock>,
}

/// HTTP server for the signing proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a server with an explicit clock (tests pin the timestamp).
    pub fn with_clock(config: ProxyConfig, clock: Arc<dyn Clock>) -> Self {
        let state = AppState {
            config: Arc::new(config.clone()),
            upstream: UpstreamClient::new(config.upstream.base_url.clone()),
            clock,
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(health_handler))
            .route("/ip", get(ip_handler))
            .route("/proxy/{*path}", any(proxy_handler))
            .route("/signed-request", post(signed_get_handler))
            .route("/signed-post", post(signed_post_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(CorsLayer::permissive())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Handler for `GET /`: liveness probe.
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Bybit API Proxy Server",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Handler for `GET /ip`: report this process's egress IP by asking the
/// configured IP-echo service.
async fn ip_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .upstream
        .get_json(&state.config.upstream.ip_echo_url)
        .await
        .map_err(ApiError::IpLookup)?;

    let ip = body.get("ip").cloned().unwrap_or(Value::Null);
    Ok(Json(json!({ "ip": ip })).into_response())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
