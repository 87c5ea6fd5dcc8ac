//! Bybit API signing proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               SIGNING PROXY                   │
//!                    │                                               │
//!   Client Request   │  ┌───────┐   ┌─────────────────────────┐     │
//!   ─────────────────┼─▶│ http  │──▶│ mode dispatch            │     │
//!                    │  │server │   │  /proxy/*  → transparent │     │
//!                    │  └───────┘   │  /signed-* → sign first  │     │
//!                    │              └───────────┬──────────────┘     │
//!                    │                          ▼                    │
//!                    │              ┌──────────────────────────┐     │
//!   Client Response  │              │ upstream client (HTTPS)  │─────┼──▶ Bybit API
//!   ◀────────────────┼──────────────│ relay status + JSON body │     │
//!                    │              └──────────────────────────┘     │
//!                    └──────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bybit_proxy::config;
use bybit_proxy::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bybit_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("bybit-proxy v0.1.0 starting");

    let config = config::load_from_env()?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
