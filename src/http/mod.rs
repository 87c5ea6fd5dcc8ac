//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route dispatch)
//!     → proxy.rs   (transparent mode: headers copied, status mirrored)
//!     → signed.rs  (signed modes: signature computed, status flattened)
//!     → response.rs (error bodies, upstream relay)
//!     → Send to client
//! ```

pub mod proxy;
pub mod response;
pub mod server;
pub mod signed;

pub use response::ApiError;
pub use server::{AppState, HttpServer};
