//! HTTP server layer
//!
//! Axum server with:
//! - JSON envelope responses (`{success, message, data?, error?}`)
//! - CORS (configured frontend origin by default)
//! - Request tracing
//! - Graceful shutdown

pub mod server;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig};
pub use error::ApiError;
