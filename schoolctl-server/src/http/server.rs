//! Axum server setup
//!
//! Server skeleton with:
//! - CORS restricted to the configured frontend origins by default
//! - Tracing middleware
//! - Static serving of uploaded images
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, REFERRER_POLICY};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::{middleware, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::error::attach_error_detail;
use super::routes;
use crate::error::ServerError;
use crate::service::SchoolService;
use crate::uploads::{UploadStore, PUBLIC_PREFIX};

/// Default frontend origin (Vite dev server)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Multipart framing allowance on top of the upload limit
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,

    /// Origins allowed by CORS when not permissive
    pub cors_origins: Vec<String>,

    /// Allow permissive CORS (default: false)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Include internal failure text in 500 responses
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_owned()],
            cors_permissive: false,
            expose_error_details: cfg!(debug_assertions),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub service: SchoolService,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(service: SchoolService, uploads: UploadStore) -> Self {
        Self { service, uploads }
    }
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, ServerError> {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ServerError::Config(format!("invalid CORS origin: {origin}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}

/// Fallback for unknown routes
async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}

/// Build the full application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router, ServerError> {
    let body_limit = state.uploads.max_bytes() + MULTIPART_OVERHEAD;
    let images = ServeDir::new(state.uploads.dir());

    let mut app = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_router())
        .nest_service(PUBLIC_PREFIX, images)
        .fallback(route_not_found)
        .with_state(Arc::new(state));

    if config.expose_error_details {
        tracing::warn!("Internal error details are included in API responses");
        app = app.layer(middleware::map_response(attach_error_detail));
    }

    Ok(app
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(SetResponseHeaderLayer::overriding(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer-when-downgrade"),
        ))
        .layer(cors_layer(config)?)
        .layer(TraceLayer::new_for_http()))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let repo = SchoolRepo::new(create_pool(&database_url).await?);
/// let state = AppState::new(SchoolService::new(Arc::new(repo)), UploadStore::new("images"));
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(uploads = %state.uploads.dir().display(), "Upload directory configured");
    let app = build_router(state, &config)?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
