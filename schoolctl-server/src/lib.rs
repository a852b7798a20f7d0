//! schoolctl-server: HTTP server for the school directory
//!
//! Exposes school records over a JSON REST API with search, pagination
//! and image uploads, backed by Postgres or an in-memory store.

pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod service;
pub mod uploads;

pub use error::{ServerError, ServiceError, ServiceResult};
pub use http::{build_router, run_server, AppState, ServerConfig};
pub use service::SchoolService;
pub use uploads::UploadStore;
