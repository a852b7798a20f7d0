//! Route handlers organized by resource

use std::sync::Arc;

use axum::Router;

use super::server::AppState;

pub mod health;
pub mod schools;
pub mod uploads;

/// Everything mounted under `/api`
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(schools::router())
        .merge(uploads::router())
}
