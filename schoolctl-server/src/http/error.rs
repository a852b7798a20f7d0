//! API error types with IntoResponse
//!
//! Errors are converted to the JSON envelope with appropriate status codes.
//! Internal failure text is logged and only sent to clients when the
//! server runs with error details exposed (see `attach_error_detail`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::envelope::Envelope;
use crate::error::ServiceError;
use crate::models::ValidationError;
use crate::uploads::UploadError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Unique school name taken (409)
    Conflict,

    /// Resource not found (404)
    NotFound,

    /// Store or IO failure (500, logged)
    Internal { detail: String },
}

/// Failure text of a 500, carried in response extensions
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Conflict => (
                StatusCode::CONFLICT,
                "School with this name already exists".to_owned(),
            ),
            Self::NotFound => (StatusCode::NOT_FOUND, "School not found".to_owned()),
            Self::Internal { detail } => {
                tracing::error!("Internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
            }
        };

        let mut response = (status, Json(Envelope::failure(message, None))).into_response();
        if let Self::Internal { detail } = self {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

/// Response mapper that surfaces internal failure text as `error`.
///
/// Only installed when error details are exposed (debug deployments).
pub async fn attach_error_detail(response: Response) -> Response {
    match response.extensions().get::<ErrorDetail>() {
        Some(ErrorDetail(detail)) => {
            let body = Envelope::failure(INTERNAL_MESSAGE, Some(detail.clone()));
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => Self::Validation(v),
            ServiceError::Conflict { .. } => Self::Conflict,
            ServiceError::NotFound { .. } => Self::NotFound,
            ServiceError::Store(db) => Self::Internal {
                detail: db.to_string(),
            },
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Invalid(v) => Self::Validation(v),
            UploadError::Io(io) => Self::Internal {
                detail: io.to_string(),
            },
        }
    }
}
