//! Standalone image upload
//!
//! `POST /schools/upload` stores a file without creating a record and
//! returns its public URL, for clients that upload before submitting.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::read_multipart;
use crate::http::server::AppState;
use crate::models::ValidationError;
use crate::uploads::public_url;

/// Stored upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
    pub filename: String,
}

/// POST /schools/upload - store an image, return where it is served
async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<UploadResponse>>, ApiError> {
    let multipart = multipart.map_err(|e| ValidationError::Malformed {
        reason: e.body_text(),
    })?;
    let (_, upload) = read_multipart(multipart, &state.uploads).await?;
    let upload = upload.ok_or(ValidationError::MissingFile)?;

    let filename = state
        .uploads
        .save(
            upload.original_name.as_deref(),
            upload.content_type.as_deref(),
            &upload.bytes,
        )
        .await?;

    Ok(Json(Envelope::ok(
        "Image uploaded successfully",
        UploadResponse {
            image_url: public_url(&filename),
            filename,
        },
    )))
}

/// Upload routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/schools/upload", post(upload_image))
}
