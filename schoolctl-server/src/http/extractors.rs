//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::server::AppState;
use crate::models::{parse_school_id, NewSchool, ValidationError};
use crate::uploads::UploadStore;

/// Extract and validate a positive school id from path
pub struct ValidSchoolId(pub i64);

impl<S> FromRequestParts<S> for ValidSchoolId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::InvalidId))?;

        Ok(Self(parse_school_id(&raw)?))
    }
}

/// JSON body whose rejection renders as a 400 envelope
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| malformed(e.body_text()))?;
        Ok(Self(value))
    }
}

/// File read from the `image` field, checked but not yet stored
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// School creation input from multipart, urlencoded or JSON bodies
pub struct SchoolForm {
    pub fields: NewSchool,
    pub upload: Option<PendingUpload>,
}

impl FromRequest<Arc<AppState>> for SchoolForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| malformed(e.body_text()))?;
            let (fields, upload) = read_multipart(multipart, &state.uploads).await?;
            Ok(Self { fields, upload })
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<NewSchool>::from_request(req, state)
                .await
                .map_err(|e| malformed(e.body_text()))?;
            Ok(Self {
                fields,
                upload: None,
            })
        } else {
            let JsonBody(fields) = JsonBody::<NewSchool>::from_request(req, state).await?;
            Ok(Self {
                fields,
                upload: None,
            })
        }
    }
}

/// Walk a multipart body: text fields fill `NewSchool`, a file in the
/// `image` field becomes the pending upload.
///
/// Type and size are checked while streaming so oversized files are
/// rejected without being buffered in full.
pub async fn read_multipart(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> Result<(NewSchool, Option<PendingUpload>), ApiError> {
    let mut fields = NewSchool::default();
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error(uploads))? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" && field.file_name().is_some() {
            let original_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            uploads.check_content_type(content_type.as_deref())?;

            let mut bytes = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(multipart_error(uploads))? {
                uploads.check_size(bytes.len() + chunk.len())?;
                bytes.extend_from_slice(&chunk);
            }

            upload = Some(PendingUpload {
                original_name,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await.map_err(multipart_error(uploads))?;
            fields.set_field(&name, value);
        }
    }

    Ok((fields, upload))
}

/// Body-limit hits surface as the upload size error, anything else as a
/// malformed body.
fn multipart_error(uploads: &UploadStore) -> impl Fn(MultipartError) -> ApiError + '_ {
    move |e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::Validation(ValidationError::FileTooLarge {
                max_bytes: uploads.max_bytes(),
            })
        } else {
            malformed(e.body_text())
        }
    }
}

fn malformed(reason: String) -> ApiError {
    ApiError::Validation(ValidationError::Malformed { reason })
}
