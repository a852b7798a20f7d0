//! School endpoints
//!
//! - `GET    /schools`       list with search + pagination
//! - `POST   /schools`       create (multipart with optional `image` file, or JSON)
//! - `GET    /schools/{id}`  fetch one
//! - `PUT    /schools/{id}`  partial update (JSON)
//! - `DELETE /schools/{id}`  hard delete
//!
//! `/show-schools` and `/add-school` are kept as aliases for older clients.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::School;
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, SchoolForm, ValidSchoolId};
use crate::http::server::AppState;
use crate::models::{ListQuery, Paginated, Pagination, SchoolPatch};

/// Raw listing query; numbers are parsed leniently by `Pagination::from_raw`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        let page = Pagination::from_raw(params.page.as_deref(), params.limit.as_deref());
        ListQuery::new(params.search.as_deref(), page)
    }
}

/// School response
#[derive(Debug, Serialize)]
pub struct SchoolResponse {
    pub id: i64,
    pub school_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<School> for SchoolResponse {
    fn from(s: School) -> Self {
        Self {
            id: s.id,
            school_name: s.school_name,
            address: s.address,
            city: s.city,
            state: s.state,
            contact: s.contact,
            email: s.email,
            image: s.image,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Page summary as the frontend expects it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSummary {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_schools: i64,
    pub schools_per_page: u32,
}

/// Listing payload
#[derive(Debug, Serialize)]
pub struct SchoolList {
    pub schools: Vec<SchoolResponse>,
    pub pagination: PaginationSummary,
}

impl From<Paginated<School>> for SchoolList {
    fn from(page: Paginated<School>) -> Self {
        let pagination = PaginationSummary {
            current_page: page.page,
            total_pages: page.total_pages(),
            total_schools: page.total,
            schools_per_page: page.limit,
        };
        Self {
            schools: page.items.into_iter().map(SchoolResponse::from).collect(),
            pagination,
        }
    }
}

/// GET /schools - list schools with search and pagination
async fn list_schools(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Envelope<SchoolList>>, ApiError> {
    let page = state.service.list(ListQuery::from(params)).await?;

    Ok(Json(Envelope::ok(
        "Schools retrieved successfully",
        SchoolList::from(page),
    )))
}

/// POST /schools - create a school, storing an uploaded image first
async fn create_school(
    State(state): State<Arc<AppState>>,
    form: SchoolForm,
) -> Result<(StatusCode, Json<Envelope<SchoolResponse>>), ApiError> {
    let image = match &form.upload {
        Some(upload) => Some(
            state
                .uploads
                .save(
                    upload.original_name.as_deref(),
                    upload.content_type.as_deref(),
                    &upload.bytes,
                )
                .await?,
        ),
        None => None,
    };

    let school = match state.service.create(form.fields, image.clone()).await {
        Ok(school) => school,
        Err(e) => {
            if let Some(filename) = &image {
                state.uploads.discard(filename).await;
            }
            return Err(e.into());
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(
            "School added successfully",
            SchoolResponse::from(school),
        )),
    ))
}

/// GET /schools/{id} - get a single school
async fn get_school(
    State(state): State<Arc<AppState>>,
    ValidSchoolId(id): ValidSchoolId,
) -> Result<Json<Envelope<SchoolResponse>>, ApiError> {
    let school = state.service.get(id).await?;
    Ok(Json(Envelope::ok(
        "School retrieved successfully",
        SchoolResponse::from(school),
    )))
}

/// PUT /schools/{id} - partial update
async fn update_school(
    State(state): State<Arc<AppState>>,
    ValidSchoolId(id): ValidSchoolId,
    JsonBody(patch): JsonBody<SchoolPatch>,
) -> Result<Json<Envelope<SchoolResponse>>, ApiError> {
    let school = state.service.update(id, patch).await?;
    Ok(Json(Envelope::ok(
        "School updated successfully",
        SchoolResponse::from(school),
    )))
}

/// DELETE /schools/{id} - delete a school
async fn delete_school(
    State(state): State<Arc<AppState>>,
    ValidSchoolId(id): ValidSchoolId,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.service.delete(id).await?;
    Ok(Json(Envelope::done("School deleted successfully")))
}

/// School routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/schools", get(list_schools).post(create_school))
        .route(
            "/schools/{id}",
            get(get_school).put(update_school).delete(delete_school),
        )
        .route("/show-schools", get(list_schools))
        .route("/add-school", post(create_school))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn list_params_fall_back_to_defaults() {
        let query = ListQuery::from(ListParams {
            search: Some(String::new()),
            page: Some("zero".into()),
            limit: None,
        });
        assert!(query.search.is_none());
        assert_eq!(query.page, Pagination::new(1, 10));
    }

    #[test]
    fn pagination_summary_uses_camel_case() {
        let page: Paginated<School> = Paginated {
            items: vec![],
            total: 0,
            page: 1,
            limit: 10,
        };
        let body = serde_json::to_value(SchoolList::from(page)).unwrap();
        assert_eq!(
            body["pagination"],
            serde_json::json!({
                "currentPage": 1,
                "totalPages": 1,
                "totalSchools": 0,
                "schoolsPerPage": 10
            })
        );
    }

    #[test]
    fn response_serializes_null_optionals() {
        let school = School {
            id: 1,
            school_name: "Alpha School".into(),
            address: "A St".into(),
            city: "CityX".into(),
            state: "StateY".into(),
            contact: None,
            email: None,
            image: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let body = serde_json::to_value(SchoolResponse::from(school)).unwrap();
        assert!(body["contact"].is_null());
        assert!(body["updated_at"].is_null());
        assert_eq!(body["school_name"], "Alpha School");
    }
}
