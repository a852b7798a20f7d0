//! Router-level tests against the in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use schoolctl_server::db::MemoryStore;
use schoolctl_server::{build_router, AppState, SchoolService, ServerConfig, UploadStore};

const BOUNDARY: &str = "schoolctl-test-boundary";

struct TestApp {
    router: Router,
    uploads: TempDir,
}

fn app_with_limit(max_bytes: Option<usize>) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut store = UploadStore::new(uploads.path().join("images"));
    if let Some(max) = max_bytes {
        store = store.with_max_bytes(max);
    }
    let state = AppState::new(SchoolService::new(Arc::new(MemoryStore::new())), store);
    let router = build_router(state, &ServerConfig::default()).unwrap();
    TestApp { router, uploads }
}

fn app() -> TestApp {
    app_with_limit(None)
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn create(&self, name: &str, city: &str) -> Value {
        let (status, body) = self
            .json(
                "POST",
                "/api/schools",
                json!({
                    "school_name": name,
                    "address": "Main St",
                    "city": city,
                    "state": "StateY",
                    "contact": "123"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }

    async fn multipart(&self, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

/// Multipart body with text fields and an optional file part.
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

const SCHOOL_FIELDS: &[(&str, &str)] = &[
    ("school_name", "Alpha School"),
    ("address", "A St"),
    ("city", "CityX"),
    ("state", "StateY"),
];

#[tokio::test]
async fn health_endpoint() {
    let app = app();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn create_then_fetch() {
    let app = app();
    let created = app.create("Alpha School", "CityX").await;
    let id = created["id"].as_i64().unwrap();
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_null());

    let (status, body) = app.get(&format!("/api/schools/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "School retrieved successfully");
    assert_eq!(body["data"]["school_name"], "Alpha School");
    assert_eq!(body["data"]["contact"], "123");
}

#[tokio::test]
async fn create_requires_core_fields() {
    let app = app();
    let (status, body) = app
        .json("POST", "/api/schools", json!({"school_name": "Alpha School"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "School name, address, city, and state are required"
    );
}

#[tokio::test]
async fn duplicate_name_is_conflict() {
    let app = app();
    app.create("Alpha School", "CityX").await;

    let (status, body) = app
        .json(
            "POST",
            "/api/schools",
            json!({
                "school_name": "Alpha School",
                "address": "Other Rd",
                "city": "CityZ",
                "state": "StateQ"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "School with this name already exists");
}

#[tokio::test]
async fn search_by_city_scenario() {
    let app = app();
    app.create("Alpha School", "CityX").await;
    app.create("Beta School", "CityX").await;
    app.create("Gamma School", "Elsewhere").await;

    let (status, body) = app.get("/api/schools?search=CityX&page=1&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Schools retrieved successfully");
    assert_eq!(body["data"]["schools"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["schools"][0]["school_name"], "Beta School");
    assert_eq!(
        body["data"]["pagination"],
        json!({"currentPage": 1, "totalPages": 1, "totalSchools": 2, "schoolsPerPage": 10})
    );
}

#[tokio::test]
async fn listing_clamps_bad_pagination() {
    let app = app();
    app.create("Alpha School", "CityX").await;

    let (status, body) = app.get("/api/schools?page=-4&limit=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["currentPage"], 1);
    assert_eq!(body["data"]["pagination"]["schoolsPerPage"], 10);

    let (_, body) = app.get("/api/schools?page=3&limit=10").await;
    assert!(body["data"]["schools"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["pagination"]["totalSchools"], 1);
}

#[tokio::test]
async fn legacy_list_alias() {
    let app = app();
    app.create("Alpha School", "CityX").await;

    let (status, body) = app.get("/api/show-schools").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalSchools"], 1);
}

#[tokio::test]
async fn invalid_and_missing_ids() {
    let app = app();
    let (status, body) = app.get("/api/schools/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Valid school ID is required");

    let (status, body) = app.get("/api/schools/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "School not found");
}

#[tokio::test]
async fn partial_update_rules() {
    let app = app();
    let alpha = app.create("Alpha School", "CityX").await;
    app.create("Beta School", "CityX").await;
    let uri = format!("/api/schools/{}", alpha["id"]);

    let (status, body) = app.json("PUT", &uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "At least one field must be provided for update"
    );

    let (status, _) = app
        .json("PUT", &uri, json!({"school_name": "Beta School"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.json("PUT", &uri, json!({"contact": ""})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "School updated successfully");
    assert_eq!(body["data"]["contact"], "");
    assert_eq!(body["data"]["city"], "CityX");
    assert!(body["data"]["updated_at"].is_string());

    let (status, _) = app
        .json("PUT", "/api/schools/424242", json!({"city": "CityZ"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.json("PUT", "/api/schools/424242", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "School not found");
}

#[tokio::test]
async fn malformed_json_is_400_envelope() {
    let app = app();
    let alpha = app.create("Alpha School", "CityX").await;

    let (status, body) = app
        .send(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/schools/{}", alpha["id"]))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = app();
    let alpha = app.create("Alpha School", "CityX").await;
    let uri = format!("/api/schools/{}", alpha["id"]);

    let (status, body) = app
        .send(Request::builder().method("DELETE").uri(&uri).body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "School deleted successfully"}));

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn multipart_create_stores_image_and_serves_it() {
    let app = app();
    let mut fields = SCHOOL_FIELDS.to_vec();
    fields.push(("image", "ignored.png"));
    let body = multipart_body(&fields, Some(("crest.png", "image/png", b"fake-png")));

    let (status, body) = app.multipart("/api/schools", body).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let image = body["data"]["image"].as_str().unwrap().to_owned();
    assert!(image.ends_with("-crest.png"));
    assert!(app.uploads.path().join("images").join(&image).exists());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/images/{image}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"fake-png");
}

#[tokio::test]
async fn legacy_create_alias_accepts_multipart() {
    let app = app();
    let (status, body) = app
        .multipart("/api/add-school", multipart_body(SCHOOL_FIELDS, None))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["image"].is_null());
}

#[tokio::test]
async fn rejects_non_image_upload() {
    let app = app();
    let body = multipart_body(SCHOOL_FIELDS, Some(("notes.txt", "text/plain", b"hi")));

    let (status, body) = app.multipart("/api/schools", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only image files are allowed!");

    let (_, list) = app.get("/api/schools").await;
    assert_eq!(list["data"]["pagination"]["totalSchools"], 0);
}

#[tokio::test]
async fn rejects_oversized_upload() {
    let app = app_with_limit(Some(16));
    let body = multipart_body(SCHOOL_FIELDS, Some(("big.png", "image/png", &[0u8; 64])));

    let (status, body) = app.multipart("/api/schools", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("File too large."));
}

#[tokio::test]
async fn failed_create_discards_upload() {
    let app = app();
    app.create("Alpha School", "CityX").await;

    let body = multipart_body(SCHOOL_FIELDS, Some(("crest.png", "image/png", b"fake-png")));
    let (status, _) = app.multipart("/api/schools", body).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let images = app.uploads.path().join("images");
    let leftover = std::fs::read_dir(&images)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn standalone_upload_returns_url() {
    let app = app();
    let body = multipart_body(&[], Some(("crest.png", "image/png", b"fake-png")));

    let (status, body) = app.multipart("/api/schools/upload", body).await;
    assert_eq!(status, StatusCode::OK);
    let url = body["data"]["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("/images/"));
    assert!(url.ends_with("-crest.png"));

    let (status, body) = app
        .multipart("/api/schools/upload", multipart_body(&[], None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No image file provided");
}

#[tokio::test]
async fn unknown_route_and_headers() {
    let app = app();
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::REFERRER_POLICY],
        "no-referrer-when-downgrade"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Route not found"}));
}
