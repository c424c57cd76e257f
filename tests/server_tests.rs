//! # HTTP API Integration Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use template_composer::{
    Template,
    media::DataUrl,
    server::{ServerConfig, StoreKind, build_state, router},
};

/// 1×1 transparent GIF
const GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

async fn app(dir: &TempDir, store: StoreKind) -> Router {
    app_with(dir, ServerConfig {
        store,
        ..Default::default()
    })
    .await
}

async fn app_with(dir: &TempDir, config: ServerConfig) -> Router {
    let config = ServerConfig {
        upload_dir: dir.path().join("uploads"),
        ..config
    };
    router(build_state(config).await.unwrap())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn sample_body() -> Value {
    json!({
        "title": "Invoice",
        "pageSize": "letter",
        "variables": [{
            "id": "6f1c0a4e-8f5b-4d52-9a3f-0a2b3c4d5e6f",
            "title": "Customer",
            "value": "Ada Lovelace",
            "x": 100.0,
            "y": 120.0,
            "format": { "fontFamily": "Arial", "fontSize": 14, "color": "#000000" }
        }]
    })
}

fn multipart_request(file_name: &str, mime: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "XBOUNDARYX";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::post("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_template_crud_round_trip() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;

    let (status, created) = send_json(&app, "POST", "/api/templates", sample_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "Invoice");
    assert_eq!(created["showBackgroundInOutput"], true);

    let (status, body) = get(&app, "/api/templates").await;
    assert_eq!(status, StatusCode::OK);
    let list: Vec<Template> = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.len(), 1);

    let (status, updated) = send_json(
        &app,
        "PUT",
        &format!("/api/templates/{id}"),
        json!({ "title": "Invoice v2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Invoice v2");
    assert_eq!(updated["pageSize"], "letter");
    assert_eq!(updated["variables"].as_array().unwrap().len(), 1);

    let (status, body) = get(&app, &format!("/api/templates/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Template = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched.title, "Invoice v2");

    let (status, _) = send_json(&app, "DELETE", &format!("/api/templates/{id}"), Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/api/templates/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_and_malformed_ids_are_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;

    let (status, body) = get(&app, "/api/templates/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Template not found");

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/templates/6f1c0a4e-8f5b-4d52-9a3f-0a2b3c4d5e6f",
        json!({ "title": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "DELETE",
        "/api/templates/6f1c0a4e-8f5b-4d52-9a3f-0a2b3c4d5e6f",
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_templates_are_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;

    let mut body = sample_body();
    body["variables"][0]["title"] = json!("");
    let (status, error) = send_json(&app, "POST", "/api/templates", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Invalid template data");
    assert_eq!(error["errors"][0], "Title is required");

    let request = Request::post("/api/templates")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, created) = send_json(&app, "POST", "/api/templates", sample_body()).await;
    let id = created["id"].as_str().unwrap();
    let mut variables = created["variables"].clone();
    variables[0]["x"] = json!(-5.0);
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/templates/{id}"),
        json!({ "variables": variables }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_directory_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let library = dir.path().join("library");

    let id = {
        let app = app(&dir, StoreKind::Directory(library.clone())).await;
        let (status, created) = send_json(&app, "POST", "/api/templates", sample_body()).await;
        assert_eq!(status, StatusCode::CREATED);
        created["id"].as_str().unwrap().to_string()
    };

    let app = app(&dir, StoreKind::Directory(library)).await;
    let (status, body) = get(&app, &format!("/api/templates/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Template = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched.title, "Invoice");
}

#[tokio::test]
async fn test_page_sizes() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;
    let (status, body) = get(&app, "/api/page-sizes").await;
    assert_eq!(status, StatusCode::OK);

    let sizes: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let keys: Vec<&str> = sizes.iter().map(|s| s["key"].as_str().unwrap()).collect();
    assert_eq!(keys, ["a4", "letter", "legal"]);
    assert_eq!(sizes[0]["unit"], "mm");
    let canvas_width = sizes[0]["canvas"]["width"].as_f64().unwrap();
    assert!((canvas_width - 594.3).abs() < 1e-9);
}

#[tokio::test]
async fn test_multipart_upload_is_served_back() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;

    let (status, body) = send(&app, multipart_request("dot.gif", "image/gif", GIF)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/api/uploads/image-"));
    assert!(url.ends_with(".gif"));

    let (status, served) = get(&app, url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, GIF);
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;

    let (status, body) = send(&app, multipart_request("notes.txt", "text/plain", b"hi")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Only image files are allowed!");

    let (status, _) = send(&app, multipart_request("dot.exe", "image/gif", GIF)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_url_upload() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/upload/data-url",
        json!({ "fileData": DataUrl::encode("image/gif", GIF), "fileName": "dot.gif" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let file_name = body["fileName"].as_str().unwrap();
    assert!(file_name.ends_with("-dot.gif"));
    assert_eq!(body["url"], format!("/api/uploads/{file_name}"));

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/upload/data-url",
        json!({ "fileData": "not a data url", "fileName": "dot.gif" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_downloads() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;
    let (_, created) = send_json(&app, "POST", "/api/templates", sample_body()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/templates/{id}/export/pdf"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("filename=\"Invoice.pdf\""));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let (status, json_bytes) = get(&app, &format!("/api/templates/{id}/export/json")).await;
    assert_eq!(status, StatusCode::OK);
    let exported: Template = serde_json::from_slice(&json_bytes).unwrap();
    assert_eq!(exported.id.to_string(), id);

    let (status, _) = get(&app, &format!("/api/templates/{id}/export/odt")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_posted_template() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, StoreKind::Memory).await;

    let mut body = sample_body();
    body["id"] = json!("0b7e7dc4-3b54-4c30-8d7e-2f7f3c6a1d11");
    let request = Request::post("/api/export/docx")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_upload_size_limit() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, ServerConfig {
        max_upload_bytes: GIF.len(),
        ..Default::default()
    })
    .await;

    // Exactly at the limit
    let (status, _) = send(&app, multipart_request("dot.gif", "image/gif", GIF)).await;
    assert_eq!(status, StatusCode::OK);

    let mut one_over = GIF.to_vec();
    one_over.push(0);
    let (status, body) = send(&app, multipart_request("dot.gif", "image/gif", &one_over)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("File too large"));

    // Far beyond the request body limit
    let huge = vec![0u8; 512 * 1024];
    let (status, _) = send(&app, multipart_request("dot.gif", "image/gif", &huge)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_data_url_upload_size_limit() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, ServerConfig {
        max_upload_bytes: GIF.len(),
        ..Default::default()
    })
    .await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/upload/data-url",
        json!({ "fileData": DataUrl::encode("image/gif", GIF), "fileName": "dot.gif" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut one_over = GIF.to_vec();
    one_over.push(0);
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/upload/data-url",
        json!({ "fileData": DataUrl::encode("image/gif", &one_over), "fileName": "dot.gif" }),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let huge = vec![0u8; 512 * 1024];
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/upload/data-url",
        json!({ "fileData": DataUrl::encode("image/gif", &huge), "fileName": "dot.gif" }),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
