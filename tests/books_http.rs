use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shelf_app::App;
use shelf_db::MemoryCatalog;
use shelf_kernel::Settings;
use shelf_storage::MemoryAssets;
use tower::ServiceExt;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRcover";

struct TestApp {
    router: Router,
    catalog: Arc<MemoryCatalog>,
    assets: Arc<MemoryAssets>,
}

fn build() -> TestApp {
    let catalog = Arc::new(MemoryCatalog::new());
    let assets = Arc::new(MemoryAssets::new("shelf-book-images"));
    let app = App::with_stores(Settings::default(), catalog.clone(), assets.clone()).unwrap();
    TestApp {
        router: app.router(),
        catalog,
        assets,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let res = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(router: &Router, title: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/api/books",
        Some(json!({"title": title, "price": "9.99", "genre": "Fiction"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_ok() {
    let app = build();
    let res = app
        .router
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn create_returns_201_with_coerced_price() {
    let app = build();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/books",
        Some(json!({"title": "Dune", "price": "15.99", "genre": "Sci-Fi"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["price"], json!(15.99));
    assert_eq!(body["genre"], "Sci-Fi");
}

#[tokio::test]
async fn create_missing_fields_is_400_and_stores_nothing() {
    let app = build();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/books",
        Some(json!({"title": "Dune", "price": 15.99})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "genre");
    assert!(app.catalog.is_empty().await);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = build();

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/books")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\":\"x\""))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(app.catalog.is_empty().await);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = build();
    let first = create(&app.router, "First").await;
    let second = create(&app.router, "Second").await;

    let (status, body) = send(&app.router, "GET", "/api/books", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    assert!(body[0].get("imageUrl").is_none());
    assert_eq!(body[0]["createdBy"], "anonymous");
}

#[tokio::test]
async fn upload_sets_public_image_url() {
    let app = build();
    let id = create(&app.router, "Dune").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/upload",
        Some(json!({"bookId": id, "imageBase64": STANDARD.encode(PNG)})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let url = body["imageUrl"].as_str().unwrap().to_string();
    assert_eq!(
        url,
        format!("https://storage.googleapis.com/shelf-book-images/{id}")
    );
    assert_eq!(app.assets.fetch_public(&url).await.unwrap().as_ref(), PNG);

    let (_, book) = send(&app.router, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(book["imageUrl"], json!(url));
}

#[tokio::test]
async fn upload_missing_fields_is_400() {
    let app = build();

    let (status, body) = send(&app.router, "POST", "/api/upload", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["bookId", "imageBase64"]);
    assert!(app.assets.is_empty().await);
}

#[tokio::test]
async fn upload_invalid_base64_is_400() {
    let app = build();
    let id = create(&app.router, "Dune").await;

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/upload",
        Some(json!({"bookId": id, "imageBase64": "%%%not-base64%%%"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.assets.is_empty().await);
}

#[tokio::test]
async fn update_keeps_image_and_echoes_fields() {
    let app = build();
    let id = create(&app.router, "Dune").await;
    send(
        &app.router,
        "POST",
        "/api/upload",
        Some(json!({"bookId": id, "imageBase64": STANDARD.encode(PNG)})),
    )
    .await;

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/books/{id}"),
        Some(json!({"title": "Children of Dune", "price": 12, "genre": "Sci-Fi"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": id, "title": "Children of Dune", "price": 12.0, "genre": "Sci-Fi"})
    );

    let (_, book) = send(&app.router, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(book["title"], "Children of Dune");
    assert!(book["imageUrl"].as_str().unwrap().ends_with(&id));
}

#[tokio::test]
async fn update_unknown_book_is_500() {
    let app = build();

    let (status, body) = send(
        &app.router,
        "PUT",
        "/api/books/ghost",
        Some(json!({"title": "Dune", "price": 1, "genre": "Sci-Fi"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "storage_error");
    assert_eq!(body["error"]["message"], "Update failed");
    assert!(app.catalog.is_empty().await);
}

#[tokio::test]
async fn upload_for_unknown_book_is_500_and_leaves_the_object() {
    let app = build();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/upload",
        Some(json!({"bookId": "ghost", "imageBase64": STANDARD.encode(PNG)})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Upload failed");
    assert!(app.assets.is_public("ghost").await);
    assert!(app.catalog.is_empty().await);
}

#[tokio::test]
async fn delete_removes_book_and_image() {
    let app = build();
    let id = create(&app.router, "Dune").await;
    send(
        &app.router,
        "POST",
        "/api/upload",
        Some(json!({"bookId": id, "imageBase64": STANDARD.encode(PNG)})),
    )
    .await;

    let (status, body) = send(&app.router, "DELETE", &format!("/api/books/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "message": "Book deleted successfully"}));
    assert!(app.assets.get(&id).await.is_none());

    let (status, _) = send(&app.router, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_book_is_404() {
    let app = build();
    create(&app.router, "Keep me").await;

    let (status, body) = send(&app.router, "DELETE", "/api/books/ghost", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(app.catalog.len().await, 1);
}

#[tokio::test]
async fn index_page_is_served() {
    let app = build();

    let res = app
        .router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("<h1>Shelf</h1>"));
}
