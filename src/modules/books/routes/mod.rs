//! HTTP handlers for `/api/books` and `/api/upload`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use shelf_http::AppError;

use super::models::{Book, BookInput, BookSummary, DeleteResponse, UploadRequest, UploadResponse};
use super::service::BookService;

pub(crate) fn books_router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

pub(crate) fn upload_router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", axum::routing::post(upload_image))
        .with_state(service)
}

async fn create_book(
    State(service): State<Arc<BookService>>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<BookSummary>), AppError> {
    let Json(input) = payload?;
    let created = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_books(State(service): State<Arc<BookService>>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.list().await?))
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.get(&id).await?))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<BookSummary>, AppError> {
    let Json(input) = payload?;
    Ok(Json(service.update(&id, input).await?))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    service.delete(&id).await?;
    Ok(Json(DeleteResponse {
        id,
        message: "Book deleted successfully".to_string(),
    }))
}

async fn upload_image(
    State(service): State<Arc<BookService>>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let Json(request) = payload?;

    let book_id = request.book_id.unwrap_or_default();
    let encoded = request.image_base64.unwrap_or_default();
    let image = decode_image(&encoded)?;

    let image_url = service.attach_image(&book_id, image).await?;
    Ok(Json(UploadResponse { image_url }))
}

/// Decode the base64 payload, accepting a full `data:` URL as well.
fn decode_image(encoded: &str) -> Result<Bytes, AppError> {
    let payload = match encoded.strip_prefix("data:") {
        Some(data_url) => data_url
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| AppError::bad_request("imageBase64 is not a valid data URL"))?,
        None => encoded,
    };

    STANDARD
        .decode(payload.trim())
        .map(Bytes::from)
        .map_err(|err| AppError::bad_request(format!("imageBase64 is not valid base64: {err}")))
}
