//! HTTP route handlers for the book catalog.
//!
//! Domain errors come back from the store as `StoreError` and are mapped to
//! structured JSON error responses here; the path/body id mismatch on update
//! is rejected before the store is touched.

use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::info;

use crate::store::{BookDraft, StoreError};
use crate::AppState;

/// JSON error response helper
fn err_response(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({ "error": msg }))).into_response()
}

fn store_err_response(err: &StoreError) -> Response {
    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
    };
    err_response(status, &err.to_string())
}

/// Build the API router with all endpoints.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/:id", get(get_book).put(update_book))
        .layer(Extension(state))
}

async fn list_books(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.list())
}

async fn get_book(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Response {
    match state.store.get(id) {
        Ok(book) => Json(book).into_response(),
        Err(e) => store_err_response(&e),
    }
}

async fn create_book(
    Extension(state): Extension<Arc<AppState>>,
    Json(draft): Json<BookDraft>,
) -> Response {
    match state.store.create(draft) {
        Ok(book) => {
            info!("Created book {} ({})", book.id, book.name);
            let location = format!("/books/{}", book.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(book),
            )
                .into_response()
        }
        Err(e) => store_err_response(&e),
    }
}

async fn update_book(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(draft): Json<BookDraft>,
) -> Response {
    // Mismatched body id is a client error; reject before any mutation.
    if let Some(body_id) = draft.id {
        if body_id != id {
            return err_response(
                StatusCode::BAD_REQUEST,
                &format!("book id {} in body does not match path id {}", body_id, id),
            );
        }
    }

    match state.store.update(id, &draft.name) {
        Ok(book) => {
            info!("Updated book {} ({})", book.id, book.name);
            Json(book).into_response()
        }
        Err(e) => store_err_response(&e),
    }
}
