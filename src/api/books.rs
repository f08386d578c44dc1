//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch, BookView},
    AppState,
};

use super::{ApiJson, StatusResponse};

/// Named views are static segments, so they take precedence over `/:id`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/available", get(list_available_books))
        .route("/disponibles", get(list_available_books))
        .route("/rented", get(list_rented_books))
        .route("/alquilados", get(list_rented_books))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Books that can be rented now
#[utoipa::path(
    get,
    path = "/books/available",
    tag = "books",
    responses(
        (status = 200, description = "Available books", body = Vec<Book>)
    )
)]
pub async fn list_available_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_where(BookView::Available).await?;
    Ok(Json(books))
}

/// Books currently rented out
#[utoipa::path(
    get,
    path = "/books/rented",
    tag = "books",
    responses(
        (status = 200, description = "Rented books", body = Vec<Book>)
    )
)]
pub async fn list_rented_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_where(BookView::Rented).await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(&id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog. New books always start available; only a
/// rental can mark them as rented.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", body = StatusResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Duplicate id or storage failure")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(mut book): ApiJson<Book>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    book.validate()?;
    book.available = true;
    let book = state.services.books.insert(book).await?;
    Ok((StatusCode::CREATED, Json(StatusResponse::new("created", book.id))))
}

/// Update a book.
///
/// Setting `available` here bypasses the rental bookkeeping.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Book updated", body = StatusResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<BookPatch>,
) -> AppResult<Json<StatusResponse>> {
    let book = state.services.books.update(&id, patch).await?;
    Ok(Json(StatusResponse::new("updated", book.id)))
}

/// Remove a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = StatusResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    if !state.services.books.delete(&id).await? {
        return Err(AppError::NotFound(format!("book {} not found", id)));
    }
    Ok(Json(StatusResponse::new("deleted", id)))
}
