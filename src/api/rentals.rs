//! Rental endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::rental::{NewRental, Rental},
    AppState,
};

use super::{ApiJson, StatusResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rentals).post(create_rental))
        .route("/active", get(list_active_rentals))
        .route("/activos", get(list_active_rentals))
        .route("/history", get(list_rental_history))
        .route("/historial", get(list_rental_history))
        .route(
            "/:id",
            get(get_rental).put(rental_action).delete(delete_rental),
        )
}

/// Action applied to an existing rental
#[derive(Debug, Deserialize, ToSchema)]
pub struct RentalAction {
    /// Only "return" is supported
    pub action: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnResponse {
    pub status: String,
    pub rental: Rental,
}

/// List all rentals
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    responses(
        (status = 200, description = "All rentals", body = Vec<Rental>)
    )
)]
pub async fn list_rentals(State(state): State<AppState>) -> AppResult<Json<Vec<Rental>>> {
    let rentals = state.services.rentals.list().await?;
    Ok(Json(rentals))
}

/// Rentals not yet returned
#[utoipa::path(
    get,
    path = "/rentals/active",
    tag = "rentals",
    responses(
        (status = 200, description = "Active rentals", body = Vec<Rental>)
    )
)]
pub async fn list_active_rentals(State(state): State<AppState>) -> AppResult<Json<Vec<Rental>>> {
    let rentals = state.services.rentals.active_rentals().await?;
    Ok(Json(rentals))
}

/// Returned rentals
#[utoipa::path(
    get,
    path = "/rentals/history",
    tag = "rentals",
    responses(
        (status = 200, description = "Returned rentals", body = Vec<Rental>)
    )
)]
pub async fn list_rental_history(State(state): State<AppState>) -> AppResult<Json<Vec<Rental>>> {
    let rentals = state.services.rentals.rental_history().await?;
    Ok(Json(rentals))
}

/// Get rental by ID
#[utoipa::path(
    get,
    path = "/rentals/{id}",
    tag = "rentals",
    params(("id" = String, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental details", body = Rental),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Rental>> {
    let rental = state.services.rentals.get_by_id(&id).await?;
    Ok(Json(rental))
}

/// Rent a book
#[utoipa::path(
    post,
    path = "/rentals",
    tag = "rentals",
    request_body = NewRental,
    responses(
        (status = 201, description = "Rental registered", body = StatusResponse),
        (status = 400, description = "Invalid request or book not available"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Duplicate id or storage failure")
    )
)]
pub async fn create_rental(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewRental>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    request.validate()?;
    let rental = state
        .services
        .rentals
        .register_rental(Rental::from_request(request))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::new("created", rental.id)),
    ))
}

/// Apply an action to a rental. `{"action":"return"}` returns the book.
#[utoipa::path(
    put,
    path = "/rentals/{id}",
    tag = "rentals",
    params(("id" = String, Path, description = "Rental ID")),
    request_body = RentalAction,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Unknown action or rental already returned"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn rental_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RentalAction>,
) -> AppResult<Json<ReturnResponse>> {
    match body.action.as_deref() {
        Some("return") | Some("devolver") => {
            let rental = state.services.rentals.return_book(&id).await?;
            Ok(Json(ReturnResponse {
                status: "returned".to_string(),
                rental,
            }))
        }
        Some(other) => Err(AppError::BadRequest(format!(
            "Unknown rental action: {}",
            other
        ))),
        None => Err(AppError::BadRequest("Missing rental action".to_string())),
    }
}

/// Delete a rental; an active rental frees its book
#[utoipa::path(
    delete,
    path = "/rentals/{id}",
    tag = "rentals",
    params(("id" = String, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental deleted", body = StatusResponse),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn delete_rental(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    if !state.services.rentals.delete(&id).await? {
        return Err(AppError::NotFound(format!("rental {} not found", id)));
    }
    Ok(Json(StatusResponse::new("deleted", id)))
}
