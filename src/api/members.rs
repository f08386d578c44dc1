//! Library member endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        member::{Member, MemberPatch},
        rental::Rental,
    },
    AppState,
};

use super::{ApiJson, StatusResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/:id/rentals", get(get_member_rentals))
        .route("/:id/alquileres", get(get_member_rentals))
}

/// List all members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "All members", body = Vec<Member>)
    )
)]
pub async fn list_members(State(state): State<AppState>) -> AppResult<Json<Vec<Member>>> {
    let members = state.services.members.list().await?;
    Ok(Json(members))
}

/// Get member by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.get_by_id(&id).await?;
    Ok(Json(member))
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = Member,
    responses(
        (status = 201, description = "Member created", body = StatusResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Duplicate id or storage failure")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    ApiJson(member): ApiJson<Member>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    member.validate()?;
    let member = state.services.members.insert(member).await?;
    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::new("created", member.id)),
    ))
}

/// Update a member
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    params(("id" = String, Path, description = "Member ID")),
    request_body = MemberPatch,
    responses(
        (status = 200, description = "Member updated", body = StatusResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<MemberPatch>,
) -> AppResult<Json<StatusResponse>> {
    let member = state.services.members.update(&id, patch).await?;
    Ok(Json(StatusResponse::new("updated", member.id)))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member deleted", body = StatusResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    if !state.services.members.delete(&id).await? {
        return Err(AppError::NotFound(format!("member {} not found", id)));
    }
    Ok(Json(StatusResponse::new("deleted", id)))
}

/// Rentals of a member, active and returned
#[utoipa::path(
    get,
    path = "/members/{id}/rentals",
    tag = "members",
    params(("id" = String, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member's rentals", body = Vec<Rental>)
    )
)]
pub async fn get_member_rentals(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Rental>>> {
    let rentals = state.services.rentals.rentals_for_member(&id).await?;
    Ok(Json(rentals))
}
