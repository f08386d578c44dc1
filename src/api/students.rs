//! Student endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::student::{Student, StudentPatch},
    AppState,
};

use super::{ApiJson, StatusResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

/// List all students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "All students", body = Vec<Student>)
    )
)]
pub async fn list_students(State(state): State<AppState>) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.students.list().await?;
    Ok(Json(students))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Student>> {
    let student = state.services.students.get_by_id(&id).await?;
    Ok(Json(student))
}

/// Create a student; an id is generated when none is given
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = Student,
    responses(
        (status = 201, description = "Student created", body = StatusResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Duplicate id or storage failure")
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(student): ApiJson<Student>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    student.validate()?;
    let student = state.services.students.insert(student).await?;
    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::new("created", student.id)),
    ))
}

/// Update a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    params(("id" = String, Path, description = "Student ID")),
    request_body = StudentPatch,
    responses(
        (status = 200, description = "Student updated", body = StatusResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<StudentPatch>,
) -> AppResult<Json<StatusResponse>> {
    let student = state.services.students.update(&id, patch).await?;
    Ok(Json(StatusResponse::new("updated", student.id)))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = StatusResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    if !state.services.students.delete(&id).await? {
        return Err(AppError::NotFound(format!("student {} not found", id)));
    }
    Ok(Json(StatusResponse::new("deleted", id)))
}
