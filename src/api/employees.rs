//! Employee API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::employee::{Employee, EmployeePatch},
    AppState,
};

use super::{ApiJson, StatusResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// List all employees
#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    responses(
        (status = 200, description = "Employee list", body = Vec<Employee>)
    )
)]
pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<Employee>>> {
    Ok(Json(state.services.employees.list().await?))
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee details", body = Employee)
    )
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Employee>> {
    Ok(Json(state.services.employees.get_by_id(&id).await?))
}

/// Create employee
#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    request_body = Employee,
    responses(
        (status = 201, description = "Employee created", body = StatusResponse)
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(employee): ApiJson<Employee>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    employee.validate()?;
    let employee = state.services.employees.insert(employee).await?;
    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::new("created", employee.id)),
    ))
}

/// Update employee
#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Employee ID")),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee updated", body = StatusResponse)
    )
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<EmployeePatch>,
) -> AppResult<Json<StatusResponse>> {
    let employee = state.services.employees.update(&id, patch).await?;
    Ok(Json(StatusResponse::new("updated", employee.id)))
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = StatusResponse)
    )
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    if !state.services.employees.delete(&id).await? {
        return Err(AppError::NotFound(format!("employee {} not found", id)));
    }
    Ok(Json(StatusResponse::new("deleted", id)))
}
