//! API handlers for Biblioteca REST endpoints

pub mod books;
pub mod employees;
pub mod health;
pub mod members;
pub mod openapi;
pub mod rentals;
pub mod students;

use std::any::Any;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections are always 400 Bad Request
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Could not read request body: {}", e)))?;

        serde_json::from_slice(&body)
            .map(ApiJson)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
    }
}

/// Outcome of a write operation
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// "created", "updated" or "deleted"
    pub status: String,
    /// Id of the affected record
    pub id: String,
}

impl StatusResponse {
    pub fn new(status: &str, id: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            id: id.into(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let static_files = ServeDir::new(&state.config.server.static_dir);

    // Spanish aliases route to the same handlers
    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/students", students::routes())
        .nest("/members", members::routes())
        .nest("/socios", members::routes())
        .nest("/books", books::routes())
        .nest("/libros", books::routes())
        .nest("/rentals", rentals::routes())
        .nest("/alquileres", rentals::routes())
        .nest("/employees", employees::routes())
        .nest("/empleados", employees::routes())
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "status": "error" })),
    )
        .into_response()
}
