//! API integration tests against the in-memory backend

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use biblioteca_server::{
    api, config::AppConfig, repository::Repositories, services::Services, AppState,
};

fn app() -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(Repositories::in_memory())),
    };
    api::create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|b| b.to_string())).await
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_memory_backend() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"]["books"], "memory");
    assert_eq!(body["storage"]["rentals"], "memory");
}

#[tokio::test]
async fn test_rental_lifecycle() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/alquileres",
        Some(json!({ "memberId": "S001", "bookId": "L001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "created");
    let id = body["id"].as_str().unwrap().to_string();

    let (_, book) = send(&app, Method::GET, "/api/libros/L001", None).await;
    assert_eq!(book["available"], false);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/alquileres/{}", id),
        Some(json!({ "action": "return" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");

    let (_, book) = send(&app, Method::GET, "/api/libros/L001", None).await;
    assert_eq!(book["available"], true);

    let (_, rental) = send(&app, Method::GET, &format!("/api/alquileres/{}", id), None).await;
    assert_eq!(rental["status"], "returned");
    assert!(rental["returnDate"].is_string());

    let (_, history) = send(&app, Method::GET, "/api/rentals/history", None).await;
    assert!(history
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"] == id.as_str()));
}

#[tokio::test]
async fn test_renting_unavailable_book_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/rentals",
        Some(json!({ "memberId": "S001", "bookId": "L002" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/rentals",
        Some(json!({ "memberId": "S001", "bookId": "L999" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_routing_precedence_for_views() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/libros/available", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["L001", "L004"]);

    let (status, body) = send(&app, Method::GET, "/api/books/alquilados", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, "/api/alquileres/activos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_action_leaves_rental_unchanged() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/alquileres/A001",
        Some(json!({ "action": "cancel" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, "/api/alquileres/A001", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, rental) = send(&app, Method::GET, "/api/alquileres/A001", None).await;
    assert_eq!(rental["status"], "active");
    assert!(rental["returnDate"].is_null());

    let (_, book) = send(&app, Method::GET, "/api/libros/L002", None).await;
    assert_eq!(book["available"], false);
}

#[tokio::test]
async fn test_duplicate_id_is_a_server_error() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(json!({ "id": "s001", "name": "Otro", "surname": "Alumno", "age": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");

    let (_, student) = send(&app, Method::GET, "/api/students/s001", None).await;
    assert_eq!(student["name"], "Juan");
}

#[tokio::test]
async fn test_delete_is_idempotent_failure() {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/api/empleados/E002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");

    for _ in 0..2 {
        let (status, _) = send(&app, Method::DELETE, "/api/empleados/E002", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (status, _) = send(&app, Method::GET, "/api/employees/E002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/api/socios",
        Some("{\"name\": ".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_invalid_record_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/members",
        Some(json!({ "name": "Ana", "surname": "Ruiz", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn test_unsupported_method() {
    let app = app();
    let (status, _) = send(&app, Method::PATCH, "/api/books", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, Method::POST, "/api/books/available", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_member_round_trip_and_update() {
    let app = app();
    let member = json!({
        "id": "S010",
        "name": "Lucía",
        "surname": "Fernández",
        "email": "lucia@example.com",
        "phone": "600123123",
        "registrationDate": "2025-03-01"
    });

    let (status, body) = send(&app, Method::POST, "/api/members", Some(member.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "S010");

    let (status, fetched) = send(&app, Method::GET, "/api/socios/S010", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, member);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/members/S010",
        Some(json!({ "phone": "600999999" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "updated");

    let (_, fetched) = send(&app, Method::GET, "/api/members/S010", None).await;
    assert_eq!(fetched["phone"], "600999999");
    assert_eq!(fetched["email"], "lucia@example.com");
}

#[tokio::test]
async fn test_generated_id_when_absent() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/libros",
        Some(json!({ "title": "Niebla", "author": "Miguel de Unamuno", "isbn": "978-84-376-0001-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let (_, book) = send(&app, Method::GET, &format!("/api/libros/{}", id), None).await;
    assert_eq!(book["available"], true);
}

#[tokio::test]
async fn test_member_rentals() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/members/S001/rentals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/api/socios/S999/alquileres", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/rentals/{id}"].is_object());
}

#[tokio::test]
async fn test_new_book_always_starts_available() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "id": "L100", "title": "Fortunata y Jacinta", "available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "L100");

    let (_, book) = send(&app, Method::GET, "/api/books/L100", None).await;
    assert_eq!(book["available"], true);

    let (_, available) = send(&app, Method::GET, "/api/books/available", None).await;
    assert!(available
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["id"] == "L100"));
}

async fn fetch_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_students_web_client_is_served() {
    let app = app();

    let (status, page) = fetch_text(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("id=\"studentForm\""));
    assert!(page.contains("app.js"));

    let (status, script) = fetch_text(&app, "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(script.contains("/api/students"));
}
