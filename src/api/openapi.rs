//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, employees, health, members, rentals, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "0.3.0",
        description = "School library REST API: students, members, books, rentals and employees"
    ),
    servers(
        (url = "/api", description = "REST API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Students
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        members::get_member_rentals,
        // Books
        books::list_books,
        books::list_available_books,
        books::list_rented_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Rentals
        rentals::list_rentals,
        rentals::list_active_rentals,
        rentals::list_rental_history,
        rentals::get_rental,
        rentals::create_rental,
        rentals::rental_action,
        rentals::delete_rental,
        // Employees
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee,
    ),
    components(
        schemas(
            crate::models::student::Student,
            crate::models::student::StudentPatch,
            crate::models::member::Member,
            crate::models::member::MemberPatch,
            crate::models::book::Book,
            crate::models::book::BookPatch,
            crate::models::rental::Rental,
            crate::models::rental::RentalStatus,
            crate::models::rental::NewRental,
            crate::models::employee::Employee,
            crate::models::employee::EmployeePatch,
            crate::api::StatusResponse,
            crate::error::ErrorResponse,
            crate::repository::StoreMode,
            rentals::RentalAction,
            rentals::ReturnResponse,
            health::HealthResponse,
            health::ReadinessResponse,
            health::StorageReport,
        )
    ),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "students", description = "Student records"),
        (name = "members", description = "Library members (socios)"),
        (name = "books", description = "Book catalog (libros)"),
        (name = "rentals", description = "Book rentals (alquileres)"),
        (name = "employees", description = "Staff (empleados)"),
    )
)]
pub struct ApiDoc;

/// Create OpenAPI router with Swagger UI
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
