//! Biblioteca school library server
//!
//! REST JSON API over students, members, books, rentals and employees.
//! Each resource is stored in PostgreSQL when the database is reachable at
//! startup and in a seeded in-memory store otherwise.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
