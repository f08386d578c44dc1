//! Employee model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::convert::Infallible;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{today, ymd};
use crate::repository::{Entity, PgQuery};

/// Employee (empleado)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(default)]
    pub position: String,
    /// Serialized as a decimal string, e.g. "1800.00"
    #[validate(custom(function = "validate_salary"))]
    #[serde(default)]
    pub salary: Decimal,
    #[serde(default = "today")]
    pub hire_date: NaiveDate,
}

fn validate_salary(salary: &Decimal) -> Result<(), ValidationError> {
    if salary.is_sign_negative() {
        return Err(ValidationError::new("negative_salary"));
    }
    Ok(())
}

/// Update employee request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
}

impl Entity for Employee {
    type Patch = EmployeePatch;
    type View = Infallible;

    const NAME: &'static str = "employee";
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "surname", "email", "position", "salary", "hire_date"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS employees (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            surname TEXT NOT NULL DEFAULT '',
            email TEXT,
            position TEXT NOT NULL DEFAULT '',
            salary NUMERIC NOT NULL DEFAULT 0,
            hire_date DATE NOT NULL DEFAULT CURRENT_DATE
        )
    "#;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: EmployeePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(surname) = patch.surname {
            self.surname = surname;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(salary) = patch.salary {
            self.salary = salary;
        }
        if let Some(date) = patch.hire_date {
            self.hire_date = date;
        }
    }

    fn matches(&self, view: Infallible) -> bool {
        match view {}
    }

    fn view_clause(view: Infallible) -> &'static str {
        match view {}
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.id)
            .bind(&self.name)
            .bind(&self.surname)
            .bind(&self.email)
            .bind(&self.position)
            .bind(self.salary)
            .bind(self.hire_date)
    }

    fn seed() -> Vec<Self> {
        let employee = |id: &str, name: &str, surname: &str, email: &str, position: &str, salary: i64, hired| {
            Employee {
                id: id.to_string(),
                name: name.to_string(),
                surname: surname.to_string(),
                email: Some(email.to_string()),
                position: position.to_string(),
                salary: Decimal::new(salary, 0),
                hire_date: hired,
            }
        };

        vec![
            employee("E001", "Carlos", "Rodríguez", "carlos@example.com", "Bibliotecario", 1800, ymd(2024, 1, 10)),
            employee("E002", "Ana", "Fernández", "ana@example.com", "Asistente", 1200, ymd(2024, 6, 15)),
            employee("E003", "Luis", "Sánchez", "luis@example.com", "Administrador", 2000, ymd(2023, 3, 20)),
        ]
    }
}
