//! Library member model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::convert::Infallible;
use utoipa::ToSchema;
use validator::Validate;

use super::{today, ymd};
use crate::repository::{Entity, PgQuery};

/// Library member (socio)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Defaults to the current date on create
    #[serde(default = "today")]
    pub registration_date: NaiveDate,
}

/// Update member request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub registration_date: Option<NaiveDate>,
}

impl Entity for Member {
    type Patch = MemberPatch;
    type View = Infallible;

    const NAME: &'static str = "member";
    const TABLE: &'static str = "members";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "surname", "email", "phone", "registration_date"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            surname TEXT NOT NULL DEFAULT '',
            email TEXT,
            phone TEXT,
            registration_date DATE NOT NULL DEFAULT CURRENT_DATE
        )
    "#;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: MemberPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(surname) = patch.surname {
            self.surname = surname;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if let Some(date) = patch.registration_date {
            self.registration_date = date;
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
            .bind(&self.phone)
            .bind(self.registration_date)
    }

    fn seed() -> Vec<Self> {
        let member = |id: &str, name: &str, surname: &str, email: &str, phone: &str, date| Member {
            id: id.to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            registration_date: date,
        };

        vec![
            member("S001", "Juan", "García", "juan@example.com", "123456789", ymd(2025, 1, 15)),
            member("S002", "María", "López", "maria@example.com", "987654321", ymd(2025, 2, 1)),
            member("S003", "Pedro", "Martínez", "pedro@example.com", "555666777", ymd(2025, 2, 5)),
        ]
    }
}
