//! Student model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::convert::Infallible;
use utoipa::ToSchema;
use validator::Validate;

use crate::repository::{Entity, PgQuery};

/// Student record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Generated on create when empty
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: i32,
}

/// Update student request; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub age: Option<i32>,
}

impl Student {
    pub fn new(id: &str, name: &str, surname: &str, age: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
            age,
        }
    }
}

impl Entity for Student {
    type Patch = StudentPatch;
    type View = Infallible;

    const NAME: &'static str = "student";
    const TABLE: &'static str = "students";
    const COLUMNS: &'static [&'static str] = &["id", "name", "surname", "age"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS students (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            surname TEXT NOT NULL DEFAULT '',
            age INTEGER NOT NULL DEFAULT 0
        )
    "#;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: StudentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(surname) = patch.surname {
            self.surname = surname;
        }
        if let Some(age) = patch.age {
            self.age = age;
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
            .bind(self.age)
    }

    fn seed() -> Vec<Self> {
        vec![
            Student::new("s001", "Juan", "García", 20),
            Student::new("s002", "María", "López", 21),
            Student::new("s003", "Carlos", "Martínez", 22),
        ]
    }
}
