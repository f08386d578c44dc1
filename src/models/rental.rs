//! Rental (alquiler) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use validator::Validate;

use super::{today, ymd};
use crate::repository::{Entity, PgQuery};

/// Rental lifecycle state; moves from active to returned exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    #[default]
    #[serde(alias = "activo")]
    Active,
    #[serde(alias = "devuelto")]
    Returned,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Returned => "returned",
        }
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" | "activo" => Ok(RentalStatus::Active),
            "returned" | "devuelto" => Ok(RentalStatus::Returned),
            other => Err(format!("Unknown rental status: {}", other)),
        }
    }
}

/// Rental record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    #[serde(default)]
    pub id: String,
    pub member_id: String,
    pub book_id: String,
    pub rental_date: NaiveDate,
    /// Set only once the book is returned
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: RentalStatus,
}

/// Create rental request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRental {
    /// Generated when absent or empty
    pub id: Option<String>,
    #[validate(length(min = 1, message = "memberId is required"))]
    pub member_id: String,
    #[validate(length(min = 1, message = "bookId is required"))]
    pub book_id: String,
    /// Defaults to the current date
    pub rental_date: Option<NaiveDate>,
}

/// Internal rental update used by the coordinator
#[derive(Debug, Default)]
pub struct RentalPatch {
    pub status: Option<RentalStatus>,
    /// `Some(None)` clears the return date
    pub return_date: Option<Option<NaiveDate>>,
}

impl RentalPatch {
    pub fn returned_on(date: NaiveDate) -> Self {
        Self {
            status: Some(RentalStatus::Returned),
            return_date: Some(Some(date)),
        }
    }

    pub fn reactivate() -> Self {
        Self {
            status: Some(RentalStatus::Active),
            return_date: Some(None),
        }
    }
}

/// Named filtered views over rentals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalView {
    Active,
    History,
}

impl Rental {
    /// Build an active rental from a create request
    pub fn from_request(request: NewRental) -> Self {
        Self {
            id: request.id.unwrap_or_default(),
            member_id: request.member_id,
            book_id: request.book_id,
            rental_date: request.rental_date.unwrap_or_else(today),
            return_date: None,
            status: RentalStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }
}

impl FromRow<'_, PgRow> for Rental {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status.parse().map_err(|e: String| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: e.into(),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            member_id: row.try_get("member_id")?,
            book_id: row.try_get("book_id")?,
            rental_date: row.try_get("rental_date")?,
            return_date: row.try_get("return_date")?,
            status,
        })
    }
}

impl Entity for Rental {
    type Patch = RentalPatch;
    type View = RentalView;

    const NAME: &'static str = "rental";
    const TABLE: &'static str = "rentals";
    const COLUMNS: &'static [&'static str] =
        &["id", "member_id", "book_id", "rental_date", "return_date", "status"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS rentals (
            id TEXT PRIMARY KEY,
            member_id TEXT NOT NULL,
            book_id TEXT NOT NULL,
            rental_date DATE NOT NULL,
            return_date DATE,
            status TEXT NOT NULL DEFAULT 'active'
        )
    "#;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: RentalPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date) = patch.return_date {
            self.return_date = date;
        }
    }

    fn matches(&self, view: RentalView) -> bool {
        match view {
            RentalView::Active => self.status == RentalStatus::Active,
            RentalView::History => self.status == RentalStatus::Returned,
        }
    }

    fn view_clause(view: RentalView) -> &'static str {
        match view {
            RentalView::Active => "status = 'active'",
            RentalView::History => "status = 'returned'",
        }
    }

    fn field(&self, column: &str) -> Option<&str> {
        match column {
            "member_id" => Some(&self.member_id),
            "book_id" => Some(&self.book_id),
            _ => None,
        }
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.id)
            .bind(&self.member_id)
            .bind(&self.book_id)
            .bind(self.rental_date)
            .bind(self.return_date)
            .bind(self.status.as_str())
    }

    fn seed() -> Vec<Self> {
        let rental = |id: &str, member: &str, book: &str, date, returned: Option<NaiveDate>| Rental {
            id: id.to_string(),
            member_id: member.to_string(),
            book_id: book.to_string(),
            rental_date: date,
            return_date: returned,
            status: if returned.is_some() {
                RentalStatus::Returned
            } else {
                RentalStatus::Active
            },
        };

        vec![
            rental("A001", "S001", "L002", ymd(2025, 2, 1), None),
            rental("A002", "S002", "L003", ymd(2025, 2, 3), None),
            rental("A003", "S003", "L005", ymd(2025, 2, 5), None),
            rental("A004", "S001", "L001", ymd(2025, 1, 20), Some(ymd(2025, 2, 5))),
        ]
    }
}
