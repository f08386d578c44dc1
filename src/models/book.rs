//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::repository::{Entity, PgQuery};

/// Book (libro). `available` is maintained by the rental coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Update book request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub available: Option<bool>,
}

impl BookPatch {
    pub fn availability(available: bool) -> Self {
        Self {
            available: Some(available),
            ..Default::default()
        }
    }
}

/// Named filtered views over books
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookView {
    Available,
    Rented,
}

impl Book {
    pub fn new(id: &str, title: &str, author: &str, isbn: &str, available: bool) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            available,
        }
    }
}

impl Entity for Book {
    type Patch = BookPatch;
    type View = BookView;

    const NAME: &'static str = "book";
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [&'static str] = &["id", "title", "author", "isbn", "available"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL DEFAULT '',
            isbn TEXT NOT NULL DEFAULT '',
            available BOOLEAN NOT NULL DEFAULT TRUE
        )
    "#;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(isbn) = patch.isbn {
            self.isbn = isbn;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
    }

    fn matches(&self, view: BookView) -> bool {
        match view {
            BookView::Available => self.available,
            BookView::Rented => !self.available,
        }
    }

    fn view_clause(view: BookView) -> &'static str {
        match view {
            BookView::Available => "available = TRUE",
            BookView::Rented => "available = FALSE",
        }
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.id)
            .bind(&self.title)
            .bind(&self.author)
            .bind(&self.isbn)
            .bind(self.available)
    }

    fn seed() -> Vec<Self> {
        // Availability mirrors the seeded active rentals (L002, L003, L005)
        vec![
            Book::new("L001", "Don Quijote", "Miguel de Cervantes", "978-8437605807", true),
            Book::new("L002", "Cien años de soledad", "Gabriel García Márquez", "978-6073128094", false),
            Book::new("L003", "La casa de los espíritus", "Isabel Allende", "978-8432217876", false),
            Book::new("L004", "Ficciones", "Jorge Luis Borges", "978-8437607499", true),
            Book::new("L005", "El quijote de la mancha", "Miguel de Cervantes", "978-8467054735", false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_book_is_available_by_default() {
        let book: Book = serde_json::from_value(json!({"title": "Rayuela"})).unwrap();
        assert!(book.available);
        assert!(book.id.is_empty());
    }

    #[test]
    fn test_views() {
        let books = Book::seed();
        let available: Vec<_> = books
            .iter()
            .filter(|b| b.matches(BookView::Available))
            .map(|b| b.id.as_str())
            .collect();
        let rented: Vec<_> = books
            .iter()
            .filter(|b| b.matches(BookView::Rented))
            .map(|b| b.id.as_str())
            .collect();

        assert_eq!(available, ["L001", "L004"]);
        assert_eq!(rented, ["L002", "L003", "L005"]);
    }
}
