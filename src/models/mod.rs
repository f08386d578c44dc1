//! Data models for Biblioteca

pub mod book;
pub mod employee;
pub mod member;
pub mod rental;
pub mod student;

use chrono::{Local, NaiveDate};

// Re-export commonly used types
pub use book::{Book, BookPatch, BookView};
pub use employee::{Employee, EmployeePatch};
pub use member::{Member, MemberPatch};
pub use rental::{NewRental, Rental, RentalPatch, RentalStatus, RentalView};
pub use student::{Student, StudentPatch};

/// Current local date, the granularity used for every date field
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Calendar date for seed records
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
