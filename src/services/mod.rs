//! Business logic services

pub mod rentals;

use crate::{
    models::{Book, Employee, Member, Student},
    repository::{Repositories, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub students: Repository<Student>,
    pub members: Repository<Member>,
    pub books: Repository<Book>,
    pub employees: Repository<Employee>,
    pub rentals: rentals::RentalsService,
}

impl Services {
    /// Create all services over the given repositories
    pub fn new(repositories: Repositories) -> Self {
        Self {
            rentals: rentals::RentalsService::new(
                repositories.rentals,
                repositories.books.clone(),
            ),
            students: repositories.students,
            members: repositories.members,
            books: repositories.books,
            employees: repositories.employees,
        }
    }
}
