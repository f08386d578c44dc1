//! Rental coordination: keeps book availability in step with rentals

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::{today, Book, BookPatch, Rental, RentalPatch, RentalStatus, RentalView},
    repository::{Repository, StoreMode},
};

/// Rental operations that also flip the rented book's `available` flag.
///
/// Mutations are serialised by a single lock so the two-step
/// rental-then-book writes never interleave. A failed book write is undone
/// on the rental side before the error is returned.
#[derive(Clone)]
pub struct RentalsService {
    rentals: Repository<Rental>,
    books: Repository<Book>,
    write_lock: Arc<Mutex<()>>,
}

impl RentalsService {
    pub fn new(rentals: Repository<Rental>, books: Repository<Book>) -> Self {
        Self {
            rentals,
            books,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn mode(&self) -> StoreMode {
        self.rentals.mode()
    }

    pub async fn list(&self) -> AppResult<Vec<Rental>> {
        self.rentals.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Rental> {
        self.rentals.get_by_id(id).await
    }

    /// Rentals still out
    pub async fn active_rentals(&self) -> AppResult<Vec<Rental>> {
        self.rentals.list_where(RentalView::Active).await
    }

    /// Returned rentals
    pub async fn rental_history(&self) -> AppResult<Vec<Rental>> {
        self.rentals.list_where(RentalView::History).await
    }

    pub async fn rentals_for_member(&self, member_id: &str) -> AppResult<Vec<Rental>> {
        self.rentals.find_by("member_id", member_id).await
    }

    /// Register a new rental and mark its book unavailable
    pub async fn register_rental(&self, mut rental: Rental) -> AppResult<Rental> {
        let _guard = self.write_lock.lock().await;

        rental.status = RentalStatus::Active;
        rental.return_date = None;

        let book = self.books.get_by_id(&rental.book_id).await?;
        if !book.available {
            return Err(AppError::Validation(format!(
                "Book {} is not available",
                book.id
            )));
        }

        let rental = self.rentals.insert(rental).await?;

        if let Err(e) = self
            .books
            .update(&rental.book_id, BookPatch::availability(false))
            .await
        {
            tracing::error!(
                "Could not mark book {} as rented, removing rental {}",
                rental.book_id,
                rental.id
            );
            if let Err(undo) = self.rentals.delete(&rental.id).await {
                tracing::error!("Rollback of rental {} failed: {}", rental.id, undo);
            }
            return Err(e);
        }

        tracing::info!(
            "Rental {} registered: member {} took book {}",
            rental.id,
            rental.member_id,
            rental.book_id
        );
        Ok(rental)
    }

    /// Close an active rental and mark its book available again
    pub async fn return_book(&self, rental_id: &str) -> AppResult<Rental> {
        let _guard = self.write_lock.lock().await;

        let rental = self.rentals.get_by_id(rental_id).await?;
        if !rental.is_active() {
            return Err(AppError::Validation(format!(
                "Rental {} has already been returned",
                rental_id
            )));
        }

        let returned = self
            .rentals
            .update(rental_id, RentalPatch::returned_on(today()))
            .await?;

        match self
            .books
            .update(&returned.book_id, BookPatch::availability(true))
            .await
        {
            Ok(_) => {}
            Err(AppError::NotFound(_)) => {
                tracing::warn!(
                    "Rental {} returned but book {} no longer exists",
                    rental_id,
                    returned.book_id
                );
            }
            Err(e) => {
                tracing::error!(
                    "Could not mark book {} as available, reopening rental {}",
                    returned.book_id,
                    rental_id
                );
                if let Err(undo) = self
                    .rentals
                    .update(rental_id, RentalPatch::reactivate())
                    .await
                {
                    tracing::error!("Rollback of rental {} failed: {}", rental_id, undo);
                }
                return Err(e);
            }
        }

        tracing::info!("Rental {} returned, book {} available", rental_id, returned.book_id);
        Ok(returned)
    }

    /// Delete a rental; deleting an active one frees its book
    pub async fn delete(&self, rental_id: &str) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;

        let rental = match self.rentals.get_by_id(rental_id).await {
            Ok(rental) => rental,
            Err(AppError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        let deleted = self.rentals.delete(rental_id).await?;
        if deleted && rental.is_active() {
            if let Err(e) = self
                .books
                .update(&rental.book_id, BookPatch::availability(true))
                .await
            {
                tracing::warn!(
                    "Deleted active rental {} but could not free book {}: {}",
                    rental_id,
                    rental.book_id,
                    e
                );
            }
        }
        Ok(deleted)
    }
}
