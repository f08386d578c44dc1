//! Repository layer: backend-agnostic CRUD over a Postgres or in-memory store

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    postgres::{PgArguments, PgRow},
    FromRow, Pool, Postgres,
};
use std::{fmt::Debug, sync::Arc, time::Duration};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, Employee, Member, Rental, Student},
};

use self::{memory::MemoryStore, postgres::PgStore};

/// Query type handed to [`Entity::bind_columns`]
pub type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// A record type managed by a [`Repository`].
///
/// Besides the data itself, an entity describes its backend table and the
/// fixed set of named views it can be filtered by.
pub trait Entity:
    Clone + Debug + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
    + for<'r> FromRow<'r, PgRow>
{
    /// Partial update; every present field overwrites the stored one
    type Patch: Send + 'static;
    /// Named filtered views (`Infallible` when there are none)
    type View: Copy + Debug + Send + Sync + 'static;

    /// Singular name used in logs and error messages
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Column list, primary key first, in [`Entity::bind_columns`] order
    const COLUMNS: &'static [&'static str];
    /// Idempotent `CREATE TABLE IF NOT EXISTS` statement
    const SCHEMA: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn apply(&mut self, patch: Self::Patch);
    fn matches(&self, view: Self::View) -> bool;
    /// SQL predicate for a named view
    fn view_clause(view: Self::View) -> &'static str;
    /// Bind every column value, in `COLUMNS` order
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
    /// Example records used when running in memory
    fn seed() -> Vec<Self>;

    /// Text value of a foreign-key column, for in-memory `find_by`
    fn field(&self, _column: &str) -> Option<&str> {
        None
    }

    /// Assign a generated id unless the caller supplied a non-empty one
    fn ensure_id(&mut self) {
        if self.id().trim().is_empty() {
            self.set_id(Uuid::new_v4().to_string());
        }
    }
}

/// Which backend a repository is bound to; fixed for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Postgres,
    Memory,
}

/// Storage capability behind a repository.
///
/// Lookups return `Ok(None)`/`Ok(false)` for absent ids; `Err` is reserved
/// for conflicts and backend failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    fn mode(&self) -> StoreMode;

    async fn list(&self) -> AppResult<Vec<T>>;

    async fn list_where(&self, view: T::View) -> AppResult<Vec<T>>;

    async fn find_by(&self, column: &str, value: &str) -> AppResult<Vec<T>>;

    async fn get(&self, id: &str) -> AppResult<Option<T>>;

    /// Fails with `Conflict` when the id already exists
    async fn insert(&self, record: &T) -> AppResult<()>;

    async fn update(&self, id: &str, patch: T::Patch) -> AppResult<Option<T>>;

    async fn delete(&self, id: &str) -> AppResult<bool>;
}

/// Generic dual-mode repository for one entity type
pub struct Repository<T: Entity> {
    store: Arc<dyn Store<T>>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<T: Entity> Repository<T> {
    /// Bind to Postgres when a pool is available and the schema can be
    /// ensured; otherwise fall back to a seeded in-memory store for good.
    pub async fn init(pool: Option<&Pool<Postgres>>, timeout: Duration) -> Self {
        if let Some(pool) = pool {
            match PgStore::open(pool.clone(), timeout).await {
                Ok(store) => {
                    tracing::info!("{} repository: using database table {}", T::NAME, T::TABLE);
                    return Self::with_store(Arc::new(store));
                }
                Err(e) => {
                    tracing::warn!(
                        "{} repository: schema setup failed ({}), using in-memory storage",
                        T::NAME,
                        e
                    );
                }
            }
        } else {
            tracing::warn!("{} repository: no database, using in-memory storage", T::NAME);
        }
        Self::in_memory()
    }

    /// In-memory repository seeded with the example records
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::seeded()))
    }

    pub fn with_store(store: Arc<dyn Store<T>>) -> Self {
        Self { store }
    }

    pub fn mode(&self) -> StoreMode {
        self.store.mode()
    }

    /// All records: insertion order in memory, backend order otherwise
    pub async fn list(&self) -> AppResult<Vec<T>> {
        self.store
            .list()
            .await
            .map_err(|e| self.log_failure("list", "*", e))
    }

    /// Records in a named view
    pub async fn list_where(&self, view: T::View) -> AppResult<Vec<T>> {
        self.store
            .list_where(view)
            .await
            .map_err(|e| self.log_failure("list_where", "*", e))
    }

    /// Records whose foreign-key `column` equals `value`
    pub async fn find_by(&self, column: &str, value: &str) -> AppResult<Vec<T>> {
        self.store
            .find_by(column, value)
            .await
            .map_err(|e| self.log_failure("find_by", value, e))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<T> {
        self.store
            .get(id)
            .await
            .map_err(|e| self.log_failure("get", id, e))?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::NAME, id)))
    }

    /// Insert a record; duplicate ids leave the store unchanged
    pub async fn insert(&self, mut record: T) -> AppResult<T> {
        record.ensure_id();
        self.store
            .insert(&record)
            .await
            .map_err(|e| self.log_failure("insert", record.id(), e))?;
        tracing::debug!("{} {} inserted", T::NAME, record.id());
        Ok(record)
    }

    /// Apply a partial update; the id itself never changes
    pub async fn update(&self, id: &str, patch: T::Patch) -> AppResult<T> {
        self.store
            .update(id, patch)
            .await
            .map_err(|e| self.log_failure("update", id, e))?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::NAME, id)))
    }

    /// Returns false when the id does not exist
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| self.log_failure("delete", id, e))?;
        if deleted {
            tracing::debug!("{} {} deleted", T::NAME, id);
        }
        Ok(deleted)
    }

    fn log_failure(&self, operation: &str, id: &str, error: AppError) -> AppError {
        tracing::warn!(
            entity = T::NAME,
            operation,
            id,
            kind = error.kind(),
            "repository operation failed: {}",
            error
        );
        error
    }
}

/// All repositories of the application
#[derive(Clone)]
pub struct Repositories {
    pub students: Repository<Student>,
    pub members: Repository<Member>,
    pub books: Repository<Book>,
    pub rentals: Repository<Rental>,
    pub employees: Repository<Employee>,
}

impl Repositories {
    /// Initialize every repository against the same (optional) pool
    pub async fn init(pool: Option<&Pool<Postgres>>, timeout: Duration) -> Self {
        Self {
            students: Repository::init(pool, timeout).await,
            members: Repository::init(pool, timeout).await,
            books: Repository::init(pool, timeout).await,
            rentals: Repository::init(pool, timeout).await,
            employees: Repository::init(pool, timeout).await,
        }
    }

    /// Fresh seeded in-memory repositories
    pub fn in_memory() -> Self {
        Self {
            students: Repository::in_memory(),
            members: Repository::in_memory(),
            books: Repository::in_memory(),
            rentals: Repository::in_memory(),
            employees: Repository::in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Student, StudentPatch};

    fn backend_down() -> AppError {
        AppError::BackendUnavailable("connection reset".to_string())
    }

    #[tokio::test]
    async fn test_insert_assigns_id_when_missing() {
        let repo: Repository<Student> = Repository::in_memory();
        let created = repo.insert(Student::new("", "Ada", "King", 36)).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(repo.get_by_id(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_caller_supplied_id_wins() {
        let repo: Repository<Student> = Repository::in_memory();
        let created = repo.insert(Student::new("s100", "Ada", "King", 36)).await.unwrap();
        assert_eq!(created.id, "s100");
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let repo: Repository<Student> = Repository::in_memory();
        let err = repo.get_by_id("nope").await.unwrap_err();
        assert!(err.is_not_found());

        let err = repo.update("nope", StudentPatch::default()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported_not_raised() {
        let mut store = MockStore::<Student>::new();
        store.expect_get().returning(|_| Err(backend_down()));
        store.expect_delete().returning(|_| Err(backend_down()));
        store.expect_insert().returning(|_| Err(backend_down()));

        let repo = Repository::with_store(Arc::new(store));

        let err = repo.get_by_id("s001").await.unwrap_err();
        assert_eq!(err.kind(), "backend");
        assert!(repo.delete("s001").await.is_err());
        assert!(repo.insert(Student::new("s9", "A", "B", 1)).await.is_err());
    }

    #[tokio::test]
    async fn test_mode_comes_from_store() {
        let mut store = MockStore::<Student>::new();
        store.expect_mode().return_const(StoreMode::Postgres);
        let repo = Repository::with_store(Arc::new(store));
        assert_eq!(repo.mode(), StoreMode::Postgres);

        let repo: Repository<Student> = Repository::in_memory();
        assert_eq!(repo.mode(), StoreMode::Memory);
    }

    #[tokio::test]
    async fn test_init_without_pool_falls_back_to_seeded_memory() {
        let repos = Repositories::init(None, Duration::from_secs(1)).await;

        assert_eq!(repos.books.mode(), StoreMode::Memory);
        let fresh = Repositories::in_memory();
        assert_eq!(
            repos.books.list().await.unwrap(),
            fresh.books.list().await.unwrap()
        );
        assert_eq!(repos.students.list().await.unwrap().len(), 3);
        assert_eq!(repos.rentals.list().await.unwrap().len(), 4);
    }
}
