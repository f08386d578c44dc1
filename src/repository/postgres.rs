//! Postgres-backed store

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::{future::Future, marker::PhantomData, time::Duration};

use super::{Entity, Store, StoreMode};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

/// Try to open a connection pool; `None` means the caller should run in memory.
pub async fn connect(config: &DatabaseConfig) -> Option<Pool<Postgres>> {
    if !config.enabled {
        tracing::info!("Database disabled by configuration");
        return None;
    }

    let url = config.url();
    let result = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout())
        .connect(&url);

    match tokio::time::timeout(config.connect_timeout(), result).await {
        Ok(Ok(pool)) => {
            tracing::info!("Connected to database {} on {}", config.name, config.host);
            Some(pool)
        }
        Ok(Err(e)) => {
            tracing::warn!("Could not connect to database: {}", e);
            None
        }
        Err(_) => {
            tracing::warn!(
                "Database connection timed out after {:?}",
                config.connect_timeout()
            );
            None
        }
    }
}

/// Table-backed store for one entity type
pub struct PgStore<T: Entity> {
    pool: Pool<Postgres>,
    timeout: Duration,
    select: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> PgStore<T> {
    /// Bind to `T::TABLE`, creating it if absent
    pub async fn open(pool: Pool<Postgres>, timeout: Duration) -> AppResult<Self> {
        let store = Self {
            select: format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::TABLE),
            pool,
            timeout,
            _entity: PhantomData,
        };

        store
            .bounded(sqlx::query(T::SCHEMA).execute(&store.pool))
            .await?;

        Ok(store)
    }

    /// Run a backend call under the configured timeout
    async fn bounded<F, R, E>(&self, call: F) -> AppResult<R>
    where
        F: Future<Output = Result<R, E>>,
        E: Into<AppError>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(AppError::BackendUnavailable(format!(
                "{} query timed out after {:?}",
                T::TABLE,
                self.timeout
            ))),
        }
    }

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    /// `UPDATE` of every non-key column; `$1` is the id
    fn update_sql() -> String {
        let sets: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        format!("UPDATE {} SET {} WHERE id = $1", T::TABLE, sets.join(", "))
    }
}

#[async_trait]
impl<T: Entity> Store<T> for PgStore<T> {
    fn mode(&self) -> StoreMode {
        StoreMode::Postgres
    }

    async fn list(&self) -> AppResult<Vec<T>> {
        self.bounded(sqlx::query_as::<_, T>(&self.select).fetch_all(&self.pool))
            .await
    }

    async fn list_where(&self, view: T::View) -> AppResult<Vec<T>> {
        let query = format!("{} WHERE {}", self.select, T::view_clause(view));
        self.bounded(sqlx::query_as::<_, T>(&query).fetch_all(&self.pool))
            .await
    }

    async fn find_by(&self, column: &str, value: &str) -> AppResult<Vec<T>> {
        if !T::COLUMNS.iter().any(|known| *known == column) {
            return Err(AppError::Internal(format!(
                "Unknown column {} for {}",
                column,
                T::TABLE
            )));
        }

        let query = format!("{} WHERE {} = $1", self.select, column);
        self.bounded(
            sqlx::query_as::<_, T>(&query)
                .bind(value)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn get(&self, id: &str) -> AppResult<Option<T>> {
        let query = format!("{} WHERE id = $1", self.select);
        self.bounded(
            sqlx::query_as::<_, T>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert(&self, record: &T) -> AppResult<()> {
        let query = Self::insert_sql();
        let result = self
            .bounded(record.bind_columns(sqlx::query(&query)).execute(&self.pool))
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(AppError::Database(sqlx::Error::Database(e))) if e.is_unique_violation() => {
                Err(AppError::Conflict(format!(
                    "{} {} already exists",
                    T::NAME,
                    record.id()
                )))
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, id: &str, patch: T::Patch) -> AppResult<Option<T>> {
        let select = format!("{} WHERE id = $1 FOR UPDATE", self.select);
        let update = Self::update_sql();

        // Read-modify-write under a row lock keeps concurrent updates of the
        // same id linearizable.
        let call = async move {
            let mut tx = self.pool.begin().await?;

            let current = sqlx::query_as::<_, T>(&select)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

            let Some(mut record) = current else {
                tx.rollback().await?;
                return Ok::<_, AppError>(None);
            };

            record.apply(patch);
            record
                .bind_columns(sqlx::query(&update))
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            Ok::<_, AppError>(Some(record))
        };

        self.bounded(call).await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let query = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = self
            .bounded(sqlx::query(&query).bind(id).execute(&self.pool))
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
