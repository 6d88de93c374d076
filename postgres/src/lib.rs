//! # VillageStay Postgres
//!
//! `PostgreSQL` implementations of the VillageStay storage traits.
//!
//! One [`PostgresStore`] serves as the package catalog, the booking store,
//! and the user-directory mirror; the three concerns share a pool and a
//! schema, which is what lets the booking insert and the village-earnings
//! credit run inside a single transaction.
//!
//! # Example
//!
//! ```ignore
//! use villagestay_postgres::PostgresStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresStore::connect("postgres://localhost/villagestay", 5).await?;
//!     store.run_migrations().await?;
//!     Ok(())
//! }
//! ```

mod bookings;
mod catalog;
mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use villagestay_core::error::StoreError;

/// Shared postgres-backed store implementing `PackageCatalog`,
/// `BookingStore`, and `UserDirectory`.
#[derive(Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    /// Wrap an existing connection pool
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Connect to `url` with a pool of at most `max_connections`.
    ///
    /// # Errors
    ///
    /// Returns [`sqlx::Error`] if the connection cannot be established.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Apply the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`sqlx::migrate::MigrateError`] if a migration fails.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }

    /// The underlying pool, for read-side query implementations that
    /// share this store's database
    #[must_use]
    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }
}

pub(crate) fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}
