//! SQLite database adapters for the hierarchy repair engine.

pub mod connection;
pub mod employee_repository;
pub mod migrations;

pub use connection::{
    create_pool, create_test_pool, inspect_database, open_existing_pool,
    ConnectionError, DatabaseStatus, PoolConfig,
};
pub use employee_repository::{SqliteEmployeeRepository, SqliteEmployeeTransaction};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};

use sqlx::SqlitePool;

use crate::domain::errors::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Create (or open) the database at `database_url` and apply the schema.
pub async fn initialize_database(database_url: &str) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, None).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Open the existing record store for a repair run.
///
/// A missing file or `employees` table is `StoreUnavailable`.
pub async fn open_store(database_path: &str, config: Option<PoolConfig>) -> Result<SqlitePool, DomainError> {
    open_existing_pool(database_path, config).await.map_err(|e| match e {
        ConnectionError::DatabaseNotFound(_) | ConnectionError::MissingTable(_) => {
            DomainError::StoreUnavailable(e.to_string())
        }
        other => DomainError::DatabaseError(other.to_string()),
    })
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}
