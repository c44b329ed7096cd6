//! SQLite database connection pool management.

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Table every repair pass reads and writes.
pub const EMPLOYEES_TABLE: &str = "employees";

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to create pool: {0}")]
    PoolCreationFailed(#[source] sqlx::Error),
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
    #[error("Failed to create directory: {0}")]
    DirectoryCreationFailed(#[source] std::io::Error),
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),
    #[error("Database not found at {0}. Run `hierarchy-repair init` and load the employee data first.")]
    DatabaseNotFound(String),
    #[error("Table '{0}' is missing from the database")]
    MissingTable(String),
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
        }
    }
}

/// Create a pool, creating the database file (and its directory) if needed.
pub async fn create_pool(database_url: &str, config: Option<PoolConfig>) -> Result<SqlitePool, ConnectionError> {
    ensure_database_directory(database_url)?;

    let connect_options = SqliteConnectOptions::from_str(database_url)
        .map_err(|_| ConnectionError::InvalidDatabaseUrl(database_url.to_string()))?
        .create_if_missing(true);

    connect(connect_options, config.unwrap_or_default()).await
}

/// Open a pool over an existing database holding the `employees` table.
///
/// Never creates anything: a missing file or table is reported so the caller
/// can abort before any pass runs.
pub async fn open_existing_pool(database_path: &str, config: Option<PoolConfig>) -> Result<SqlitePool, ConnectionError> {
    if database_path == ":memory:" || !Path::new(database_path).exists() {
        return Err(ConnectionError::DatabaseNotFound(database_path.to_string()));
    }

    let connect_options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(false);

    let pool = connect(connect_options, config.unwrap_or_default()).await?;
    if !table_exists(&pool, EMPLOYEES_TABLE).await? {
        pool.close().await;
        return Err(ConnectionError::MissingTable(EMPLOYEES_TABLE.to_string()));
    }
    Ok(pool)
}

async fn connect(options: SqliteConnectOptions, config: PoolConfig) -> Result<SqlitePool, ConnectionError> {
    let options = options
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(ConnectionError::PoolCreationFailed)
}

/// Single-connection in-memory pool. The connection is never reaped, so the
/// database lives as long as the pool.
pub async fn create_test_pool() -> Result<SqlitePool, ConnectionError> {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|_| ConnectionError::InvalidDatabaseUrl("sqlite::memory:".to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .shared_cache(true);

    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options)
        .await
        .map_err(ConnectionError::PoolCreationFailed)
}

fn ensure_database_directory(database_url: &str) -> Result<(), ConnectionError> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);

    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(ConnectionError::DirectoryCreationFailed)?;
        }
    }
    Ok(())
}

pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, ConnectionError> {
    let found: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(pool)
            .await
            .map_err(ConnectionError::ConnectionFailed)?;
    Ok(found.is_some())
}

/// Snapshot of the database as seen before a run.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStatus {
    pub path: String,
    pub db_exists: bool,
    pub table_exists: bool,
    pub row_count: Option<u64>,
    pub message: String,
}

impl DatabaseStatus {
    /// Whether there is anything to repair.
    pub fn is_ready(&self) -> bool {
        self.db_exists && self.table_exists && self.row_count.unwrap_or(0) > 0
    }
}

/// Inspect the database at `database_path` without modifying it.
///
/// Connection problems are folded into the status message rather than
/// returned, so a status check always produces a report.
pub async fn inspect_database(database_path: &str) -> DatabaseStatus {
    let mut status = DatabaseStatus {
        path: database_path.to_string(),
        db_exists: Path::new(database_path).exists(),
        table_exists: false,
        row_count: None,
        message: String::new(),
    };

    if !status.db_exists {
        status.message = format!("Database not found at {database_path}");
        return status;
    }

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(false);
    let pool = match SqlitePoolOptions::new().max_connections(1).connect_with(options).await {
        Ok(pool) => pool,
        Err(e) => {
            status.message = format!("Error opening database: {e}");
            return status;
        }
    };

    match table_exists(&pool, EMPLOYEES_TABLE).await {
        Ok(true) => {
            status.table_exists = true;
            let count: Result<(i64,), _> = sqlx::query_as("SELECT COUNT(*) FROM employees")
                .fetch_one(&pool)
                .await;
            match count {
                Ok((rows,)) => {
                    status.row_count = Some(u64::try_from(rows).unwrap_or(0));
                    status.message = format!("DB: {database_path} | employees rows: {rows}");
                }
                Err(e) => status.message = format!("Error counting employees: {e}"),
            }
        }
        Ok(false) => status.message = format!("DB: {database_path} | employees table: MISSING"),
        Err(e) => status.message = format!("Error opening database: {e}"),
    }

    pool.close().await;
    status
}
