//! Command handlers. Each takes its parsed arguments, the loaded config and
//! the output mode.

pub mod audit;
pub mod init;
pub mod repair;
pub mod spans;
pub mod status;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{open_store, PoolConfig, SqliteEmployeeRepository};
use crate::domain::models::Config;

pub(crate) fn pool_config(config: &Config) -> PoolConfig {
    PoolConfig {
        max_connections: config.database.max_connections,
        ..PoolConfig::default()
    }
}

/// Open the configured store; a missing database or table is an error.
pub(crate) async fn open_repository(config: &Config) -> Result<Arc<SqliteEmployeeRepository>> {
    let pool = open_store(&config.database.path, Some(pool_config(config)))
        .await
        .with_context(|| format!("Cannot open record store at {}", config.database.path))?;
    Ok(Arc::new(SqliteEmployeeRepository::new(pool)))
}
