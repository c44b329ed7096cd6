//! Implementation of the `hierarchy-repair init` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

use crate::adapters::sqlite::{create_pool, inspect_database, Migrator, all_embedded_migrations};
use crate::cli::commands::pool_config;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Delete an existing database and create an empty one
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub database_path: String,
    pub migrations_applied: usize,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.migrations_applied > 0 {
            lines.push(format!("Applied {} migration(s) to {}", self.migrations_applied, self.database_path));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let database_path = config.database.path.clone();
    let status = inspect_database(&database_path).await;

    if status.table_exists && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Database already initialized. Use --force to recreate it.".to_string(),
            database_path,
            migrations_applied: 0,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if args.force && status.db_exists {
        remove_database_files(&database_path).await?;
    }

    let pool = create_pool(&config.database.url(), Some(pool_config(config)))
        .await
        .context("Failed to create database")?;
    let migrations_applied = Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to apply schema")?;
    pool.close().await;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Database recreated successfully.".to_string()
        } else {
            "Database initialized successfully.".to_string()
        },
        database_path,
        migrations_applied,
    };

    output(&output_data, json_mode);
    Ok(())
}

/// Remove the database and its WAL side files
async fn remove_database_files(database_path: &str) -> Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let path = format!("{database_path}{suffix}");
        if Path::new(&path).exists() {
            fs::remove_file(&path)
                .await
                .with_context(|| format!("Failed to remove {path}"))?;
        }
    }
    Ok(())
}
