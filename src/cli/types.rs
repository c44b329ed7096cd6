//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::{audit::AuditArgs, init::InitArgs, repair::RepairArgs, spans::SpansArgs};

#[derive(Parser, Debug)]
#[command(name = "hierarchy-repair")]
#[command(about = "Repair manager and supervisor links in an employee hierarchy", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of .hierarchy/
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Database path, overriding the configured one
    #[arg(short, long, global = true, value_name = "PATH")]
    pub database: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database file and apply the schema
    Init(InitArgs),

    /// Validate links, recompute tenure and fill missing links
    Repair(RepairArgs),

    /// Check hierarchy invariants without modifying anything
    Audit(AuditArgs),

    /// Show database status
    Status,

    /// Show team sizes per manager or supervisor
    Spans(SpansArgs),
}
