//! hierarchy-repair - Organizational Hierarchy Repair Engine
//!
//! Validates and repairs the manager and supervisor links of a flat
//! employee table, recomputes tenure from raw dates, and fills missing links
//! using a specificity-fallback candidate search with least-loaded selection.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, reports and the repository port
//! - **Service Layer** (`services`): Candidate search, load balancing, validation, tenure and the repair passes
//! - **Adapters** (`adapters`): SQLite implementation of the repository port
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hierarchy_repair::adapters::sqlite::{open_store, SqliteEmployeeRepository};
//! use hierarchy_repair::HierarchyRepairer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = open_store("data/sql/custom_db.db", None).await?;
//!     let repairer = HierarchyRepairer::new(Arc::new(SqliteEmployeeRepository::new(pool)));
//!     let report = repairer.run().await?;
//!     println!("{} managers assigned", report.managers.assigned);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AuditReport, Config, DatabaseConfig, Employee, EmployeeId, FillReport, LinkField,
    LoggingConfig, RepairConfig, RepairReport, TeamSize, TenureReport, ValidationReport,
};
pub use domain::ports::{EmployeeFilter, EmployeeRepository, EmployeeTransaction, EmployeeUpdate};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    CandidateFinder, HierarchyAuditor, HierarchyRepairer, LinkValidator, LoadBalancer,
    TenureCalculator,
};
