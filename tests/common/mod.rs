//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tempfile::TempDir;

use hierarchy_repair::adapters::sqlite::{
    create_migrated_test_pool, initialize_database, SqliteEmployeeRepository,
};
use hierarchy_repair::{Employee, EmployeeId, EmployeeRepository, HierarchyRepairer};

/// Create a temporary test database path
///
/// Returns the path to a SQLite database file in a temporary directory.
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Frozen "today" used by repair tests
pub fn as_of() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 1)
}

/// Build an employee with the attributes candidate lookup matches on
pub fn employee(id: EmployeeId, department: &str, level: i64, region: &str, location: &str) -> Employee {
    Employee::new(id, format!("First{id}"), format!("Last{id}"))
        .with_department(department)
        .with_level(level)
        .with_region(region)
        .with_location(location)
        .with_joining_date("2020-01-01")
}

/// In-memory repository seeded with `employees`
///
/// The pool is returned too, for tests that edit rows behind the repository.
pub async fn seeded_repository(employees: &[Employee]) -> (SqlitePool, Arc<SqliteEmployeeRepository>) {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    let repo = Arc::new(SqliteEmployeeRepository::new(pool.clone()));
    for employee in employees {
        repo.insert(employee).await.expect("Failed to insert employee");
    }
    (pool, repo)
}

/// File-backed database with the schema applied and `employees` loaded
pub async fn seeded_database(employees: &[Employee]) -> (TempDir, PathBuf) {
    let (dir, path) = temp_db_path();
    let pool = initialize_database(&format!("sqlite:{}", path.display()))
        .await
        .expect("Failed to initialize database");
    let repo = SqliteEmployeeRepository::new(pool.clone());
    for employee in employees {
        repo.insert(employee).await.expect("Failed to insert employee");
    }
    pool.close().await;
    (dir, path)
}

/// Repairer with the frozen date
pub fn repairer(repo: &Arc<SqliteEmployeeRepository>) -> HierarchyRepairer<SqliteEmployeeRepository> {
    HierarchyRepairer::new(Arc::clone(repo)).with_as_of(as_of())
}

/// A small organization spread over two regions
///
/// Sales: apex 1 (L5); L4 leads 2 (NA) and 3 (EMEA); L3 leads 10 (NA, NY),
/// 11 (NA, SF), 12 (EMEA, London); L2 staff 20..=25; L1 staff 30..=35.
pub fn sample_organization() -> Vec<Employee> {
    let mut employees = vec![
        employee(1, "Sales", 5, "NA", "NY"),
        employee(2, "Sales", 4, "NA", "NY"),
        employee(3, "Sales", 4, "EMEA", "London"),
        employee(10, "Sales", 3, "NA", "NY"),
        employee(11, "Sales", 3, "NA", "SF"),
        employee(12, "Sales", 3, "EMEA", "London"),
    ];
    for id in 20..=25 {
        let (region, location) = if id % 2 == 0 { ("NA", "NY") } else { ("EMEA", "London") };
        employees.push(employee(id, "Sales", 2, region, location));
    }
    for id in 30..=35 {
        let (region, location) = if id % 3 == 0 { ("NA", "SF") } else { ("NA", "NY") };
        employees.push(employee(id, "Sales", 1, region, location).with_joining_date("03/15/2021"));
    }
    employees
}
