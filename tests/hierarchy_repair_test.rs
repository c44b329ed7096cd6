//! End-to-end tests for the four repair passes over a seeded store.

mod common;

use common::{employee, repairer, sample_organization, seeded_database, seeded_repository, temp_db_path};
use hierarchy_repair::adapters::sqlite::{create_pool, open_store, SqliteEmployeeRepository};
use hierarchy_repair::{
    DomainError, Employee, EmployeeFilter, EmployeeId, EmployeeRepository, HierarchyAuditor,
};
use std::sync::Arc;

async fn fetch(repo: &SqliteEmployeeRepository, id: EmployeeId) -> Employee {
    repo.get(id).await.unwrap().expect("employee should exist")
}

#[tokio::test]
async fn test_full_repair_builds_consistent_hierarchy() {
    common::setup_test_logging();
    let (_pool, repo) = seeded_repository(&sample_organization()).await;

    let report = repairer(&repo).run().await.unwrap();

    assert_eq!(report.validation.examined, 0);
    assert_eq!(report.tenure.examined, 18);
    assert_eq!(report.tenure.updated, 18);

    assert_eq!(report.managers.examined, 18);
    assert_eq!(report.managers.assigned, 17);
    assert_eq!(report.managers.skipped_policy, 1);
    assert_eq!(report.managers.unresolved, 0);

    // Apex has no level-7 leader; both level 4 records are excluded
    assert_eq!(report.supervisors.assigned, 15);
    assert_eq!(report.supervisors.skipped_policy, 2);
    assert_eq!(report.supervisors.unresolved, 1);

    let audit = HierarchyAuditor::new(Arc::clone(&repo)).audit().await.unwrap();
    assert!(audit.is_consistent(), "violations: {:?}", audit.violations);
    assert_eq!(audit.without_manager, 0);
    // Only the apex, for which no level-7 leader can exist
    assert_eq!(audit.without_supervisor, 1);
}

#[tokio::test]
async fn test_repair_is_idempotent() {
    let (_pool, repo) = seeded_repository(&sample_organization()).await;

    repairer(&repo).run().await.unwrap();
    let after_first = repo.list(&EmployeeFilter::new()).await.unwrap();

    let second = repairer(&repo).run().await.unwrap();
    let after_second = repo.list(&EmployeeFilter::new()).await.unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(second.validation.cleared(), 0);
    assert_eq!(second.managers.assigned, 0);
    assert_eq!(second.supervisors.assigned, 0);
    // Only the records policy keeps empty are left to examine
    assert_eq!(second.managers.examined, 1);
    assert_eq!(second.supervisors.examined, 3);
}

#[tokio::test]
async fn test_least_loaded_leader_is_chosen() {
    let mut employees = vec![
        employee(1, "Ops", 1, "NA", "Austin"),
        employee(10, "Ops", 2, "NA", "Austin"),
        employee(11, "Ops", 2, "NA", "Austin"),
    ];
    for id in 2..=4 {
        employees.push(employee(id, "Ops", 1, "NA", "Austin").with_manager(10));
    }
    employees.push(employee(5, "Ops", 1, "NA", "Austin").with_manager(11));

    let (_pool, repo) = seeded_repository(&employees).await;
    let report = repairer(&repo).fill_managers().await.unwrap();

    assert_eq!(report.assigned, 1);
    assert_eq!(fetch(&repo, 1).await.manager_id, Some(11));
}

#[tokio::test]
async fn test_ties_go_to_lowest_id() {
    let (_pool, repo) = seeded_repository(&[
        employee(1, "Ops", 1, "NA", "Austin"),
        employee(12, "Ops", 2, "NA", "Austin"),
        employee(10, "Ops", 2, "NA", "Austin"),
    ])
    .await;

    repairer(&repo).fill_managers().await.unwrap();
    assert_eq!(fetch(&repo, 1).await.manager_id, Some(10));
}

#[tokio::test]
async fn test_falls_back_to_department_and_level() {
    let (_pool, repo) = seeded_repository(&[
        employee(40, "Sales", 1, "APAC", "Tokyo"),
        employee(41, "Sales", 2, "EMEA", "London"),
        employee(42, "Marketing", 2, "APAC", "Tokyo"),
    ])
    .await;

    repairer(&repo).fill_managers().await.unwrap();
    assert_eq!(fetch(&repo, 40).await.manager_id, Some(41));
}

#[tokio::test]
async fn test_tiers_are_not_merged() {
    // 50 is busy but shares the location; 51 is idle in another city
    let mut employees = vec![
        employee(50, "Sales", 2, "NA", "NY"),
        employee(51, "Sales", 2, "NA", "SF"),
        employee(60, "Sales", 1, "NA", "NY"),
    ];
    for id in 61..=65 {
        employees.push(employee(id, "Sales", 1, "NA", "NY").with_manager(50));
    }

    let (_pool, repo) = seeded_repository(&employees).await;
    repairer(&repo).fill_managers().await.unwrap();

    assert_eq!(fetch(&repo, 60).await.manager_id, Some(50));
}

#[tokio::test]
async fn test_policy_excluded_links_are_cleared_and_not_refilled() {
    let (_pool, repo) = seeded_repository(&[
        employee(1, "Sales", 5, "NA", "NY").with_manager(2),
        employee(2, "Sales", 4, "NA", "NY").with_supervisor(1),
    ])
    .await;

    let report = repairer(&repo).run().await.unwrap();

    assert_eq!(report.validation.cleared_manager, 1);
    assert_eq!(report.validation.cleared_supervisor, 1);

    let apex = fetch(&repo, 1).await;
    let director = fetch(&repo, 2).await;
    assert_eq!(apex.manager_id, None);
    assert_eq!(director.manager_id, Some(1));
    assert_eq!(director.supervisor_id, None);
}

#[tokio::test]
async fn test_tenure_pass_normalizes_dates() {
    let (_pool, repo) = seeded_repository(&[
        employee(1, "Ops", 1, "NA", "Austin"),
        employee(2, "Ops", 1, "NA", "Austin").with_joining_date("03/15/2021"),
        employee(3, "Ops", 1, "NA", "Austin").with_joining_date("someday"),
        employee(4, "Ops", 1, "NA", "Austin").with_exit_date("N/A"),
    ])
    .await;

    let report = repairer(&repo).update_tenure().await.unwrap();
    assert_eq!(report.updated, 3);
    assert_eq!(report.undefined_tenure, 1);

    assert_eq!(fetch(&repo, 1).await.tenure_years, Some(4.0));

    let reformatted = fetch(&repo, 2).await;
    assert_eq!(reformatted.joining_date, "2021-03-15");
    assert_eq!(reformatted.tenure_years, Some(2.8));

    let malformed = fetch(&repo, 3).await;
    assert_eq!(malformed.joining_date, "someday");
    assert_eq!(malformed.tenure_years, None);

    let null_exit = fetch(&repo, 4).await;
    assert_eq!(null_exit.exit_date, None);
    assert_eq!(null_exit.tenure_years, Some(4.0));
}

#[tokio::test]
async fn test_drifted_record_loses_stale_links() {
    let (pool, repo) = seeded_repository(&sample_organization()).await;
    repairer(&repo).run().await.unwrap();

    let before = fetch(&repo, 31).await;
    assert_eq!(before.manager_id, Some(22));
    assert_eq!(before.supervisor_id, Some(10));

    sqlx::query("UPDATE employees SET department = 'Marketing' WHERE employee_id = 31")
        .execute(&pool)
        .await
        .unwrap();

    let report = repairer(&repo).run().await.unwrap();
    assert_eq!(report.validation.cleared_manager, 1);
    assert_eq!(report.validation.cleared_supervisor, 1);
    assert_eq!(report.managers.unresolved, 1);

    let after = fetch(&repo, 31).await;
    assert_eq!(after.manager_id, None);
    assert_eq!(after.supervisor_id, None);

    let audit = HierarchyAuditor::new(Arc::clone(&repo)).audit().await.unwrap();
    assert!(audit.is_consistent());
    assert_eq!(audit.without_manager, 1);
}

#[tokio::test]
async fn test_repair_persists_to_file_database() {
    let (_dir, path) = seeded_database(&sample_organization()).await;
    let path = path.display().to_string();

    let pool = open_store(&path, None).await.unwrap();
    let repo = Arc::new(SqliteEmployeeRepository::new(pool.clone()));
    repairer(&repo).run().await.unwrap();
    pool.close().await;

    let reopened = SqliteEmployeeRepository::new(open_store(&path, None).await.unwrap());
    let missing = reopened
        .list(&EmployeeFilter::new().job_level(1).missing_link(hierarchy_repair::LinkField::Manager))
        .await
        .unwrap();
    assert!(missing.is_empty());
    assert_eq!(fetch(&reopened, 30).await.manager_id, Some(20));
}

#[tokio::test]
async fn test_missing_database_is_store_unavailable() {
    let (_dir, path) = temp_db_path();

    let result = open_store(&path.display().to_string(), None).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_database_without_table_is_store_unavailable() {
    let (_dir, path) = temp_db_path();
    let pool = create_pool(&format!("sqlite:{}", path.display()), None).await.unwrap();
    pool.close().await;

    let result = open_store(&path.display().to_string(), None).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
}
