//! Clears hierarchy links that no longer satisfy the level-offset rule.

use tracing::{debug, info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Employee, LinkField, ValidationReport};
use crate::domain::ports::{EmployeeFilter, EmployeeTransaction, EmployeeUpdate, FieldAssignment};
use crate::services::candidate_finder::{CandidateFinder, CandidateQuery};

/// Why a stored link was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidLink {
    /// Level policy forbids the link outright
    PolicyExcluded,
    /// The record has no job level to check against
    Unleveled,
    /// The leader is not a candidate for the record's current attributes
    NotACandidate,
}

/// Re-derives each stored link from the record's current attributes.
#[derive(Debug, Clone, Default)]
pub struct LinkValidator {
    finder: CandidateFinder,
}

impl LinkValidator {
    pub fn new(finder: CandidateFinder) -> Self {
        Self { finder }
    }

    /// Check one link. `Ok(None)` when the link is absent or valid.
    pub async fn check(
        &self,
        store: &mut dyn EmployeeTransaction,
        employee: &Employee,
        field: LinkField,
    ) -> DomainResult<Option<InvalidLink>> {
        let Some(leader) = employee.link(field) else {
            return Ok(None);
        };

        if employee.is_excluded(field) {
            return Ok(Some(InvalidLink::PolicyExcluded));
        }

        let Some(query) = CandidateQuery::for_leader(employee, field) else {
            return Ok(Some(InvalidLink::Unleveled));
        };

        let candidates = self.finder.find(store, &query).await?;
        if candidates.contains(leader) {
            Ok(None)
        } else {
            Ok(Some(InvalidLink::NotACandidate))
        }
    }

    /// Validate every record holding a link, in ascending id order.
    #[instrument(name = "validate_pass", skip_all)]
    pub async fn validate_all(
        &self,
        store: &mut dyn EmployeeTransaction,
        progress_interval: u64,
    ) -> DomainResult<ValidationReport> {
        let employees = store.select(&EmployeeFilter::new().with_any_link()).await?;
        info!(employees = employees.len(), "validating manager and supervisor links");

        let mut report = ValidationReport::default();

        for employee in &employees {
            report.examined += 1;

            let mut update = EmployeeUpdate::new(employee.employee_id);
            for field in LinkField::ALL {
                if let Some(reason) = self.check(store, employee, field).await? {
                    debug!(
                        employee_id = employee.employee_id,
                        %field,
                        leader = employee.link(field),
                        ?reason,
                        "clearing invalid link"
                    );
                    update = update.set(FieldAssignment::Link(field, None));
                    report.record_cleared(field);
                }
            }

            if !update.assignments.is_empty() {
                store.update_many(&[update]).await?;
            }

            if progress_interval > 0 && report.examined % progress_interval == 0 {
                debug!(processed = report.examined, total = employees.len(), "validation progress");
            }
        }

        info!(
            cleared_manager = report.cleared_manager,
            cleared_supervisor = report.cleared_supervisor,
            "validation pass complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteEmployeeRepository};
    use crate::domain::models::EmployeeId;
    use crate::domain::ports::EmployeeRepository;

    fn sales(id: EmployeeId, level: i64) -> Employee {
        Employee::new(id, "Sales", format!("Person{id}"))
            .with_department("Sales")
            .with_level(level)
            .with_region("EMEA")
            .with_location("Berlin")
            .with_joining_date("2020-01-01")
    }

    async fn setup(employees: &[Employee]) -> SqliteEmployeeRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteEmployeeRepository::new(pool);
        for employee in employees {
            repo.insert(employee).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_valid_links_are_kept() {
        let repo = setup(&[
            sales(1, 2).with_manager(10).with_supervisor(20),
            sales(10, 3),
            sales(20, 4),
        ])
        .await;

        let mut tx = repo.begin().await.unwrap();
        let report = LinkValidator::default().validate_all(tx.as_mut(), 1000).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(report.examined, 1);
        assert_eq!(report.cleared(), 0);
        let kept = repo.get(1).await.unwrap().unwrap();
        assert_eq!((kept.manager_id, kept.supervisor_id), (Some(10), Some(20)));
    }

    #[tokio::test]
    async fn test_wrong_level_and_dangling_links_are_cleared() {
        let repo = setup(&[
            sales(1, 2).with_manager(20).with_supervisor(99),
            sales(10, 3),
            sales(20, 4),
        ])
        .await;

        let mut tx = repo.begin().await.unwrap();
        let report = LinkValidator::default().validate_all(tx.as_mut(), 1000).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(report.cleared_manager, 1);
        assert_eq!(report.cleared_supervisor, 1);
        let cleared = repo.get(1).await.unwrap().unwrap();
        assert_eq!((cleared.manager_id, cleared.supervisor_id), (None, None));
    }

    #[tokio::test]
    async fn test_policy_and_unleveled_links_are_cleared() {
        let mut unleveled = sales(3, 2).with_manager(10);
        unleveled.job_level = None;
        let repo = setup(&[
            sales(1, 5).with_manager(10),
            sales(2, 4).with_supervisor(10),
            unleveled,
            sales(10, 3),
        ])
        .await;
        let validator = LinkValidator::default();

        let mut tx = repo.begin().await.unwrap();
        let apex = fetch(tx.as_mut(), 1).await;
        assert_eq!(
            validator.check(tx.as_mut(), &apex, LinkField::Manager).await.unwrap(),
            Some(InvalidLink::PolicyExcluded)
        );
        let report = validator.validate_all(tx.as_mut(), 1).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(report.examined, 3);
        assert_eq!(report.cleared_manager, 2);
        assert_eq!(report.cleared_supervisor, 1);
        assert_eq!(repo.get(3).await.unwrap().unwrap().manager_id, None);
    }

    #[tokio::test]
    async fn test_drifted_attributes_invalidate_link() {
        // Leader sits in another region but still in the only matching tier
        let repo = setup(&[
            sales(1, 2).with_manager(10),
            sales(10, 3).with_region("APAC"),
        ])
        .await;
        let validator = LinkValidator::default();

        let mut tx = repo.begin().await.unwrap();
        let employee = fetch(tx.as_mut(), 1).await;
        assert_eq!(validator.check(tx.as_mut(), &employee, LinkField::Manager).await.unwrap(), None);

        // A closer leader appears, so the broader tier no longer applies
        drop(tx);
        repo.insert(&sales(11, 3)).await.unwrap();

        let mut tx = repo.begin().await.unwrap();
        let employee = fetch(tx.as_mut(), 1).await;
        assert_eq!(
            validator.check(tx.as_mut(), &employee, LinkField::Manager).await.unwrap(),
            Some(InvalidLink::NotACandidate)
        );
    }

    async fn fetch(tx: &mut dyn EmployeeTransaction, id: EmployeeId) -> Employee {
        tx.select(&EmployeeFilter::new())
            .await
            .unwrap()
            .into_iter()
            .find(|e| e.employee_id == id)
            .unwrap()
    }
}
