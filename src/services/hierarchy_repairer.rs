//! Four-pass hierarchy repair.
//!
//! Passes run in a fixed order, each inside its own transaction:
//! validate links, update tenure, fill managers, fill supervisors. A pass
//! commits before the next one begins, so a failure leaves earlier passes
//! persisted and discards the failing one.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{FillReport, LinkField, RepairReport, TenureReport, ValidationReport};
use crate::domain::ports::{EmployeeFilter, EmployeeRepository, EmployeeTransaction, EmployeeUpdate};
use crate::services::candidate_finder::{CandidateFinder, CandidateQuery};
use crate::services::link_validator::LinkValidator;
use crate::services::load_balancer::LoadBalancer;
use crate::services::tenure_calculator::TenureCalculator;

pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1000;

pub struct HierarchyRepairer<R: EmployeeRepository> {
    repository: Arc<R>,
    finder: CandidateFinder,
    balancer: LoadBalancer,
    tenure: TenureCalculator,
    progress_interval: u64,
}

impl<R: EmployeeRepository> HierarchyRepairer<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            finder: CandidateFinder::new(),
            balancer: LoadBalancer::new(),
            tenure: TenureCalculator::new(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Freeze "today" for tenure of employees without an exit date.
    pub fn with_as_of(mut self, as_of: Option<NaiveDate>) -> Self {
        self.tenure = self.tenure.with_as_of(as_of);
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_finder(mut self, finder: CandidateFinder) -> Self {
        self.finder = finder;
        self
    }

    /// Run all four passes in order.
    pub async fn run(&self) -> DomainResult<RepairReport> {
        let validation = self.validate_links().await?;
        let tenure = self.update_tenure().await?;
        let managers = self.fill_managers().await?;
        let supervisors = self.fill_supervisors().await?;

        info!(
            cleared = validation.cleared(),
            tenure_updated = tenure.updated,
            managers_assigned = managers.assigned,
            supervisors_assigned = supervisors.assigned,
            "hierarchy repair complete"
        );

        Ok(RepairReport {
            validation,
            tenure,
            managers,
            supervisors,
        })
    }

    /// Pass 1: clear links violating the level-offset rule or level policy.
    pub async fn validate_links(&self) -> DomainResult<ValidationReport> {
        let mut tx = self.repository.begin().await?;
        let report = LinkValidator::new(self.finder.clone())
            .validate_all(tx.as_mut(), self.progress_interval)
            .await?;
        tx.commit().await?;
        Ok(report)
    }

    /// Pass 2: normalize dates and recompute tenure.
    pub async fn update_tenure(&self) -> DomainResult<TenureReport> {
        let mut tx = self.repository.begin().await?;
        let report = self.tenure.update_all(tx.as_mut(), self.progress_interval).await?;
        tx.commit().await?;
        Ok(report)
    }

    /// Pass 3: assign a manager one level up to every non-apex record
    /// without one.
    pub async fn fill_managers(&self) -> DomainResult<FillReport> {
        self.fill_links(LinkField::Manager).await
    }

    /// Pass 4: assign a supervisor two levels up to every record below
    /// level 4 without one.
    pub async fn fill_supervisors(&self) -> DomainResult<FillReport> {
        self.fill_links(LinkField::Supervisor).await
    }

    async fn fill_links(&self, field: LinkField) -> DomainResult<FillReport> {
        let mut tx = self.repository.begin().await?;
        let report = self.fill_in(tx.as_mut(), field).await?;
        tx.commit().await?;
        Ok(report)
    }

    #[instrument(name = "fill_pass", skip_all, fields(field = %field))]
    async fn fill_in(&self, store: &mut dyn EmployeeTransaction, field: LinkField) -> DomainResult<FillReport> {
        let employees = store.select(&EmployeeFilter::new().missing_link(field)).await?;
        info!(employees = employees.len(), "filling missing {field} links");

        let mut report = FillReport::new(field);

        for employee in &employees {
            report.examined += 1;

            if employee.is_excluded(field) {
                report.skipped_policy += 1;
            } else if let Some(query) = CandidateQuery::for_leader(employee, field) {
                let candidates = self.finder.find(store, &query).await?;
                match self.balancer.least_loaded(store, &candidates.ids, field).await? {
                    Some(leader) => {
                        store
                            .update_many(&[EmployeeUpdate::link(employee.employee_id, field, Some(leader))])
                            .await?;
                        report.assigned += 1;
                    }
                    None => {
                        debug!(employee_id = employee.employee_id, "no candidate {field} at any specificity");
                        report.unresolved += 1;
                    }
                }
            } else {
                report.skipped_unleveled += 1;
            }

            if self.progress_interval > 0 && report.examined % self.progress_interval == 0 {
                debug!(processed = report.examined, total = employees.len(), "fill progress");
            }
        }

        info!(
            assigned = report.assigned,
            skipped_policy = report.skipped_policy,
            skipped_unleveled = report.skipped_unleveled,
            unresolved = report.unresolved,
            "fill pass complete"
        );
        Ok(report)
    }
}
