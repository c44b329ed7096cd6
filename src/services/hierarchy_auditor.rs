//! Read-only invariant check over the persisted hierarchy.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AuditReport, Employee, EmployeeId, LinkField, Violation, ViolationKind,
};
use crate::domain::ports::{EmployeeFilter, EmployeeRepository};

/// Number of individual violations kept in a report.
pub const DEFAULT_VIOLATION_SAMPLE: usize = 20;

pub struct HierarchyAuditor<R: EmployeeRepository> {
    repository: Arc<R>,
    sample_size: usize,
}

impl<R: EmployeeRepository> HierarchyAuditor<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sample_size: DEFAULT_VIOLATION_SAMPLE,
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub async fn audit(&self) -> DomainResult<AuditReport> {
        let employees = self.repository.list(&EmployeeFilter::new()).await?;
        let levels: HashMap<EmployeeId, Option<i64>> =
            employees.iter().map(|e| (e.employee_id, e.job_level)).collect();

        let mut report = AuditReport {
            employees: employees.len() as u64,
            ..Default::default()
        };

        for employee in &employees {
            for field in LinkField::ALL {
                match employee.link(field) {
                    Some(leader) => {
                        if let Some(kind) = Self::classify(employee, field, leader, &levels) {
                            self.record(&mut report, employee.employee_id, kind);
                        }
                    }
                    None if employee.is_excluded(field) => {}
                    None => match field {
                        LinkField::Manager => report.without_manager += 1,
                        LinkField::Supervisor => report.without_supervisor += 1,
                    },
                }
            }

            if employee.tenure_years.is_none() {
                report.undefined_tenure += 1;
            }
        }

        info!(
            employees = report.employees,
            dangling = report.dangling_links,
            level_mismatches = report.level_mismatches,
            policy_violations = report.policy_violations,
            "hierarchy audit complete"
        );
        Ok(report)
    }

    fn classify(
        employee: &Employee,
        field: LinkField,
        leader: EmployeeId,
        levels: &HashMap<EmployeeId, Option<i64>>,
    ) -> Option<ViolationKind> {
        if employee.is_excluded(field) {
            return Some(ViolationKind::PolicyExclusion(field));
        }

        let Some(leader_level) = levels.get(&leader) else {
            return Some(ViolationKind::DanglingLink(field));
        };

        match (employee.leader_level(field), leader_level) {
            (Some(expected), Some(actual)) if expected == *actual => None,
            _ => Some(ViolationKind::LevelMismatch(field)),
        }
    }

    fn record(&self, report: &mut AuditReport, employee_id: EmployeeId, kind: ViolationKind) {
        match kind {
            ViolationKind::DanglingLink(_) => report.dangling_links += 1,
            ViolationKind::LevelMismatch(_) => report.level_mismatches += 1,
            ViolationKind::PolicyExclusion(_) => report.policy_violations += 1,
        }
        if report.violations.len() < self.sample_size {
            report.violations.push(Violation { employee_id, kind });
        }
    }
}
