//! Per-pass repair reports and audit results.

use serde::{Deserialize, Serialize};

use super::employee::{EmployeeId, LinkField};

/// Outcome of the link validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Records holding at least one link
    pub examined: u64,
    pub cleared_manager: u64,
    pub cleared_supervisor: u64,
}

impl ValidationReport {
    pub fn cleared(&self) -> u64 {
        self.cleared_manager + self.cleared_supervisor
    }

    pub(crate) fn record_cleared(&mut self, field: LinkField) {
        match field {
            LinkField::Manager => self.cleared_manager += 1,
            LinkField::Supervisor => self.cleared_supervisor += 1,
        }
    }
}

/// Outcome of the tenure pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureReport {
    pub examined: u64,
    /// Records that received a tenure value
    pub updated: u64,
    /// Joining date missing or unparseable; tenure written as NULL
    pub undefined_tenure: u64,
    /// Exit date present but unparseable; written as NULL
    pub malformed_exit: u64,
}

/// Outcome of a manager or supervisor fill pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    pub field: LinkField,
    /// Records whose link was NULL at the start of the pass
    pub examined: u64,
    pub assigned: u64,
    /// Skipped by level policy (apex for managers, level 4 for supervisors)
    pub skipped_policy: u64,
    /// Skipped because the record has no job level
    pub skipped_unleveled: u64,
    /// No candidate at any specificity
    pub unresolved: u64,
}

impl FillReport {
    pub fn new(field: LinkField) -> Self {
        Self {
            field,
            examined: 0,
            assigned: 0,
            skipped_policy: 0,
            skipped_unleveled: 0,
            unresolved: 0,
        }
    }
}

/// Reports of a full four-pass repair run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    pub validation: ValidationReport,
    pub tenure: TenureReport,
    pub managers: FillReport,
    pub supervisors: FillReport,
}

/// Kind of invariant breach found by an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Link points at an id with no record
    DanglingLink(LinkField),
    /// Leader sits at the wrong level for the link
    LevelMismatch(LinkField),
    /// Apex employee with a manager, or level 4 with a supervisor
    PolicyExclusion(LinkField),
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingLink(field) => write!(f, "dangling {field}"),
            Self::LevelMismatch(field) => write!(f, "{field} level mismatch"),
            Self::PolicyExclusion(field) => write!(f, "{field} forbidden by level policy"),
        }
    }
}

/// A single invariant breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub employee_id: EmployeeId,
    pub kind: ViolationKind,
}

/// Read-only invariant check over the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub employees: u64,
    pub dangling_links: u64,
    pub level_mismatches: u64,
    pub policy_violations: u64,
    /// Non-apex employees without a manager
    pub without_manager: u64,
    /// Employees without a supervisor, level 4 excepted
    pub without_supervisor: u64,
    pub undefined_tenure: u64,
    /// First violations found, in employee id order
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// No dangling, misleveled or policy-excluded links.
    pub fn is_consistent(&self) -> bool {
        self.dangling_links == 0 && self.level_mismatches == 0 && self.policy_violations == 0
    }
}
