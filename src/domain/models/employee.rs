//! Employee domain model.
//!
//! Employees form a hierarchy through two self-referencing links. Links are
//! plain ids resolved through the store, never held as references.

use serde::{Deserialize, Serialize};

/// Primary identity of an employee record.
pub type EmployeeId = i64;

/// Highest job level. Apex employees never get a manager.
pub const APEX_LEVEL: i64 = 5;

/// Level whose supervisor tier (level + 2) falls outside the hierarchy.
pub const NO_SUPERVISOR_LEVEL: i64 = 4;

/// One of the two hierarchy links carried by an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkField {
    /// Direct manager, one level up
    Manager,
    /// Supervisor, two levels up
    Supervisor,
}

impl LinkField {
    /// Both links, in repair order.
    pub const ALL: [Self; 2] = [Self::Manager, Self::Supervisor];

    /// Column holding the link.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Manager => "manager_id",
            Self::Supervisor => "supervisor_id",
        }
    }

    /// Level distance between an employee and the leader on this link.
    pub fn level_offset(&self) -> i64 {
        match self {
            Self::Manager => 1,
            Self::Supervisor => 2,
        }
    }

    /// Level that never carries this link.
    pub fn excluded_level(&self) -> i64 {
        match self {
            Self::Manager => APEX_LEVEL,
            Self::Supervisor => NO_SUPERVISOR_LEVEL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Supervisor => "supervisor",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manager" | "manager_id" => Some(Self::Manager),
            "supervisor" | "supervisor_id" => Some(Self::Supervisor),
            _ => None,
        }
    }
}

impl std::fmt::Display for LinkField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `employees` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    /// 1-5, 5 being the apex
    pub job_level: Option<i64>,
    pub location: Option<String>,
    pub region: Option<String>,
    pub manager_id: Option<EmployeeId>,
    pub supervisor_id: Option<EmployeeId>,
    /// Raw on ingestion, `YYYY-MM-DD` once repaired
    pub joining_date: String,
    pub exit_date: Option<String>,
    pub performance_rating: Option<i64>,
    pub tenure_years: Option<f64>,
    pub is_active: bool,
}

impl Employee {
    /// Create an active employee with no attributes or links.
    pub fn new(employee_id: EmployeeId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            employee_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: None,
            job_title: None,
            job_level: None,
            location: None,
            region: None,
            manager_id: None,
            supervisor_id: None,
            joining_date: String::new(),
            exit_date: None,
            performance_rating: None,
            tenure_years: None,
            is_active: true,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_level(mut self, job_level: i64) -> Self {
        self.job_level = Some(job_level);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_manager(mut self, manager_id: EmployeeId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    pub fn with_supervisor(mut self, supervisor_id: EmployeeId) -> Self {
        self.supervisor_id = Some(supervisor_id);
        self
    }

    pub fn with_joining_date(mut self, joining_date: impl Into<String>) -> Self {
        self.joining_date = joining_date.into();
        self
    }

    pub fn with_exit_date(mut self, exit_date: impl Into<String>) -> Self {
        self.exit_date = Some(exit_date.into());
        self.is_active = false;
        self
    }

    /// Current value of a hierarchy link.
    pub fn link(&self, field: LinkField) -> Option<EmployeeId> {
        match field {
            LinkField::Manager => self.manager_id,
            LinkField::Supervisor => self.supervisor_id,
        }
    }

    /// Level a leader on `field` must hold, if this employee is leveled.
    ///
    /// `None` also for a raw level so large no leader level exists above it.
    pub fn leader_level(&self, field: LinkField) -> Option<i64> {
        self.job_level?.checked_add(field.level_offset())
    }

    /// Whether policy forbids this employee from holding `field`.
    pub fn is_excluded(&self, field: LinkField) -> bool {
        self.job_level == Some(field.excluded_level())
    }
}

/// Direct-report count for one leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSize {
    pub leader_id: EmployeeId,
    /// Empty when the leader id does not resolve to a record
    pub leader_name: String,
    pub team_size: u64,
}
