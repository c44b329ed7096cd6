//! Employee repository port.
//!
//! The repair passes only need equality-filtered selects, a subordinate
//! count and bulk field updates, all scoped to one transaction per pass.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Employee, EmployeeId, LinkField, TeamSize};

/// Equality filter over employee rows.
///
/// A `Some` attribute matches with SQL equality, so it never matches a NULL
/// column. Results are always ordered by ascending `employee_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub job_level: Option<i64>,
    pub region: Option<String>,
    pub location: Option<String>,
    /// Only rows whose link is NULL
    pub missing_link: Option<LinkField>,
    /// Only rows holding a manager or a supervisor
    pub has_any_link: bool,
}

impl EmployeeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn job_level(mut self, job_level: i64) -> Self {
        self.job_level = Some(job_level);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn missing_link(mut self, field: LinkField) -> Self {
        self.missing_link = Some(field);
        self
    }

    pub fn with_any_link(mut self) -> Self {
        self.has_any_link = true;
        self
    }
}

/// Filter applied to the direct reports when sizing teams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSizeFilter {
    pub department: Option<String>,
    pub region: Option<String>,
    pub location: Option<String>,
    pub limit: Option<u32>,
}

/// A single field write performed by a repair pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAssignment {
    Link(LinkField, Option<EmployeeId>),
    JoiningDate(String),
    ExitDate(Option<String>),
    TenureYears(Option<f64>),
}

impl FieldAssignment {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Link(field, _) => field.column(),
            Self::JoiningDate(_) => "joining_date",
            Self::ExitDate(_) => "exit_date",
            Self::TenureYears(_) => "tenure_years",
        }
    }
}

/// Field writes for one record, keyed by primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeUpdate {
    pub employee_id: EmployeeId,
    pub assignments: Vec<FieldAssignment>,
}

impl EmployeeUpdate {
    pub fn new(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            assignments: Vec::new(),
        }
    }

    pub fn set(mut self, assignment: FieldAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// Update writing a single link.
    pub fn link(employee_id: EmployeeId, field: LinkField, leader: Option<EmployeeId>) -> Self {
        Self::new(employee_id).set(FieldAssignment::Link(field, leader))
    }
}

/// Store access scoped to one repair pass.
///
/// Reads observe every write already made through the same transaction.
/// Nothing persists until `commit`; dropping the transaction rolls back.
#[async_trait]
pub trait EmployeeTransaction: Send {
    /// Rows matching `filter`, ordered by `employee_id`.
    async fn select(&mut self, filter: &EmployeeFilter) -> DomainResult<Vec<Employee>>;

    /// Ids matching `filter`, ordered by `employee_id`.
    async fn select_ids(&mut self, filter: &EmployeeFilter) -> DomainResult<Vec<EmployeeId>>;

    /// Number of rows whose `field` points at `leader_id`.
    async fn count_reports(&mut self, field: LinkField, leader_id: EmployeeId) -> DomainResult<u64>;

    /// Apply field writes by primary key. Returns the number of rows touched.
    async fn update_many(&mut self, updates: &[EmployeeUpdate]) -> DomainResult<u64>;

    /// Persist every write made through this transaction.
    async fn commit(self: Box<Self>) -> DomainResult<()>;
}

/// Repository interface for employee persistence.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Open a transaction for one repair pass.
    async fn begin(&self) -> DomainResult<Box<dyn EmployeeTransaction>>;

    /// Insert a record. Used by ingestion collaborators, never by repair.
    async fn insert(&self, employee: &Employee) -> DomainResult<()>;

    /// Get an employee by ID.
    async fn get(&self, id: EmployeeId) -> DomainResult<Option<Employee>>;

    /// List employees matching `filter`, ordered by `employee_id`.
    async fn list(&self, filter: &EmployeeFilter) -> DomainResult<Vec<Employee>>;

    /// Total number of records.
    async fn count(&self) -> DomainResult<u64>;

    /// Direct-report counts per leader on `field`, largest teams first.
    async fn team_sizes(&self, field: LinkField, filter: &TeamSizeFilter) -> DomainResult<Vec<TeamSize>>;
}
