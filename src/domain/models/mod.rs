pub mod config;
pub mod employee;
pub mod repair;

pub use config::{Config, DatabaseConfig, LoggingConfig, RepairConfig};
pub use employee::{Employee, EmployeeId, LinkField, TeamSize, APEX_LEVEL, NO_SUPERVISOR_LEVEL};
pub use repair::{
    AuditReport, FillReport, RepairReport, TenureReport, ValidationReport, Violation,
    ViolationKind,
};
