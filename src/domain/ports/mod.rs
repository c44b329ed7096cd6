//! Port trait definitions (Hexagonal Architecture)
//!
//! The services are written against these traits; the `SQLite` adapter in
//! `adapters::sqlite` implements them.

pub mod employee_repository;

pub use employee_repository::{
    EmployeeFilter, EmployeeRepository, EmployeeTransaction, EmployeeUpdate, FieldAssignment,
    TeamSizeFilter,
};
