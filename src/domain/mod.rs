//! Domain layer for the hierarchy repair engine
//!
//! This module contains the employee model, pass reports and the storage
//! ports the services are written against.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
