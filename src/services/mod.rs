//! Repair services: candidate search, load balancing, link validation,
//! tenure and the pass orchestration built on them.

pub mod candidate_finder;
pub mod hierarchy_auditor;
pub mod hierarchy_repairer;
pub mod link_validator;
pub mod load_balancer;
pub mod tenure_calculator;

pub use candidate_finder::{CandidateFinder, CandidateQuery, CandidateSet, Scope, SpecificityTier, DEFAULT_TIERS};
pub use hierarchy_auditor::HierarchyAuditor;
pub use hierarchy_repairer::HierarchyRepairer;
pub use link_validator::{InvalidLink, LinkValidator};
pub use load_balancer::LoadBalancer;
pub use tenure_calculator::{normalize_date, tenure_years, DateValue, TenureCalculator, TenureOutcome};
