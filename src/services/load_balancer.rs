//! Least-loaded selection among leader candidates.

use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmployeeId, LinkField};
use crate::domain::ports::EmployeeTransaction;

/// Picks the candidate currently leading the fewest reports on a link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadBalancer;

impl LoadBalancer {
    pub fn new() -> Self {
        Self
    }

    /// Least-loaded candidate on `field`, or `None` for an empty slice.
    ///
    /// Ties keep the earliest candidate, so ascending input ids resolve to
    /// the lowest id.
    pub async fn least_loaded(
        &self,
        store: &mut dyn EmployeeTransaction,
        candidates: &[EmployeeId],
        field: LinkField,
    ) -> DomainResult<Option<EmployeeId>> {
        let mut best: Option<(EmployeeId, u64)> = None;

        for &candidate in candidates {
            let load = store.count_reports(field, candidate).await?;
            if best.map_or(true, |(_, best_load)| load < best_load) {
                best = Some((candidate, load));
            }
        }

        if let Some((leader, load)) = best {
            debug!(%field, leader, load, candidates = candidates.len(), "selected least-loaded leader");
        }
        Ok(best.map(|(leader, _)| leader))
    }
}
