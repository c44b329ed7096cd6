//! Leader candidate lookup with cascading specificity.
//!
//! A candidate must share the employee's department and sit at the target
//! level. Region and location narrow the search; tiers are tried from most to
//! least specific and the first non-empty tier wins outright.

use tracing::trace;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Employee, EmployeeId, LinkField};
use crate::domain::ports::{EmployeeFilter, EmployeeTransaction};

/// Attribute a tier matches on, beyond department and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Region,
    Location,
}

/// One step of the specificity cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecificityTier {
    pub name: &'static str,
    pub scopes: &'static [Scope],
}

/// department + level + region + location, then + region, then bare.
pub const DEFAULT_TIERS: [SpecificityTier; 3] = [
    SpecificityTier {
        name: "department+level+region+location",
        scopes: &[Scope::Region, Scope::Location],
    },
    SpecificityTier {
        name: "department+level+region",
        scopes: &[Scope::Region],
    },
    SpecificityTier {
        name: "department+level",
        scopes: &[],
    },
];

/// Who is looking for a leader, and at which level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateQuery<'a> {
    pub department: Option<&'a str>,
    pub target_level: i64,
    pub region: Option<&'a str>,
    pub location: Option<&'a str>,
}

impl<'a> CandidateQuery<'a> {
    /// Query for the leader `employee` needs on `field`, using the
    /// employee's current attributes. `None` for unleveled employees.
    pub fn for_leader(employee: &'a Employee, field: LinkField) -> Option<Self> {
        Some(Self {
            department: employee.department.as_deref(),
            target_level: employee.leader_level(field)?,
            region: employee.region.as_deref(),
            location: employee.location.as_deref(),
        })
    }
}

/// Ids of eligible leaders, ascending, and the tier that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    pub tier: Option<&'static str>,
    pub ids: Vec<EmployeeId>,
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.ids.contains(&id)
    }
}

#[derive(Debug, Clone)]
pub struct CandidateFinder {
    tiers: Vec<SpecificityTier>,
}

impl Default for CandidateFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateFinder {
    pub fn new() -> Self {
        Self::with_tiers(DEFAULT_TIERS.to_vec())
    }

    pub fn with_tiers(tiers: Vec<SpecificityTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[SpecificityTier] {
        &self.tiers
    }

    /// Filter for one tier, or `None` when the query lacks an attribute the
    /// tier needs (a NULL never equals anything, so the tier cannot match).
    pub fn tier_filter(tier: &SpecificityTier, query: &CandidateQuery<'_>) -> Option<EmployeeFilter> {
        let mut filter = EmployeeFilter::new()
            .department(query.department?)
            .job_level(query.target_level);

        for scope in tier.scopes {
            filter = match scope {
                Scope::Region => filter.region(query.region?),
                Scope::Location => filter.location(query.location?),
            };
        }
        Some(filter)
    }

    /// Candidates from the first tier with any match. Read-only.
    pub async fn find(
        &self,
        store: &mut dyn EmployeeTransaction,
        query: &CandidateQuery<'_>,
    ) -> DomainResult<CandidateSet> {
        for tier in &self.tiers {
            let Some(filter) = Self::tier_filter(tier, query) else {
                continue;
            };

            let ids = store.select_ids(&filter).await?;
            if !ids.is_empty() {
                trace!(tier = tier.name, candidates = ids.len(), "candidate tier matched");
                return Ok(CandidateSet {
                    tier: Some(tier.name),
                    ids,
                });
            }
        }

        Ok(CandidateSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteEmployeeRepository};
    use crate::domain::ports::EmployeeRepository;

    fn member(id: EmployeeId, dept: &str, level: i64, region: &str, location: &str) -> Employee {
        Employee::new(id, "Test", "Member")
            .with_department(dept)
            .with_level(level)
            .with_region(region)
            .with_location(location)
            .with_joining_date("2021-03-01")
    }

    async fn setup(employees: &[Employee]) -> SqliteEmployeeRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteEmployeeRepository::new(pool);
        for employee in employees {
            repo.insert(employee).await.unwrap();
        }
        repo
    }

    fn query<'a>(dept: &'a str, level: i64, region: Option<&'a str>, location: Option<&'a str>) -> CandidateQuery<'a> {
        CandidateQuery {
            department: Some(dept),
            target_level: level,
            region,
            location,
        }
    }

    #[test]
    fn test_tier_filter_skips_missing_attributes() {
        let q = query("Eng", 3, Some("NA"), None);

        assert_eq!(CandidateFinder::tier_filter(&DEFAULT_TIERS[0], &q), None);
        assert_eq!(
            CandidateFinder::tier_filter(&DEFAULT_TIERS[1], &q),
            Some(EmployeeFilter::new().department("Eng").job_level(3).region("NA"))
        );
        assert_eq!(
            CandidateFinder::tier_filter(&DEFAULT_TIERS[2], &q),
            Some(EmployeeFilter::new().department("Eng").job_level(3))
        );

        let no_department = CandidateQuery { department: None, ..q };
        assert!(DEFAULT_TIERS
            .iter()
            .all(|tier| CandidateFinder::tier_filter(tier, &no_department).is_none()));
    }

    #[test]
    fn test_query_for_leader() {
        let employee = member(1, "Eng", 2, "NA", "NY");

        let manager = CandidateQuery::for_leader(&employee, LinkField::Manager).unwrap();
        assert_eq!(manager.target_level, 3);
        assert_eq!(manager.department, Some("Eng"));

        let supervisor = CandidateQuery::for_leader(&employee, LinkField::Supervisor).unwrap();
        assert_eq!(supervisor.target_level, 4);

        let unleveled = Employee::new(2, "No", "Level").with_department("Eng");
        assert!(CandidateQuery::for_leader(&unleveled, LinkField::Manager).is_none());
    }

    #[tokio::test]
    async fn test_most_specific_tier_wins() {
        let repo = setup(&[
            member(10, "Eng", 3, "NA", "NY"),
            member(11, "Eng", 3, "NA", "SF"),
            member(12, "Eng", 3, "EMEA", "London"),
        ])
        .await;
        let finder = CandidateFinder::new();
        let mut tx = repo.begin().await.unwrap();

        let found = finder.find(tx.as_mut(), &query("Eng", 3, Some("NA"), Some("NY"))).await.unwrap();
        assert_eq!(found.ids, vec![10]);
        assert_eq!(found.tier, Some("department+level+region+location"));

        let found = finder.find(tx.as_mut(), &query("Eng", 3, Some("NA"), Some("Austin"))).await.unwrap();
        assert_eq!(found.ids, vec![10, 11]);
        assert_eq!(found.tier, Some("department+level+region"));

        let found = finder.find(tx.as_mut(), &query("Eng", 3, Some("APAC"), Some("Tokyo"))).await.unwrap();
        assert_eq!(found.ids, vec![10, 11, 12]);
        assert_eq!(found.tier, Some("department+level"));
    }

    #[tokio::test]
    async fn test_no_match_in_any_tier() {
        let repo = setup(&[member(10, "Eng", 3, "NA", "NY")]).await;
        let finder = CandidateFinder::new();
        let mut tx = repo.begin().await.unwrap();

        let wrong_level = finder.find(tx.as_mut(), &query("Eng", 4, Some("NA"), Some("NY"))).await.unwrap();
        assert!(wrong_level.is_empty());
        assert_eq!(wrong_level.tier, None);

        let wrong_department = finder.find(tx.as_mut(), &query("Sales", 3, Some("NA"), Some("NY"))).await.unwrap();
        assert!(wrong_department.is_empty());
    }

    #[tokio::test]
    async fn test_custom_tiers() {
        let repo = setup(&[member(10, "Eng", 3, "NA", "NY"), member(11, "Eng", 3, "NA", "SF")]).await;
        let finder = CandidateFinder::with_tiers(vec![DEFAULT_TIERS[1]]);
        let mut tx = repo.begin().await.unwrap();

        let found = finder.find(tx.as_mut(), &query("Eng", 3, Some("NA"), Some("NY"))).await.unwrap();
        assert_eq!(found.ids, vec![10, 11]);
        assert!(found.contains(11));
    }
}
