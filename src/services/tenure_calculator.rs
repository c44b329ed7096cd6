//! Date normalization and tenure computation.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Employee, EmployeeId, TenureReport};
use crate::domain::ports::{EmployeeFilter, EmployeeTransaction, EmployeeUpdate, FieldAssignment};

/// Accepted input formats, tried in order.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Canonical storage format.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

const NULL_TOKENS: [&str; 4] = ["NA", "N/A", "NULL", "NONE"];

const DAYS_PER_YEAR: f64 = 365.25;

/// A raw date field after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    /// Null, blank or a null-like token
    Missing,
    Normalized(NaiveDate),
    /// Present but unparseable; carries the trimmed input
    Malformed(String),
}

impl DateValue {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Normalized(date) => Some(*date),
            _ => None,
        }
    }

    /// `YYYY-MM-DD` text for normalized dates.
    pub fn canonical(&self) -> Option<String> {
        self.date().map(|date| date.format(CANONICAL_FORMAT).to_string())
    }
}

/// Normalize a raw date field.
pub fn normalize_date(raw: Option<&str>) -> DateValue {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return DateValue::Missing;
    };

    if NULL_TOKENS.iter().any(|token| value.eq_ignore_ascii_case(token)) {
        return DateValue::Missing;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return DateValue::Normalized(date);
        }
    }

    // Timestamps such as "2020-01-01T09:30:00"
    if let Some(date) = value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, CANONICAL_FORMAT).ok())
    {
        return DateValue::Normalized(date);
    }

    DateValue::Malformed(value.to_string())
}

/// Elapsed years between two dates, rounded to two decimals.
pub fn tenure_years(start: NaiveDate, end: NaiveDate) -> f64 {
    let days = (end - start).num_days() as f64;
    (days / DAYS_PER_YEAR * 100.0).round() / 100.0
}

/// Normalized dates and tenure for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct TenureOutcome {
    pub joining: DateValue,
    pub exit: DateValue,
    /// `None` when the joining date is missing or malformed
    pub tenure_years: Option<f64>,
}

impl TenureOutcome {
    /// Writes persisting this outcome. An unusable joining date keeps its raw
    /// text; any exit date that is not a valid date becomes NULL.
    pub fn update_for(&self, employee_id: EmployeeId) -> EmployeeUpdate {
        let mut update = EmployeeUpdate::new(employee_id);
        if let Some(joining) = self.joining.canonical() {
            update = update.set(FieldAssignment::JoiningDate(joining));
        }
        update
            .set(FieldAssignment::ExitDate(self.exit.canonical()))
            .set(FieldAssignment::TenureYears(self.tenure_years))
    }
}

/// Computes tenure against an optional frozen "today".
#[derive(Debug, Clone, Default)]
pub struct TenureCalculator {
    as_of: Option<NaiveDate>,
}

impl TenureCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze "today" for reproducible runs.
    pub fn with_as_of(mut self, as_of: Option<NaiveDate>) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn compute(&self, joining_date: &str, exit_date: Option<&str>) -> TenureOutcome {
        let joining = normalize_date(Some(joining_date));
        let exit = normalize_date(exit_date);
        let end = exit.date().unwrap_or_else(|| self.today());

        TenureOutcome {
            tenure_years: joining.date().map(|start| tenure_years(start, end)),
            joining,
            exit,
        }
    }

    /// Recompute dates and tenure for every record in the pass.
    #[instrument(name = "tenure_pass", skip_all)]
    pub async fn update_all(
        &self,
        store: &mut dyn EmployeeTransaction,
        progress_interval: u64,
    ) -> DomainResult<TenureReport> {
        let employees = store.select(&EmployeeFilter::new()).await?;
        info!(employees = employees.len(), as_of = ?self.as_of, "updating tenure");

        let mut report = TenureReport::default();
        let mut updates = Vec::with_capacity(employees.len());

        for employee in &employees {
            report.examined += 1;
            let outcome = self.examine(employee, &mut report);
            updates.push(outcome.update_for(employee.employee_id));

            if progress_interval > 0 && report.examined % progress_interval == 0 {
                debug!(prepared = report.examined, total = employees.len(), "tenure progress");
            }
        }

        store.update_many(&updates).await?;

        info!(
            updated = report.updated,
            undefined_tenure = report.undefined_tenure,
            malformed_exit = report.malformed_exit,
            "tenure pass complete"
        );
        Ok(report)
    }

    fn examine(&self, employee: &Employee, report: &mut TenureReport) -> TenureOutcome {
        let outcome = self.compute(&employee.joining_date, employee.exit_date.as_deref());

        match &outcome.joining {
            DateValue::Normalized(_) => report.updated += 1,
            DateValue::Malformed(raw) => {
                warn!(employee_id = employee.employee_id, joining_date = %raw, "unparseable joining date, tenure left undefined");
                report.undefined_tenure += 1;
            }
            DateValue::Missing => {
                warn!(employee_id = employee.employee_id, "missing joining date, tenure left undefined");
                report.undefined_tenure += 1;
            }
        }

        if let DateValue::Malformed(raw) = &outcome.exit {
            warn!(employee_id = employee.employee_id, exit_date = %raw, "unparseable exit date cleared");
            report.malformed_exit += 1;
        }

        outcome
    }
}
