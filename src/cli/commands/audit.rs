//! Implementation of the `hierarchy-repair audit` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::commands::open_repository;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{AuditReport, Config};
use crate::services::hierarchy_auditor::{HierarchyAuditor, DEFAULT_VIOLATION_SAMPLE};

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Maximum number of individual violations to list
    #[arg(long, default_value_t = DEFAULT_VIOLATION_SAMPLE)]
    pub sample: usize,
}

#[derive(Debug, Serialize)]
pub struct AuditOutput {
    pub consistent: bool,
    #[serde(flatten)]
    pub report: AuditReport,
}

impl CommandOutput for AuditOutput {
    fn to_human(&self) -> String {
        let verdict = if self.consistent {
            "Hierarchy is consistent."
        } else {
            "Hierarchy has invalid links. Run `hierarchy-repair repair` to fix them."
        };
        format!("{}\n{verdict}", TableFormatter::new().format_audit(&self.report))
    }
}

pub async fn execute(args: AuditArgs, config: &Config, json_mode: bool) -> Result<()> {
    let repository = open_repository(config).await?;
    let report = HierarchyAuditor::new(repository)
        .with_sample_size(args.sample)
        .audit()
        .await
        .context("Hierarchy audit failed")?;

    output(
        &AuditOutput {
            consistent: report.is_consistent(),
            report,
        },
        json_mode,
    );
    Ok(())
}
