//! Implementation of the `hierarchy-repair repair` command.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use crate::cli::commands::open_repository;
use crate::cli::output::progress::{create_spinner, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, RepairReport};
use crate::services::HierarchyRepairer;

#[derive(Args, Debug)]
pub struct RepairArgs {
    /// Compute tenure as of this date (YYYY-MM-DD) instead of today
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RepairOutput {
    pub database_path: String,
    pub as_of: Option<NaiveDate>,
    pub report: RepairReport,
}

impl CommandOutput for RepairOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Repaired hierarchy in {}", self.database_path)];
        if let Some(as_of) = self.as_of {
            lines.push(format!("Tenure computed as of {as_of}"));
        }
        lines.push(TableFormatter::new().format_repair_report(&self.report));
        lines.join("\n")
    }
}

pub async fn execute(args: RepairArgs, config: &Config, json_mode: bool) -> Result<()> {
    let repository = open_repository(config).await?;
    let as_of = args.as_of.or(config.repair.as_of);

    let repairer = HierarchyRepairer::new(repository)
        .with_as_of(as_of)
        .with_progress_interval(config.repair.progress_interval);

    let spinner = (!json_mode).then(|| create_spinner("Repairing hierarchy (4 passes)..."));
    let result = repairer.run().await;

    match (&result, &spinner) {
        (Ok(_), Some(spinner)) => spinner.finish_success("Repair complete"),
        (Err(_), Some(spinner)) => spinner.finish_error("Repair failed"),
        _ => {}
    }

    let report = result.context("Hierarchy repair failed")?;
    output(
        &RepairOutput {
            database_path: config.database.path.clone(),
            as_of,
            report,
        },
        json_mode,
    );
    Ok(())
}
