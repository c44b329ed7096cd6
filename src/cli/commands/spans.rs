//! Implementation of the `hierarchy-repair spans` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::commands::open_repository;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, LinkField, TeamSize};
use crate::domain::ports::{EmployeeRepository, TeamSizeFilter};

#[derive(Args, Debug)]
pub struct SpansArgs {
    /// Link to group by: manager or supervisor
    #[arg(long, default_value = "manager", value_parser = parse_link_field)]
    pub field: LinkField,

    /// Only count reports in this department
    #[arg(long)]
    pub department: Option<String>,

    /// Only count reports in this region
    #[arg(long)]
    pub region: Option<String>,

    /// Only count reports at this location
    #[arg(long)]
    pub location: Option<String>,

    /// Maximum number of leaders to show
    #[arg(short, long)]
    pub limit: Option<u32>,
}

fn parse_link_field(value: &str) -> Result<LinkField, String> {
    LinkField::from_str(value).ok_or_else(|| format!("expected 'manager' or 'supervisor', got '{value}'"))
}

#[derive(Debug, Serialize)]
pub struct SpansOutput {
    pub field: LinkField,
    pub teams: Vec<TeamSize>,
}

impl CommandOutput for SpansOutput {
    fn to_human(&self) -> String {
        if self.teams.is_empty() {
            return format!("No employees have a {} assigned.", self.field);
        }
        format!(
            "Direct reports per {}\n{}",
            self.field,
            TableFormatter::new().format_team_sizes(&self.teams)
        )
    }
}

pub async fn execute(args: SpansArgs, config: &Config, json_mode: bool) -> Result<()> {
    let repository = open_repository(config).await?;
    let filter = TeamSizeFilter {
        department: args.department,
        region: args.region,
        location: args.location,
        limit: args.limit,
    };

    let teams = repository
        .team_sizes(args.field, &filter)
        .await
        .context("Failed to compute team sizes")?;

    output(&SpansOutput { field: args.field, teams }, json_mode);
    Ok(())
}
