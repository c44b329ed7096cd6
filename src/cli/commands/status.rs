//! Implementation of the `hierarchy-repair status` command.

use anyhow::Result;
use serde::Serialize;

use crate::adapters::sqlite::{inspect_database, DatabaseStatus};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    #[serde(flatten)]
    pub status: DatabaseStatus,
    pub ready: bool,
    pub hint: Option<String>,
}

impl StatusOutput {
    pub fn new(status: DatabaseStatus) -> Self {
        let hint = if !status.db_exists || !status.table_exists {
            Some("Run `hierarchy-repair init`, then load employee records.".to_string())
        } else if status.row_count == Some(0) {
            Some("The employees table is empty. Load employee records before repairing.".to_string())
        } else {
            None
        };

        Self {
            ready: status.is_ready(),
            status,
            hint,
        }
    }
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{}\n{hint}", self.status.message),
            None => self.status.message.clone(),
        }
    }
}

pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let status = inspect_database(&config.database.path).await;
    output(&StatusOutput::new(status), json_mode);
    Ok(())
}
