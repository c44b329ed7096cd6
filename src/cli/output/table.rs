//! Table output formatting for CLI commands
//!
//! Renders repair, audit and span-of-control results with comfy-table.

use crate::domain::models::{AuditReport, FillReport, RepairReport, TeamSize};
use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// One row per pass with its headline counts
    pub fn format_repair_report(&self, report: &RepairReport) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Pass", "Examined", "Changed", "Skipped", "Unresolved"]));

        let validation = &report.validation;
        table.add_row(vec![
            Cell::new("1. validate links"),
            number(validation.examined),
            self.count_cell(validation.cleared(), Color::Yellow)
                .set_alignment(CellAlignment::Right),
            Cell::new("-"),
            Cell::new("-"),
        ]);

        let tenure = &report.tenure;
        table.add_row(vec![
            Cell::new("2. update tenure"),
            number(tenure.examined),
            number(tenure.updated),
            Cell::new("-"),
            self.count_cell(tenure.undefined_tenure, Color::Yellow)
                .set_alignment(CellAlignment::Right),
        ]);

        table.add_row(self.fill_row("3. fill managers", &report.managers));
        table.add_row(self.fill_row("4. fill supervisors", &report.supervisors));

        let mut lines = vec![table.to_string()];
        if validation.cleared() > 0 {
            lines.push(format!(
                "Cleared {} manager and {} supervisor link(s)",
                validation.cleared_manager, validation.cleared_supervisor
            ));
        }
        if tenure.malformed_exit > 0 {
            lines.push(format!("Cleared {} unparseable exit date(s)", tenure.malformed_exit));
        }
        lines.join("\n")
    }

    fn fill_row(&self, label: &str, report: &FillReport) -> Vec<Cell> {
        vec![
            Cell::new(label),
            number(report.examined),
            self.count_cell(report.assigned, Color::Green)
                .set_alignment(CellAlignment::Right),
            number(report.skipped_policy + report.skipped_unleveled),
            self.count_cell(report.unresolved, Color::Yellow)
                .set_alignment(CellAlignment::Right),
        ]
    }

    /// Counters followed by the sampled violations
    pub fn format_audit(&self, report: &AuditReport) -> String {
        let mut summary = self.create_base_table();
        summary.set_header(header(&["Check", "Count"]));
        summary.add_row(vec![Cell::new("employees"), number(report.employees)]);
        summary.add_row(vec![
            Cell::new("dangling links"),
            self.count_cell(report.dangling_links, Color::Red).set_alignment(CellAlignment::Right),
        ]);
        summary.add_row(vec![
            Cell::new("level mismatches"),
            self.count_cell(report.level_mismatches, Color::Red).set_alignment(CellAlignment::Right),
        ]);
        summary.add_row(vec![
            Cell::new("policy violations"),
            self.count_cell(report.policy_violations, Color::Red).set_alignment(CellAlignment::Right),
        ]);
        summary.add_row(vec![Cell::new("without manager"), number(report.without_manager)]);
        summary.add_row(vec![Cell::new("without supervisor"), number(report.without_supervisor)]);
        summary.add_row(vec![Cell::new("undefined tenure"), number(report.undefined_tenure)]);

        let mut lines = vec![summary.to_string()];

        if !report.violations.is_empty() {
            let mut violations = self.create_base_table();
            violations.set_header(header(&["Employee", "Violation"]));
            for violation in &report.violations {
                violations.add_row(vec![
                    number(violation.employee_id),
                    Cell::new(violation.kind.to_string()),
                ]);
            }
            lines.push(violations.to_string());
        }

        lines.join("\n")
    }

    pub fn format_team_sizes(&self, sizes: &[TeamSize]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Leader ID", "Name", "Team Size"]));

        for size in sizes {
            let name = if size.leader_name.is_empty() {
                "-".to_string()
            } else {
                size.leader_name.clone()
            };
            table.add_row(vec![
                number(size.leader_id),
                Cell::new(name),
                number(size.team_size),
            ]);
        }

        table.to_string()
    }

    fn count_cell(&self, count: u64, color: Color) -> Cell {
        let cell = Cell::new(count);
        if self.use_colors && count > 0 {
            cell.fg(color)
        } else {
            cell
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.use_colors {
            table.force_no_tty();
        }
        table
    }
}

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
        .collect()
}

fn number(value: impl std::fmt::Display) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

/// Colors are disabled by NO_COLOR or a dumb terminal
fn supports_color() -> bool {
    env::var_os("NO_COLOR").is_none() && env::var("TERM").map_or(true, |term| term != "dumb")
}
