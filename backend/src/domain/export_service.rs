//! Report export domain logic.
//!
//! Builds the flat text report (overview, roster, expense ledger,
//! attrition ledger) and handles writing it to a target directory. The
//! report is one-way: it is meant for people, not for re-import.

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use std::fs;
use std::path::PathBuf;

use crate::domain::commands::expenses::ExpenseListQuery;
use crate::domain::commands::members::MemberListQuery;
use crate::domain::commands::reports::ExportToPathCommand;
use crate::domain::dashboard_service::DashboardService;
use crate::domain::query_service::QueryService;
use shared::{ExportToPathResult, ExportedReport};

const RULE_WIDTH: usize = 80;

#[derive(Clone, Default)]
pub struct ExportService {}

impl ExportService {
    pub fn new() -> Self {
        Self {}
    }

    /// Build the report document and its dated filename.
    pub fn build_report(
        &self,
        dashboard: &DashboardService,
        query: &QueryService,
    ) -> Result<ExportedReport> {
        info!("Building budget report");

        let summary = dashboard.dashboard_summary()?;
        let members = query.list_members(MemberListQuery::default())?;
        let expense_rows = query.expense_rows(ExpenseListQuery::default())?;
        let attrition_rows = query.attrition_rows()?;

        let mut report = String::new();
        report.push_str("BUDGET TRACKING REPORT\n");
        report.push_str(&"=".repeat(RULE_WIDTH));
        report.push_str("\n\n");

        report.push_str("BUDGET OVERVIEW\n");
        report.push_str(&"-".repeat(RULE_WIDTH));
        report.push('\n');
        for card in [&summary.team, &summary.connectivity] {
            let label = match card.category {
                shared::BudgetCategory::Team => "Team Budget",
                shared::BudgetCategory::Connectivity => "Connectivity Budget",
            };
            report.push_str(&format!(
                "{}: {} | Spent: {} | Remaining: {}\n",
                label,
                format_currency(card.total_budget),
                format_currency(card.total_spent),
                format_currency(card.remaining),
            ));
        }
        report.push('\n');

        report.push_str("TEAM MEMBERS\n");
        report.push_str(&"-".repeat(RULE_WIDTH));
        report.push('\n');
        for member in &members {
            report.push_str(&format!(
                "{} ({}) - Team: {} | Connectivity: {} | Status: {}\n",
                member.name,
                member.role,
                format_currency(member.team_budget),
                format_currency(member.connectivity_budget),
                member.status.as_str(),
            ));
        }

        report.push_str("\n\nEXPENSES\n");
        report.push_str(&"-".repeat(RULE_WIDTH));
        report.push('\n');
        for row in &expense_rows {
            report.push_str(&format!(
                "{} | {} | {} | {} | {} | {}\n",
                row.formatted_date,
                row.name,
                format_currency(row.amount),
                row.event,
                row.category,
                row.member_name,
            ));
        }

        if !attrition_rows.is_empty() {
            report.push_str("\n\nATTRITION\n");
            report.push_str(&"-".repeat(RULE_WIDTH));
            report.push('\n');
            for row in &attrition_rows {
                report.push_str(&format!(
                    "{} ({}) - Exit Month: {}\n",
                    row.member_name, row.role, row.formatted_exit_month,
                ));
            }
        }

        let filename = format!("budget-report-{}.txt", Utc::now().format("%Y-%m-%d"));

        info!(
            "Built report ({} bytes) with filename: {}",
            report.len(),
            filename
        );
        Ok(ExportedReport { content: report, filename })
    }

    /// Build the report and write it to the requested directory, or the
    /// Documents folder when none is given.
    pub fn export_to_path(
        &self,
        command: ExportToPathCommand,
        dashboard: &DashboardService,
        query: &QueryService,
    ) -> Result<ExportToPathResult> {
        let report = self.build_report(dashboard, query)?;

        let export_dir = match command.custom_path {
            Some(ref custom) if !custom.trim().is_empty() => {
                PathBuf::from(self.sanitize_path(custom))
            }
            _ => match dirs::document_dir().or_else(dirs::home_dir) {
                Some(dir) => dir,
                None => {
                    error!("Could not determine default export directory");
                    return Ok(ExportToPathResult {
                        success: false,
                        message: "Failed to determine export directory".to_string(),
                        file_path: String::new(),
                    });
                }
            },
        };

        let file_path = export_dir.join(&report.filename);
        if let Some(parent) = file_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create export directory {:?}: {}", parent, e);
                return Ok(ExportToPathResult {
                    success: false,
                    message: format!("Failed to create export directory: {}", e),
                    file_path: parent.to_string_lossy().to_string(),
                });
            }
        }

        match fs::write(&file_path, &report.content) {
            Ok(()) => {
                let file_path = file_path.to_string_lossy().to_string();
                info!("Exported report to {}", file_path);
                Ok(ExportToPathResult {
                    success: true,
                    message: format!("Report exported successfully to: {}", file_path),
                    file_path,
                })
            }
            Err(e) => {
                error!("Failed to write report to {:?}: {}", file_path, e);
                Ok(ExportToPathResult {
                    success: false,
                    message: format!("Failed to write report: {}", e),
                    file_path: file_path.to_string_lossy().to_string(),
                })
            }
        }
    }

    /// Basic path sanitization for user-typed export directories.
    fn sanitize_path(&self, path: &str) -> String {
        let mut cleaned = path.trim().to_string();

        if (cleaned.starts_with('"') && cleaned.ends_with('"') && cleaned.len() >= 2)
            || (cleaned.starts_with('\'') && cleaned.ends_with('\'') && cleaned.len() >= 2)
        {
            cleaned = cleaned[1..cleaned.len() - 1].to_string();
        }
        cleaned = cleaned.trim().to_string();
        cleaned = cleaned.replace("\\ ", " ");
        while cleaned.ends_with('/') || cleaned.ends_with('\\') {
            cleaned.pop();
        }

        if cleaned.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                if cleaned == "~" {
                    cleaned = home.to_string_lossy().to_string();
                } else if cleaned.starts_with("~/") {
                    cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
                }
            }
        }

        cleaned
    }
}

/// Rupee rendering with Indian digit grouping: the last three digits,
/// then groups of two ("₹12,34,567"). Fractional paise are shown with
/// two decimals only when present.
pub fn format_currency(amount: f64) -> String {
    format!("₹{}", format_indian_number(amount))
}

fn format_indian_number(amount: f64) -> String {
    let negative = amount < 0.0;
    let paise = (amount.abs() * 100.0).round() as i64;
    let whole = paise / 100;
    let fraction = paise % 100;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups = Vec::new();
        let head_bytes = head.as_bytes();
        let mut index = head_bytes.len();
        while index > 2 {
            groups.push(&head[index - 2..index]);
            index -= 2;
        }
        groups.push(&head[..index]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if fraction != 0 {
        out.push_str(&format!(".{:02}", fraction));
    }
    out
}
