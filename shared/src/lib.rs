use serde::{Deserialize, Serialize};
use std::fmt;

/// Member role within the team.
///
/// Serialized with the short labels the dashboard uses ("BPS", "TL", "TM").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "BPS")]
    Bps,
    #[serde(rename = "TL")]
    Tl,
    #[serde(rename = "TM")]
    Tm,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Bps => "BPS",
            Role::Tl => "TL",
            Role::Tm => "TM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two budget dimensions every allotment and expense belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    Team,
    Connectivity,
}

impl BudgetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetCategory::Team => "team",
            BudgetCategory::Connectivity => "connectivity",
        }
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a member is still on the team or has an attrition entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Exited,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Exited => "exited",
        }
    }
}

/// A member row of the roster table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Free-text team leader affiliation (not a foreign key).
    pub team_leader: Option<String>,
    /// Budget ceiling snapshotted from the configuration at last save.
    pub team_budget: f64,
    /// Budget ceiling snapshotted from the configuration at last save.
    pub connectivity_budget: f64,
    pub status: MemberStatus,
}

/// Aggregate dashboard figures for a single budget category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: BudgetCategory,
    pub total_budget: f64,
    pub total_spent: f64,
    /// May be negative - signals overspend, never clamped.
    pub remaining: f64,
    /// spent / total * 100, or 0.0 when the total budget is zero.
    pub utilization_percent: f64,
}

/// The two category cards shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub team: CategorySummary,
    pub connectivity: CategorySummary,
}

/// A row of the expense ledger with the member reference resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub id: String,
    /// ISO 8601 date (YYYY-MM-DD).
    pub date: String,
    /// Date formatted for display ("15 Mar 2025").
    pub formatted_date: String,
    pub name: String,
    pub amount: f64,
    pub event: String,
    pub category: BudgetCategory,
    /// Resolved member name, "General" for unattributed expenses.
    pub member_name: String,
}

/// A row of the attrition ledger with member data joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttritionRow {
    pub id: String,
    pub member_name: String,
    pub role: Role,
    /// Exit month formatted for display ("Mar 2025").
    pub formatted_exit_month: String,
    /// Combined team + connectivity snapshot of the exiting member.
    pub budget_impact: f64,
}

/// Entry for a member dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberOption {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Entry for the expense month filter dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOption {
    /// Filter value (YYYY-MM).
    pub value: String,
    /// Display label ("Mar 2025").
    pub label: String,
}

/// Month range selector for the spend chart.
///
/// Quarters are fixed 3-month slices of the calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuarterRange {
    #[default]
    All,
    Q1,
    Q2,
    Q3,
    Q4,
}

/// Per-month team/connectivity spend series for the chart.
///
/// All four vectors are index-aligned, one entry per month in the
/// selected range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpenseChart {
    /// Month labels ("Jan", "Feb", ...).
    pub labels: Vec<String>,
    /// Month numbers (1-12) matching the labels.
    pub months: Vec<u32>,
    pub team: Vec<f64>,
    pub connectivity: Vec<f64>,
}

/// A generated report ready for download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedReport {
    pub content: String,
    /// Dated file name ("budget-report-2025-08-08.txt").
    pub filename: String,
}

/// Outcome of writing a report to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathResult {
    pub success: bool,
    pub message: String,
    pub file_path: String,
}
