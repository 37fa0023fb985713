//! Domain model for an expense.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::BudgetCategory;
use uuid::Uuid;

use super::month::YearMonth;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub name: String,
    /// Always positive. Zero and negative amounts are rejected at
    /// command validation time.
    pub amount: f64,
    /// Free-text event label.
    pub event: String,
    pub category: BudgetCategory,
    /// None for general expenses not attributed to a member.
    pub member_id: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Generate a unique expense ID.
    /// Format: exp-<uuid-v4>
    pub fn generate_id() -> String {
        format!("exp-{}", Uuid::new_v4())
    }

    /// The month this expense falls in, for month filters and the
    /// month-selection dropdown.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}
