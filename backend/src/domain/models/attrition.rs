//! Domain model for an attrition (exit) record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::YearMonth;

/// A member's exit entry. A member has at most one of these at a time;
/// its existence is what marks the member as exited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttritionRecord {
    pub id: String,
    pub member_id: String,
    /// The member's budget stays counted up to and including this month.
    pub exit_month: YearMonth,
    pub created_at: DateTime<Utc>,
}

impl AttritionRecord {
    /// Generate a unique attrition record ID.
    /// Format: att-<uuid-v4>
    pub fn generate_id() -> String {
        format!("att-{}", Uuid::new_v4())
    }
}
