//! Domain model for a team member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{BudgetCategory, MemberStatus, Role};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Free-text team leader affiliation. Informal by design - not a
    /// foreign key into the member collection.
    pub team_leader: Option<String>,
    /// Ceiling snapshotted from the configuration at last save, not
    /// live-linked to later configuration changes.
    pub team_budget: f64,
    pub connectivity_budget: f64,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Generate a unique member ID.
    /// Format: mbr-<uuid-v4>
    pub fn generate_id() -> String {
        format!("mbr-{}", Uuid::new_v4())
    }

    /// The snapshotted ceiling for one budget dimension.
    pub fn budget_for(&self, category: BudgetCategory) -> f64 {
        match category {
            BudgetCategory::Team => self.team_budget,
            BudgetCategory::Connectivity => self.connectivity_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let a = Member::generate_id();
        let b = Member::generate_id();
        assert!(a.starts_with("mbr-"));
        assert_ne!(a, b);
    }
}
