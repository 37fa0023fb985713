//! Domain model for the per-role budget configuration.

use serde::{Deserialize, Serialize};
use shared::{BudgetCategory, Role};

use super::month::YearMonth;

/// Pair of budget ceilings for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RoleBudget {
    pub team: f64,
    pub connectivity: f64,
}

/// Per-role budget ceilings plus the reporting month used as the
/// attrition cutoff. Members snapshot these values at save time; editing
/// the configuration never retroactively changes existing members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BudgetConfig {
    pub bps: RoleBudget,
    pub tl: RoleBudget,
    pub tm: RoleBudget,
    pub current_month: Option<YearMonth>,
}

impl BudgetConfig {
    pub fn budget_for(&self, role: Role) -> RoleBudget {
        match role {
            Role::Bps => self.bps,
            Role::Tl => self.tl,
            Role::Tm => self.tm,
        }
    }

    pub fn ceiling(&self, role: Role, category: BudgetCategory) -> f64 {
        let budget = self.budget_for(role);
        match category {
            BudgetCategory::Team => budget.team,
            BudgetCategory::Connectivity => budget.connectivity,
        }
    }
}
