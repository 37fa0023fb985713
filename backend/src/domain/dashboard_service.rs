//! Budget aggregation for the dashboard cards.
//!
//! Totals are lifetime figures recomputed from scratch on every query:
//! allotted budget is the sum of member snapshots subject to the
//! attrition cutoff, spend is the all-time sum of expenses per category.

use anyhow::Result;
use log::warn;
use std::sync::Arc;

use crate::storage::json::{
    AttritionRepository, ConfigRepository, ExpenseRepository, JsonConnection, MemberRepository,
};
use crate::storage::traits::{AttritionStorage, ConfigStorage, ExpenseStorage, MemberStorage};
use shared::{BudgetCategory, CategorySummary, DashboardSummary, MemberStatus};

#[derive(Clone)]
pub struct DashboardService {
    member_repository: MemberRepository,
    expense_repository: ExpenseRepository,
    attrition_repository: AttritionRepository,
    config_repository: ConfigRepository,
}

impl DashboardService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            member_repository: MemberRepository::new(connection.clone()),
            expense_repository: ExpenseRepository::new(connection.clone()),
            attrition_repository: AttritionRepository::new(connection.clone()),
            config_repository: ConfigRepository::new(connection),
        }
    }

    /// Total allotted budget for a category.
    ///
    /// Active members always count their snapshot. Exited members count
    /// it only while the reporting month has not passed their exit
    /// month: the budget stays allotted up to and including the exit
    /// month, then drops out. This is an inclusion cutoff at month
    /// granularity, not a fractional calculation.
    pub fn total_budget(&self, category: BudgetCategory) -> Result<f64> {
        let config = self.config_repository.get_config()?;
        let members = self.member_repository.list_members()?;
        let records = self.attrition_repository.list_records()?;

        let mut total = 0.0;
        for member in &members {
            match member.status {
                MemberStatus::Active => total += member.budget_for(category),
                MemberStatus::Exited => {
                    let record = records.iter().find(|r| r.member_id == member.id);
                    let Some(record) = record else {
                        // Exited member without an exit entry: the
                        // cascade rules should make this impossible.
                        warn!("Exited member {} has no attrition record", member.id);
                        continue;
                    };
                    let Some(current_month) = config.current_month else {
                        warn!("No reporting month configured; excluding exited member {}", member.id);
                        continue;
                    };
                    if record.exit_month >= current_month {
                        total += member.budget_for(category);
                    }
                }
            }
        }
        Ok(total)
    }

    /// All-time spend for a category, independent of member or date.
    pub fn total_spent(&self, category: BudgetCategory) -> Result<f64> {
        let expenses = self.expense_repository.list_expenses()?;
        Ok(expenses
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.amount)
            .sum())
    }

    /// The full card for one category: total, spent, remaining and
    /// utilization. Remaining may go negative to signal overspend.
    pub fn category_summary(&self, category: BudgetCategory) -> Result<CategorySummary> {
        let total_budget = self.total_budget(category)?;
        let total_spent = self.total_spent(category)?;
        let remaining = total_budget - total_spent;
        let utilization_percent = if total_budget > 0.0 {
            total_spent / total_budget * 100.0
        } else {
            0.0
        };

        Ok(CategorySummary {
            category,
            total_budget,
            total_spent,
            remaining,
            utilization_percent,
        })
    }

    pub fn dashboard_summary(&self) -> Result<DashboardSummary> {
        Ok(DashboardSummary {
            team: self.category_summary(BudgetCategory::Team)?,
            connectivity: self.category_summary(BudgetCategory::Connectivity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attrition_service::AttritionService;
    use crate::domain::commands::attrition::CreateAttritionCommand;
    use crate::domain::commands::config::UpdateConfigCommand;
    use crate::domain::commands::expenses::CreateExpenseCommand;
    use crate::domain::commands::members::CreateMemberCommand;
    use crate::domain::config_service::ConfigService;
    use crate::domain::expense_service::ExpenseService;
    use crate::domain::member_service::MemberService;
    use crate::domain::models::budget_config::RoleBudget;
    use shared::Role;
    use tempfile::tempdir;

    struct Fixture {
        dashboard: DashboardService,
        config: ConfigService,
        members: MemberService,
        expenses: ExpenseService,
        attrition: AttritionService,
        _dir: tempfile::TempDir,
    }

    fn setup() -> Fixture {
        let dir = tempdir().unwrap();
        let conn = Arc::new(JsonConnection::new(dir.path()).unwrap());
        Fixture {
            dashboard: DashboardService::new(conn.clone()),
            config: ConfigService::new(conn.clone()),
            members: MemberService::new(conn.clone()),
            expenses: ExpenseService::new(conn.clone()),
            attrition: AttritionService::new(conn),
            _dir: dir,
        }
    }

    fn configure(fixture: &Fixture, current_month: &str) {
        fixture
            .config
            .update_config(UpdateConfigCommand {
                bps: RoleBudget { team: 1000.0, connectivity: 500.0 },
                tl: RoleBudget { team: 2000.0, connectivity: 800.0 },
                tm: RoleBudget { team: 3000.0, connectivity: 900.0 },
                current_month: current_month.to_string(),
            })
            .unwrap();
    }

    fn add_member(fixture: &Fixture, name: &str, role: Role) -> String {
        fixture
            .members
            .create_member(CreateMemberCommand {
                name: name.to_string(),
                role,
                team_leader: None,
            })
            .unwrap()
            .member
            .id
    }

    fn add_expense(fixture: &Fixture, amount: f64, category: BudgetCategory, date: &str) {
        fixture
            .expenses
            .create_expense(CreateExpenseCommand {
                name: "Expense".to_string(),
                amount,
                event: "Event".to_string(),
                category,
                member_id: None,
                date: date.to_string(),
            })
            .unwrap();
    }

    #[test]
    fn worked_dashboard_scenario() {
        let fixture = setup();
        configure(&fixture, "2025-01");
        add_member(&fixture, "Asha", Role::Bps);
        add_expense(&fixture, 300.0, BudgetCategory::Team, "2025-01-10");

        let summary = fixture
            .dashboard
            .category_summary(BudgetCategory::Team)
            .unwrap();
        assert_eq!(summary.total_budget, 1000.0);
        assert_eq!(summary.total_spent, 300.0);
        assert_eq!(summary.remaining, 700.0);
        assert!((summary.utilization_percent - 30.0).abs() < 1e-9);
    }

    #[test]
    fn spent_ignores_member_and_date() {
        let fixture = setup();
        configure(&fixture, "2025-01");
        let member_id = add_member(&fixture, "Asha", Role::Bps);

        add_expense(&fixture, 100.0, BudgetCategory::Team, "2024-11-01");
        add_expense(&fixture, 250.0, BudgetCategory::Team, "2025-06-30");
        add_expense(&fixture, 75.0, BudgetCategory::Connectivity, "2025-06-30");
        fixture
            .expenses
            .create_expense(CreateExpenseCommand {
                name: "Attributed".to_string(),
                amount: 50.0,
                event: "Event".to_string(),
                category: BudgetCategory::Team,
                member_id: Some(member_id),
                date: "2025-02-14".to_string(),
            })
            .unwrap();

        assert_eq!(
            fixture.dashboard.total_spent(BudgetCategory::Team).unwrap(),
            400.0
        );
        assert_eq!(
            fixture
                .dashboard
                .total_spent(BudgetCategory::Connectivity)
                .unwrap(),
            75.0
        );
    }

    #[test]
    fn exited_member_counts_until_past_their_exit_month() {
        let fixture = setup();
        configure(&fixture, "2025-01");
        let active_id = add_member(&fixture, "Stays", Role::Bps);
        let exiting_id = add_member(&fixture, "Leaves", Role::Bps);
        let _ = active_id;

        fixture
            .attrition
            .create_record(CreateAttritionCommand {
                member_id: exiting_id,
                exit_month: "2025-03".to_string(),
            })
            .unwrap();

        // Reporting month January: exit month March lies ahead, both
        // members count.
        assert_eq!(
            fixture.dashboard.total_budget(BudgetCategory::Team).unwrap(),
            2000.0
        );

        // Reporting month June: March has passed, only the active
        // member counts.
        configure(&fixture, "2025-06");
        assert_eq!(
            fixture.dashboard.total_budget(BudgetCategory::Team).unwrap(),
            1000.0
        );

        // Boundary: reporting month equal to the exit month still
        // counts the member.
        configure(&fixture, "2025-03");
        assert_eq!(
            fixture.dashboard.total_budget(BudgetCategory::Team).unwrap(),
            2000.0
        );
    }

    #[test]
    fn utilization_is_zero_when_nothing_is_allotted() {
        let fixture = setup();
        configure(&fixture, "2025-01");
        add_expense(&fixture, 120.0, BudgetCategory::Connectivity, "2025-01-05");

        let summary = fixture
            .dashboard
            .category_summary(BudgetCategory::Connectivity)
            .unwrap();
        assert_eq!(summary.total_budget, 0.0);
        assert_eq!(summary.utilization_percent, 0.0);
        assert_eq!(summary.remaining, -120.0);
    }

    #[test]
    fn summary_covers_both_categories() {
        let fixture = setup();
        configure(&fixture, "2025-01");
        add_member(&fixture, "Asha", Role::Tl);

        let summary = fixture.dashboard.dashboard_summary().unwrap();
        assert_eq!(summary.team.total_budget, 2000.0);
        assert_eq!(summary.connectivity.total_budget, 800.0);
    }
}
