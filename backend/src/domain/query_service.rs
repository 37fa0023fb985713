//! Read-only derived views over the entity store.
//!
//! Every view is a pure filter/reduce recomputed on demand; nothing is
//! cached or incrementally maintained.

use anyhow::Result;
use log::warn;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::commands::charts::ChartQuery;
use crate::domain::commands::expenses::ExpenseListQuery;
use crate::domain::commands::members::MemberListQuery;
use crate::domain::models::expense::Expense;
use crate::domain::models::member::Member;
use crate::domain::models::month::YearMonth;
use crate::storage::json::{
    AttritionRepository, ExpenseRepository, JsonConnection, MemberRepository,
};
use crate::storage::traits::{AttritionStorage, ExpenseStorage, MemberStorage};
use shared::{
    AttritionRow, BudgetCategory, ExpenseRow, MemberOption, MonthOption, MonthlyExpenseChart,
    QuarterRange, Role,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Clone)]
pub struct QueryService {
    member_repository: MemberRepository,
    expense_repository: ExpenseRepository,
    attrition_repository: AttritionRepository,
}

impl QueryService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            member_repository: MemberRepository::new(connection.clone()),
            expense_repository: ExpenseRepository::new(connection.clone()),
            attrition_repository: AttritionRepository::new(connection),
        }
    }

    /// Members, optionally restricted to one role.
    pub fn list_members(&self, query: MemberListQuery) -> Result<Vec<Member>> {
        let mut members = self.member_repository.list_members()?;
        if let Some(role) = query.role {
            members.retain(|m| m.role == role);
        }
        Ok(members)
    }

    /// Expenses with the query's filters AND-composed.
    pub fn list_expenses(&self, query: ExpenseListQuery) -> Result<Vec<Expense>> {
        let mut expenses = self.expense_repository.list_expenses()?;
        if let Some(category) = query.category {
            expenses.retain(|e| e.category == category);
        }
        if let Some(month) = query.month {
            expenses.retain(|e| e.year_month() == month);
        }
        if let Some(ref member_id) = query.member_id {
            expenses.retain(|e| e.member_id.as_deref() == Some(member_id.as_str()));
        }
        Ok(expenses)
    }

    /// The member view as roster-table rows.
    pub fn member_rows(&self, query: MemberListQuery) -> Result<Vec<shared::Member>> {
        let members = self.list_members(query)?;
        Ok(members
            .into_iter()
            .map(|m| shared::Member {
                id: m.id,
                name: m.name,
                role: m.role,
                team_leader: m.team_leader,
                team_budget: m.team_budget,
                connectivity_budget: m.connectivity_budget,
                status: m.status,
            })
            .collect())
    }

    /// The filtered expense view joined with member display names for
    /// the ledger table.
    pub fn expense_rows(&self, query: ExpenseListQuery) -> Result<Vec<ExpenseRow>> {
        let expenses = self.list_expenses(query)?;
        let members = self.member_repository.list_members()?;

        let rows = expenses
            .into_iter()
            .map(|expense| {
                let member_name = match &expense.member_id {
                    None => "General".to_string(),
                    Some(id) => match members.iter().find(|m| &m.id == id) {
                        Some(member) => member.name.clone(),
                        None => {
                            warn!("Expense {} references missing member {}", expense.id, id);
                            "Unknown member".to_string()
                        }
                    },
                };
                ExpenseRow {
                    id: expense.id.clone(),
                    date: expense.date.to_string(),
                    formatted_date: expense.date.format("%d %b %Y").to_string(),
                    name: expense.name.clone(),
                    amount: expense.amount,
                    event: expense.event.clone(),
                    category: expense.category,
                    member_name,
                }
            })
            .collect();
        Ok(rows)
    }

    /// The attrition ledger joined with member data. The budget impact
    /// shown is the exiting member's combined snapshot.
    pub fn attrition_rows(&self) -> Result<Vec<AttritionRow>> {
        let records = self.attrition_repository.list_records()?;
        let members = self.member_repository.list_members()?;

        let rows = records
            .into_iter()
            .map(|record| {
                match members.iter().find(|m| m.id == record.member_id) {
                    Some(member) => AttritionRow {
                        id: record.id,
                        member_name: member.name.clone(),
                        role: member.role,
                        formatted_exit_month: record.exit_month.label(),
                        budget_impact: member.team_budget + member.connectivity_budget,
                    },
                    None => {
                        warn!(
                            "Attrition record {} references missing member {}",
                            record.id, record.member_id
                        );
                        AttritionRow {
                            id: record.id,
                            member_name: "Unknown member".to_string(),
                            role: Role::Bps,
                            formatted_exit_month: record.exit_month.label(),
                            budget_impact: 0.0,
                        }
                    }
                }
            })
            .collect();
        Ok(rows)
    }

    /// Distinct expense months, most recent first, for the month filter
    /// dropdown.
    pub fn distinct_expense_months(&self) -> Result<Vec<MonthOption>> {
        let expenses = self.expense_repository.list_expenses()?;
        let months: BTreeSet<YearMonth> =
            expenses.iter().map(Expense::year_month).collect();

        Ok(months
            .into_iter()
            .rev()
            .map(|month| MonthOption {
                value: month.to_string(),
                label: month.label(),
            })
            .collect())
    }

    /// Distinct team-leader names (members with the TL role) for the
    /// chart filter dropdown.
    pub fn team_leader_options(&self) -> Result<Vec<String>> {
        let members = self.member_repository.list_members()?;
        let mut seen = BTreeSet::new();
        let mut leaders = Vec::new();
        for member in members.iter().filter(|m| m.role == Role::Tl) {
            if seen.insert(member.name.clone()) {
                leaders.push(member.name.clone());
            }
        }
        Ok(leaders)
    }

    /// Members for dropdown population, optionally active members only.
    pub fn member_options(&self, active_only: bool) -> Result<Vec<MemberOption>> {
        let members = self.member_repository.list_members()?;
        Ok(members
            .into_iter()
            .filter(|m| !active_only || m.status == shared::MemberStatus::Active)
            .map(|m| MemberOption {
                id: m.id,
                name: m.name,
                role: m.role,
            })
            .collect())
    }

    /// Per-month team/connectivity spend for the chart.
    ///
    /// Months match on month-of-year only. The team-leader filter is
    /// exact on the attributed member's team-leader field; for general
    /// expenses it falls back to a case-insensitive substring match of
    /// the leader's name inside the expense name - a best-effort
    /// heuristic, not authoritative attribution.
    pub fn monthly_expense_chart(&self, query: ChartQuery) -> Result<MonthlyExpenseChart> {
        let expenses = self.expense_repository.list_expenses()?;
        let members = self.member_repository.list_members()?;

        let months = Self::months_in_range(query.range);
        let mut labels = Vec::with_capacity(months.len());
        let mut team = Vec::with_capacity(months.len());
        let mut connectivity = Vec::with_capacity(months.len());

        for &month in &months {
            let mut team_total = 0.0;
            let mut connectivity_total = 0.0;

            for expense in &expenses {
                if expense.year_month().month() != month {
                    continue;
                }
                if let Some(ref leader) = query.team_leader {
                    let matches = match &expense.member_id {
                        Some(member_id) => members
                            .iter()
                            .find(|m| &m.id == member_id)
                            .map(|m| m.team_leader.as_deref() == Some(leader.as_str()))
                            .unwrap_or(false),
                        None => expense
                            .name
                            .to_lowercase()
                            .contains(&leader.to_lowercase()),
                    };
                    if !matches {
                        continue;
                    }
                }
                match expense.category {
                    BudgetCategory::Team => team_total += expense.amount,
                    BudgetCategory::Connectivity => connectivity_total += expense.amount,
                }
            }

            labels.push(MONTH_LABELS[(month - 1) as usize].to_string());
            team.push(team_total);
            connectivity.push(connectivity_total);
        }

        Ok(MonthlyExpenseChart {
            labels,
            months,
            team,
            connectivity,
        })
    }

    /// The month numbers covered by a range: the whole year, or one
    /// fixed calendar quarter.
    fn months_in_range(range: QuarterRange) -> Vec<u32> {
        match range {
            QuarterRange::All => (1..=12).collect(),
            QuarterRange::Q1 => (1..=3).collect(),
            QuarterRange::Q2 => (4..=6).collect(),
            QuarterRange::Q3 => (7..=9).collect(),
            QuarterRange::Q4 => (10..=12).collect(),
        }
    }
}
