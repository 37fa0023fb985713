//! Service for managing expenses.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::expenses::{
    CreateExpenseCommand, CreateExpenseResult, DeleteExpenseCommand, DeleteExpenseResult,
    GetExpenseCommand, GetExpenseResult, ExpenseListResult, UpdateExpenseCommand,
    UpdateExpenseResult,
};
use crate::domain::models::expense::Expense;
use crate::storage::json::{ExpenseRepository, JsonConnection, MemberRepository};
use crate::storage::traits::{ExpenseStorage, MemberStorage};

#[derive(Clone)]
pub struct ExpenseService {
    expense_repository: ExpenseRepository,
    member_repository: MemberRepository,
}

impl ExpenseService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            expense_repository: ExpenseRepository::new(connection.clone()),
            member_repository: MemberRepository::new(connection),
        }
    }

    /// Create a new expense.
    pub fn create_expense(&self, command: CreateExpenseCommand) -> Result<CreateExpenseResult> {
        info!(
            "Creating expense: name={}, amount={}, category={}",
            command.name, command.amount, command.category
        );

        let (name, event) = Self::validate_texts(&command.name, &command.event)?;
        Self::validate_amount(command.amount)?;
        let date = Self::parse_date(&command.date)?;
        let member_id = self.validate_member_reference(command.member_id)?;

        let now = Utc::now();
        let expense = Expense {
            id: Expense::generate_id(),
            name,
            amount: command.amount,
            event,
            category: command.category,
            member_id,
            date,
            created_at: now,
            updated_at: now,
        };

        self.expense_repository.store_expense(&expense)?;

        info!("Created expense: {} with ID: {}", expense.name, expense.id);
        Ok(CreateExpenseResult { expense })
    }

    pub fn get_expense(&self, command: GetExpenseCommand) -> Result<GetExpenseResult> {
        let expense = self.expense_repository.get_expense(&command.expense_id)?;
        if expense.is_none() {
            warn!("Expense not found: {}", command.expense_id);
        }
        Ok(GetExpenseResult { expense })
    }

    pub fn list_expenses(&self) -> Result<ExpenseListResult> {
        let expenses = self.expense_repository.list_expenses()?;
        Ok(ExpenseListResult { expenses })
    }

    /// Edit an expense (full field set, like the form).
    pub fn update_expense(&self, command: UpdateExpenseCommand) -> Result<UpdateExpenseResult> {
        info!("Updating expense: {}", command.expense_id);

        let mut expense = self
            .expense_repository
            .get_expense(&command.expense_id)?
            .ok_or_else(|| anyhow!("Expense not found: {}", command.expense_id))?;

        let (name, event) = Self::validate_texts(&command.name, &command.event)?;
        Self::validate_amount(command.amount)?;
        let date = Self::parse_date(&command.date)?;
        let member_id = self.validate_member_reference(command.member_id)?;

        expense.name = name;
        expense.amount = command.amount;
        expense.event = event;
        expense.category = command.category;
        expense.member_id = member_id;
        expense.date = date;
        expense.updated_at = Utc::now();

        self.expense_repository.update_expense(&expense)?;

        Ok(UpdateExpenseResult { expense })
    }

    pub fn delete_expense(&self, command: DeleteExpenseCommand) -> Result<DeleteExpenseResult> {
        info!("Deleting expense: {}", command.expense_id);

        let found = self.expense_repository.delete_expense(&command.expense_id)?;
        if !found {
            return Err(anyhow!("Expense not found: {}", command.expense_id));
        }

        Ok(DeleteExpenseResult {
            success_message: "Expense deleted successfully".to_string(),
        })
    }

    fn validate_texts(name: &str, event: &str) -> Result<(String, String)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("Expense name cannot be empty"));
        }
        let event = event.trim();
        if event.is_empty() {
            return Err(anyhow!("Expense event cannot be empty"));
        }
        Ok((name.to_string(), event.to_string()))
    }

    fn validate_amount(amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(anyhow!("Expense amount must be a positive number"));
        }
        Ok(())
    }

    fn parse_date(date: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .context("Invalid expense date. Use YYYY-MM-DD.")
    }

    /// An attributed expense must reference an existing member; empty
    /// selections mean a general expense.
    fn validate_member_reference(&self, member_id: Option<String>) -> Result<Option<String>> {
        let member_id = member_id.filter(|id| !id.trim().is_empty());
        if let Some(ref id) = member_id {
            if self.member_repository.get_member(id)?.is_none() {
                return Err(anyhow!("Member not found: {}", id));
            }
        }
        Ok(member_id)
    }
}
