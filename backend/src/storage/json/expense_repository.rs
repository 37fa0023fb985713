//! JSON-backed expense repository over a single `expenses.json`
//! document.

use anyhow::{anyhow, Result};
use log::debug;
use std::sync::Arc;

use super::connection::JsonConnection;
use crate::domain::models::expense::Expense;
use crate::storage::traits::ExpenseStorage;

const EXPENSES_FILE: &str = "expenses.json";

#[derive(Clone)]
pub struct ExpenseRepository {
    connection: Arc<JsonConnection>,
}

impl ExpenseRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_all(&self) -> Result<Vec<Expense>> {
        Ok(self.connection.read_document(EXPENSES_FILE)?.unwrap_or_default())
    }

    fn save_all(&self, expenses: &[Expense]) -> Result<()> {
        self.connection.write_document(EXPENSES_FILE, &expenses)
    }
}

impl ExpenseStorage for ExpenseRepository {
    fn store_expense(&self, expense: &Expense) -> Result<()> {
        let mut expenses = self.load_all()?;
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(anyhow!("Expense already exists: {}", expense.id));
        }
        expenses.push(expense.clone());
        self.save_all(&expenses)
    }

    fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        let expenses = self.load_all()?;
        Ok(expenses.into_iter().find(|e| e.id == expense_id))
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.load_all()
    }

    fn update_expense(&self, expense: &Expense) -> Result<()> {
        let mut expenses = self.load_all()?;
        let slot = expenses
            .iter_mut()
            .find(|e| e.id == expense.id)
            .ok_or_else(|| anyhow!("Expense not found: {}", expense.id))?;
        *slot = expense.clone();
        self.save_all(&expenses)
    }

    fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let mut expenses = self.load_all()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);
        if expenses.len() == before {
            return Ok(false);
        }
        self.save_all(&expenses)?;
        Ok(true)
    }

    fn delete_expenses_for_member(&self, member_id: &str) -> Result<usize> {
        let mut expenses = self.load_all()?;
        let before = expenses.len();
        expenses.retain(|e| e.member_id.as_deref() != Some(member_id));
        let removed = before - expenses.len();
        if removed > 0 {
            self.save_all(&expenses)?;
            debug!("Removed {} expenses for member {}", removed, member_id);
        }
        Ok(removed)
    }

    fn replace_expenses(&self, expenses: &[Expense]) -> Result<()> {
        debug!("Replacing expense collection with {} expenses", expenses.len());
        self.save_all(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use shared::BudgetCategory;
    use tempfile::tempdir;

    fn test_expense(id: &str, member_id: Option<&str>) -> Expense {
        Expense {
            id: id.to_string(),
            name: "Team lunch".to_string(),
            amount: 1200.0,
            event: "Offsite".to_string(),
            category: BudgetCategory::Team,
            member_id: member_id.map(str::to_string),
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn setup() -> (ExpenseRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let conn = JsonConnection::new(dir.path()).unwrap();
        (ExpenseRepository::new(Arc::new(conn)), dir)
    }

    #[test]
    fn store_get_delete() {
        let (repo, _dir) = setup();
        repo.store_expense(&test_expense("e1", None)).unwrap();

        assert!(repo.get_expense("e1").unwrap().is_some());
        assert!(repo.delete_expense("e1").unwrap());
        assert!(repo.get_expense("e1").unwrap().is_none());
        assert!(!repo.delete_expense("e1").unwrap());
    }

    #[test]
    fn cascade_delete_removes_only_that_members_expenses() {
        let (repo, _dir) = setup();
        repo.store_expense(&test_expense("e1", Some("m1"))).unwrap();
        repo.store_expense(&test_expense("e2", Some("m1"))).unwrap();
        repo.store_expense(&test_expense("e3", Some("m2"))).unwrap();
        repo.store_expense(&test_expense("e4", None)).unwrap();

        let removed = repo.delete_expenses_for_member("m1").unwrap();
        assert_eq!(removed, 2);

        let remaining = repo.list_expenses().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().any(|e| e.id == "e3"));
        assert!(remaining.iter().any(|e| e.id == "e4"));
    }

    #[test]
    fn cascade_delete_for_unknown_member_is_a_noop() {
        let (repo, _dir) = setup();
        repo.store_expense(&test_expense("e1", None)).unwrap();
        assert_eq!(repo.delete_expenses_for_member("ghost").unwrap(), 0);
        assert_eq!(repo.list_expenses().unwrap().len(), 1);
    }

    #[test]
    fn replace_is_destructive() {
        let (repo, _dir) = setup();
        repo.store_expense(&test_expense("e1", None)).unwrap();
        repo.replace_expenses(&[test_expense("e9", None)]).unwrap();

        let expenses = repo.list_expenses().unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, "e9");
    }
}
