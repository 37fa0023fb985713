//! # Storage Traits
//!
//! Storage abstraction traits that allow different persistence backends
//! to be used interchangeably in the domain layer. All operations are
//! synchronous; every command runs to completion before the next.

use anyhow::Result;

use crate::domain::models::attrition::AttritionRecord;
use crate::domain::models::budget_config::BudgetConfig;
use crate::domain::models::expense::Expense;
use crate::domain::models::member::Member;

/// Interface for member storage operations.
pub trait MemberStorage: Send + Sync {
    /// Store a new member.
    fn store_member(&self, member: &Member) -> Result<()>;

    /// Retrieve a specific member by ID.
    fn get_member(&self, member_id: &str) -> Result<Option<Member>>;

    /// List all members in insertion order.
    fn list_members(&self) -> Result<Vec<Member>>;

    /// Update an existing member. Errors if the member does not exist.
    fn update_member(&self, member: &Member) -> Result<()>;

    /// Delete a member by ID.
    /// Returns true if the member was found and deleted.
    fn delete_member(&self, member_id: &str) -> Result<bool>;

    /// Destructively replace the whole collection (workbook import).
    fn replace_members(&self, members: &[Member]) -> Result<()>;
}

/// Interface for expense storage operations.
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense.
    fn store_expense(&self, expense: &Expense) -> Result<()>;

    /// Retrieve a specific expense by ID.
    fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;

    /// List all expenses in insertion order.
    fn list_expenses(&self) -> Result<Vec<Expense>>;

    /// Update an existing expense. Errors if the expense does not exist.
    fn update_expense(&self, expense: &Expense) -> Result<()>;

    /// Delete an expense by ID.
    /// Returns true if the expense was found and deleted.
    fn delete_expense(&self, expense_id: &str) -> Result<bool>;

    /// Delete every expense attributed to a member (cascade on member
    /// delete). Returns the number of expenses removed.
    fn delete_expenses_for_member(&self, member_id: &str) -> Result<usize>;

    /// Destructively replace the whole collection (workbook import).
    fn replace_expenses(&self, expenses: &[Expense]) -> Result<()>;
}

/// Interface for attrition record storage operations.
pub trait AttritionStorage: Send + Sync {
    /// Store a new attrition record.
    fn store_record(&self, record: &AttritionRecord) -> Result<()>;

    /// Retrieve a specific record by ID.
    fn get_record(&self, attrition_id: &str) -> Result<Option<AttritionRecord>>;

    /// Retrieve the record for a member, if any. At most one exists.
    fn get_record_for_member(&self, member_id: &str) -> Result<Option<AttritionRecord>>;

    /// List all records in insertion order.
    fn list_records(&self) -> Result<Vec<AttritionRecord>>;

    /// Delete a record by ID.
    /// Returns true if the record was found and deleted.
    fn delete_record(&self, attrition_id: &str) -> Result<bool>;

    /// Delete the record referencing a member (cascade on member
    /// delete). Returns true if one was removed.
    fn delete_record_for_member(&self, member_id: &str) -> Result<bool>;

    /// Destructively replace the whole collection.
    fn replace_records(&self, records: &[AttritionRecord]) -> Result<()>;
}

/// Interface for budget configuration storage operations.
pub trait ConfigStorage: Send + Sync {
    /// Get the stored configuration, or the default when none exists.
    fn get_config(&self) -> Result<BudgetConfig>;

    /// Persist the configuration.
    fn save_config(&self, config: &BudgetConfig) -> Result<()>;
}
