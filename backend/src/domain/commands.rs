//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are
//! **not** exposed over the public API. The rendering layer is
//! responsible for mapping the public DTOs defined in the `shared` crate
//! to these internal types.

pub mod config {
    use crate::domain::models::budget_config::{BudgetConfig, RoleBudget};

    /// Input for replacing the budget configuration.
    #[derive(Debug, Clone)]
    pub struct UpdateConfigCommand {
        pub bps: RoleBudget,
        pub tl: RoleBudget,
        pub tm: RoleBudget,
        /// Reporting month (YYYY-MM).
        pub current_month: String,
    }

    /// Result of reading the budget configuration.
    #[derive(Debug, Clone)]
    pub struct GetConfigResult {
        pub config: BudgetConfig,
    }

    /// Result of replacing the budget configuration.
    #[derive(Debug, Clone)]
    pub struct UpdateConfigResult {
        pub config: BudgetConfig,
        pub success_message: String,
    }
}

pub mod members {
    use crate::domain::models::member::Member;
    use shared::Role;

    /// Input for creating a new member.
    #[derive(Debug, Clone)]
    pub struct CreateMemberCommand {
        pub name: String,
        pub role: Role,
        pub team_leader: Option<String>,
    }

    /// Input for editing a member. The member form always submits every
    /// field, so updates carry the full set rather than partials.
    #[derive(Debug, Clone)]
    pub struct UpdateMemberCommand {
        pub member_id: String,
        pub name: String,
        pub role: Role,
        pub team_leader: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct GetMemberCommand {
        pub member_id: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteMemberCommand {
        pub member_id: String,
    }

    /// Query parameters for listing members.
    #[derive(Debug, Clone, Default)]
    pub struct MemberListQuery {
        /// Exact-match role filter; None lists every member.
        pub role: Option<Role>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateMemberResult {
        pub member: Member,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateMemberResult {
        pub member: Member,
    }

    #[derive(Debug, Clone)]
    pub struct GetMemberResult {
        pub member: Option<Member>,
    }

    #[derive(Debug, Clone)]
    pub struct MemberListResult {
        pub members: Vec<Member>,
    }

    /// Result of a cascading member delete.
    #[derive(Debug, Clone)]
    pub struct DeleteMemberResult {
        pub success_message: String,
        /// How many of the member's expenses were removed with them.
        pub removed_expenses: usize,
        /// Whether an attrition record was removed with them.
        pub removed_attrition: bool,
    }
}

pub mod expenses {
    use crate::domain::models::expense::Expense;
    use crate::domain::models::month::YearMonth;
    use shared::BudgetCategory;

    /// Input for creating a new expense.
    #[derive(Debug, Clone)]
    pub struct CreateExpenseCommand {
        pub name: String,
        pub amount: f64,
        pub event: String,
        pub category: BudgetCategory,
        /// Empty or missing means a general, unattributed expense.
        pub member_id: Option<String>,
        /// ISO 8601 date (YYYY-MM-DD).
        pub date: String,
    }

    /// Input for editing an expense (full field set, like the form).
    #[derive(Debug, Clone)]
    pub struct UpdateExpenseCommand {
        pub expense_id: String,
        pub name: String,
        pub amount: f64,
        pub event: String,
        pub category: BudgetCategory,
        pub member_id: Option<String>,
        pub date: String,
    }

    #[derive(Debug, Clone)]
    pub struct GetExpenseCommand {
        pub expense_id: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteExpenseCommand {
        pub expense_id: String,
    }

    /// Query parameters for listing expenses. Filters are independent
    /// and compose with logical AND.
    #[derive(Debug, Clone, Default)]
    pub struct ExpenseListQuery {
        pub category: Option<BudgetCategory>,
        pub month: Option<YearMonth>,
        pub member_id: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateExpenseResult {
        pub expense: Expense,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateExpenseResult {
        pub expense: Expense,
    }

    #[derive(Debug, Clone)]
    pub struct GetExpenseResult {
        pub expense: Option<Expense>,
    }

    #[derive(Debug, Clone)]
    pub struct ExpenseListResult {
        pub expenses: Vec<Expense>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteExpenseResult {
        pub success_message: String,
    }
}

pub mod attrition {
    use crate::domain::models::attrition::AttritionRecord;

    /// Input for recording a member's exit.
    #[derive(Debug, Clone)]
    pub struct CreateAttritionCommand {
        pub member_id: String,
        /// Exit month (YYYY-MM).
        pub exit_month: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteAttritionCommand {
        pub attrition_id: String,
    }

    #[derive(Debug, Clone)]
    pub struct CreateAttritionResult {
        pub record: AttritionRecord,
    }

    #[derive(Debug, Clone)]
    pub struct AttritionListResult {
        pub records: Vec<AttritionRecord>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteAttritionResult {
        pub success_message: String,
    }
}

pub mod imports {
    use crate::domain::models::workbook::Workbook;

    /// Input for reconciling an externally parsed workbook into the
    /// entity store.
    #[derive(Debug, Clone)]
    pub struct ImportWorkbookCommand {
        pub workbook: Workbook,
    }

    /// Counts of what the import replaced. A `None` count means the
    /// corresponding sheet was absent and the collection was left alone.
    #[derive(Debug, Clone)]
    pub struct ImportWorkbookResult {
        pub members_imported: Option<usize>,
        pub expenses_imported: Option<usize>,
        /// Team-leader budget rows that matched a TL member.
        pub leader_budgets_applied: usize,
        pub success_message: String,
    }
}

pub mod charts {
    use shared::QuarterRange;

    /// Query parameters for the monthly spend time series.
    #[derive(Debug, Clone, Default)]
    pub struct ChartQuery {
        /// Team-leader name filter; None charts every expense.
        pub team_leader: Option<String>,
        pub range: QuarterRange,
    }
}

pub mod reports {
    /// Input for exporting the report to a file on disk.
    #[derive(Debug, Clone, Default)]
    pub struct ExportToPathCommand {
        /// Target directory; falls back to the Documents folder.
        pub custom_path: Option<String>,
    }
}
