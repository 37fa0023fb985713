//! Workbook reconciliation: maps an externally parsed spreadsheet into
//! the entity model.
//!
//! Each recognized sheet destructively replaces its collection; sheets
//! are independent and optional. All sheets are parsed into staged
//! collections first and nothing is persisted until every present sheet
//! parsed cleanly, so a failed import leaves the store untouched.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use crate::domain::commands::imports::{ImportWorkbookCommand, ImportWorkbookResult};
use crate::domain::models::expense::Expense;
use crate::domain::models::member::Member;
use crate::domain::models::workbook::{cell, CellValue, SheetGrid};
use crate::storage::json::{
    AttritionRepository, ExpenseRepository, JsonConnection, MemberRepository,
};
use crate::storage::traits::{AttritionStorage, ExpenseStorage, MemberStorage};
use shared::{BudgetCategory, MemberStatus, Role};

/// Roster sheet: members, one per row from row index 2.
const ROSTER_SHEET: &str = "2025";
/// Expense-series sheet: one expense per matching header column.
const EXPENSES_SHEET: &str = "Expenses";
/// Per-leader budget totals.
const TL_BUDGET_SHEET: &str = "TL Connect Budget";

/// Roster column layout (0-based).
const ROSTER_DATA_START_ROW: usize = 2;
const ROSTER_NAME_COL: usize = 4;
const ROSTER_ROLE_COL: usize = 5;
const ROSTER_LEADER_COL: usize = 6;
/// Monthly figure columns H through S.
const ROSTER_MONTHLY_COLS: std::ops::RangeInclusive<usize> = 7..=18;

/// Fallback snapshots assigned to every imported member. The monthly
/// roster columns are scanned but do not feed these yet.
const FALLBACK_TEAM_BUDGET: f64 = 12000.0;
const FALLBACK_CONNECTIVITY_BUDGET: f64 = 4233.0;

/// All imported expense dates land on the 15th of their month in this
/// year.
const IMPORT_YEAR: i32 = 2025;
const IMPORT_DAY: u32 = 15;

const MONTH_ABBREVIATIONS: [(&str, u32); 11] = [
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

#[derive(Clone)]
pub struct ImportService {
    member_repository: MemberRepository,
    expense_repository: ExpenseRepository,
    attrition_repository: AttritionRepository,
    /// Held for the duration of an import; a second import started
    /// while one is running is rejected rather than racing it.
    in_flight: Arc<Mutex<()>>,
}

impl ImportService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            member_repository: MemberRepository::new(connection.clone()),
            expense_repository: ExpenseRepository::new(connection.clone()),
            attrition_repository: AttritionRepository::new(connection),
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Reconcile a parsed workbook into the store.
    pub fn import_workbook(&self, command: ImportWorkbookCommand) -> Result<ImportWorkbookResult> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| anyhow!("An import is already in progress"))?;

        let workbook = &command.workbook;
        info!(
            "Importing workbook with sheets: {:?}",
            workbook.sheet_names().collect::<Vec<_>>()
        );

        // Stage everything before touching the store.
        let mut staged_members = match workbook.sheet(ROSTER_SHEET) {
            Some(grid) => Some(self.parse_roster(grid)?),
            None => None,
        };
        let staged_expenses = match workbook.sheet(EXPENSES_SHEET) {
            Some(grid) => Some(self.parse_expense_series(grid)?),
            None => None,
        };

        let mut leader_budgets_applied = 0;
        if let Some(grid) = workbook.sheet(TL_BUDGET_SHEET) {
            // Leader totals apply to the incoming roster when one is
            // staged, otherwise to a staged copy of the stored members.
            let mut base = match staged_members.take() {
                Some(members) => members,
                None => self.member_repository.list_members()?,
            };
            leader_budgets_applied = Self::apply_leader_budgets(grid, &mut base)?;
            staged_members = Some(base);
        }

        // Commit.
        let members_imported = match &staged_members {
            Some(members) => {
                self.member_repository.replace_members(members)?;
                self.prune_dangling_attrition(members)?;
                Some(members.len())
            }
            None => None,
        };
        let expenses_imported = match &staged_expenses {
            Some(expenses) => {
                self.expense_repository.replace_expenses(expenses)?;
                Some(expenses.len())
            }
            None => None,
        };

        let success_message = format!(
            "Imported {} members, {} expenses",
            members_imported.map_or("no".to_string(), |n| n.to_string()),
            expenses_imported.map_or("no".to_string(), |n| n.to_string()),
        );
        info!("{}", success_message);

        Ok(ImportWorkbookResult {
            members_imported,
            expenses_imported,
            leader_budgets_applied,
            success_message,
        })
    }

    /// Parse the roster sheet into a replacement member collection.
    fn parse_roster(&self, grid: &SheetGrid) -> Result<Vec<Member>> {
        let mut members = Vec::new();

        for row_index in ROSTER_DATA_START_ROW..grid.len() {
            let Some(name) = cell(grid, row_index, ROSTER_NAME_COL).as_text() else {
                continue;
            };
            let lowered = name.to_lowercase();
            if lowered.contains("total") || lowered.contains("budget") {
                // Summary rows, not member rows.
                continue;
            }

            let role = match cell(grid, row_index, ROSTER_ROLE_COL).as_text() {
                Some(text) => Self::map_role(text),
                None => Role::Bps,
            };
            let team_leader = cell(grid, row_index, ROSTER_LEADER_COL)
                .as_text()
                .map(str::to_string);

            // The monthly columns carry per-month figures for some
            // rows. They are summed for the log but not wired into the
            // assigned snapshot.
            let monthly_total: f64 = ROSTER_MONTHLY_COLS
                .clone()
                .filter_map(|col| cell(grid, row_index, col).as_number())
                .filter(|v| *v > 0.0)
                .sum();
            if monthly_total > 0.0 {
                debug!(
                    "Roster row {}: {} has {} in monthly columns (not applied)",
                    row_index, name, monthly_total
                );
            }

            let now = Utc::now();
            members.push(Member {
                id: Member::generate_id(),
                name: name.trim().to_string(),
                role,
                team_leader,
                team_budget: FALLBACK_TEAM_BUDGET,
                connectivity_budget: FALLBACK_CONNECTIVITY_BUDGET,
                status: MemberStatus::Active,
                created_at: now,
                updated_at: now,
            });
        }

        info!("Parsed {} members from roster sheet", members.len());
        Ok(members)
    }

    /// Map free-text role labels onto the fixed role set.
    fn map_role(text: &str) -> Role {
        let upper = text.to_uppercase();
        if upper.contains("TL") || upper.contains("TEAM LEADER") {
            Role::Tl
        } else if upper.contains("TM") || upper.contains("TEAM MANAGER") {
            Role::Tm
        } else {
            // "PC" and "BPS" map here explicitly; everything else
            // defaults to the same role.
            Role::Bps
        }
    }

    /// Parse the expense-series sheet: every header cell containing
    /// "expense" defines one synthesized, unattributed expense whose
    /// total sits in row 0 one column to the right.
    fn parse_expense_series(&self, grid: &SheetGrid) -> Result<Vec<Expense>> {
        let mut expenses = Vec::new();

        if grid.len() < 3 {
            info!("Expenses sheet too short, staging empty expense list");
            return Ok(expenses);
        }

        let header_row = &grid[1];
        for (col, header_cell) in header_row.iter().enumerate() {
            let Some(header) = header_cell.as_text() else {
                continue;
            };
            if !header.to_lowercase().contains("expense") {
                continue;
            }

            let Some(total) = cell(grid, 0, col + 1).as_number() else {
                debug!("Expense header '{}' has no numeric total, skipping", header);
                continue;
            };
            if total <= 0.0 {
                continue;
            }

            let month = Self::month_from_header(header);
            let date = NaiveDate::from_ymd_opt(IMPORT_YEAR, month, IMPORT_DAY)
                .ok_or_else(|| anyhow!("Invalid synthesized date for month {}", month))?;
            let category = if header.to_lowercase().contains("connectivity") {
                BudgetCategory::Connectivity
            } else {
                BudgetCategory::Team
            };
            let label = header.replacen(" - Expense", "", 1).trim().to_string();

            let now = Utc::now();
            expenses.push(Expense {
                id: Expense::generate_id(),
                name: label.clone(),
                amount: total,
                event: label,
                category,
                member_id: None,
                date,
                created_at: now,
                updated_at: now,
            });
        }

        info!("Parsed {} expenses from expense sheet", expenses.len());
        Ok(expenses)
    }

    /// First month abbreviation found in the header; January when none
    /// matches.
    fn month_from_header(header: &str) -> u32 {
        let lowered = header.to_lowercase();
        MONTH_ABBREVIATIONS
            .iter()
            .find(|(abbr, _)| lowered.contains(abbr))
            .map(|(_, month)| *month)
            .unwrap_or(1)
    }

    /// Apply per-leader budget totals to TL members matched by exact
    /// name. The sheet's totals overwrite the team budget field.
    fn apply_leader_budgets(grid: &SheetGrid, members: &mut [Member]) -> Result<usize> {
        let mut applied = 0;

        for row_index in 1..grid.len() {
            let Some(name) = cell(grid, row_index, 0).as_text() else {
                continue;
            };
            let Some(budget) = cell(grid, row_index, 5).as_number() else {
                continue;
            };

            match members
                .iter_mut()
                .find(|m| m.role == Role::Tl && m.name == name)
            {
                Some(leader) => {
                    leader.team_budget = budget;
                    leader.updated_at = Utc::now();
                    applied += 1;
                }
                None => {
                    warn!("Leader budget row '{}' matched no TL member", name);
                }
            }
        }

        info!("Applied {} leader budget rows", applied);
        Ok(applied)
    }

    /// Replacing the member collection invalidates exit entries whose
    /// member no longer exists; drop them so status and attrition stay
    /// consistent.
    fn prune_dangling_attrition(&self, members: &[Member]) -> Result<()> {
        let records = self.attrition_repository.list_records()?;
        let kept: Vec<_> = records
            .into_iter()
            .filter(|r| members.iter().any(|m| m.id == r.member_id))
            .collect();
        self.attrition_repository.replace_records(&kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::attrition::CreateAttritionCommand;
    use crate::domain::commands::members::CreateMemberCommand;
    use crate::domain::attrition_service::AttritionService;
    use crate::domain::member_service::MemberService;
    use crate::domain::models::workbook::Workbook;
    use tempfile::tempdir;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    struct Fixture {
        import: ImportService,
        members: MemberService,
        attrition: AttritionService,
        member_repo: MemberRepository,
        expense_repo: ExpenseRepository,
        attrition_repo: AttritionRepository,
        _dir: tempfile::TempDir,
    }

    fn setup() -> Fixture {
        let dir = tempdir().unwrap();
        let conn = Arc::new(JsonConnection::new(dir.path()).unwrap());
        Fixture {
            import: ImportService::new(conn.clone()),
            members: MemberService::new(conn.clone()),
            attrition: AttritionService::new(conn.clone()),
            member_repo: MemberRepository::new(conn.clone()),
            expense_repo: ExpenseRepository::new(conn.clone()),
            attrition_repo: AttritionRepository::new(conn),
            _dir: dir,
        }
    }

    /// A roster row with the name/role/leader columns populated.
    fn roster_row(name: &str, role: &str, leader: &str) -> Vec<CellValue> {
        let mut row = vec![CellValue::Empty; 4];
        row.push(text(name));
        row.push(text(role));
        row.push(if leader.is_empty() { CellValue::Empty } else { text(leader) });
        row
    }

    fn roster_grid(rows: Vec<Vec<CellValue>>) -> SheetGrid {
        let mut grid = vec![vec![CellValue::Empty], vec![CellValue::Empty]];
        grid.extend(rows);
        grid
    }

    fn import(fixture: &Fixture, workbook: Workbook) -> ImportWorkbookResult {
        fixture
            .import
            .import_workbook(ImportWorkbookCommand { workbook })
            .unwrap()
    }

    #[test]
    fn roster_sheet_replaces_members() {
        let fixture = setup();
        fixture
            .members
            .create_member(CreateMemberCommand {
                name: "Old Member".to_string(),
                role: Role::Bps,
                team_leader: None,
            })
            .unwrap();

        let mut workbook = Workbook::new();
        workbook.insert_sheet(
            ROSTER_SHEET,
            roster_grid(vec![
                roster_row("Asha Rao", "BPS", "Priya"),
                roster_row("Priya Nair", "Team Leader", ""),
                roster_row("Monthly Total", "", ""),
                roster_row("Budget carry", "", ""),
            ]),
        );

        let result = import(&fixture, workbook);
        assert_eq!(result.members_imported, Some(2));
        assert_eq!(result.expenses_imported, None);

        let members = fixture.member_repo.list_members().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Asha Rao");
        assert_eq!(members[0].role, Role::Bps);
        assert_eq!(members[0].team_leader.as_deref(), Some("Priya"));
        assert_eq!(members[0].team_budget, 12000.0);
        assert_eq!(members[0].connectivity_budget, 4233.0);
        assert_eq!(members[1].role, Role::Tl);
    }

    #[test]
    fn roster_skips_non_text_and_summary_names() {
        let fixture = setup();

        let mut no_name = vec![CellValue::Empty; 4];
        no_name.push(num(42.0));
        no_name.push(text("BPS"));

        let mut workbook = Workbook::new();
        workbook.insert_sheet(
            ROSTER_SHEET,
            roster_grid(vec![
                no_name,
                roster_row("TOTAL BUDGET", "BPS", ""),
                roster_row("Real Person", "PC", ""),
            ]),
        );

        let result = import(&fixture, workbook);
        assert_eq!(result.members_imported, Some(1));
        let members = fixture.member_repo.list_members().unwrap();
        assert_eq!(members[0].name, "Real Person");
        assert_eq!(members[0].role, Role::Bps);
    }

    #[test]
    fn role_mapping_is_substring_and_case_insensitive() {
        assert_eq!(ImportService::map_role("tl"), Role::Tl);
        assert_eq!(ImportService::map_role("Team Leader"), Role::Tl);
        assert_eq!(ImportService::map_role("Senior TM"), Role::Tm);
        assert_eq!(ImportService::map_role("team manager"), Role::Tm);
        assert_eq!(ImportService::map_role("PC"), Role::Bps);
        assert_eq!(ImportService::map_role("BPS"), Role::Bps);
        assert_eq!(ImportService::map_role("Consultant"), Role::Bps);
    }

    #[test]
    fn expense_sheet_synthesizes_monthly_expenses() {
        let fixture = setup();

        // Row 0 carries totals one column right of each header; row 1
        // carries the headers.
        let grid: SheetGrid = vec![
            vec![CellValue::Empty, num(5000.0), CellValue::Empty, num(1200.0), CellValue::Empty, num(0.0)],
            vec![
                text("Mar Offsite - Expense"),
                CellValue::Empty,
                text("Connectivity May - Expense"),
                CellValue::Empty,
                text("Zero row - Expense"),
                CellValue::Empty,
            ],
            vec![CellValue::Empty],
            vec![CellValue::Empty],
        ];
        let mut workbook = Workbook::new();
        workbook.insert_sheet(EXPENSES_SHEET, grid);

        let result = import(&fixture, workbook);
        assert_eq!(result.expenses_imported, Some(2));

        let expenses = fixture.expense_repo.list_expenses().unwrap();
        assert_eq!(expenses.len(), 2);

        let offsite = &expenses[0];
        assert_eq!(offsite.name, "Mar Offsite");
        assert_eq!(offsite.event, "Mar Offsite");
        assert_eq!(offsite.amount, 5000.0);
        assert_eq!(offsite.category, BudgetCategory::Team);
        assert_eq!(offsite.date.to_string(), "2025-03-15");
        assert_eq!(offsite.member_id, None);

        let connect = &expenses[1];
        assert_eq!(connect.category, BudgetCategory::Connectivity);
        assert_eq!(connect.date.to_string(), "2025-05-15");
    }

    #[test]
    fn headers_without_month_default_to_january() {
        assert_eq!(ImportService::month_from_header("Snacks - Expense"), 1);
        assert_eq!(ImportService::month_from_header("DEC party - Expense"), 12);
        assert_eq!(ImportService::month_from_header("april top-up - Expense"), 4);
    }

    #[test]
    fn short_expense_sheet_clears_expenses() {
        let fixture = setup();

        // Pre-existing expense gets wiped because the sheet is present,
        // even though it is too short to hold any series.
        let now = Utc::now();
        fixture
            .expense_repo
            .store_expense(&Expense {
                id: "e1".to_string(),
                name: "Old".to_string(),
                amount: 10.0,
                event: "Old".to_string(),
                category: BudgetCategory::Team,
                member_id: None,
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                created_at: now,
                updated_at: now,
            })
            .unwrap();

        let mut workbook = Workbook::new();
        workbook.insert_sheet(EXPENSES_SHEET, vec![vec![CellValue::Empty]]);

        let result = import(&fixture, workbook);
        assert_eq!(result.expenses_imported, Some(0));
        assert!(fixture.expense_repo.list_expenses().unwrap().is_empty());
    }

    #[test]
    fn leader_budget_sheet_overwrites_team_budget_of_matching_tl() {
        let fixture = setup();

        let mut workbook = Workbook::new();
        workbook.insert_sheet(
            ROSTER_SHEET,
            roster_grid(vec![
                roster_row("Priya Nair", "TL", ""),
                roster_row("Asha Rao", "BPS", "Priya Nair"),
            ]),
        );
        let tl_grid: SheetGrid = vec![
            vec![text("Leader"), CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty, text("Budget Total")],
            vec![text("Priya Nair"), CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty, num(18000.0)],
            vec![text("Nobody Known"), CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty, num(9000.0)],
        ];
        workbook.insert_sheet(TL_BUDGET_SHEET, tl_grid);

        let result = import(&fixture, workbook);
        assert_eq!(result.leader_budgets_applied, 1);

        let members = fixture.member_repo.list_members().unwrap();
        let priya = members.iter().find(|m| m.name == "Priya Nair").unwrap();
        // The sheet feeds the team budget field; connectivity keeps the
        // fallback.
        assert_eq!(priya.team_budget, 18000.0);
        assert_eq!(priya.connectivity_budget, 4233.0);

        let asha = members.iter().find(|m| m.name == "Asha Rao").unwrap();
        assert_eq!(asha.team_budget, 12000.0);
    }

    #[test]
    fn leader_budgets_apply_to_stored_members_without_roster_sheet() {
        let fixture = setup();
        fixture
            .members
            .create_member(CreateMemberCommand {
                name: "Priya Nair".to_string(),
                role: Role::Tl,
                team_leader: None,
            })
            .unwrap();

        let mut workbook = Workbook::new();
        workbook.insert_sheet(
            TL_BUDGET_SHEET,
            vec![
                vec![text("Leader")],
                vec![text("Priya Nair"), CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty, num(7500.0)],
            ],
        );

        let result = import(&fixture, workbook);
        assert_eq!(result.leader_budgets_applied, 1);

        let members = fixture.member_repo.list_members().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].team_budget, 7500.0);
    }

    #[test]
    fn unrecognized_sheets_leave_everything_alone() {
        let fixture = setup();
        fixture
            .members
            .create_member(CreateMemberCommand {
                name: "Keep Me".to_string(),
                role: Role::Bps,
                team_leader: None,
            })
            .unwrap();

        let mut workbook = Workbook::new();
        workbook.insert_sheet("Some Other Sheet", vec![vec![text("data")]]);

        let result = import(&fixture, workbook);
        assert_eq!(result.members_imported, None);
        assert_eq!(result.expenses_imported, None);
        assert_eq!(fixture.member_repo.list_members().unwrap().len(), 1);
    }

    #[test]
    fn replacing_the_roster_prunes_dangling_exit_entries() {
        let fixture = setup();
        let member_id = fixture
            .members
            .create_member(CreateMemberCommand {
                name: "Old Member".to_string(),
                role: Role::Bps,
                team_leader: None,
            })
            .unwrap()
            .member
            .id;
        fixture
            .attrition
            .create_record(CreateAttritionCommand {
                member_id,
                exit_month: "2025-04".to_string(),
            })
            .unwrap();

        let mut workbook = Workbook::new();
        workbook.insert_sheet(
            ROSTER_SHEET,
            roster_grid(vec![roster_row("New Member", "BPS", "")]),
        );
        import(&fixture, workbook);

        assert!(fixture.attrition_repo.list_records().unwrap().is_empty());
    }
}
