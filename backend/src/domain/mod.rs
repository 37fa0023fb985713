//! Domain layer: command services, pure aggregation/query logic and the
//! entity models.

pub mod attrition_service;
pub mod commands;
pub mod config_service;
pub mod dashboard_service;
pub mod expense_service;
pub mod export_service;
pub mod import_service;
pub mod member_service;
pub mod models;
pub mod query_service;

pub use attrition_service::AttritionService;
pub use config_service::ConfigService;
pub use dashboard_service::DashboardService;
pub use expense_service::ExpenseService;
pub use export_service::ExportService;
pub use import_service::ImportService;
pub use member_service::MemberService;
pub use query_service::QueryService;
