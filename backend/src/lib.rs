//! # Budget Tracker Backend
//!
//! Domain services and JSON storage for a small-team budget dashboard.
//! The backend is fully synchronous: every command runs to completion
//! before the next, and derived views (dashboard aggregates, filtered
//! tables, time series) are recomputed from the store on each query.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::json::JsonConnection;

/// Main backend struct that orchestrates all services over one data
/// directory.
pub struct Backend {
    pub config_service: domain::ConfigService,
    pub member_service: domain::MemberService,
    pub expense_service: domain::ExpenseService,
    pub attrition_service: domain::AttritionService,
    pub dashboard_service: domain::DashboardService,
    pub query_service: domain::QueryService,
    pub import_service: domain::ImportService,
    pub export_service: domain::ExportService,
}

impl Backend {
    /// Create a backend instance with all services sharing one storage
    /// connection.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let connection = Arc::new(JsonConnection::new(base_directory)?);

        Ok(Backend {
            config_service: domain::ConfigService::new(connection.clone()),
            member_service: domain::MemberService::new(connection.clone()),
            expense_service: domain::ExpenseService::new(connection.clone()),
            attrition_service: domain::AttritionService::new(connection.clone()),
            dashboard_service: domain::DashboardService::new(connection.clone()),
            query_service: domain::QueryService::new(connection.clone()),
            import_service: domain::ImportService::new(connection),
            export_service: domain::ExportService::new(),
        })
    }
}
