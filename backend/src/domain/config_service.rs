//! Budget configuration service.
//!
//! Owns reads and validated writes of the per-role budget ceilings and
//! the reporting month. Members snapshot these ceilings when saved, so
//! edits here never touch existing members.

use anyhow::{anyhow, Result};
use log::info;
use std::sync::Arc;

use crate::domain::commands::config::{GetConfigResult, UpdateConfigCommand, UpdateConfigResult};
use crate::domain::models::budget_config::{BudgetConfig, RoleBudget};
use crate::domain::models::month::YearMonth;
use crate::storage::json::{ConfigRepository, JsonConnection};
use crate::storage::traits::ConfigStorage;

#[derive(Clone)]
pub struct ConfigService {
    config_repository: ConfigRepository,
}

impl ConfigService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        let config_repository = ConfigRepository::new(connection);
        Self { config_repository }
    }

    pub fn get_config(&self) -> Result<GetConfigResult> {
        let config = self.config_repository.get_config()?;
        Ok(GetConfigResult { config })
    }

    /// Replace the configuration. The reporting month is required and
    /// must be a well-formed YYYY-MM value; ceilings must be
    /// non-negative finite numbers.
    pub fn update_config(&self, command: UpdateConfigCommand) -> Result<UpdateConfigResult> {
        info!("Updating budget configuration, reporting month {}", command.current_month);

        let current_month: YearMonth = command.current_month.parse()?;
        Self::validate_role_budget("BPS", &command.bps)?;
        Self::validate_role_budget("TL", &command.tl)?;
        Self::validate_role_budget("TM", &command.tm)?;

        let config = BudgetConfig {
            bps: command.bps,
            tl: command.tl,
            tm: command.tm,
            current_month: Some(current_month),
        };

        self.config_repository.save_config(&config)?;

        Ok(UpdateConfigResult {
            config,
            success_message: "Configuration saved".to_string(),
        })
    }

    fn validate_role_budget(role_label: &str, budget: &RoleBudget) -> Result<()> {
        for (field, value) in [("team", budget.team), ("connectivity", budget.connectivity)] {
            if !value.is_finite() || value < 0.0 {
                return Err(anyhow!(
                    "{} {} budget must be a non-negative number",
                    role_label,
                    field
                ));
            }
        }
        Ok(())
    }
}
