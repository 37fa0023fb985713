//! JSON-backed budget configuration repository.
//!
//! The configuration is a single `budget_config.json` document. Reads of
//! a missing file fall back to the all-zero default so a fresh data
//! directory behaves like an unconfigured dashboard.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use super::connection::JsonConnection;
use crate::domain::models::budget_config::BudgetConfig;
use crate::storage::traits::ConfigStorage;

const CONFIG_FILE: &str = "budget_config.json";

#[derive(Clone)]
pub struct ConfigRepository {
    connection: Arc<JsonConnection>,
}

impl ConfigRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl ConfigStorage for ConfigRepository {
    fn get_config(&self) -> Result<BudgetConfig> {
        Ok(self.connection.read_document(CONFIG_FILE)?.unwrap_or_default())
    }

    fn save_config(&self, config: &BudgetConfig) -> Result<()> {
        self.connection.write_document(CONFIG_FILE, config)?;
        info!("Saved budget configuration");
        Ok(())
    }
}
