//! Service for managing attrition (exit) records.
//!
//! Attrition records and member status move together: creating a record
//! flips the member to exited, deleting it flips them back to active. A
//! member can have at most one record at a time.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::domain::commands::attrition::{
    AttritionListResult, CreateAttritionCommand, CreateAttritionResult, DeleteAttritionCommand,
    DeleteAttritionResult,
};
use crate::domain::models::attrition::AttritionRecord;
use crate::domain::models::month::YearMonth;
use crate::storage::json::{AttritionRepository, JsonConnection, MemberRepository};
use crate::storage::traits::{AttritionStorage, MemberStorage};
use shared::MemberStatus;

#[derive(Clone)]
pub struct AttritionService {
    attrition_repository: AttritionRepository,
    member_repository: MemberRepository,
}

impl AttritionService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            attrition_repository: AttritionRepository::new(connection.clone()),
            member_repository: MemberRepository::new(connection),
        }
    }

    /// Record a member's exit and flip their status to exited.
    ///
    /// Rejected if the member already has a record, leaving the original
    /// record and the member's status untouched.
    pub fn create_record(&self, command: CreateAttritionCommand) -> Result<CreateAttritionResult> {
        info!(
            "Recording exit: member={}, month={}",
            command.member_id, command.exit_month
        );

        let exit_month: YearMonth = command.exit_month.parse()?;

        let mut member = self
            .member_repository
            .get_member(&command.member_id)?
            .ok_or_else(|| anyhow!("Member not found: {}", command.member_id))?;

        if self
            .attrition_repository
            .get_record_for_member(&command.member_id)?
            .is_some()
        {
            return Err(anyhow!("This member already has an exit entry"));
        }

        let record = AttritionRecord {
            id: AttritionRecord::generate_id(),
            member_id: command.member_id.clone(),
            exit_month,
            created_at: Utc::now(),
        };

        self.attrition_repository.store_record(&record)?;

        member.status = MemberStatus::Exited;
        member.updated_at = Utc::now();
        self.member_repository.update_member(&member)?;

        info!("Recorded exit for {} in {}", member.name, exit_month);
        Ok(CreateAttritionResult { record })
    }

    pub fn list_records(&self) -> Result<AttritionListResult> {
        let records = self.attrition_repository.list_records()?;
        Ok(AttritionListResult { records })
    }

    /// Remove an exit entry and flip the member back to active.
    pub fn delete_record(&self, command: DeleteAttritionCommand) -> Result<DeleteAttritionResult> {
        info!("Removing exit entry: {}", command.attrition_id);

        let record = self
            .attrition_repository
            .get_record(&command.attrition_id)?
            .ok_or_else(|| anyhow!("Exit entry not found: {}", command.attrition_id))?;

        self.attrition_repository.delete_record(&command.attrition_id)?;

        // The member may already be gone if the entry outlived a
        // cascade; only flip status when they still exist.
        if let Some(mut member) = self.member_repository.get_member(&record.member_id)? {
            member.status = MemberStatus::Active;
            member.updated_at = Utc::now();
            self.member_repository.update_member(&member)?;
        }

        Ok(DeleteAttritionResult {
            success_message: "Exit entry removed".to_string(),
        })
    }
}
