//! Service for managing team members.
//!
//! Creating or editing a member snapshots the budget ceilings for their
//! role from the current configuration; the snapshot is what every
//! aggregate later counts, so a configuration change only reaches a
//! member through another save. Deleting a member cascades to their
//! expenses and attrition record.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::members::{
    CreateMemberCommand, CreateMemberResult, DeleteMemberCommand, DeleteMemberResult,
    GetMemberCommand, GetMemberResult, MemberListResult, UpdateMemberCommand, UpdateMemberResult,
};
use crate::domain::models::member::Member;
use crate::storage::json::{
    AttritionRepository, ConfigRepository, ExpenseRepository, JsonConnection, MemberRepository,
};
use crate::storage::traits::{AttritionStorage, ConfigStorage, ExpenseStorage, MemberStorage};
use shared::MemberStatus;

#[derive(Clone)]
pub struct MemberService {
    member_repository: MemberRepository,
    expense_repository: ExpenseRepository,
    attrition_repository: AttritionRepository,
    config_repository: ConfigRepository,
}

impl MemberService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            member_repository: MemberRepository::new(connection.clone()),
            expense_repository: ExpenseRepository::new(connection.clone()),
            attrition_repository: AttritionRepository::new(connection.clone()),
            config_repository: ConfigRepository::new(connection),
        }
    }

    /// Create a new member with budget snapshots for their role.
    pub fn create_member(&self, command: CreateMemberCommand) -> Result<CreateMemberResult> {
        info!("Creating member: name={}, role={}", command.name, command.role);

        let name = Self::validate_name(&command.name)?;
        let team_leader = normalize_optional(command.team_leader);

        let config = self.config_repository.get_config()?;
        let snapshot = config.budget_for(command.role);

        let now = Utc::now();
        let member = Member {
            id: Member::generate_id(),
            name,
            role: command.role,
            team_leader,
            team_budget: snapshot.team,
            connectivity_budget: snapshot.connectivity,
            status: MemberStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.member_repository.store_member(&member)?;

        info!("Created member: {} with ID: {}", member.name, member.id);
        Ok(CreateMemberResult { member })
    }

    pub fn get_member(&self, command: GetMemberCommand) -> Result<GetMemberResult> {
        let member = self.member_repository.get_member(&command.member_id)?;
        if member.is_none() {
            warn!("Member not found: {}", command.member_id);
        }
        Ok(GetMemberResult { member })
    }

    pub fn list_members(&self) -> Result<MemberListResult> {
        let members = self.member_repository.list_members()?;
        Ok(MemberListResult { members })
    }

    /// Edit a member. Both budget fields are re-snapshotted from the
    /// current configuration for the submitted role, even if the role
    /// did not change.
    pub fn update_member(&self, command: UpdateMemberCommand) -> Result<UpdateMemberResult> {
        info!("Updating member: {}", command.member_id);

        let mut member = self
            .member_repository
            .get_member(&command.member_id)?
            .ok_or_else(|| anyhow!("Member not found: {}", command.member_id))?;

        let name = Self::validate_name(&command.name)?;

        let config = self.config_repository.get_config()?;
        let snapshot = config.budget_for(command.role);

        member.name = name;
        member.role = command.role;
        member.team_leader = normalize_optional(command.team_leader);
        member.team_budget = snapshot.team;
        member.connectivity_budget = snapshot.connectivity;
        member.updated_at = Utc::now();

        self.member_repository.update_member(&member)?;

        info!("Updated member: {} with ID: {}", member.name, member.id);
        Ok(UpdateMemberResult { member })
    }

    /// Delete a member along with their expenses and attrition record.
    pub fn delete_member(&self, command: DeleteMemberCommand) -> Result<DeleteMemberResult> {
        info!("Deleting member: {}", command.member_id);

        let member = self
            .member_repository
            .get_member(&command.member_id)?
            .ok_or_else(|| anyhow!("Member not found: {}", command.member_id))?;

        let removed_expenses = self
            .expense_repository
            .delete_expenses_for_member(&command.member_id)?;
        let removed_attrition = self
            .attrition_repository
            .delete_record_for_member(&command.member_id)?;
        self.member_repository.delete_member(&command.member_id)?;

        info!(
            "Deleted member {} ({} expenses, attrition record: {})",
            member.name, removed_expenses, removed_attrition
        );

        Ok(DeleteMemberResult {
            success_message: format!("Member '{}' deleted successfully", member.name),
            removed_expenses,
            removed_attrition,
        })
    }

    fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("Member name cannot be empty"));
        }
        if trimmed.len() > 100 {
            return Err(anyhow!("Member name cannot exceed 100 characters"));
        }
        Ok(trimmed.to_string())
    }
}

/// Treat empty or whitespace-only optional text as absent.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
