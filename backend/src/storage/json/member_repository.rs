//! JSON-backed member repository. The whole collection lives in a
//! single `members.json` document, rewritten atomically on every
//! mutation.

use anyhow::{anyhow, Result};
use log::debug;
use std::sync::Arc;

use super::connection::JsonConnection;
use crate::domain::models::member::Member;
use crate::storage::traits::MemberStorage;

const MEMBERS_FILE: &str = "members.json";

#[derive(Clone)]
pub struct MemberRepository {
    connection: Arc<JsonConnection>,
}

impl MemberRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_all(&self) -> Result<Vec<Member>> {
        Ok(self.connection.read_document(MEMBERS_FILE)?.unwrap_or_default())
    }

    fn save_all(&self, members: &[Member]) -> Result<()> {
        self.connection.write_document(MEMBERS_FILE, &members)
    }
}

impl MemberStorage for MemberRepository {
    fn store_member(&self, member: &Member) -> Result<()> {
        let mut members = self.load_all()?;
        if members.iter().any(|m| m.id == member.id) {
            return Err(anyhow!("Member already exists: {}", member.id));
        }
        members.push(member.clone());
        self.save_all(&members)
    }

    fn get_member(&self, member_id: &str) -> Result<Option<Member>> {
        let members = self.load_all()?;
        Ok(members.into_iter().find(|m| m.id == member_id))
    }

    fn list_members(&self) -> Result<Vec<Member>> {
        self.load_all()
    }

    fn update_member(&self, member: &Member) -> Result<()> {
        let mut members = self.load_all()?;
        let slot = members
            .iter_mut()
            .find(|m| m.id == member.id)
            .ok_or_else(|| anyhow!("Member not found: {}", member.id))?;
        *slot = member.clone();
        self.save_all(&members)
    }

    fn delete_member(&self, member_id: &str) -> Result<bool> {
        let mut members = self.load_all()?;
        let before = members.len();
        members.retain(|m| m.id != member_id);
        if members.len() == before {
            return Ok(false);
        }
        self.save_all(&members)?;
        Ok(true)
    }

    fn replace_members(&self, members: &[Member]) -> Result<()> {
        debug!("Replacing member collection with {} members", members.len());
        self.save_all(members)
    }
}
