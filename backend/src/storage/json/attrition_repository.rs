//! JSON-backed attrition record repository over a single
//! `attrition.json` document.

use anyhow::{anyhow, Result};
use log::debug;
use std::sync::Arc;

use super::connection::JsonConnection;
use crate::domain::models::attrition::AttritionRecord;
use crate::storage::traits::AttritionStorage;

const ATTRITION_FILE: &str = "attrition.json";

#[derive(Clone)]
pub struct AttritionRepository {
    connection: Arc<JsonConnection>,
}

impl AttritionRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_all(&self) -> Result<Vec<AttritionRecord>> {
        Ok(self.connection.read_document(ATTRITION_FILE)?.unwrap_or_default())
    }

    fn save_all(&self, records: &[AttritionRecord]) -> Result<()> {
        self.connection.write_document(ATTRITION_FILE, &records)
    }
}

impl AttritionStorage for AttritionRepository {
    fn store_record(&self, record: &AttritionRecord) -> Result<()> {
        let mut records = self.load_all()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(anyhow!("Attrition record already exists: {}", record.id));
        }
        records.push(record.clone());
        self.save_all(&records)
    }

    fn get_record(&self, attrition_id: &str) -> Result<Option<AttritionRecord>> {
        let records = self.load_all()?;
        Ok(records.into_iter().find(|r| r.id == attrition_id))
    }

    fn get_record_for_member(&self, member_id: &str) -> Result<Option<AttritionRecord>> {
        let records = self.load_all()?;
        Ok(records.into_iter().find(|r| r.member_id == member_id))
    }

    fn list_records(&self) -> Result<Vec<AttritionRecord>> {
        self.load_all()
    }

    fn delete_record(&self, attrition_id: &str) -> Result<bool> {
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|r| r.id != attrition_id);
        if records.len() == before {
            return Ok(false);
        }
        self.save_all(&records)?;
        Ok(true)
    }

    fn delete_record_for_member(&self, member_id: &str) -> Result<bool> {
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|r| r.member_id != member_id);
        if records.len() == before {
            return Ok(false);
        }
        self.save_all(&records)?;
        debug!("Removed attrition record for member {}", member_id);
        Ok(true)
    }

    fn replace_records(&self, records: &[AttritionRecord]) -> Result<()> {
        debug!("Replacing attrition collection with {} records", records.len());
        self.save_all(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn test_record(id: &str, member_id: &str, exit_month: &str) -> AttritionRecord {
        AttritionRecord {
            id: id.to_string(),
            member_id: member_id.to_string(),
            exit_month: exit_month.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    fn setup() -> (AttritionRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let conn = JsonConnection::new(dir.path()).unwrap();
        (AttritionRepository::new(Arc::new(conn)), dir)
    }

    #[test]
    fn lookup_by_member() {
        let (repo, _dir) = setup();
        repo.store_record(&test_record("a1", "m1", "2025-03")).unwrap();
        repo.store_record(&test_record("a2", "m2", "2025-05")).unwrap();

        let found = repo.get_record_for_member("m2").unwrap().unwrap();
        assert_eq!(found.id, "a2");
        assert!(repo.get_record_for_member("m3").unwrap().is_none());
    }

    #[test]
    fn delete_by_member_removes_only_that_record() {
        let (repo, _dir) = setup();
        repo.store_record(&test_record("a1", "m1", "2025-03")).unwrap();
        repo.store_record(&test_record("a2", "m2", "2025-05")).unwrap();

        assert!(repo.delete_record_for_member("m1").unwrap());
        assert!(!repo.delete_record_for_member("m1").unwrap());

        let records = repo.list_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].member_id, "m2");
    }

    #[test]
    fn exit_months_survive_persistence() {
        let dir = tempdir().unwrap();
        {
            let conn = JsonConnection::new(dir.path()).unwrap();
            let repo = AttritionRepository::new(Arc::new(conn));
            repo.store_record(&test_record("a1", "m1", "2025-11")).unwrap();
        }
        let conn = JsonConnection::new(dir.path()).unwrap();
        let repo = AttritionRepository::new(Arc::new(conn));
        let record = repo.get_record("a1").unwrap().unwrap();
        assert_eq!(record.exit_month.to_string(), "2025-11");
    }
}
