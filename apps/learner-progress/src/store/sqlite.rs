//! SQLite-backed snapshot store.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::schema::{SCHEMA, SCHEMA_VERSION};
use super::{ProgressSnapshot, ProgressStore};
use crate::error::Result;

pub struct SqliteProgressStore {
    conn: Connection,
}

impl SqliteProgressStore {
    /// Open database at path, creating it and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }
}

impl ProgressStore for SqliteProgressStore {
    fn load(&self, profile_id: &str) -> Result<Option<ProgressSnapshot>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT snapshot_json FROM progress WHERE profile_id = ?1",
                params![profile_id],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => {
                let mut snapshot: ProgressSnapshot = serde_json::from_str(&json)?;
                // The row key is authoritative
                snapshot.profile_id = profile_id.to_string();
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT INTO progress (profile_id, snapshot_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(profile_id) DO UPDATE SET
                snapshot_json = excluded.snapshot_json,
                updated_at = excluded.updated_at",
            params![snapshot.profile_id, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn delete(&self, profile_id: &str) -> Result<bool> {
        let count = self.conn.execute(
            "DELETE FROM progress WHERE profile_id = ?1",
            params![profile_id],
        )?;
        Ok(count > 0)
    }

    fn profiles(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT profile_id FROM progress ORDER BY profile_id")?;
        let profiles = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(profiles)
    }
}
