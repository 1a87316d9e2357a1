//! In-memory store for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::{ProgressSnapshot, ProgressStore};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    snapshots: Mutex<BTreeMap<String, ProgressSnapshot>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self, profile_id: &str) -> Result<Option<ProgressSnapshot>> {
        let snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(snapshots.get(profile_id).cloned())
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        let mut snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        snapshots.insert(snapshot.profile_id.clone(), snapshot.clone());
        Ok(())
    }

    fn delete(&self, profile_id: &str) -> Result<bool> {
        let mut snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(snapshots.remove(profile_id).is_some())
    }

    fn profiles(&self) -> Result<Vec<String>> {
        let snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(snapshots.keys().cloned().collect())
    }
}
