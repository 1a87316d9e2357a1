//! Persistence of learner progress snapshots.

pub mod memory;
pub mod schema;
pub mod sqlite;

use review_scheduler::{ReviewItem, SchedulerOverrides};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use memory::MemoryProgressStore;
pub use sqlite::SqliteProgressStore;

/// Everything stored for one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub profile_id: String,
    #[serde(default)]
    pub items: Vec<ReviewItem>,
    #[serde(default, skip_serializing_if = "SchedulerOverrides::is_empty")]
    pub overrides: SchedulerOverrides,
}

impl ProgressSnapshot {
    pub fn empty(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            ..Default::default()
        }
    }
}

/// Key/value store of snapshots keyed by profile id.
pub trait ProgressStore {
    fn load(&self, profile_id: &str) -> Result<Option<ProgressSnapshot>>;
    /// Replace the stored snapshot for `snapshot.profile_id`.
    fn save(&self, snapshot: &ProgressSnapshot) -> Result<()>;
    /// Returns whether a snapshot existed.
    fn delete(&self, profile_id: &str) -> Result<bool>;
    fn profiles(&self) -> Result<Vec<String>>;
}
