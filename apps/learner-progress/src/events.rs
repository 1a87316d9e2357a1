//! Notifications for other subsystems (achievements, progress widgets).

use chrono::{DateTime, Utc};
use review_scheduler::ItemKey;
use serde::Serialize;

/// Event emitted after a mutation has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    ItemAdded {
        key: ItemKey,
    },
    ItemReviewed {
        key: ItemKey,
        grade: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_spent_ms: Option<u64>,
        interval: u32,
        due_date: DateTime<Utc>,
    },
    ItemReset {
        key: ItemKey,
    },
    ItemRemoved {
        key: ItemKey,
    },
    SettingsChanged,
}
