//! Error types for the progress host.

use review_scheduler::{ItemKey, SchedulerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("item not found: {0}")]
    ItemNotFound(ItemKey),

    #[error("item already exists: {0}")]
    AlreadyExists(ItemKey),

    #[error("stale snapshot for {key}: expected review count {expected}, found {found}")]
    StaleSnapshot {
        key: ItemKey,
        expected: u32,
        found: u32,
    },

    #[error("invalid setting {key}: {value}")]
    InvalidSetting { key: String, value: String },
}

impl ProgressError {
    /// Store-level conditions a session can skip past and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound(_) | Self::AlreadyExists(_) | Self::StaleSnapshot { .. }
        )
    }
}

/// Result type alias for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

#[cfg(test)]
mod tests {
    use super::*;
    use review_scheduler::ItemType;

    #[test]
    fn test_error_display_not_found() {
        let error = ProgressError::ItemNotFound(ItemKey::new(ItemType::Letter, "ka"));
        assert_eq!(error.to_string(), "item not found: letter:ka");
    }

    #[test]
    fn test_error_display_stale_snapshot() {
        let error = ProgressError::StaleSnapshot {
            key: ItemKey::new(ItemType::Vocabulary, "mizu"),
            expected: 4,
            found: 3,
        };
        assert_eq!(
            error.to_string(),
            "stale snapshot for vocabulary:mizu: expected review count 4, found 3"
        );
    }

    #[test]
    fn test_invalid_grade_is_transparent() {
        let error = ProgressError::from(SchedulerError::InvalidGrade(9));
        assert_eq!(
            error.to_string(),
            "invalid grade 9: expected a value between 0 and 5"
        );
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_store_conditions_are_recoverable() {
        let key = ItemKey::new(ItemType::Grammar, "te-form");
        assert!(ProgressError::ItemNotFound(key.clone()).is_recoverable());
        assert!(ProgressError::AlreadyExists(key).is_recoverable());
    }
}
