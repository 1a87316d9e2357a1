//! Test fixtures and factory functions.

use chrono::{DateTime, Duration, Utc};
use learner_progress::{ProgressService, ProgressStore, ReviewEvent};
use review_scheduler::{ItemType, DAY_MS};

/// Fixed reference time so schedules are reproducible.
pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(19_700 * DAY_MS).unwrap()
}

pub fn days_later(days: i64) -> DateTime<Utc> {
    base_time() + Duration::days(days)
}

pub fn hours_later(hours: i64) -> DateTime<Utc> {
    base_time() + Duration::hours(hours)
}

/// Korean consonants used as letter ids.
pub const LETTERS: [&str; 5] = ["ga", "na", "da", "ra", "ma"];

pub const WORDS: [&str; 3] = ["mul", "bap", "chaek"];

/// Register every letter and word at `base_time()`.
pub fn register_all<S: ProgressStore>(service: &mut ProgressService<S>) {
    for letter in LETTERS {
        service
            .try_register(ItemType::Letter, letter, base_time())
            .expect("register letter");
    }
    for word in WORDS {
        service
            .try_register(ItemType::Vocabulary, word, base_time())
            .expect("register word");
    }
}

/// Review event at an explicit time.
pub fn review(item_type: ItemType, item_id: &str, grade: i64, at: DateTime<Utc>) -> ReviewEvent {
    ReviewEvent::new(item_type, item_id, grade).at(at)
}
