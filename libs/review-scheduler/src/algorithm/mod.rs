//! Spaced repetition scheduling.

pub mod sm2;

use crate::config::SchedulerConfig;
use crate::types::{Grade, ItemType, ReviewItem};
use chrono::{DateTime, Utc};

/// Milliseconds in one scheduling day.
pub const DAY_MS: i64 = 86_400_000;

/// Stateless scheduler: every method is a pure function of its arguments and
/// the configuration it was built with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Initial state for a newly registered item, due at `now`.
    pub fn new_item(
        &self,
        item_id: impl Into<String>,
        item_type: ItemType,
        now: DateTime<Utc>,
    ) -> ReviewItem {
        ReviewItem::new(item_id, item_type, self.config.initial_ease_factor, now)
    }

    /// Bring a record from outside the scheduler back within the item
    /// invariants. Valid records are returned unchanged.
    pub fn normalize(&self, mut item: ReviewItem) -> ReviewItem {
        if item.ease_factor.is_nan() {
            item.ease_factor = self.config.initial_ease_factor;
        }
        item.ease_factor = item.ease_factor.max(self.config.min_ease_factor);
        item.interval = item.interval.min(self.config.maximum_interval);
        item.lapse_count = item.lapse_count.min(item.review_count);

        item.recent_grades.retain(|grade| *grade <= Grade::MAX);
        let cap = self.config.recent_grades_cap;
        if item.recent_grades.len() > cap {
            item.recent_grades.drain(..item.recent_grades.len() - cap);
        }
        item
    }
}
