//! Maturity classification.

use crate::algorithm::Scheduler;
use crate::config::MaturityThresholds;
use crate::types::{Maturity, ReviewItem};

impl Maturity {
    /// Classify from review count and interval alone.
    pub fn classify(review_count: u32, interval: u32, thresholds: &MaturityThresholds) -> Self {
        if review_count == 0 || interval == 0 {
            Self::New
        } else if interval < thresholds.learning_below {
            Self::Learning
        } else if interval < thresholds.young_below {
            Self::Young
        } else {
            Self::Mature
        }
    }
}

impl Scheduler {
    pub fn maturity(&self, item: &ReviewItem) -> Maturity {
        Maturity::classify(item.review_count, item.interval, &self.config().maturity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::types::ItemType;
    use chrono::DateTime;

    fn item(review_count: u32, interval: u32) -> ReviewItem {
        let epoch = DateTime::from_timestamp_millis(0).unwrap();
        ReviewItem {
            review_count,
            interval,
            ..ReviewItem::new("x", ItemType::Letter, 2.5, epoch)
        }
    }

    #[test]
    fn stage_boundaries() {
        let scheduler = Scheduler::default();
        assert_eq!(scheduler.maturity(&item(0, 0)), Maturity::New);
        assert_eq!(scheduler.maturity(&item(0, 40)), Maturity::New);
        assert_eq!(scheduler.maturity(&item(3, 0)), Maturity::New);
        assert_eq!(scheduler.maturity(&item(1, 1)), Maturity::Learning);
        assert_eq!(scheduler.maturity(&item(4, 20)), Maturity::Learning);
        assert_eq!(scheduler.maturity(&item(5, 21)), Maturity::Young);
        assert_eq!(scheduler.maturity(&item(6, 99)), Maturity::Young);
        assert_eq!(scheduler.maturity(&item(7, 100)), Maturity::Mature);
    }

    #[test]
    fn ignores_ease_factor_and_dates() {
        let scheduler = Scheduler::default();
        let base = item(4, 30);
        let other = ReviewItem {
            ease_factor: 1.3,
            lapse_count: 3,
            due_date: DateTime::from_timestamp_millis(999_999).unwrap(),
            ..base.clone()
        };
        assert_eq!(scheduler.maturity(&base), scheduler.maturity(&other));
        assert_eq!(scheduler.maturity(&base), scheduler.maturity(&base));
    }

    #[test]
    fn thresholds_are_configurable() {
        let scheduler = Scheduler::new(SchedulerConfig {
            maturity: MaturityThresholds {
                learning_below: 3,
                young_below: 10,
            },
            ..Default::default()
        });
        assert_eq!(scheduler.maturity(&item(2, 3)), Maturity::Young);
        assert_eq!(scheduler.maturity(&item(2, 10)), Maturity::Mature);
    }
}
