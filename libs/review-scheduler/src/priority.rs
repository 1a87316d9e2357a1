//! Priority scoring for due items.

use crate::algorithm::{Scheduler, DAY_MS};
use crate::types::ReviewItem;
use chrono::{DateTime, Utc};

/// Whole days elapsed from `from` to `to`, rounded down. Negative when `to`
/// precedes `from`.
pub fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(DAY_MS)
}

impl Scheduler {
    /// Urgency score; higher is reviewed sooner.
    ///
    /// Sum of the overdue weight per full day past due, the item type weight
    /// and the maturity stage weight.
    pub fn calculate_priority(&self, item: &ReviewItem, now: DateTime<Utc>) -> f64 {
        let weights = &self.config().priority;

        let overdue = if item.due_date < now {
            whole_days_between(item.due_date, now) as f64 * weights.overdue_per_day
        } else {
            0.0
        };

        overdue
            + weights.for_item_type(item.item_type)
            + weights.for_maturity(self.maturity(item))
    }

    /// Order items by descending priority. Equal scores keep their input order.
    pub fn rank_by_priority<'a, I>(&self, items: I, now: DateTime<Utc>) -> Vec<&'a ReviewItem>
    where
        I: IntoIterator<Item = &'a ReviewItem>,
    {
        let mut scored: Vec<(f64, &ReviewItem)> = items
            .into_iter()
            .map(|item| (self.calculate_priority(item, now), item))
            .collect();
        // sort_by is stable
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().map(|(_, item)| item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PriorityWeights, SchedulerConfig};
    use crate::types::ItemType;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(100 * DAY_MS).unwrap()
    }

    fn due_item(id: &str, item_type: ItemType, interval: u32, due_date: DateTime<Utc>) -> ReviewItem {
        ReviewItem {
            interval,
            review_count: 3,
            due_date,
            ..ReviewItem::new(id, item_type, 2.5, now() - Duration::days(200))
        }
    }

    #[test]
    fn whole_days_floor() {
        let start = now();
        assert_eq!(whole_days_between(start, start + Duration::hours(23)), 0);
        assert_eq!(whole_days_between(start, start + Duration::hours(49)), 2);
        assert_eq!(whole_days_between(start, start - Duration::hours(1)), -1);
    }

    #[test]
    fn more_overdue_never_scores_lower() {
        let scheduler = Scheduler::default();
        let mut last = f64::MIN;
        for hours in [0, 12, 24, 36, 48, 240, 2400] {
            let item = due_item("w", ItemType::Vocabulary, 10, now() - Duration::hours(hours));
            let score = scheduler.calculate_priority(&item, now());
            assert!(score >= last, "{hours}h overdue scored {score} < {last}");
            last = score;
        }
    }

    #[test]
    fn score_components() {
        let scheduler = Scheduler::default();
        // 3 full days overdue, letter, learning
        let item = due_item("a", ItemType::Letter, 10, now() - Duration::hours(80));
        assert_eq!(scheduler.calculate_priority(&item, now()), 30.0 + 30.0 + 20.0);

        // not yet due: no overdue contribution; grammar, mature
        let later = due_item("g", ItemType::Grammar, 150, now() + Duration::days(3));
        assert_eq!(scheduler.calculate_priority(&later, now()), 10.0);
    }

    #[test]
    fn letters_outrank_vocabulary_outrank_grammar() {
        let scheduler = Scheduler::default();
        let due = now() - Duration::days(1);
        let letter = due_item("a", ItemType::Letter, 5, due);
        let word = due_item("b", ItemType::Vocabulary, 5, due);
        let rule = due_item("c", ItemType::Grammar, 5, due);
        let score = |i: &ReviewItem| scheduler.calculate_priority(i, now());
        assert!(score(&letter) > score(&word));
        assert!(score(&word) > score(&rule));
    }

    #[test]
    fn learning_weighted_above_other_stages() {
        let scheduler = Scheduler::default();
        let due = now();
        let learning = due_item("l", ItemType::Vocabulary, 5, due);
        let young = due_item("y", ItemType::Vocabulary, 50, due);
        let mature = due_item("m", ItemType::Vocabulary, 200, due);
        let score = |i: &ReviewItem| scheduler.calculate_priority(i, now());
        assert!(score(&learning) > score(&young));
        assert!(score(&young) > score(&mature));
    }

    #[test]
    fn ranking_is_stable_for_equal_scores() {
        let scheduler = Scheduler::new(SchedulerConfig {
            priority: PriorityWeights {
                letter: 0.0,
                vocabulary: 0.0,
                grammar: 0.0,
                ..Default::default()
            },
            ..Default::default()
        });
        let due = now();
        let items = vec![
            due_item("first", ItemType::Grammar, 5, due),
            due_item("second", ItemType::Letter, 5, due),
            due_item("urgent", ItemType::Vocabulary, 5, due - Duration::days(4)),
            due_item("third", ItemType::Vocabulary, 5, due),
        ];
        let ranked: Vec<&str> = scheduler
            .rank_by_priority(&items, now())
            .into_iter()
            .map(|i| i.item_id.as_str())
            .collect();
        assert_eq!(ranked, vec!["urgent", "first", "second", "third"]);
    }
}
