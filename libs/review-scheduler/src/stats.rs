//! Forecast and statistics over a set of items.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::algorithm::{Scheduler, DAY_MS};
use crate::types::{Grade, ItemType, Maturity, ReviewItem};

/// Item counts per item type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeCounts {
    pub letter: usize,
    pub vocabulary: usize,
    pub grammar: usize,
}

impl ItemTypeCounts {
    pub fn add(&mut self, item_type: ItemType) {
        match item_type {
            ItemType::Letter => self.letter += 1,
            ItemType::Vocabulary => self.vocabulary += 1,
            ItemType::Grammar => self.grammar += 1,
        }
    }

    pub fn get(&self, item_type: ItemType) -> usize {
        match item_type {
            ItemType::Letter => self.letter,
            ItemType::Vocabulary => self.vocabulary,
            ItemType::Grammar => self.grammar,
        }
    }
}

/// Item counts per maturity stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityCounts {
    pub new: usize,
    pub learning: usize,
    pub young: usize,
    pub mature: usize,
}

impl MaturityCounts {
    pub fn add(&mut self, maturity: Maturity) {
        match maturity {
            Maturity::New => self.new += 1,
            Maturity::Learning => self.learning += 1,
            Maturity::Young => self.young += 1,
            Maturity::Mature => self.mature += 1,
        }
    }

    pub fn get(&self, maturity: Maturity) -> usize {
        match maturity {
            Maturity::New => self.new,
            Maturity::Learning => self.learning,
            Maturity::Young => self.young,
            Maturity::Mature => self.mature,
        }
    }
}

/// One forecast bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Offset from the forecast start, 0 = the 24 hours starting now.
    pub day: u32,
    /// Start of the bucket.
    pub date: DateTime<Utc>,
    pub due_count: usize,
}

/// Lazily computed due counts for consecutive 24h buckets.
///
/// Only reviewed items are counted, and items already due before the start
/// of the forecast fall in no bucket. Buckets stop at the latest representable
/// date.
#[derive(Debug)]
pub struct Forecast<'a> {
    items: &'a [ReviewItem],
    start: DateTime<Utc>,
    day: u32,
    days: u32,
}

impl Iterator for Forecast<'_> {
    type Item = ForecastDay;

    fn next(&mut self) -> Option<ForecastDay> {
        if self.day >= self.days {
            return None;
        }
        let date = self
            .start
            .checked_add_signed(Duration::milliseconds(i64::from(self.day) * DAY_MS));
        let end = date.and_then(|date| date.checked_add_signed(Duration::milliseconds(DAY_MS)));
        let (Some(date), Some(end)) = (date, end) else {
            self.day = self.days;
            return None;
        };
        let due_count = self
            .items
            .iter()
            .filter(|item| !item.is_new() && item.due_date >= date && item.due_date < end)
            .count();
        let bucket = ForecastDay {
            day: self.day,
            date,
            due_count,
        };
        self.day += 1;
        Some(bucket)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.days.saturating_sub(self.day) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Forecast<'_> {}

/// Derived view of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub maturity: Maturity,
    /// Percentage of reviews that passed, 0 when never reviewed.
    pub success_rate: f64,
    pub total_reviews: u32,
    pub lapse_count: u32,
    /// Consecutive passing grades at the end of the recent history.
    pub current_streak: usize,
    /// Mean of the recent grades, 0 when there are none.
    pub average_grade: f64,
    /// Whole days until due, 0 when already due.
    pub days_until_review: i64,
    pub ease_factor: f64,
    pub interval: u32,
    /// Interval each grade 0-5 would produce if reviewed now.
    pub next_intervals: [u32; 6],
}

/// Aggregate statistics across every item category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_items: usize,
    pub by_item_type: ItemTypeCounts,
    pub by_maturity: MaturityCounts,
    /// Reviewed items falling due before the end of the study day.
    pub due_today: usize,
    /// Items whose last review is on or after the study day start.
    pub reviewed_today: usize,
    pub total_reviews: u64,
    pub total_lapses: u64,
    /// Percentage of passing reviews across all reviewed items.
    pub accuracy: f64,
}

impl Scheduler {
    /// Forecast due counts for `days` buckets starting at `now`.
    pub fn forecast<'a>(&self, items: &'a [ReviewItem], days: u32, now: DateTime<Utc>) -> Forecast<'a> {
        let representable = (DateTime::<Utc>::MAX_UTC - now).num_days();
        Forecast {
            items,
            start: now,
            day: 0,
            days: days.min(u32::try_from(representable).unwrap_or(u32::MAX)),
        }
    }

    pub fn item_stats(&self, item: &ReviewItem, now: DateTime<Utc>) -> ItemStats {
        let success_rate = if item.review_count == 0 {
            0.0
        } else {
            let passed = item.review_count.saturating_sub(item.lapse_count);
            f64::from(passed) / f64::from(item.review_count) * 100.0
        };

        let current_streak = item
            .recent_grades
            .iter()
            .rev()
            .take_while(|grade| **grade >= Grade::PASS)
            .count();

        let average_grade = if item.recent_grades.is_empty() {
            0.0
        } else {
            let sum: u32 = item.recent_grades.iter().map(|g| u32::from(*g)).sum();
            f64::from(sum) / item.recent_grades.len() as f64
        };

        let days_until_review = if item.due_date <= now {
            0
        } else {
            let remaining = (item.due_date - now).num_milliseconds();
            (remaining + DAY_MS - 1) / DAY_MS
        };

        ItemStats {
            maturity: self.maturity(item),
            success_rate,
            total_reviews: item.review_count,
            lapse_count: item.lapse_count,
            current_streak,
            average_grade,
            days_until_review,
            ease_factor: item.ease_factor,
            interval: item.interval,
            next_intervals: self.preview_intervals(item),
        }
    }

    /// Aggregate statistics for the study day beginning at `day_start`.
    pub fn calculate_statistics(&self, items: &[ReviewItem], day_start: DateTime<Utc>) -> Statistics {
        let day_end = day_start + Duration::milliseconds(DAY_MS);

        let mut by_item_type = ItemTypeCounts::default();
        let mut by_maturity = MaturityCounts::default();
        let mut due_today = 0;
        let mut reviewed_today = 0;
        let mut total_reviews = 0u64;
        let mut total_lapses = 0u64;

        for item in items {
            by_item_type.add(item.item_type);
            by_maturity.add(self.maturity(item));

            if !item.is_new() && item.due_date < day_end {
                due_today += 1;
            }
            if item.last_review_date.is_some_and(|reviewed| reviewed >= day_start) {
                reviewed_today += 1;
            }
            total_reviews += u64::from(item.review_count);
            total_lapses += u64::from(item.lapse_count.min(item.review_count));
        }

        let accuracy = if total_reviews == 0 {
            0.0
        } else {
            (total_reviews - total_lapses) as f64 / total_reviews as f64 * 100.0
        };

        Statistics {
            total_items: items.len(),
            by_item_type,
            by_maturity,
            due_today,
            reviewed_today,
            total_reviews,
            total_lapses,
            accuracy,
        }
    }
}
