//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with two refinements: the weakest passing grade only
//! earns a dampened interval bump, and a perfect recall earns an easy bonus.
//!
//! Grades (0-5):
//! - 0: Complete blackout
//! - 1: Incorrect, answer recognised once shown
//! - 2: Incorrect, answer seemed easy once shown
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect recall

use super::Scheduler;
use crate::types::{Grade, ReviewItem};
use chrono::{DateTime, Duration, Utc};

impl Scheduler {
    /// Next ease factor for a grade.
    ///
    /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at the
    /// configured minimum.
    pub fn calculate_ease_factor(&self, current: f64, grade: Grade) -> f64 {
        let miss = f64::from(Grade::MAX - grade.value());
        let next = current + (0.1 - miss * (0.08 + miss * 0.02));
        next.max(self.config().min_ease_factor)
    }

    /// Next interval in days for `item` reviewed with `grade`.
    ///
    /// The ease factor this grade produces drives the interval, exactly as in
    /// `process_review`.
    pub fn calculate_interval(&self, item: &ReviewItem, grade: Grade) -> u32 {
        let ease_factor = self.calculate_ease_factor(item.ease_factor, grade);
        self.next_interval(item.interval, ease_factor, grade)
    }

    fn next_interval(&self, interval: u32, ease_factor: f64, grade: Grade) -> u32 {
        let config = self.config();

        let next = if grade.is_lapse() {
            0
        } else if grade.is_hard() && interval > 0 {
            scale(interval, config.hard_interval_multiplier)
        } else {
            match interval {
                0 => 1,
                1 => 6,
                _ => {
                    let multiplier = if grade.is_perfect() {
                        ease_factor * config.easy_bonus
                    } else {
                        ease_factor
                    };
                    scale(interval, multiplier)
                }
            }
        };

        next.min(config.maximum_interval)
    }

    /// Apply one review and return the replacement snapshot.
    ///
    /// The new ease factor is computed first and drives the interval. The
    /// input item is left untouched.
    pub fn process_review(&self, item: &ReviewItem, grade: Grade, at: DateTime<Utc>) -> ReviewItem {
        let ease_factor = self.calculate_ease_factor(item.ease_factor, grade);
        let interval = self.next_interval(item.interval, ease_factor, grade);
        // Saturates at the latest representable instant
        let due_date = at
            .checked_add_signed(Duration::days(i64::from(interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut recent_grades = item.recent_grades.clone();
        recent_grades.push(grade.value());
        let cap = self.config().recent_grades_cap;
        if recent_grades.len() > cap {
            recent_grades.drain(..recent_grades.len() - cap);
        }

        ReviewItem {
            ease_factor,
            interval,
            due_date,
            review_count: item.review_count.saturating_add(1),
            lapse_count: item.lapse_count.saturating_add(u32::from(grade.is_lapse())),
            last_review_date: Some(at),
            recent_grades,
            ..item.clone()
        }
    }

    /// Interval each grade (0-5) would produce, for showing on answer buttons.
    pub fn preview_intervals(&self, item: &ReviewItem) -> [u32; 6] {
        let mut intervals = [0; 6];
        for grade in Grade::all() {
            intervals[usize::from(grade.value())] = self.calculate_interval(item, grade);
        }
        intervals
    }
}

fn scale(interval: u32, multiplier: f64) -> u32 {
    let scaled = (f64::from(interval) * multiplier).round();
    if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}
