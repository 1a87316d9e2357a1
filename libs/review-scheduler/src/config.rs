//! Scheduler configuration and per-profile overrides.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::types::{ItemType, Maturity};

/// Lowest ease factor SM-2 allows.
pub const EASE_FACTOR_FLOOR: f64 = 1.3;

/// Longest interval a configuration may allow, in days.
pub const INTERVAL_LIMIT: u32 = 36_500;

/// Interval boundaries (in days) between maturity stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityThresholds {
    /// Reviewed items with a shorter interval are `Learning`.
    pub learning_below: u32,
    /// Items below this (and past learning) are `Young`, the rest `Mature`.
    pub young_below: u32,
}

impl Default for MaturityThresholds {
    fn default() -> Self {
        Self {
            learning_below: 21,
            young_below: 100,
        }
    }
}

/// Weights summed into an item's priority score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    /// Added for each full day an item is overdue.
    pub overdue_per_day: f64,
    pub letter: f64,
    pub vocabulary: f64,
    pub grammar: f64,
    pub new: f64,
    pub learning: f64,
    pub young: f64,
    pub mature: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            overdue_per_day: 10.0,
            letter: 30.0,
            vocabulary: 20.0,
            grammar: 10.0,
            new: 0.0,
            learning: 20.0,
            young: 10.0,
            mature: 0.0,
        }
    }
}

impl PriorityWeights {
    pub fn for_item_type(&self, item_type: ItemType) -> f64 {
        match item_type {
            ItemType::Letter => self.letter,
            ItemType::Vocabulary => self.vocabulary,
            ItemType::Grammar => self.grammar,
        }
    }

    pub fn for_maturity(&self, maturity: Maturity) -> f64 {
        match maturity {
            Maturity::New => self.new,
            Maturity::Learning => self.learning,
            Maturity::Young => self.young,
            Maturity::Mature => self.mature,
        }
    }
}

/// Global scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub min_ease_factor: f64,
    pub initial_ease_factor: f64,
    /// Extra multiplier applied on a perfect recall.
    pub easy_bonus: f64,
    /// Multiplier applied instead of the ease factor on the weakest pass.
    pub hard_interval_multiplier: f64,
    /// Upper bound on any computed interval, in days.
    pub maximum_interval: u32,
    pub max_reviews_per_day: u32,
    pub max_new_per_day: u32,
    /// Number of grades kept in `ReviewItem::recent_grades`.
    pub recent_grades_cap: usize,
    pub maturity: MaturityThresholds,
    pub priority: PriorityWeights,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease_factor: 1.3,
            initial_ease_factor: 2.5,
            easy_bonus: 1.3,
            hard_interval_multiplier: 1.2,
            maximum_interval: 36500,
            max_reviews_per_day: 200,
            max_new_per_day: 20,
            recent_grades_cap: 10,
            maturity: MaturityThresholds::default(),
            priority: PriorityWeights::default(),
        }
    }
}

/// Per-profile overrides (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easy_bonus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_interval_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reviews_per_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_per_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity: Option<MaturityThresholds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityWeights>,
}

impl SchedulerOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl SchedulerConfig {
    /// Merge global configuration with optional profile overrides.
    pub fn merge(global: &SchedulerConfig, overrides: Option<&SchedulerOverrides>) -> Self {
        match overrides {
            Some(o) => Self {
                easy_bonus: o.easy_bonus.unwrap_or(global.easy_bonus),
                hard_interval_multiplier: o
                    .hard_interval_multiplier
                    .unwrap_or(global.hard_interval_multiplier),
                max_reviews_per_day: o.max_reviews_per_day.unwrap_or(global.max_reviews_per_day),
                max_new_per_day: o.max_new_per_day.unwrap_or(global.max_new_per_day),
                maturity: o.maturity.unwrap_or(global.maturity),
                priority: o.priority.unwrap_or(global.priority),
                ..global.clone()
            },
            None => global.clone(),
        }
    }
}

impl SchedulerConfig {
    /// Reject values that would break item invariants or overflow dates.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &'static str, value: String, reason: &'static str| {
            Err(SchedulerError::InvalidConfig {
                field,
                value,
                reason,
            })
        };

        if self.min_ease_factor.is_nan() || self.min_ease_factor < EASE_FACTOR_FLOOR {
            return invalid(
                "min_ease_factor",
                self.min_ease_factor.to_string(),
                "must be at least 1.3",
            );
        }
        if !self.initial_ease_factor.is_finite() || self.initial_ease_factor < self.min_ease_factor {
            return invalid(
                "initial_ease_factor",
                self.initial_ease_factor.to_string(),
                "must be finite and at least min_ease_factor",
            );
        }
        for (field, value) in [
            ("easy_bonus", self.easy_bonus),
            ("hard_interval_multiplier", self.hard_interval_multiplier),
        ] {
            if !value.is_finite() || value < 1.0 {
                return invalid(field, value.to_string(), "must be finite and at least 1.0");
            }
        }
        if self.maximum_interval == 0 || self.maximum_interval > INTERVAL_LIMIT {
            return invalid(
                "maximum_interval",
                self.maximum_interval.to_string(),
                "must be between 1 and 36500 days",
            );
        }
        if self.recent_grades_cap == 0 {
            return invalid("recent_grades_cap", "0".to_string(), "must be at least 1");
        }
        if self.maturity.learning_below > self.maturity.young_below {
            return invalid(
                "maturity.learning_below",
                self.maturity.learning_below.to_string(),
                "must not exceed maturity.young_below",
            );
        }
        Ok(())
    }
}
