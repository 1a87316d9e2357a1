//! Spaced repetition scheduler for learnable items (letters, vocabulary, grammar).
//!
//! Provides:
//! - SM-2 ease factor and interval calculation with hard/easy dampening
//! - Review processing into new immutable item snapshots
//! - Maturity classification and priority scoring
//! - Bounded daily review queues, due forecasts and statistics
//!
//! Every operation is a pure computation over the supplied items. Persistence,
//! logging and event delivery belong to the host.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod maturity;
pub mod priority;
pub mod queue;
pub mod stats;
pub mod types;

pub use algorithm::{Scheduler, DAY_MS};
pub use config::{
    MaturityThresholds, PriorityWeights, SchedulerConfig, SchedulerOverrides, EASE_FACTOR_FLOOR,
    INTERVAL_LIMIT,
};
pub use error::{Result, SchedulerError};
pub use queue::{DailyQueue, QueueOptions, QueueStats};
pub use stats::{
    Forecast, ForecastDay, ItemStats, ItemTypeCounts, MaturityCounts, Statistics,
};
pub use types::{Grade, ItemKey, ItemType, Maturity, ReviewItem};
