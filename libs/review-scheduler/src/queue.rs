//! Daily study queue assembly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::algorithm::Scheduler;
use crate::config::SchedulerConfig;
use crate::stats::{ItemTypeCounts, MaturityCounts};
use crate::types::ReviewItem;

/// Limits for one study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueOptions {
    pub max_reviews: usize,
    pub max_new: usize,
    /// Backfill spare capacity with never-reviewed items.
    pub include_new: bool,
    pub now: DateTime<Utc>,
}

impl QueueOptions {
    /// Daily limits from configuration, new items included.
    pub fn from_config(config: &SchedulerConfig, now: DateTime<Utc>) -> Self {
        Self {
            max_reviews: config.max_reviews_per_day as usize,
            max_new: config.max_new_per_day as usize,
            include_new: true,
            now,
        }
    }
}

/// Summary of the queue and the backlog it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total_due: usize,
    pub total_new: usize,
    pub queue_size: usize,
    /// Due items more than 24 hours past their due date.
    pub overdue: usize,
    /// Breakdown of the returned queue.
    pub by_item_type: ItemTypeCounts,
    /// Breakdown of the returned queue.
    pub by_maturity: MaturityCounts,
    /// More items are due than the session shows.
    pub has_overflow: bool,
}

/// Items to study, most urgent reviews first, then new items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyQueue {
    pub items: Vec<ReviewItem>,
    pub stats: QueueStats,
}

impl Scheduler {
    pub fn daily_queue(&self, items: &[ReviewItem], options: &QueueOptions) -> DailyQueue {
        let now = options.now;

        let due: Vec<&ReviewItem> = items.iter().filter(|item| item.is_due(now)).collect();
        let new: Vec<&ReviewItem> = items.iter().filter(|item| item.is_new()).collect();

        let overdue_cutoff = now - Duration::days(1);
        let overdue = due.iter().filter(|item| item.due_date < overdue_cutoff).count();

        let mut queue: Vec<ReviewItem> = self
            .rank_by_priority(due.iter().copied(), now)
            .into_iter()
            .take(options.max_reviews)
            .cloned()
            .collect();

        if options.include_new && queue.len() < options.max_reviews {
            let capacity = options.max_new.min(options.max_reviews - queue.len());
            queue.extend(new.iter().take(capacity).map(|item| (*item).clone()));
        }

        let mut by_item_type = ItemTypeCounts::default();
        let mut by_maturity = MaturityCounts::default();
        for item in &queue {
            by_item_type.add(item.item_type);
            by_maturity.add(self.maturity(item));
        }

        DailyQueue {
            stats: QueueStats {
                total_due: due.len(),
                total_new: new.len(),
                queue_size: queue.len(),
                overdue,
                by_item_type,
                by_maturity,
                has_overflow: due.len() > options.max_reviews,
            },
            items: queue,
        }
    }
}
