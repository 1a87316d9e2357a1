//! Progress service: the scheduler wired to a store for one profile.
//!
//! Checks item existence around the pure scheduler, persists the full
//! snapshot after every mutation and notifies listeners once it is stored.

use std::sync::mpsc::Sender;

use chrono::{DateTime, Utc};
use review_scheduler::{
    DailyQueue, Forecast, Grade, ItemKey, ItemStats, ItemType, QueueOptions, ReviewItem,
    Scheduler, SchedulerConfig, SchedulerOverrides, Statistics,
};
use tracing::{debug, info, warn};

use crate::error::{ProgressError, Result};
use crate::events::ProgressEvent;
use crate::store::{ProgressSnapshot, ProgressStore};

/// One review reported by the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEvent {
    pub item_id: String,
    pub item_type: ItemType,
    /// Raw grade as reported; validated before anything is computed.
    pub grade: i64,
    pub time_spent_ms: Option<u64>,
    /// Review time, defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ReviewEvent {
    pub fn new(item_type: ItemType, item_id: impl Into<String>, grade: i64) -> Self {
        Self {
            item_id: item_id.into(),
            item_type,
            grade,
            time_spent_ms: None,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn time_spent_ms(mut self, ms: u64) -> Self {
        self.time_spent_ms = Some(ms);
        self
    }
}

pub struct ProgressService<S: ProgressStore> {
    store: S,
    profile_id: String,
    global: SchedulerConfig,
    overrides: SchedulerOverrides,
    scheduler: Scheduler,
    /// Registration order.
    items: Vec<ReviewItem>,
    events: Option<Sender<ProgressEvent>>,
}

impl<S: ProgressStore> ProgressService<S> {
    /// Load the profile's snapshot (or start empty) and merge its overrides
    /// onto the global configuration.
    ///
    /// Stored items that violate the item invariants are clamped back into
    /// range; the corrected copies are written on the next mutation.
    pub fn open(store: S, profile_id: impl Into<String>, global: SchedulerConfig) -> Result<Self> {
        let profile_id = profile_id.into();
        let snapshot = store
            .load(&profile_id)?
            .unwrap_or_else(|| ProgressSnapshot::empty(profile_id.clone()));

        let config = SchedulerConfig::merge(&global, Some(&snapshot.overrides));
        config.validate()?;
        let scheduler = Scheduler::new(config);

        let mut repaired = 0;
        let items: Vec<ReviewItem> = snapshot
            .items
            .into_iter()
            .map(|item| {
                let normalized = scheduler.normalize(item.clone());
                if normalized != item {
                    warn!(profile = %profile_id, item = %item.key(), "repaired stored item");
                    repaired += 1;
                }
                normalized
            })
            .collect();

        info!(
            profile = %profile_id,
            items = items.len(),
            repaired,
            "loaded learner progress"
        );

        Ok(Self {
            store,
            profile_id,
            global,
            overrides: snapshot.overrides,
            scheduler,
            items,
            events: None,
        })
    }

    /// Deliver a `ProgressEvent` to `sender` after each persisted mutation.
    pub fn with_events(mut self, sender: Sender<ProgressEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn overrides(&self) -> &SchedulerOverrides {
        &self.overrides
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn get_item(&self, item_type: ItemType, item_id: &str) -> Option<&ReviewItem> {
        self.items.iter().find(|item| item.matches(item_type, item_id))
    }

    fn position(&self, item_type: ItemType, item_id: &str) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.matches(item_type, item_id))
            .ok_or_else(|| ProgressError::ItemNotFound(ItemKey::new(item_type, item_id)))
    }

    /// Register a new item; fails with `AlreadyExists` if it has a record.
    pub fn try_register(
        &mut self,
        item_type: ItemType,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem> {
        if self.get_item(item_type, item_id).is_some() {
            return Err(ProgressError::AlreadyExists(ItemKey::new(item_type, item_id)));
        }

        let item = self.scheduler.new_item(item_id, item_type, now);
        let mut items = self.items.clone();
        items.push(item.clone());
        self.commit_items(items)?;

        info!(profile = %self.profile_id, item = %item.key(), "registered item");
        self.emit(ProgressEvent::ItemAdded { key: item.key() });
        Ok(item)
    }

    /// Register a new item, or return the existing record untouched.
    pub fn register_item(
        &mut self,
        item_type: ItemType,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem> {
        match self.try_register(item_type, item_id, now) {
            Err(ProgressError::AlreadyExists(key)) => {
                warn!(
                    profile = %self.profile_id,
                    item = %key,
                    "item already registered, keeping existing record"
                );
                self.position(item_type, item_id)
                    .map(|index| self.items[index].clone())
            }
            other => other,
        }
    }

    /// Apply a review and persist the resulting snapshot.
    pub fn record_review(&mut self, event: ReviewEvent) -> Result<ReviewItem> {
        let index = match self.position(event.item_type, &event.item_id) {
            Ok(index) => index,
            Err(err) => {
                warn!(profile = %self.profile_id, error = %err, "review for unknown item");
                return Err(err);
            }
        };
        let grade = Grade::try_from(event.grade)?;
        let at = event.timestamp.unwrap_or_else(Utc::now);

        let previous = &self.items[index];
        let reviewed = self.scheduler.process_review(previous, grade, at);
        debug!(
            item = %reviewed.key(),
            grade = grade.value(),
            interval_before = previous.interval,
            interval_after = reviewed.interval,
            ease_factor = reviewed.ease_factor,
            time_spent_ms = ?event.time_spent_ms,
            "processed review"
        );

        let mut items = self.items.clone();
        items[index] = reviewed.clone();
        self.commit_items(items)?;

        self.emit(ProgressEvent::ItemReviewed {
            key: reviewed.key(),
            grade: grade.value(),
            time_spent_ms: event.time_spent_ms,
            interval: reviewed.interval,
            due_date: reviewed.due_date,
        });
        Ok(reviewed)
    }

    /// Store a snapshot computed elsewhere from this service's current copy.
    ///
    /// The snapshot must be exactly one review ahead of the stored item;
    /// anything else was computed from a stale copy and is rejected.
    pub fn commit(&mut self, snapshot: ReviewItem) -> Result<()> {
        let index = self.position(snapshot.item_type, &snapshot.item_id)?;
        let expected = self.items[index].review_count.saturating_add(1);
        if snapshot.review_count != expected {
            return Err(ProgressError::StaleSnapshot {
                key: snapshot.key(),
                expected,
                found: snapshot.review_count,
            });
        }

        let mut items = self.items.clone();
        items[index] = snapshot;
        self.commit_items(items)
    }

    /// Recreate an item with default values, discarding its history.
    pub fn reset_item(
        &mut self,
        item_type: ItemType,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem> {
        let index = self.position(item_type, item_id)?;
        let fresh = self.scheduler.new_item(item_id, item_type, now);

        let mut items = self.items.clone();
        items[index] = fresh.clone();
        self.commit_items(items)?;

        info!(profile = %self.profile_id, item = %fresh.key(), "reset item");
        self.emit(ProgressEvent::ItemReset { key: fresh.key() });
        Ok(fresh)
    }

    pub fn remove_item(&mut self, item_type: ItemType, item_id: &str) -> Result<ReviewItem> {
        let index = self.position(item_type, item_id)?;

        let mut items = self.items.clone();
        let removed = items.remove(index);
        self.commit_items(items)?;

        info!(profile = %self.profile_id, item = %removed.key(), "removed item");
        self.emit(ProgressEvent::ItemRemoved { key: removed.key() });
        Ok(removed)
    }

    /// Replace the profile's overrides and rebuild the scheduler.
    pub fn update_overrides(&mut self, overrides: SchedulerOverrides) -> Result<()> {
        let config = SchedulerConfig::merge(&self.global, Some(&overrides));
        config.validate()?;

        self.store.save(&ProgressSnapshot {
            profile_id: self.profile_id.clone(),
            items: self.items.clone(),
            overrides: overrides.clone(),
        })?;

        self.scheduler = Scheduler::new(config);
        self.overrides = overrides;

        info!(profile = %self.profile_id, "updated scheduler overrides");
        self.emit(ProgressEvent::SettingsChanged);
        Ok(())
    }

    /// Due items, highest priority first.
    pub fn get_due_items(
        &self,
        item_type: Option<ItemType>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<&ReviewItem> {
        let due = self
            .items
            .iter()
            .filter(|item| item_type.map_or(true, |t| item.item_type == t))
            .filter(|item| item.is_due(now));
        let mut ranked = self.scheduler.rank_by_priority(due, now);
        ranked.truncate(limit);
        ranked
    }

    /// Never-reviewed items in registration order.
    pub fn get_new_items(&self, item_type: Option<ItemType>, limit: usize) -> Vec<&ReviewItem> {
        self.items
            .iter()
            .filter(|item| item_type.map_or(true, |t| item.item_type == t))
            .filter(|item| item.is_new())
            .take(limit)
            .collect()
    }

    /// Queue options from this profile's daily limits.
    pub fn queue_options(&self, now: DateTime<Utc>) -> QueueOptions {
        QueueOptions::from_config(self.scheduler.config(), now)
    }

    pub fn get_daily_queue(&self, options: &QueueOptions) -> DailyQueue {
        self.scheduler.daily_queue(&self.items, options)
    }

    pub fn get_forecast(&self, days: u32, now: DateTime<Utc>) -> Forecast<'_> {
        self.scheduler.forecast(&self.items, days, now)
    }

    pub fn get_item_stats(
        &self,
        item_type: ItemType,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ItemStats> {
        let index = self.position(item_type, item_id)?;
        Ok(self.scheduler.item_stats(&self.items[index], now))
    }

    /// Aggregate statistics for the study day starting at `day_start`.
    pub fn statistics(&self, day_start: DateTime<Utc>) -> Statistics {
        self.scheduler.calculate_statistics(&self.items, day_start)
    }

    /// Persist `items` and only then adopt them.
    fn commit_items(&mut self, items: Vec<ReviewItem>) -> Result<()> {
        let snapshot = ProgressSnapshot {
            profile_id: self.profile_id.clone(),
            items,
            overrides: self.overrides.clone(),
        };
        if let Err(err) = self.store.save(&snapshot) {
            warn!(profile = %self.profile_id, error = %err, "failed to save progress");
            return Err(err);
        }
        self.items = snapshot.items;
        Ok(())
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.events {
            if sender.send(event).is_err() {
                debug!("progress event receiver dropped");
            }
        }
    }
}
