//! Common test utilities for learner-progress integration tests.
//!
//! Every test runs against an in-memory SQLite store, so no setup is needed.

#![allow(dead_code)]

pub mod fixtures;

use learner_progress::{ProgressService, SqliteProgressStore};
use review_scheduler::SchedulerConfig;

pub const PROFILE: &str = "ko";

/// Fresh service for `PROFILE` with default configuration.
pub fn open_service() -> ProgressService<SqliteProgressStore> {
    let store = SqliteProgressStore::open_in_memory().expect("in-memory store");
    ProgressService::open(store, PROFILE, SchedulerConfig::default()).expect("open service")
}

/// Reopen the profile from the store a previous service wrote to.
pub fn reopen(service: ProgressService<SqliteProgressStore>) -> ProgressService<SqliteProgressStore> {
    let store = service.into_store();
    ProgressService::open(store, PROFILE, SchedulerConfig::default()).expect("reopen service")
}
