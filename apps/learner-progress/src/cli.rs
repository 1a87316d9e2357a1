//! Command-line interface for inspecting and updating learner progress.

use std::path::PathBuf;

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use review_scheduler::{ForecastDay, ItemType};
use serde::Serialize;

use crate::date_utils::study_day_start;
use crate::error::ProgressError;
use crate::service::{ProgressService, ReviewEvent};
use crate::settings::HostSettings;
use crate::store::SqliteProgressStore;

/// Spaced repetition progress for letters, vocabulary and grammar.
#[derive(Debug, Parser)]
#[command(name = "learner-progress")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Database file (defaults to LEARNER_PROGRESS_DB or the data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Profile / language key (defaults to LEARNER_PROGRESS_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new item
    Register {
        #[arg(value_parser = parse_item_type)]
        item_type: ItemType,
        item_id: String,
    },

    /// Record a review grade (0-5)
    Review {
        #[arg(value_parser = parse_item_type)]
        item_type: ItemType,
        item_id: String,
        #[arg(allow_negative_numbers = true)]
        grade: i64,
        /// Time spent answering
        #[arg(long)]
        time_spent_ms: Option<u64>,
    },

    /// Reset an item to its initial state
    Reset {
        #[arg(value_parser = parse_item_type)]
        item_type: ItemType,
        item_id: String,
    },

    /// Delete an item and its history
    Remove {
        #[arg(value_parser = parse_item_type)]
        item_type: ItemType,
        item_id: String,
    },

    /// Show today's study queue
    Queue {
        #[arg(long)]
        max_reviews: Option<usize>,
        #[arg(long)]
        max_new: Option<usize>,
        /// Do not backfill with new items
        #[arg(long)]
        no_new: bool,
    },

    /// List due items by priority
    Due {
        #[arg(long, value_parser = parse_item_type)]
        item_type: Option<ItemType>,
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// List items never reviewed
    New {
        #[arg(long, value_parser = parse_item_type)]
        item_type: Option<ItemType>,
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Forecast due reviews per day
    Forecast {
        #[arg(
            long,
            default_value = "7",
            value_parser = clap::value_parser!(u32).range(1..=MAX_FORECAST_DAYS)
        )]
        days: u32,
    },

    /// Show statistics for one item
    Item {
        #[arg(value_parser = parse_item_type)]
        item_type: ItemType,
        item_id: String,
    },

    /// Show aggregate statistics
    Stats,
}

/// Longest forecast the CLI prints, ten years.
pub const MAX_FORECAST_DAYS: i64 = 3650;

fn parse_item_type(s: &str) -> Result<ItemType, String> {
    ItemType::from_str(s)
        .ok_or_else(|| format!("unknown item type '{s}' (expected letter, vocabulary or grammar)"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report recoverable store conditions as a warning and exit cleanly.
pub fn skip_recoverable(result: anyhow::Result<()>) -> anyhow::Result<()> {
    match result {
        Err(err) => match err.downcast_ref::<ProgressError>() {
            Some(progress) if progress.is_recoverable() => {
                tracing::warn!(error = %progress, "skipping recoverable error");
                Ok(())
            }
            _ => Err(err),
        },
        ok => ok,
    }
}

/// Execute one command against the profile selected by `cli` and `settings`.
pub fn execute(cli: Cli, settings: &HostSettings) -> anyhow::Result<()> {
    let db_path = cli.db.unwrap_or_else(|| settings.db_path.clone());
    let profile = cli.profile.unwrap_or_else(|| settings.profile_id.clone());

    let store = SqliteProgressStore::open(&db_path)?;
    let mut service = ProgressService::open(store, profile, settings.scheduler_config()?)?;
    let now = Utc::now();

    match cli.command {
        Command::Register { item_type, item_id } => {
            print_json(&service.register_item(item_type, &item_id, now)?)
        }
        Command::Review {
            item_type,
            item_id,
            grade,
            time_spent_ms,
        } => {
            let mut event = ReviewEvent::new(item_type, item_id, grade).at(now);
            event.time_spent_ms = time_spent_ms;
            print_json(&service.record_review(event)?)
        }
        Command::Reset { item_type, item_id } => {
            print_json(&service.reset_item(item_type, &item_id, now)?)
        }
        Command::Remove { item_type, item_id } => {
            print_json(&service.remove_item(item_type, &item_id)?)
        }
        Command::Queue {
            max_reviews,
            max_new,
            no_new,
        } => {
            let mut options = service.queue_options(now);
            if let Some(max_reviews) = max_reviews {
                options.max_reviews = max_reviews;
            }
            if let Some(max_new) = max_new {
                options.max_new = max_new;
            }
            options.include_new = !no_new;
            print_json(&service.get_daily_queue(&options))
        }
        Command::Due { item_type, limit } => {
            print_json(&service.get_due_items(item_type, limit, now))
        }
        Command::New { item_type, limit } => print_json(&service.get_new_items(item_type, limit)),
        Command::Forecast { days } => {
            let forecast: Vec<ForecastDay> = service.get_forecast(days, now).collect();
            print_json(&forecast)
        }
        Command::Item { item_type, item_id } => {
            print_json(&service.get_item_stats(item_type, &item_id, now)?)
        }
        Command::Stats => {
            let day_start = study_day_start(now, &Local, settings.daily_reset_hour);
            print_json(&service.statistics(day_start))
        }
    }
}
