//! Host adapter around the review scheduler: per-profile persistence, item
//! existence checks, change notifications and a command-line front end.

pub mod cli;
pub mod date_utils;
pub mod error;
pub mod events;
pub mod service;
pub mod settings;
pub mod store;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{ProgressError, Result};
pub use events::ProgressEvent;
pub use service::{ProgressService, ReviewEvent};
pub use settings::HostSettings;
pub use store::{MemoryProgressStore, ProgressSnapshot, ProgressStore, SqliteProgressStore};

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let settings = HostSettings::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&settings.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(db = %settings.db_path.display(), "starting learner-progress");
    cli::skip_recoverable(cli::execute(cli, &settings))
}
