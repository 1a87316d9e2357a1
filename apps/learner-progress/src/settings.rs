//! Host settings loaded from the environment.

use std::path::{Path, PathBuf};

use review_scheduler::SchedulerConfig;

use crate::error::{ProgressError, Result};

pub const DB_PATH_VAR: &str = "LEARNER_PROGRESS_DB";
pub const PROFILE_VAR: &str = "LEARNER_PROGRESS_PROFILE";
pub const CONFIG_VAR: &str = "LEARNER_PROGRESS_CONFIG";
pub const RESET_HOUR_VAR: &str = "LEARNER_PROGRESS_RESET_HOUR";
pub const LOG_VAR: &str = "RUST_LOG";

/// Settings for the progress host process.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSettings {
    pub db_path: PathBuf,
    /// Language/profile key the snapshot is stored under.
    pub profile_id: String,
    /// Optional JSON file with global scheduler configuration.
    pub config_path: Option<PathBuf>,
    /// Hour of day (0-23) when a new study day begins.
    pub daily_reset_hour: u32,
    pub log_filter: String,
}

impl HostSettings {
    /// Read settings from the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let daily_reset_hour = match lookup(RESET_HOUR_VAR) {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|hour| *hour < 24)
                .ok_or_else(|| ProgressError::InvalidSetting {
                    key: RESET_HOUR_VAR.to_string(),
                    value,
                })?,
            None => 0,
        };

        Ok(Self {
            db_path: lookup(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            profile_id: lookup(PROFILE_VAR).unwrap_or_else(|| "default".to_string()),
            config_path: lookup(CONFIG_VAR).map(PathBuf::from),
            daily_reset_hour,
            log_filter: lookup(LOG_VAR).unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Global scheduler configuration, from the config file when one is set.
    pub fn scheduler_config(&self) -> Result<SchedulerConfig> {
        match &self.config_path {
            Some(path) => load_scheduler_config(path),
            None => Ok(SchedulerConfig::default()),
        }
    }
}

/// Default database location in the platform data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("learner-progress")
        .join("progress.db")
}

/// Load scheduler configuration from JSON; missing fields keep defaults.
pub fn load_scheduler_config(path: &Path) -> Result<SchedulerConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: SchedulerConfig = serde_json::from_str(&contents)?;
    config
        .validate()
        .map_err(|err| ProgressError::InvalidSetting {
            key: CONFIG_VAR.to_string(),
            value: err.to_string(),
        })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = HostSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.profile_id, "default");
        assert_eq!(settings.daily_reset_hour, 0);
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.config_path, None);
        assert!(settings.db_path.ends_with("learner-progress/progress.db"));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let settings = HostSettings::from_lookup(lookup(&[
            (DB_PATH_VAR, "/tmp/progress.db"),
            (PROFILE_VAR, "ko"),
            (RESET_HOUR_VAR, "4"),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();
        assert_eq!(settings.db_path, PathBuf::from("/tmp/progress.db"));
        assert_eq!(settings.profile_id, "ko");
        assert_eq!(settings.daily_reset_hour, 4);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn test_invalid_reset_hour() {
        let result = HostSettings::from_lookup(lookup(&[(RESET_HOUR_VAR, "25")]));
        assert!(matches!(
            result,
            Err(ProgressError::InvalidSetting { ref key, .. }) if key == RESET_HOUR_VAR
        ));
    }

    fn write_config(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "learner-progress-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_config_file_merges_with_defaults() {
        let path = write_config("partial", r#"{ "max_new_per_day": 5 }"#);
        let config = load_scheduler_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.max_new_per_day, 5);
        assert_eq!(config.maximum_interval, 36_500);
    }

    #[test]
    fn test_config_file_with_unbounded_interval_is_rejected() {
        let path = write_config("unbounded", r#"{ "maximum_interval": 4294967295 }"#);
        let result = load_scheduler_config(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(ProgressError::InvalidSetting { ref key, ref value })
                if key == CONFIG_VAR && value.contains("maximum_interval")
        ));
    }

    #[test]
    fn test_config_file_with_low_ease_floor_is_rejected() {
        let path = write_config("ease", r#"{ "min_ease_factor": 1.0 }"#);
        let result = load_scheduler_config(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(ProgressError::InvalidSetting { ref value, .. }) if value.contains("min_ease_factor")
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let settings = HostSettings {
            config_path: Some(PathBuf::from("/nonexistent/learner-progress.json")),
            ..HostSettings::from_lookup(lookup(&[])).unwrap()
        };
        assert!(matches!(settings.scheduler_config(), Err(ProgressError::Io(_))));
    }
}
