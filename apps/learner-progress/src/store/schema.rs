//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// One JSON snapshot per profile.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS progress (
    profile_id TEXT PRIMARY KEY,
    snapshot_json TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
