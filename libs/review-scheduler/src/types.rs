//! Core types for the review scheduler.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Category of a learnable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Letter,
    Vocabulary,
    Grammar,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [Self::Letter, Self::Vocabulary, Self::Grammar];

    /// Get the item type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Vocabulary => "vocabulary",
            Self::Grammar => "grammar",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "letter" => Some(Self::Letter),
            "vocabulary" => Some(Self::Vocabulary),
            "grammar" => Some(Self::Grammar),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an item: ids are only unique within their category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub item_type: ItemType,
    pub item_id: String,
}

impl ItemKey {
    pub fn new(item_type: ItemType, item_id: impl Into<String>) -> Self {
        Self {
            item_type,
            item_id: item_id.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_type, self.item_id)
    }
}

/// Quality-of-recall grade for one review, 0 (blackout) to 5 (perfect).
///
/// Grades below 3 count as a lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MAX: u8 = 5;
    /// Lowest passing grade.
    pub const PASS: u8 = 3;

    /// Validate a raw grade value.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(SchedulerError::InvalidGrade(i64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_lapse(self) -> bool {
        self.0 < Self::PASS
    }

    /// The weakest passing grade, which only earns a dampened interval bump.
    pub fn is_hard(self) -> bool {
        self.0 == Self::PASS
    }

    pub fn is_perfect(self) -> bool {
        self.0 == Self::MAX
    }

    /// All valid grades, lowest first.
    pub fn all() -> impl Iterator<Item = Grade> {
        (0..=Self::MAX).map(Grade)
    }
}

impl TryFrom<u8> for Grade {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Grade {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(SchedulerError::InvalidGrade(value))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

/// Coarse lifecycle stage of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maturity {
    New,
    Learning,
    Young,
    Mature,
}

impl Maturity {
    pub const ALL: [Maturity; 4] = [Self::New, Self::Learning, Self::Young, Self::Mature];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Young => "young",
            Self::Mature => "mature",
        }
    }
}

fn default_ease_factor() -> f64 {
    2.5
}

/// Review state of one learnable item.
///
/// Items are snapshots: the scheduler never mutates one in place, it returns
/// a replacement that the caller stores instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub item_id: String,
    pub item_type: ItemType,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Days until the next review; 0 means due now.
    #[serde(default)]
    pub interval: u32,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub lapse_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Most recent grade last.
    #[serde(default)]
    pub recent_grades: Vec<u8>,
}

impl ReviewItem {
    /// Register a new item, due immediately.
    pub fn new(
        item_id: impl Into<String>,
        item_type: ItemType,
        ease_factor: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_type,
            ease_factor,
            interval: 0,
            due_date: now,
            review_count: 0,
            lapse_count: 0,
            last_review_date: None,
            created_at: now,
            recent_grades: Vec::new(),
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.item_type, self.item_id.clone())
    }

    pub fn matches(&self, item_type: ItemType, item_id: &str) -> bool {
        self.item_type == item_type && self.item_id == item_id
    }

    /// Never reviewed.
    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }

    /// Reviewed before and scheduled at or before `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_new() && self.due_date <= now
    }
}
