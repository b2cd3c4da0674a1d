use crate::calendar::Weekday;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque unique tracker identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerId(Uuid);

impl TrackerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TrackerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TrackerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A habit definition. Values are immutable: edits build a new value
/// carrying the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: TrackerId,
    pub title: String,
    /// `#RRGGBB`
    pub color: String,
    pub emoji: String,
    pub schedule: BTreeSet<Weekday>,
    pub is_pinned: bool,
    pub creation_date: Option<DateTime<Utc>>,
    pub original_category: Option<String>,
}

impl Tracker {
    /// A weekly habit due on every day in `schedule`.
    pub fn habit(
        title: &str,
        color: &str,
        emoji: &str,
        schedule: impl IntoIterator<Item = Weekday>,
        category: &str,
    ) -> Self {
        Self {
            id: TrackerId::new(),
            title: title.to_string(),
            color: color.to_string(),
            emoji: emoji.to_string(),
            schedule: schedule.into_iter().collect(),
            is_pinned: false,
            creation_date: None,
            original_category: Some(category.to_string()),
        }
    }

    /// A one-off event. It carries a creation date and the weekday it was
    /// created on as its only schedule entry.
    pub fn irregular_event(
        title: &str,
        color: &str,
        emoji: &str,
        created_at: DateTime<Utc>,
        category: &str,
    ) -> Self {
        let weekday = Weekday::from(chrono::Datelike::weekday(&created_at));
        Self {
            id: TrackerId::new(),
            title: title.to_string(),
            color: color.to_string(),
            emoji: emoji.to_string(),
            schedule: BTreeSet::from([weekday]),
            is_pinned: false,
            creation_date: Some(created_at),
            original_category: Some(category.to_string()),
        }
    }

    /// One-off trackers are recognised by exactly one schedule entry plus a
    /// creation date.
    ///
    /// A weekly habit that happens to run on a single weekday and also has a
    /// creation date is classified as irregular too. The two cases can't be
    /// told apart from the stored fields.
    pub fn is_irregular(&self) -> bool {
        self.schedule.len() == 1 && self.creation_date.is_some()
    }

    /// Pin, remembering the category it was shown in.
    #[must_use]
    pub fn pinned(&self, shown_in: &str) -> Self {
        Self {
            is_pinned: true,
            original_category: Some(shown_in.to_string()),
            ..self.clone()
        }
    }

    /// Unpin, keeping the remembered category.
    #[must_use]
    pub fn unpinned(&self) -> Self {
        Self {
            is_pinned: false,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_title(&self, title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_schedule(&self, schedule: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            schedule: schedule.into_iter().collect(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn moved_to(&self, category: &str) -> Self {
        Self {
            original_category: Some(category.to_string()),
            ..self.clone()
        }
    }

    /// Category this tracker lives in when not pinned.
    pub fn category_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.original_category.as_deref().unwrap_or(default)
    }
}
