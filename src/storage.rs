//! The persistence capability the session depends on.
//!
//! `db::SqliteStorage` is the on-disk implementation. `MemoryStorage` holds
//! everything in process and is what you want for previews and tests.

use crate::calendar::Day;
use crate::error::{AppError, Result};
use crate::models::{CompletionRecord, StatisticsSnapshot, Tracker, TrackerId};
use std::collections::BTreeSet;

pub trait Storage {
    fn fetch_all_trackers(&self) -> Result<Vec<Tracker>>;

    fn fetch_all_completion_records(&self) -> Result<Vec<CompletionRecord>>;

    fn insert_or_replace_tracker(&mut self, tracker: &Tracker) -> Result<()>;

    /// Delete a tracker and every completion record that references it.
    /// Unknown ids are `AppError::NotFound`.
    fn delete_tracker(&mut self, id: TrackerId) -> Result<()>;

    /// Idempotent: re-inserting an existing record is not an error.
    fn insert_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()>;

    /// Idempotent: deleting a missing record is not an error.
    fn delete_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()>;

    /// Replace the single statistics row.
    fn replace_statistics_snapshot(&mut self, snapshot: &StatisticsSnapshot) -> Result<()>;

    fn fetch_statistics_snapshot(&self) -> Result<Option<StatisticsSnapshot>>;

    fn clear_statistics_snapshot(&mut self) -> Result<()>;
}

/// Process-local storage. Trackers keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    trackers: Vec<Tracker>,
    records: BTreeSet<CompletionRecord>,
    statistics: Option<StatisticsSnapshot>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn fetch_all_trackers(&self) -> Result<Vec<Tracker>> {
        Ok(self.trackers.clone())
    }

    fn fetch_all_completion_records(&self) -> Result<Vec<CompletionRecord>> {
        Ok(self.records.iter().copied().collect())
    }

    fn insert_or_replace_tracker(&mut self, tracker: &Tracker) -> Result<()> {
        match self.trackers.iter_mut().find(|t| t.id == tracker.id) {
            Some(existing) => *existing = tracker.clone(),
            None => self.trackers.push(tracker.clone()),
        }
        Ok(())
    }

    fn delete_tracker(&mut self, id: TrackerId) -> Result<()> {
        let before = self.trackers.len();
        self.trackers.retain(|t| t.id != id);
        if self.trackers.len() == before {
            return Err(AppError::tracker_not_found(id));
        }
        self.records.retain(|r| r.tracker_id != id);
        Ok(())
    }

    fn insert_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()> {
        self.records.insert(CompletionRecord::new(id, day));
        Ok(())
    }

    fn delete_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()> {
        self.records.remove(&CompletionRecord::new(id, day));
        Ok(())
    }

    fn replace_statistics_snapshot(&mut self, snapshot: &StatisticsSnapshot) -> Result<()> {
        self.statistics = Some(*snapshot);
        Ok(())
    }

    fn fetch_statistics_snapshot(&self) -> Result<Option<StatisticsSnapshot>> {
        Ok(self.statistics)
    }

    fn clear_statistics_snapshot(&mut self) -> Result<()> {
        self.statistics = None;
        Ok(())
    }
}
