//! Shared test utilities.

#![cfg(test)]

use crate::calendar::Day;
use crate::db::{migrations, Database};
use crate::error::{AppError, Result};
use crate::models::{CompletionRecord, StatisticsSnapshot, Tracker, TrackerId};
use crate::storage::{MemoryStorage, Storage};
use std::cell::Cell;
use tempfile::{tempdir, TempDir};

/// Create a temporary test database with migrations applied.
///
/// Returns a tuple of (Database, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_db() -> (Database, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection()).expect("Failed to run migrations on test DB");
    (db, dir)
}

/// `MemoryStorage` that can be switched into failing reads or writes.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    fail_statistics_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Only the statistics row rejects writes.
    pub fn fail_statistics_writes(&self, fail: bool) {
        self.fail_statistics_writes.set(fail);
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn check_read(&self, operation: &'static str) -> Result<()> {
        if self.fail_reads.get() {
            return Err(AppError::read(operation, "injected failure"));
        }
        Ok(())
    }

    fn check_write(&self, operation: &'static str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(AppError::write(operation, "injected failure"));
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl Storage for FailingStorage {
    fn fetch_all_trackers(&self) -> Result<Vec<Tracker>> {
        self.check_read("trackers")?;
        self.inner.fetch_all_trackers()
    }

    fn fetch_all_completion_records(&self) -> Result<Vec<CompletionRecord>> {
        self.check_read("completion records")?;
        self.inner.fetch_all_completion_records()
    }

    fn insert_or_replace_tracker(&mut self, tracker: &Tracker) -> Result<()> {
        self.check_write("tracker")?;
        self.inner.insert_or_replace_tracker(tracker)
    }

    fn delete_tracker(&mut self, id: TrackerId) -> Result<()> {
        self.check_write("tracker")?;
        self.inner.delete_tracker(id)
    }

    fn insert_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()> {
        self.check_write("completion record")?;
        self.inner.insert_completion_record(id, day)
    }

    fn delete_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()> {
        self.check_write("completion record")?;
        self.inner.delete_completion_record(id, day)
    }

    fn replace_statistics_snapshot(&mut self, snapshot: &StatisticsSnapshot) -> Result<()> {
        if self.fail_statistics_writes.get() {
            return Err(AppError::write("statistics", "injected failure"));
        }
        self.check_write("statistics")?;
        self.inner.replace_statistics_snapshot(snapshot)
    }

    fn fetch_statistics_snapshot(&self) -> Result<Option<StatisticsSnapshot>> {
        self.check_read("statistics")?;
        self.inner.fetch_statistics_snapshot()
    }

    fn clear_statistics_snapshot(&mut self) -> Result<()> {
        self.check_write("statistics")?;
        self.inner.clear_statistics_snapshot()
    }
}
