pub mod calendar;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod events;
pub mod filter;
pub mod ledger;
pub mod models;
pub mod recurrence;
pub mod session;
pub mod stats;
pub mod storage;
#[cfg(test)]
mod test_utils;
pub mod validation;

pub use calendar::{Clock, Day, FixedClock, SystemClock, Weekday};
pub use config::{default_db_path, InitError, SessionConfig};
pub use error::{AppError, Result};
pub use events::{ChangeEvent, EventBus, SubscriberId};
pub use filter::{CompletionPredicate, FilterMode, FilterState};
pub use ledger::CompletionLedger;
pub use models::{CompletionRecord, StatisticsSnapshot, Tracker, TrackerCategory, TrackerId};
pub use session::Session;
pub use storage::{MemoryStorage, Storage};

use db::{Database, SqliteStorage};
use log::info;

/// Open a session over the SQLite database in the platform data directory.
pub fn open_default_session(config: SessionConfig) -> std::result::Result<Session<SqliteStorage>, Box<dyn std::error::Error>> {
    let db_path = default_db_path()?;
    info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path).map_err(|e| AppError::read("database", e))?;
    let storage = SqliteStorage::new(db)?;
    Ok(Session::open_with_system_clock(storage, config)?)
}
