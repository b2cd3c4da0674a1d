use super::{migrations, with_connection, with_connection_mut, Database};
use crate::calendar::{format_schedule, parse_schedule, Day};
use crate::constants::STATISTICS_ROW_ID;
use crate::error::{AppError, Result};
use crate::models::{CompletionRecord, StatisticsSnapshot, Tracker, TrackerId};
use crate::storage::Storage;
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

impl ToSql for TrackerId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TrackerId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Self>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Day {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Day {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Self>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

const TRACKER_COLUMNS: &str =
    "id, title, color, emoji, schedule, is_pinned, creation_date, original_category";

fn conversion_error(column: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn tracker_from_row(row: &Row<'_>) -> rusqlite::Result<Tracker> {
    let schedule: String = row.get(4)?;
    let schedule = parse_schedule(&schedule).map_err(|e| conversion_error(4, e))?;

    let creation_date = row
        .get::<_, Option<String>>(6)?
        .map(|text| {
            DateTime::parse_from_rfc3339(&text)
                .map(|date| date.with_timezone(&Utc))
                .map_err(|e| {
                    conversion_error(
                        6,
                        AppError::InvalidInput {
                            field: "creation_date",
                            reason: format!("'{text}': {e}"),
                        },
                    )
                })
        })
        .transpose()?;

    Ok(Tracker {
        id: row.get(0)?,
        title: row.get(1)?,
        color: row.get(2)?,
        emoji: row.get(3)?,
        schedule,
        is_pinned: row.get(5)?,
        creation_date,
        original_category: row.get(7)?,
    })
}

/// `Storage` backed by SQLite. The database handle is shareable so other
/// components can read the same file.
pub struct SqliteStorage {
    db: Arc<Mutex<Database>>,
}

impl SqliteStorage {
    /// Take ownership of `db`, running migrations first.
    pub fn new(db: Database) -> Result<Self> {
        migrations::run(db.connection()).map_err(|e| AppError::write("schema", e))?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Use an already-shared, already-migrated database.
    pub fn shared(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.db)
    }
}

impl Storage for SqliteStorage {
    fn fetch_all_trackers(&self) -> Result<Vec<Tracker>> {
        with_connection(&self.db, "trackers", |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TRACKER_COLUMNS} FROM trackers ORDER BY rowid"
            ))?;
            let rows = stmt.query_map([], tracker_from_row)?;
            rows.collect()
        })
    }

    fn fetch_all_completion_records(&self) -> Result<Vec<CompletionRecord>> {
        with_connection(&self.db, "completion records", |conn| {
            let mut stmt =
                conn.prepare("SELECT tracker_id, day FROM completion_records ORDER BY day, tracker_id")?;
            let rows = stmt.query_map([], |row| {
                Ok(CompletionRecord {
                    tracker_id: row.get(0)?,
                    day: row.get(1)?,
                })
            })?;
            rows.collect()
        })
    }

    fn insert_or_replace_tracker(&mut self, tracker: &Tracker) -> Result<()> {
        with_connection_mut(&self.db, "tracker", |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO trackers ({TRACKER_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(id) DO UPDATE SET
                         title = excluded.title,
                         color = excluded.color,
                         emoji = excluded.emoji,
                         schedule = excluded.schedule,
                         is_pinned = excluded.is_pinned,
                         creation_date = excluded.creation_date,
                         original_category = excluded.original_category"
                ),
                params![
                    tracker.id,
                    tracker.title,
                    tracker.color,
                    tracker.emoji,
                    format_schedule(&tracker.schedule),
                    tracker.is_pinned,
                    tracker
                        .creation_date
                        .map(|d| d.to_rfc3339_opts(SecondsFormat::Nanos, true)),
                    tracker.original_category,
                ],
            )
        })?;
        Ok(())
    }

    fn delete_tracker(&mut self, id: TrackerId) -> Result<()> {
        let deleted = with_connection_mut(&self.db, "tracker", |conn| {
            let tx = conn.transaction()?;
            let records = tx.execute("DELETE FROM completion_records WHERE tracker_id = ?1", params![id])?;
            let trackers = tx.execute("DELETE FROM trackers WHERE id = ?1", params![id])?;
            if trackers == 0 {
                // nothing to delete; dropping the transaction rolls back
                return Ok(None);
            }
            tx.commit()?;
            Ok(Some(records))
        })?;

        match deleted {
            Some(records) => {
                info!("Deleted tracker {id} and {records} completion records");
                Ok(())
            }
            None => Err(AppError::tracker_not_found(id)),
        }
    }

    fn insert_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()> {
        with_connection_mut(&self.db, "completion record", |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO completion_records (tracker_id, day) VALUES (?1, ?2)",
                params![id, day],
            )
        })?;
        Ok(())
    }

    fn delete_completion_record(&mut self, id: TrackerId, day: Day) -> Result<()> {
        with_connection_mut(&self.db, "completion record", |conn| {
            conn.execute(
                "DELETE FROM completion_records WHERE tracker_id = ?1 AND day = ?2",
                params![id, day],
            )
        })?;
        Ok(())
    }

    fn replace_statistics_snapshot(&mut self, snapshot: &StatisticsSnapshot) -> Result<()> {
        with_connection_mut(&self.db, "statistics", |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM statistics", [])?;
            tx.execute(
                "INSERT INTO statistics (id, completed_count, ideal_days, average_completion_percent, best_streak)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    STATISTICS_ROW_ID,
                    snapshot.completed_count,
                    snapshot.ideal_days,
                    snapshot.average_completion_percent,
                    snapshot.best_streak,
                ],
            )?;
            tx.commit()
        })
    }

    fn fetch_statistics_snapshot(&self) -> Result<Option<StatisticsSnapshot>> {
        with_connection(&self.db, "statistics", |conn| {
            conn.query_row(
                "SELECT completed_count, ideal_days, average_completion_percent, best_streak
                 FROM statistics WHERE id = ?1",
                params![STATISTICS_ROW_ID],
                |row| {
                    Ok(StatisticsSnapshot {
                        completed_count: row.get(0)?,
                        ideal_days: row.get(1)?,
                        average_completion_percent: row.get(2)?,
                        best_streak: row.get(3)?,
                    })
                },
            )
            .optional()
        })
    }

    fn clear_statistics_snapshot(&mut self) -> Result<()> {
        with_connection_mut(&self.db, "statistics", |conn| conn.execute("DELETE FROM statistics", []))?;
        Ok(())
    }
}
