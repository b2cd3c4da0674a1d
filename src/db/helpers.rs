use crate::db::Database;
use crate::error::{AppError, Result};
use log::{error, warn};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Lock the shared database, recovering from poisoning.
pub fn lock_db(db: &Mutex<Database>) -> MutexGuard<'_, Database> {
    match db.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Database mutex was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

/// Run a read against the shared database, mapping failures to `StorageRead`.
///
/// # Example
/// ```ignore
/// with_connection(&db, "trackers", |conn| {
///     conn.query_row("SELECT COUNT(*) FROM trackers", [], |row| row.get(0))
/// })
/// ```
pub fn with_connection<F, T>(db: &Arc<Mutex<Database>>, operation: &'static str, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> rusqlite::Result<T>,
{
    let guard = lock_db(db);
    f(guard.connection()).map_err(|e| {
        error!("Failed to read {operation}: {e}");
        AppError::read(operation, e)
    })
}

/// Run a write against the shared database, mapping failures to `StorageWrite`.
pub fn with_connection_mut<F, T>(db: &Arc<Mutex<Database>>, operation: &'static str, f: F) -> Result<T>
where
    F: FnOnce(&mut Connection) -> rusqlite::Result<T>,
{
    let mut guard = lock_db(db);
    f(guard.connection_mut()).map_err(|e| {
        error!("Failed to write {operation}: {e}");
        AppError::write(operation, e)
    })
}
