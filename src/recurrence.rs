//! Decides which trackers are due on a given day.

use crate::calendar::{weekday_of, Day};
use crate::ledger::CompletionLedger;
use crate::models::Tracker;

/// Whether `tracker` should be shown on `day`.
///
/// Irregular trackers stay pending on every day until first completed,
/// after which they only show on the day(s) they were completed. Regular
/// trackers follow their weekly schedule and ignore completion state.
pub fn is_due(tracker: &Tracker, day: Day, ledger: &CompletionLedger) -> bool {
    if tracker.is_irregular() {
        !ledger.has_any(tracker.id) || ledger.contains(tracker.id, day)
    } else {
        tracker.schedule.contains(&weekday_of(day))
    }
}

/// The trackers due on `day`, in input order.
pub fn due_trackers<'a>(
    trackers: impl IntoIterator<Item = &'a Tracker>,
    day: Day,
    ledger: &CompletionLedger,
) -> Vec<&'a Tracker> {
    trackers
        .into_iter()
        .filter(|tracker| is_due(tracker, day, ledger))
        .collect()
}
