//! Statistics derived from the tracker inventory and the completion ledger.
//!
//! Snapshots are always recomputed from scratch. Ideal days are judged
//! against the *current* tracker count, so adding a tracker can turn a past
//! ideal day into an ordinary one on the next recomputation.

use crate::calendar::{self, days_between, Day};
use crate::constants::MAX_PERCENT;
use crate::ledger::CompletionLedger;
use crate::models::{StatisticsSnapshot, Tracker};
use crate::storage::Storage;
use log::{debug, error};
use std::collections::BTreeSet;

/// Compute a snapshot using the current local day for the completion rate.
pub fn compute(trackers: &[Tracker], ledger: &CompletionLedger) -> StatisticsSnapshot {
    compute_at(trackers, ledger, calendar::today())
}

pub fn compute_at(trackers: &[Tracker], ledger: &CompletionLedger, today: Day) -> StatisticsSnapshot {
    let total_trackers = trackers.len();
    let grouped = ledger.grouped_by_day();

    let ideal_days = grouped
        .values()
        .filter(|ids| ids.len() == total_trackers)
        .count();

    let snapshot = StatisticsSnapshot {
        completed_count: saturating_u32(ledger.len()),
        ideal_days: saturating_u32(ideal_days),
        average_completion_percent: completion_percent(ledger.completed_on(today), total_trackers),
        best_streak: saturating_u32(best_streak(grouped.keys().copied())),
    };

    debug!(
        "Statistics for {today}: {} trackers, {} completion days -> {snapshot:?}",
        total_trackers,
        grouped.len()
    );
    snapshot
}

/// Longest run of consecutive days. Input order and duplicates don't matter.
pub fn best_streak(days: impl IntoIterator<Item = Day>) -> usize {
    let days: BTreeSet<Day> = days.into_iter().collect();
    let mut best = 0;
    let mut current = 0;
    let mut previous: Option<Day> = None;

    for day in days {
        current = match previous {
            Some(prev) if days_between(prev, day) == 1 => current + 1,
            _ => 1,
        };
        best = best.max(current);
        previous = Some(day);
    }

    best
}

/// `round(100 * completed / total)`, 0 when there are no trackers.
pub fn completion_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = u64::try_from(completed).unwrap_or(u64::MAX);
    let total = u64::try_from(total).unwrap_or(u64::MAX);
    // half-up rounding in integers: floor((200c + t) / 2t)
    let rounded = completed
        .saturating_mul(200)
        .saturating_add(total)
        / total.saturating_mul(2);
    u32::try_from(rounded).unwrap_or(MAX_PERCENT).min(MAX_PERCENT)
}

/// Recompute from storage. Never fails: when either source can't be read,
/// the error is logged and `last_known` is returned.
pub fn refresh<S: Storage + ?Sized>(storage: &S, last_known: StatisticsSnapshot, today: Day) -> StatisticsSnapshot {
    let trackers = match storage.fetch_all_trackers() {
        Ok(trackers) => trackers,
        Err(e) => {
            error!("Statistics refresh skipped, keeping last snapshot: {e}");
            return last_known;
        }
    };

    let ledger: CompletionLedger = match storage.fetch_all_completion_records() {
        Ok(records) => records.into_iter().collect(),
        Err(e) => {
            error!("Statistics refresh skipped, keeping last snapshot: {e}");
            return last_known;
        }
    };

    compute_at(&trackers, &ledger, today)
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
