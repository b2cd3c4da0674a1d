//! The set of (tracker, day) completion facts.

use crate::calendar::Day;
use crate::models::{CompletionRecord, TrackerId};
use std::collections::{BTreeMap, BTreeSet};

/// A set of completion records keyed by tracker. At most one record per
/// (tracker, day) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionLedger {
    days_by_tracker: BTreeMap<TrackerId, BTreeSet<Day>>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion. Returns false if it was already recorded.
    pub fn add(&mut self, tracker_id: TrackerId, day: Day) -> bool {
        self.days_by_tracker.entry(tracker_id).or_default().insert(day)
    }

    /// Forget a completion. Returns false if there was nothing to remove.
    pub fn remove(&mut self, tracker_id: TrackerId, day: Day) -> bool {
        let Some(days) = self.days_by_tracker.get_mut(&tracker_id) else {
            return false;
        };
        let removed = days.remove(&day);
        if days.is_empty() {
            self.days_by_tracker.remove(&tracker_id);
        }
        removed
    }

    /// Drop every completion of a tracker. Returns how many were removed.
    pub fn remove_tracker(&mut self, tracker_id: TrackerId) -> usize {
        self.days_by_tracker
            .remove(&tracker_id)
            .map_or(0, |days| days.len())
    }

    pub fn contains(&self, tracker_id: TrackerId, day: Day) -> bool {
        self.days_by_tracker
            .get(&tracker_id)
            .is_some_and(|days| days.contains(&day))
    }

    /// Whether the tracker was ever completed.
    pub fn has_any(&self, tracker_id: TrackerId) -> bool {
        self.days_by_tracker.contains_key(&tracker_id)
    }

    /// Distinct completed days for a tracker.
    pub fn count_for(&self, tracker_id: TrackerId) -> usize {
        self.days_by_tracker.get(&tracker_id).map_or(0, BTreeSet::len)
    }

    /// Number of trackers completed on `day`.
    pub fn completed_on(&self, day: Day) -> usize {
        self.days_by_tracker
            .values()
            .filter(|days| days.contains(&day))
            .count()
    }

    pub fn grouped_by_day(&self) -> BTreeMap<Day, BTreeSet<TrackerId>> {
        let mut grouped: BTreeMap<Day, BTreeSet<TrackerId>> = BTreeMap::new();
        for (tracker_id, days) in &self.days_by_tracker {
            for day in days {
                grouped.entry(*day).or_default().insert(*tracker_id);
            }
        }
        grouped
    }

    pub fn records(&self) -> impl Iterator<Item = CompletionRecord> + '_ {
        self.days_by_tracker.iter().flat_map(|(tracker_id, days)| {
            days.iter()
                .map(move |day| CompletionRecord::new(*tracker_id, *day))
        })
    }

    /// Total distinct records.
    pub fn len(&self) -> usize {
        self.days_by_tracker.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days_by_tracker.is_empty()
    }
}

impl FromIterator<CompletionRecord> for CompletionLedger {
    fn from_iter<I: IntoIterator<Item = CompletionRecord>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for record in iter {
            ledger.add(record.tracker_id, record.day);
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut ledger = CompletionLedger::new();
        let id = TrackerId::new();

        assert!(ledger.add(id, day(2024, 1, 1)));
        assert!(!ledger.add(id, day(2024, 1, 1)));

        assert_eq!(ledger.count_for(id), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut ledger = CompletionLedger::new();
        let id = TrackerId::new();

        assert!(!ledger.remove(id, day(2024, 1, 1)));
        assert!(!ledger.contains(id, day(2024, 1, 1)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_remove_last_day_forgets_tracker() {
        let mut ledger = CompletionLedger::new();
        let id = TrackerId::new();
        ledger.add(id, day(2024, 1, 1));

        assert!(ledger.has_any(id));
        assert!(ledger.remove(id, day(2024, 1, 1)));
        assert!(!ledger.has_any(id));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_count_for_is_per_tracker() {
        let mut ledger = CompletionLedger::new();
        let a = TrackerId::new();
        let b = TrackerId::new();
        ledger.add(a, day(2024, 1, 1));
        ledger.add(a, day(2024, 1, 2));
        ledger.add(b, day(2024, 1, 2));

        assert_eq!(ledger.count_for(a), 2);
        assert_eq!(ledger.count_for(b), 1);
        assert_eq!(ledger.count_for(TrackerId::new()), 0);
        assert_eq!(ledger.completed_on(day(2024, 1, 2)), 2);
        assert_eq!(ledger.completed_on(day(2024, 1, 3)), 0);
    }

    #[test]
    fn test_grouped_by_day() {
        let mut ledger = CompletionLedger::new();
        let a = TrackerId::new();
        let b = TrackerId::new();
        ledger.add(a, day(2024, 1, 1));
        ledger.add(b, day(2024, 1, 1));
        ledger.add(a, day(2024, 1, 3));

        let grouped = ledger.grouped_by_day();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&day(2024, 1, 1)], BTreeSet::from([a, b]));
        assert_eq!(grouped[&day(2024, 1, 3)], BTreeSet::from([a]));
    }

    #[test]
    fn test_remove_tracker_cascades() {
        let mut ledger = CompletionLedger::new();
        let a = TrackerId::new();
        let b = TrackerId::new();
        ledger.add(a, day(2024, 1, 1));
        ledger.add(a, day(2024, 1, 2));
        ledger.add(b, day(2024, 1, 2));

        assert_eq!(ledger.remove_tracker(a), 2);
        assert_eq!(ledger.remove_tracker(a), 0);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(b, day(2024, 1, 2)));
    }

    #[test]
    fn test_from_iterator_collapses_duplicates() {
        let id = TrackerId::new();
        let ledger: CompletionLedger = [
            CompletionRecord::new(id, day(2024, 1, 1)),
            CompletionRecord::new(id, day(2024, 1, 1)),
            CompletionRecord::new(id, day(2024, 1, 2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.records().count(), 2);
    }
}
