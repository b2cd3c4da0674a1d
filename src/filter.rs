//! Filtered category view: schedule match, completion state, then search.

use crate::calendar::Day;
use crate::ledger::CompletionLedger;
use crate::models::{sort_for_display, Tracker, TrackerCategory};
use crate::recurrence::is_due;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    All,
    Today,
    Completed,
    Uncompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPredicate {
    Any,
    CompletedOn(Day),
    NotCompletedOn(Day),
}

impl CompletionPredicate {
    fn accepts(self, tracker: &Tracker, ledger: &CompletionLedger) -> bool {
        match self {
            Self::Any => true,
            Self::CompletedOn(day) => ledger.contains(tracker.id, day),
            Self::NotCompletedOn(day) => !ledger.contains(tracker.id, day),
        }
    }
}

/// Caller-owned filter context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub reference_day: Day,
    pub mode: FilterMode,
    pub search_text: String,
}

impl FilterState {
    pub fn new(reference_day: Day) -> Self {
        Self {
            reference_day,
            mode: FilterMode::All,
            search_text: String::new(),
        }
    }

    /// Switch mode. `Today` also moves `reference_day` to `today`.
    pub fn set_mode(&mut self, mode: FilterMode, today: Day) -> CompletionPredicate {
        self.mode = mode;
        if mode == FilterMode::Today {
            self.reference_day = today;
        }
        self.predicate()
    }

    pub fn predicate(&self) -> CompletionPredicate {
        match self.mode {
            FilterMode::All | FilterMode::Today => CompletionPredicate::Any,
            FilterMode::Completed => CompletionPredicate::CompletedOn(self.reference_day),
            FilterMode::Uncompleted => CompletionPredicate::NotCompletedOn(self.reference_day),
        }
    }
}

/// Run the pipeline over `categories`.
///
/// Stages are applied per tracker in order: due on `day`, `predicate`,
/// case-insensitive title search. Search text is matched as given, so
/// whitespace is significant. Categories left empty are dropped. The
/// result has `pinned_title` first, then the rest by title.
pub fn apply(
    categories: &[TrackerCategory],
    day: Day,
    predicate: CompletionPredicate,
    search_text: &str,
    ledger: &CompletionLedger,
    pinned_title: &str,
) -> Vec<TrackerCategory> {
    let needle = search_text.to_lowercase();

    let mut filtered: Vec<TrackerCategory> = categories
        .iter()
        .filter_map(|category| {
            let trackers: Vec<_> = category
                .trackers
                .iter()
                .filter(|t| is_due(t, day, ledger))
                .filter(|t| predicate.accepts(t, ledger))
                .filter(|t| needle.is_empty() || t.title.to_lowercase().contains(&needle))
                .cloned()
                .collect();

            (!trackers.is_empty()).then(|| TrackerCategory {
                title: category.title.clone(),
                trackers,
            })
        })
        .collect();

    sort_for_display(&mut filtered, pinned_title);

    debug!(
        "Filtered {day}: {} categories, {} trackers",
        filtered.len(),
        filtered.iter().map(|c| c.trackers.len()).sum::<usize>()
    );
    filtered
}

/// Whether anything at all is due on `day`, regardless of completion or search.
pub fn has_due_trackers(categories: &[TrackerCategory], day: Day, ledger: &CompletionLedger) -> bool {
    categories
        .iter()
        .flat_map(|c| c.trackers.iter())
        .any(|t| is_due(t, day, ledger))
}
