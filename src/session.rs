//! The owning context for trackers, completions, the filter and statistics.
//!
//! Every mutation writes to storage first and only then touches memory, so a
//! failed write leaves the session unchanged. Statistics are recomputed after
//! each successful mutation and observers are told afterwards.

use crate::calendar::{Clock, Day, SystemClock};
use crate::config::SessionConfig;
use crate::error::{AppError, Result};
use crate::events::{ChangeEvent, EventBus, SubscriberId};
use crate::filter::{self, CompletionPredicate, FilterMode, FilterState};
use crate::ledger::CompletionLedger;
use crate::models::{group_into_categories, StatisticsSnapshot, Tracker, TrackerCategory, TrackerId};
use crate::stats;
use crate::storage::Storage;
use crate::validation::{validate_category_title, validate_tracker};
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};

pub struct Session<S: Storage> {
    storage: S,
    config: SessionConfig,
    clock: Box<dyn Clock>,
    /// Insertion order; `index` maps ids into it.
    trackers: Vec<Tracker>,
    index: HashMap<TrackerId, usize>,
    /// User-created categories, listed even while empty.
    extra_categories: BTreeSet<String>,
    ledger: CompletionLedger,
    filter: FilterState,
    statistics: StatisticsSnapshot,
    events: EventBus,
}

impl<S: Storage> Session<S> {
    /// Load everything from `storage` and compute fresh statistics.
    pub fn open(storage: S, config: SessionConfig, clock: impl Clock + 'static) -> Result<Self> {
        let stored_statistics = match storage.fetch_statistics_snapshot() {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(e) => {
                warn!("Could not read stored statistics, starting from zero: {e}");
                StatisticsSnapshot::default()
            }
        };

        let today = clock.today();
        let mut session = Self {
            storage,
            config,
            clock: Box::new(clock),
            trackers: Vec::new(),
            index: HashMap::new(),
            extra_categories: BTreeSet::new(),
            ledger: CompletionLedger::new(),
            filter: FilterState::new(today),
            statistics: stored_statistics,
            events: EventBus::new(),
        };
        session.load()?;
        session.recompute_statistics();

        info!(
            "Session opened: {} trackers, {} completion records",
            session.trackers.len(),
            session.ledger.len()
        );
        Ok(session)
    }

    pub fn open_with_system_clock(storage: S, config: SessionConfig) -> Result<Self> {
        Self::open(storage, config, SystemClock)
    }

    /// Re-read trackers and completions from storage.
    pub fn reload(&mut self) -> Result<()> {
        self.load()?;
        self.events.publish(&ChangeEvent::TrackersChanged);
        self.recompute_statistics();
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        let trackers = self.storage.fetch_all_trackers()?;
        let records = self.storage.fetch_all_completion_records()?;

        let index: HashMap<TrackerId, usize> = trackers
            .iter()
            .enumerate()
            .map(|(position, tracker)| (tracker.id, position))
            .collect();

        let total = records.len();
        let ledger: CompletionLedger = records
            .into_iter()
            .filter(|record| index.contains_key(&record.tracker_id))
            .collect();
        if ledger.len() < total {
            warn!(
                "Ignoring {} completion records for unknown trackers",
                total - ledger.len()
            );
        }

        self.trackers = trackers;
        self.index = index;
        self.ledger = ledger;
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn today(&self) -> Day {
        self.clock.today()
    }

    // Inventory

    /// All trackers in insertion order.
    pub fn trackers(&self) -> &[Tracker] {
        &self.trackers
    }

    pub fn tracker(&self, id: TrackerId) -> Option<&Tracker> {
        self.index.get(&id).and_then(|&position| self.trackers.get(position))
    }

    /// Unfiltered grouping: pinned first, then by title, including empty
    /// user-created categories.
    pub fn categories(&self) -> Vec<TrackerCategory> {
        group_into_categories(
            &self.trackers,
            self.extra_categories.iter().map(String::as_str),
            &self.config.pinned_category_title,
            &self.config.default_category_title,
        )
    }

    /// Register an empty category. Returns the trimmed title.
    pub fn create_category(&mut self, title: &str) -> Result<String> {
        let title = validate_category_title(title)?;
        if title == self.config.pinned_category_title {
            return Err(AppError::InvalidInput {
                field: "category",
                reason: format!("'{title}' is reserved"),
            });
        }
        if self.categories().iter().any(|c| c.title == title) {
            return Err(AppError::AlreadyExists {
                name: title.to_string(),
            });
        }

        self.extra_categories.insert(title.to_string());
        debug!("Created category '{title}'");
        self.events.publish(&ChangeEvent::TrackersChanged);
        Ok(title.to_string())
    }

    /// Validate and store a new tracker. Returns its id.
    pub fn add_tracker(&mut self, tracker: Tracker) -> Result<TrackerId> {
        if self.index.contains_key(&tracker.id) {
            return Err(AppError::AlreadyExists {
                name: tracker.id.to_string(),
            });
        }
        let tracker = self.validate(tracker)?;

        self.storage.insert_or_replace_tracker(&tracker)?;

        let id = tracker.id;
        self.index.insert(id, self.trackers.len());
        self.trackers.push(tracker);
        info!("Added tracker {id}");
        self.inventory_changed();
        Ok(id)
    }

    /// Replace a tracker with a new value carrying the same id.
    pub fn update_tracker(&mut self, tracker: Tracker) -> Result<()> {
        let position = self.position(tracker.id)?;
        let tracker = self.validate(tracker)?;
        if self.trackers.get(position) == Some(&tracker) {
            return Ok(());
        }

        self.storage.insert_or_replace_tracker(&tracker)?;
        self.replace_at(position, tracker);
        self.inventory_changed();
        Ok(())
    }

    /// Flip the pinned flag. Returns the new state.
    ///
    /// Pinning records the category the tracker was shown in; unpinning
    /// returns it there.
    pub fn toggle_pin(&mut self, id: TrackerId) -> Result<bool> {
        let position = self.position(id)?;
        let current = self
            .trackers
            .get(position)
            .ok_or_else(|| AppError::tracker_not_found(id))?;
        let toggled = if current.is_pinned {
            current.unpinned()
        } else {
            current.pinned(current.category_or(&self.config.default_category_title))
        };

        self.storage.insert_or_replace_tracker(&toggled)?;
        let pinned = toggled.is_pinned;
        self.replace_at(position, toggled);
        debug!("Tracker {id} pinned: {pinned}");
        self.inventory_changed();
        Ok(pinned)
    }

    /// Delete a tracker together with all of its completions.
    pub fn delete_tracker(&mut self, id: TrackerId) -> Result<()> {
        let position = self.position(id)?;

        self.storage.delete_tracker(id)?;

        if position < self.trackers.len() {
            self.trackers.remove(position);
        }
        self.reindex();
        let removed = self.ledger.remove_tracker(id);
        info!("Deleted tracker {id} with {removed} completions");
        self.inventory_changed();
        Ok(())
    }

    // Ledger

    /// Mark `id` done on `day`. Returns false if it already was.
    pub fn complete(&mut self, id: TrackerId, day: Day) -> Result<bool> {
        self.position(id)?;
        if self.ledger.contains(id, day) {
            return Ok(false);
        }

        self.storage.insert_completion_record(id, day)?;
        self.ledger.add(id, day);
        self.recompute_statistics();
        Ok(true)
    }

    /// Undo a completion. Returns false if there was none.
    pub fn uncomplete(&mut self, id: TrackerId, day: Day) -> Result<bool> {
        self.position(id)?;
        if !self.ledger.contains(id, day) {
            return Ok(false);
        }

        self.storage.delete_completion_record(id, day)?;
        self.ledger.remove(id, day);
        self.recompute_statistics();
        Ok(true)
    }

    /// Flip completion for `day`. Returns whether it is now completed.
    pub fn toggle_completion(&mut self, id: TrackerId, day: Day) -> Result<bool> {
        if self.ledger.contains(id, day) {
            self.uncomplete(id, day)?;
            Ok(false)
        } else {
            self.complete(id, day)?;
            Ok(true)
        }
    }

    pub fn is_completed(&self, id: TrackerId, day: Day) -> bool {
        self.ledger.contains(id, day)
    }

    /// Number of distinct days `id` was completed.
    pub fn completed_days(&self, id: TrackerId) -> usize {
        self.ledger.count_for(id)
    }

    pub fn ledger(&self) -> &CompletionLedger {
        &self.ledger
    }

    // Filter

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_reference_day(&mut self, day: Day) {
        self.filter.reference_day = day;
    }

    /// `Today` also moves the reference day to the clock's today.
    pub fn set_filter_mode(&mut self, mode: FilterMode) -> CompletionPredicate {
        let today = self.clock.today();
        self.filter.set_mode(mode, today)
    }

    pub fn set_search_text(&mut self, text: &str) {
        text.clone_into(&mut self.filter.search_text);
    }

    /// Categories as the current filter state shows them.
    pub fn visible_categories(&self) -> Vec<TrackerCategory> {
        filter::apply(
            &self.categories(),
            self.filter.reference_day,
            self.filter.predicate(),
            &self.filter.search_text,
            &self.ledger,
            &self.config.pinned_category_title,
        )
    }

    /// Whether anything is due on the reference day, before predicate and search.
    pub fn has_due_trackers(&self) -> bool {
        filter::has_due_trackers(&self.categories(), self.filter.reference_day, &self.ledger)
    }

    // Statistics

    /// The last published snapshot.
    pub fn statistics(&self) -> StatisticsSnapshot {
        self.statistics
    }

    /// Recompute from storage, persist and publish. Storage read failures
    /// keep the last snapshot.
    pub fn refresh_statistics(&mut self) -> StatisticsSnapshot {
        let snapshot = stats::refresh(&self.storage, self.statistics, self.clock.today());
        self.publish_statistics(snapshot);
        snapshot
    }

    /// Drop the persisted statistics row and publish a zero snapshot.
    pub fn clear_statistics(&mut self) -> Result<()> {
        self.storage.clear_statistics_snapshot()?;
        self.statistics = StatisticsSnapshot::default();
        info!("Statistics cleared");
        self.events
            .publish(&ChangeEvent::StatisticsChanged(self.statistics));
        Ok(())
    }

    // Events

    pub fn subscribe(&mut self, observer: impl Fn(&ChangeEvent) + 'static) -> SubscriberId {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Give the storage back, e.g. to reopen a session over it.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn validate(&self, tracker: Tracker) -> Result<Tracker> {
        let tracker = validate_tracker(tracker)?;
        if tracker.original_category.as_deref() == Some(self.config.pinned_category_title.as_str()) {
            return Err(AppError::InvalidInput {
                field: "category",
                reason: format!("'{}' is reserved", self.config.pinned_category_title),
            });
        }
        Ok(tracker)
    }

    fn position(&self, id: TrackerId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or_else(|| AppError::tracker_not_found(id))
    }

    fn replace_at(&mut self, position: usize, tracker: Tracker) {
        if let Some(slot) = self.trackers.get_mut(position) {
            *slot = tracker;
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .trackers
            .iter()
            .enumerate()
            .map(|(position, tracker)| (tracker.id, position))
            .collect();
    }

    fn inventory_changed(&mut self) {
        self.events.publish(&ChangeEvent::TrackersChanged);
        self.recompute_statistics();
    }

    fn recompute_statistics(&mut self) {
        let snapshot = stats::compute_at(&self.trackers, &self.ledger, self.clock.today());
        self.publish_statistics(snapshot);
    }

    /// Persist and announce `snapshot`. Persistence failures are logged only.
    fn publish_statistics(&mut self, snapshot: StatisticsSnapshot) {
        if let Err(e) = self.storage.replace_statistics_snapshot(&snapshot) {
            warn!("Failed to persist statistics: {e}");
        }
        if snapshot != self.statistics {
            self.statistics = snapshot;
            self.events.publish(&ChangeEvent::StatisticsChanged(snapshot));
        }
    }
}

impl<S: Storage + std::fmt::Debug> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("storage", &self.storage)
            .field("trackers", &self.trackers.len())
            .field("completions", &self.ledger.len())
            .field("filter", &self.filter)
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}
