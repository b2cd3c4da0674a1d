//! Change notification for observers of a session.

use crate::models::StatisticsSnapshot;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    StatisticsChanged(StatisticsSnapshot),
    TrackersChanged,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Observer = Box<dyn Fn(&ChangeEvent)>;

/// Synchronous publish/subscribe. Observers run in subscription order on
/// the publishing thread.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    observers: Vec<(SubscriberId, Observer)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl Fn(&ChangeEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn publish(&self, event: &ChangeEvent) {
        trace!("Publishing {event:?} to {} observers", self.observers.len());
        for (_, observer) in &self.observers {
            observer(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(bus: &mut EventBus, tag: &'static str, log: &Rc<RefCell<Vec<String>>>) -> SubscriberId {
        let log = Rc::clone(log);
        bus.subscribe(move |event| log.borrow_mut().push(format!("{tag}:{event:?}")))
    }

    #[test]
    fn test_observers_called_in_subscription_order() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&mut bus, "a", &log);
        recorder(&mut bus, "b", &log);

        bus.publish(&ChangeEvent::TrackersChanged);

        assert_eq!(*log.borrow(), vec!["a:TrackersChanged", "b:TrackersChanged"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&mut bus, "a", &log);
        recorder(&mut bus, "b", &log);

        assert!(bus.unsubscribe(a));
        assert!(!bus.unsubscribe(a));
        bus.publish(&ChangeEvent::StatisticsChanged(StatisticsSnapshot::default()));

        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].starts_with("b:StatisticsChanged"));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut bus = EventBus::new();
        let first = bus.subscribe(|_| {});
        bus.unsubscribe(first);
        let second = bus.subscribe(|_| {});
        assert_ne!(first, second);
    }

    #[test]
    fn test_debug_shows_subscriber_count() {
        let mut bus = EventBus::new();
        bus.subscribe(|_| {});
        assert_eq!(format!("{bus:?}"), "EventBus { subscribers: 1, .. }");
    }

    #[test]
    fn test_publish_without_observers() {
        EventBus::new().publish(&ChangeEvent::TrackersChanged);
    }
}
