//! Event notification for hierarchy mutations
//!
//! The managers publish a fine-grained event for every mutation, followed by
//! a coarse `Changed` event, so UI code can either react precisely or just
//! re-render. Subscriptions return a handle that can be used to unsubscribe.

use crate::model::{Layer, Level};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A single-threaded callback registry for one event type.
pub struct EventBus<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn Fn(&E)>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Register a callback invoked for every emitted event.
    pub fn subscribe(&mut self, callback: impl Fn(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a previously registered callback.
    ///
    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber, in subscription order.
    pub fn emit(&self, event: &E) {
        for (_, callback) in &self.subscribers {
            callback(event);
        }
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Events published by the layer manager.
#[derive(Debug, Clone)]
pub enum LayerEvent {
    /// A layer was created.
    Added(Layer),
    /// A layer's fields were updated.
    Updated(Layer),
    /// A layer (and, on forced delete, its descendants) was removed.
    Removed { ids: Vec<String> },
    /// A layer was reparented.
    Moved {
        id: String,
        new_parent_id: Option<String>,
    },
    /// The active drawing layer changed.
    ActiveChanged { id: String },
    /// Coarse notification emitted after every mutation.
    Changed,
}

/// Events published by the level manager.
#[derive(Debug, Clone)]
pub enum LevelEvent {
    /// A site was created.
    SiteAdded { id: String },
    /// A building was created.
    BuildingAdded { id: String },
    /// A level was created or copied.
    LevelAdded(Level),
    /// A site, building or level was updated.
    Updated { id: String },
    /// A cascade delete completed; ids list every removed entity (sites,
    /// buildings, levels) but not the removed objects.
    Removed { ids: Vec<String> },
    /// An object was assigned to or moved between levels.
    ObjectAssigned { object_id: String, level_id: String },
    /// Coarse notification emitted after every mutation.
    Changed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let mut bus: EventBus<u32> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = Rc::clone(&seen);
        bus.subscribe(move |event| seen_clone.borrow_mut().push(*event));

        bus.emit(&1);
        bus.emit(&2);

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus: EventBus<u32> = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));

        let seen_clone = Rc::clone(&seen);
        let sub = bus.subscribe(move |_| *seen_clone.borrow_mut() += 1);

        bus.emit(&1);
        assert!(bus.unsubscribe(sub));
        bus.emit(&2);

        assert_eq!(*seen.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id() {
        let mut bus: EventBus<u32> = EventBus::new();
        let sub = bus.subscribe(|_| {});
        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
    }

    #[test]
    fn test_multiple_subscribers_all_notified() {
        let mut bus: EventBus<&'static str> = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            let count_clone = Rc::clone(&count);
            bus.subscribe(move |_| *count_clone.borrow_mut() += 1);
        }

        bus.emit(&"changed");
        assert_eq!(*count.borrow(), 3);
    }
}
