//! Topic-keyed publish/subscribe registry.

use std::{collections::BTreeMap, fmt};

use crate::{Event, EventKind};

/// Handle returned by [`EventBus::subscribe`] and used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

type Callback = Box<dyn FnMut(&Event)>;

struct Listener {
    id: ListenerId,
    once: bool,
    callback: Callback,
}

/// Synchronous event bus that fans events out to topic listeners.
///
/// Listeners run in subscription order on the publishing thread. They receive
/// a shared reference and cannot reach the bus, so publication never re-enters.
#[derive(Default)]
pub struct EventBus {
    listeners: BTreeMap<EventKind, Vec<Listener>>,
    next_listener: u64,
}

impl EventBus {
    /// Creates a bus without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener invoked for every event of the topic.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.register(kind, false, Box::new(callback))
    }

    /// Registers a listener removed after its first invocation.
    pub fn subscribe_once<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.register(kind, true, Box::new(callback))
    }

    fn register(&mut self, kind: EventKind, once: bool, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.entry(kind).or_default().push(Listener {
            id,
            once,
            callback,
        });
        id
    }

    /// Removes a listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            let _ = self.listeners.remove(&kind);
        }
        removed
    }

    /// Delivers the event to every listener of its topic.
    pub fn publish(&mut self, event: &Event) {
        let kind = event.kind();
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return;
        };
        for listener in listeners.iter_mut() {
            (listener.callback)(event);
        }
        listeners.retain(|listener| !listener.once);
        if listeners.is_empty() {
            let _ = self.listeners.remove(&kind);
        }
    }

    /// Removes the listeners of one topic, or of every topic when `None`.
    pub fn clear(&mut self, kind: Option<EventKind>) {
        match kind {
            Some(kind) => {
                let _ = self.listeners.remove(&kind);
            }
            None => self.listeners.clear(),
        }
    }

    /// Reports whether the topic has at least one listener.
    #[must_use]
    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.listener_count(kind) > 0
    }

    /// Number of listeners registered for the topic.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Topics that currently have listeners, in topic order.
    #[must_use]
    pub fn event_kinds(&self) -> Vec<EventKind> {
        self.listeners.keys().copied().collect()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<EventKind, usize> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (*kind, listeners.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .finish()
    }
}
