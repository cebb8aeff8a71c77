//! Synchronous observer lists.
//!
//! Listeners receive events by shared reference after the document has
//! finished the step being reported, so they can inspect the event but
//! never re-enter the document.

use crate::editing::{MarkClass, MarkId, Origin, Position, Selection};

/// A buffer edit as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Start of the replaced span, in pre-edit coordinates
    pub from: Position,
    /// End of the replaced span, in pre-edit coordinates
    pub to: Position,
    pub text: String,
    pub removed: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeforeSelectionChange,
    BeforeChange,
    Change,
    CursorActivity,
    MarkerChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BeforeSelectionChange { from: Selection, to: Selection },
    BeforeChange(Change),
    /// The document changed. `None` when only marks or line classes moved.
    Change(Option<Change>),
    CursorActivity(Selection),
    MarkerChange { class: MarkClass, added: Vec<MarkId> },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BeforeSelectionChange { .. } => EventKind::BeforeSelectionChange,
            Event::BeforeChange(_) => EventKind::BeforeChange,
            Event::Change(_) => EventKind::Change,
            Event::CursorActivity(_) => EventKind::CursorActivity,
            Event::MarkerChange { .. } => EventKind::MarkerChange,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Event)>;

/// Ordered subscriber lists per event kind.
#[derive(Default)]
pub struct Emitter {
    listeners: Vec<(SubscriptionId, EventKind, Listener)>,
    next_id: u64,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _, _)| *other != id);
        before != self.listeners.len()
    }

    /// Call every listener for the event's kind, in subscription order.
    pub fn emit(&mut self, event: &Event) {
        let kind = event.kind();
        for (_, listening, listener) in &mut self.listeners {
            if *listening == kind {
                listener(event);
            }
        }
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
