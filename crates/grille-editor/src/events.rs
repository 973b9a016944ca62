//! Change notifications.
//!
//! Every emitted [`SceneEvent`] is handed to each subscriber in subscription
//! order and also queued until [`EventBus::drain`] is called, so a view can
//! either react immediately or poll once per frame.

use grille_core::{ForceId, LineId, NodeId, Plane};
use std::fmt;

/// An element removed from the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Node(NodeId),
    Line(LineId),
    Force(ForceId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    NodeAdded(NodeId),
    LineAdded(LineId),
    ForceAdded(ForceId),
    ElementDeleted(ElementRef),
    /// The scene or transform changed wholesale (undo, redo, clear, pan,
    /// zoom, load).
    StateChanged,
    PlaneChanged(Plane),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&SceneEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    queue: Vec<SceneEvent>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SceneEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: SceneEvent) {
        log::trace!("emit {event:?}");
        for (_, callback) in &mut self.subscribers {
            callback(&event);
        }
        self.queue.push(event);
    }

    /// Take every event queued since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.queue)
    }
}
