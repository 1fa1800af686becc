//! Grid notifications and their subscriber registry.
//!
//! Delivery is synchronous and happens in registration order within the tick
//! that produced the event. A subscriber ends its own subscription by returning
//! [`Delivery::Unsubscribe`]; the event being delivered still reaches every
//! later subscriber, and the removal takes effect before the next event.

use glam::Vec3;
use tokio::sync::mpsc;

use crate::types::{BlockColor, BlockId, Layer};

/// Notification emitted by the grid, the shot resolver or the progress tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// A structural mutation (removal or compaction) happened.
    GridChanged,
    /// A settle animation snapped every block to its target.
    SettleComplete,
    /// A shot sequence finished.
    ShootComplete { success: bool },
    /// A bullet was spent; `remaining` is the new count.
    BulletUsed { remaining: u32 },
    /// Every block of the level has been removed.
    ProgressComplete,
    /// A block entity was created at level construction.
    BlockSpawned {
        id: BlockId,
        color: BlockColor,
        layer: Layer,
        position: Vec3,
    },
    /// A block entity was destroyed.
    BlockDestroyed { id: BlockId },
}

/// Returned by a subscriber after each delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Keep,
    Unsubscribe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&GridEvent) -> Delivery + Send>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&GridEvent) -> Delivery + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Forward every event into an unbounded channel.
    ///
    /// The subscription ends on the first delivery after the receiver is dropped.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, mpsc::UnboundedReceiver<GridEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.subscribe(move |event| match tx.send(*event) {
            Ok(()) => Delivery::Keep,
            Err(_) => Delivery::Unsubscribe,
        });
        (id, rx)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: GridEvent) {
        self.subscribers
            .retain_mut(|(_, callback)| callback(&event) == Delivery::Keep);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
