//! Operation-lifecycle and progress events.
//!
//! The bus is the synchronization contract with the external pseudocode
//! highlighter: per run it carries exactly one `operation-start`, zero or
//! more `step-progress` entries in pseudocode execution order, and exactly
//! one `operation-done`. Delivery is synchronous with publish; there is no
//! queuing or replay, so late subscribers never see past events.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::model::OperationKind;

/// Ephemeral progress payload pointing at a pseudocode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoreographyStep {
    /// Monotonically increasing step counter within one run, starting at 1.
    pub step_id: u64,
    /// 1-based pseudocode line index for the corresponding statement.
    pub line_index: u32,
}

/// Event payloads carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// A choreography run started.
    OperationStart {
        /// The operation being animated.
        op: OperationKind,
    },
    /// One phase of the run reached its pseudocode statement.
    StepProgress {
        /// Step counter and line index.
        step: ChoreographyStep,
    },
    /// The run finished (success or failure).
    OperationDone {
        /// The operation that was animated.
        op: OperationKind,
    },
}

/// Key handed out by [`StepEventBus::subscribe`] for later unsubscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Box<dyn FnMut(&StepEvent)>;
type SharedCallback = Rc<RefCell<Callback>>;

/// Shared per-canvas handle to the event bus.
///
/// Publish through [`StepEventBus::publish_shared`] rather than
/// `borrow_mut().publish(..)`: the shared form releases the bus borrow
/// before callbacks run, so a subscriber may subscribe or unsubscribe
/// (itself included) while handling an event. Publishing a new event
/// from inside a callback is not supported.
pub type SharedBus = Rc<RefCell<StepEventBus>>;

/// Keyed publish/subscribe channel with synchronous fan-out.
#[derive(Default)]
pub struct StepEventBus {
    subscribers: Vec<(SubscriberId, SharedCallback)>,
    next_id: u64,
}

impl StepEventBus {
    /// Empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty bus wrapped in a shared handle.
    #[must_use]
    pub fn shared() -> SharedBus {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register a subscriber. Delivery order follows registration order.
    pub fn subscribe(&mut self, callback: Callback) -> SubscriberId {
        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.subscribers.push((id, Rc::new(RefCell::new(callback))));
        id
    }

    /// Remove a subscriber. Idempotent: unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Fan an event out synchronously to every current subscriber, in
    /// registration order. No queuing, no replay.
    ///
    /// Callbacks on an owned bus cannot reach back into it; use
    /// [`StepEventBus::publish_shared`] when the bus sits behind a
    /// [`SharedBus`] handle that subscribers also hold.
    pub fn publish(&self, event: &StepEvent) {
        for (_, callback) in &self.subscribers {
            (callback.borrow_mut())(event);
        }
    }

    /// Fan an event out through a shared handle without holding the bus
    /// borrow while callbacks run.
    ///
    /// The subscriber list is snapshotted when the publish starts; a
    /// callback that unsubscribes a later subscriber suppresses its
    /// delivery for this event, and one that subscribes a new callback
    /// takes effect from the next event.
    pub fn publish_shared(bus: &SharedBus, event: &StepEvent) {
        let snapshot: Vec<(SubscriberId, SharedCallback)> = bus
            .borrow()
            .subscribers
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();
        for (id, callback) in snapshot {
            let registered = bus
                .borrow()
                .subscribers
                .iter()
                .any(|(sid, _)| *sid == id);
            if registered {
                (callback.borrow_mut())(event);
            }
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for StepEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepEventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
