//! UI event bus.
//!
//! The core never touches focus or visibility itself; it emits abstract
//! events on a broadcast bus and a host UI layer subscribes and performs the
//! actual changes.  Events are wrapped in [`Arc`] so fan-out to multiple
//! subscribers does not clone payloads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::request::RequestStatus;

/// An abstract UI intent emitted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UiEvent {
    /// The assistant panel should open.
    RequestOpen,
    /// The assistant panel should close.
    RequestClose,
    /// The history search input should take focus.
    RequestFocusSearch,
    /// A request changed lifecycle status; the history view should refresh.
    RequestStatusChanged {
        request_id: Uuid,
        status: RequestStatus,
    },
}

/// Broadcast bus carrying [`UiEvent`]s to host-UI subscribers.
///
/// Cheaply cloneable and `Send + Sync`.  Publishing with no subscribers is
/// not an error; the event is simply dropped.
#[derive(Clone)]
pub struct UiEventBus {
    sender: broadcast::Sender<Arc<UiEvent>>,
}

impl UiEventBus {
    /// Create a bus with the given channel capacity.
    ///
    /// A subscriber that falls more than `capacity` events behind observes a
    /// `Lagged` error and continues from the oldest retained event.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of receivers that will observe it.
    pub fn publish(&self, event: UiEvent) -> usize {
        match self.sender.send(Arc::new(event)) {
            Ok(n) => n,
            Err(_) => {
                tracing::trace!("ui event published with no active subscribers");
                0
            }
        }
    }

    /// Subscribe to all future events.  Earlier events are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<UiEvent>> {
        self.sender.subscribe()
    }
}

impl Default for UiEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
