//! Scheduled event types.

use core::cmp::Ordering;

use super::Scheduler;
use crate::clock::Tick;

/// Callback fired once its tick is reached.
///
/// Receives the scheduler (so it can post follow-up events or reach the
/// generator) and the tick the event was due at.
pub type EventFn<G> = Box<dyn FnOnce(&mut Scheduler<G>, Tick) + Send + 'static>;

/// Opaque handle to a posted event, used to cancel it.
///
/// Handles are never reused and are unique across schedulers, so removing a
/// stale or foreign handle cannot cancel a different event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventHandle(pub(crate) u64);

impl EventHandle {
    /// Get the internal ID (for debugging/logging only)
    pub fn id(&self) -> u64 {
        self.0
    }

    /// Rebuild a handle from its [`id`](Self::id), e.g. after parking it in an atomic.
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

/// Heap ordering key: due tick first, then arrival order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct QueueKey {
    pub(crate) due_tick: Tick,
    pub(crate) seq: u64,
    pub(crate) id: u64,
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_tick
            .cmp(&other.due_tick)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Commands sent from the control thread to the audio thread.
pub(crate) enum SchedulerCommand<G> {
    Post {
        handle: EventHandle,
        due_tick: Tick,
        callback: EventFn<G>,
    },
    Remove(EventHandle),
}
