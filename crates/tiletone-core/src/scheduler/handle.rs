//! Control-thread handle to a scheduler running on the audio thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

use super::event::{EventFn, EventHandle, SchedulerCommand};
use super::Scheduler;
use crate::clock::{ClockReadout, TempoMap, Tick};
use crate::lockfree::AtomicCounter;

/// Event ids are shared by every scheduler in the process, so a handle from
/// one scheduler never names an event on another.
static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// State published by the audio thread and shared with every handle.
#[derive(Debug)]
pub(crate) struct SchedulerShared {
    pub(crate) tick: AtomicCounter,
    pub(crate) frames: AtomicCounter,
}

impl SchedulerShared {
    pub(crate) fn new() -> Self {
        Self {
            tick: AtomicCounter::new(0),
            frames: AtomicCounter::new(0),
        }
    }

    #[inline]
    pub(crate) fn allocate(&self) -> EventHandle {
        EventHandle(NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Thread-safe handle for posting and cancelling events.
///
/// Commands are queued lock-free and applied at the start of the next
/// audio block, in the order they were sent.
///
/// # Example
/// ```ignore
/// let handle = scheduler.handle();
/// let event = handle.post_at_tick(handle.current_tick() + 480, |sched, tick| {
///     sched.generator_mut().note_on(0, 60, 100);
/// });
/// handle.remove(event);
/// ```
pub struct SchedulerHandle<G> {
    command_tx: Sender<SchedulerCommand<G>>,
    shared: Arc<SchedulerShared>,
    tempo_map: TempoMap,
}

impl<G> Clone for SchedulerHandle<G> {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            shared: Arc::clone(&self.shared),
            tempo_map: self.tempo_map.clone(),
        }
    }
}

impl<G> SchedulerHandle<G> {
    pub(crate) fn new(
        command_tx: Sender<SchedulerCommand<G>>,
        shared: Arc<SchedulerShared>,
        tempo_map: TempoMap,
    ) -> Self {
        Self {
            command_tx,
            shared,
            tempo_map,
        }
    }

    /// Post `callback` to fire at `due_tick`. A tick in the past fires on the next block.
    pub fn post_at_tick<F>(&self, due_tick: Tick, callback: F) -> EventHandle
    where
        F: FnOnce(&mut Scheduler<G>, Tick) + Send + 'static,
    {
        self.post_boxed(due_tick, Box::new(callback))
    }

    pub fn post_boxed(&self, due_tick: Tick, callback: EventFn<G>) -> EventHandle {
        let handle = self.shared.allocate();
        let _ = self.command_tx.send(SchedulerCommand::Post {
            handle,
            due_tick,
            callback,
        });
        handle
    }

    /// Cancel a posted event. Unknown or already fired handles are ignored.
    pub fn remove(&self, handle: EventHandle) {
        let _ = self.command_tx.send(SchedulerCommand::Remove(handle));
    }

    /// Tick reached by the audio thread at the end of its last block.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.shared.tick.get()
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.shared.frames.get()
    }

    #[inline]
    pub fn tempo_map(&self) -> &TempoMap {
        &self.tempo_map
    }

    pub fn readout(&self) -> ClockReadout {
        ClockReadout::new(&self.tempo_map, self.frames(), self.current_tick())
    }

    pub fn now_str(&self) -> String {
        self.readout().to_string()
    }
}
