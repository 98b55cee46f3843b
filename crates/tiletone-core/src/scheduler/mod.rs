//! Tick-ordered event scheduler driven by the audio callback.
//!
//! The [`Scheduler`] lives on the audio thread. Every block it applies queued
//! control commands, then renders its generator in sub-blocks that end exactly
//! on the frame where the next event becomes due, firing events in between.
//! Control threads talk to it through a [`SchedulerHandle`].

mod event;
mod handle;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use hashbrown::HashMap;

use crate::clock::{ClockReadout, TempoMap, Tick};
use crate::{AudioGenerator, EngineConfig, Result};

use event::{QueueKey, SchedulerCommand};
use handle::SchedulerShared;

pub use event::{EventFn, EventHandle};
pub use handle::SchedulerHandle;

pub struct Scheduler<G> {
    tempo_map: TempoMap,
    generator: G,
    queue: BinaryHeap<Reverse<QueueKey>>,
    pending: HashMap<u64, EventFn<G>>,
    next_seq: u64,
    frames: u64,
    current_tick: Tick,
    shared: Arc<SchedulerShared>,
    command_tx: Sender<SchedulerCommand<G>>,
    command_rx: Receiver<SchedulerCommand<G>>,
}

impl<G> Scheduler<G> {
    pub fn new(tempo_map: TempoMap, generator: G) -> Self {
        Self::with_capacity(tempo_map, generator, EngineConfig::default().event_capacity)
    }

    pub fn with_capacity(tempo_map: TempoMap, generator: G, capacity: usize) -> Self {
        let (command_tx, command_rx) = unbounded();

        Self {
            tempo_map,
            generator,
            queue: BinaryHeap::with_capacity(capacity),
            pending: HashMap::with_capacity(capacity),
            next_seq: 0,
            frames: 0,
            current_tick: 0,
            shared: Arc::new(SchedulerShared::new()),
            command_tx,
            command_rx,
        }
    }

    pub fn from_config(config: &EngineConfig, generator: G) -> Result<Self> {
        let tempo_map = TempoMap::from_config(config)?;
        Ok(Self::with_capacity(
            tempo_map,
            generator,
            config.event_capacity,
        ))
    }

    /// Handle for posting from other threads.
    pub fn handle(&self) -> SchedulerHandle<G> {
        SchedulerHandle::new(
            self.command_tx.clone(),
            Arc::clone(&self.shared),
            self.tempo_map.clone(),
        )
    }

    /// Post `callback` to fire at `due_tick`.
    ///
    /// A tick at or before the current tick fires during the next firing pass.
    /// When called from inside a callback, that is still the current advance.
    pub fn post_at_tick<F>(&mut self, due_tick: Tick, callback: F) -> EventHandle
    where
        F: FnOnce(&mut Scheduler<G>, Tick) + Send + 'static,
    {
        self.post_boxed(due_tick, Box::new(callback))
    }

    pub fn post_boxed(&mut self, due_tick: Tick, callback: EventFn<G>) -> EventHandle {
        let handle = self.shared.allocate();
        self.insert(handle, due_tick, callback);
        handle
    }

    /// Cancel a pending event. Unknown or already fired handles are ignored.
    pub fn remove(&mut self, handle: EventHandle) {
        // The heap entry is left behind and skipped once it surfaces.
        self.pending.remove(&handle.0);
    }

    /// Apply commands queued by [`SchedulerHandle`]s (call from audio thread).
    pub fn process_commands(&mut self) {
        let mut applied = 0usize;
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                SchedulerCommand::Post {
                    handle,
                    due_tick,
                    callback,
                } => self.insert(handle, due_tick, callback),
                SchedulerCommand::Remove(handle) => self.remove(handle),
            }
            applied += 1;
        }
        if applied > 0 {
            tracing::trace!(applied, pending = self.pending.len(), "scheduler commands");
        }
    }

    /// Move the clock forward by `frames` without rendering audio, firing
    /// everything that became due.
    pub fn advance(&mut self, frames: u64) {
        self.process_commands();
        self.advance_clock(frames);
        self.fire_due();
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Frames rendered (or advanced) so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn tempo_map(&self) -> &TempoMap {
        &self.tempo_map
    }

    #[inline]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    #[inline]
    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    /// Number of events still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn readout(&self) -> ClockReadout {
        ClockReadout::new(&self.tempo_map, self.frames, self.current_tick)
    }

    pub fn now_str(&self) -> String {
        self.readout().to_string()
    }

    fn insert(&mut self, handle: EventHandle, due_tick: Tick, callback: EventFn<G>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(handle.0, callback);
        self.queue.push(Reverse(QueueKey {
            due_tick,
            seq,
            id: handle.0,
        }));
    }

    /// Due tick of the earliest live event, discarding cancelled heap entries.
    fn next_due(&mut self) -> Option<Tick> {
        while let Some(Reverse(key)) = self.queue.peek() {
            if self.pending.contains_key(&key.id) {
                return Some(key.due_tick);
            }
            self.queue.pop();
        }
        None
    }

    fn fire_due(&mut self) {
        while let Some(due_tick) = self.next_due() {
            if due_tick > self.current_tick {
                break;
            }
            let Some(Reverse(key)) = self.queue.pop() else {
                break;
            };
            if let Some(callback) = self.pending.remove(&key.id) {
                callback(self, key.due_tick);
            }
        }
    }

    fn advance_clock(&mut self, frames: u64) {
        self.frames += frames;
        let tick = self.tempo_map.frame_to_tick(self.frames);
        self.current_tick = self.current_tick.max(tick);
        self.shared.frames.set(self.frames);
        self.shared.tick.set(self.current_tick);
    }
}

impl<G: AudioGenerator> Scheduler<G> {
    /// Render one audio block.
    ///
    /// Events fire on the exact frame their tick is reached; the generator is
    /// rendered in the sub-blocks between them.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());

        self.process_commands();
        self.fire_due();

        let mut offset = 0;
        while offset < frames {
            let remaining = frames - offset;
            let chunk = match self.next_due() {
                Some(due_tick) => {
                    let until = self
                        .tempo_map
                        .tick_to_frame(due_tick)
                        .saturating_sub(self.frames)
                        .min(remaining as u64);
                    (until as usize).max(1)
                }
                None => remaining,
            };

            let end = offset + chunk;
            self.generator
                .render(&mut left[offset..end], &mut right[offset..end]);
            self.advance_clock(chunk as u64);
            self.fire_due();
            offset = end;
        }
    }
}

impl<G: AudioGenerator> AudioGenerator for Scheduler<G> {
    #[inline]
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        Scheduler::render(self, left, right);
    }
}
