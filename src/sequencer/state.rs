//! State shared between a [`NoteSequencer`](super::NoteSequencer) and the events it posts.
//!
//! Every play-through gets an epoch number: odd while playing, even while
//! stopped. Events capture the epoch they were posted under and do nothing
//! once it has moved on, so a stop never races with an event already queued
//! on the audio thread.

use std::sync::atomic::{AtomicUsize, Ordering};

use arc_swap::ArcSwap;
use tiletone_core::{AtomicCounter, AtomicFlag, EventHandle};

use super::config::SequencerConfig;
use super::step::Sequence;

pub(crate) struct SequencerShared {
    epoch: AtomicCounter,
    /// Outstanding chain event, 0 when none.
    pending: AtomicCounter,
    /// Next step to play. Written by the audio thread only.
    cursor: AtomicUsize,
    looping: AtomicFlag,
    pub(crate) sequence: ArcSwap<Sequence>,
    pub(crate) config: SequencerConfig,
}

impl SequencerShared {
    pub(crate) fn new(config: SequencerConfig, sequence: Sequence) -> Self {
        Self {
            epoch: AtomicCounter::new(0),
            pending: AtomicCounter::new(0),
            cursor: AtomicUsize::new(0),
            looping: AtomicFlag::new(config.looping),
            sequence: ArcSwap::from_pointee(sequence),
            config,
        }
    }

    #[inline]
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    #[inline]
    pub(crate) fn is_playing(&self) -> bool {
        self.epoch() % 2 == 1
    }

    #[inline]
    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.epoch() == epoch
    }

    /// Enter a new play-through at the first step. Returns its epoch, or
    /// `None` if already playing.
    pub(crate) fn begin(&self) -> Option<u64> {
        let epoch = self.epoch();
        if epoch % 2 == 1 {
            return None;
        }
        self.epoch.compare_exchange(epoch, epoch + 1).ok()?;
        self.pending.set(0);
        self.set_cursor(0);
        Some(epoch + 1)
    }

    /// End the current play-through from the control side.
    ///
    /// Returns the outstanding event to cancel, if any. `None` from a stopped
    /// sequencer.
    pub(crate) fn halt(&self) -> Option<Option<EventHandle>> {
        let epoch = self.epoch();
        if epoch % 2 == 0 {
            return None;
        }
        self.epoch.compare_exchange(epoch, epoch + 1).ok()?;
        let pending = self.pending.swap(0);
        Some((pending != 0).then(|| EventHandle::from_id(pending)))
    }

    /// End play-through `epoch` because it ran out of steps.
    ///
    /// Returns `true` exactly once per play-through, and only if it was not
    /// stopped first.
    pub(crate) fn finish(&self, epoch: u64) -> bool {
        if self.epoch.compare_exchange(epoch, epoch + 1).is_err() {
            return false;
        }
        self.pending.set(0);
        true
    }

    #[inline]
    pub(crate) fn set_pending(&self, handle: EventHandle) {
        self.pending.set(handle.id());
    }

    /// Record the first event of a play-through unless a later step already
    /// replaced it.
    #[inline]
    pub(crate) fn claim_pending(&self, handle: EventHandle) -> bool {
        self.pending.compare_exchange(0, handle.id()).is_ok()
    }

    #[inline]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_cursor(&self, index: usize) {
        self.cursor.store(index, Ordering::Release);
    }

    #[inline]
    pub(crate) fn looping(&self) -> bool {
        self.looping.get()
    }

    pub(crate) fn set_looping(&self, looping: bool) {
        self.looping.set(looping);
    }
}
