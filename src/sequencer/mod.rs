//! Note sequencer: plays a list of steps through a scheduler.
//!
//! A [`NoteSequencer`] is a small state machine driven from the game thread
//! (`start`, `stop`, `toggle`) whose steps run as scheduler events on the
//! audio thread. It plays in one of two modes:
//!
//! - **Free-running** ([`NoteSequencer::start`]): the first step lands on the
//!   next quarter note, each step is released after 90% of its length
//!   ([`detached_duration`]) and the next one starts right at its end. Rests
//!   take time but never reach the synth.
//! - **Simon Says** ([`NoteSequencer::start_simon_says`]): each step switches a
//!   tile on together with its notes, switches it off when the step ends and
//!   leaves [`SIMON_SAYS_GAP`] ticks of silence before the next tile.
//!
//! # Example
//!
//! ```ignore
//! use tiletone::prelude::*;
//!
//! let mut scheduler = Scheduler::new(TempoMap::new(120.0, 48000.0)?, RecordingSynth::new());
//! let sequencer = NoteSequencer::new(scheduler.handle(), SequencerConfig::default())?;
//!
//! let chords: Vec<Chord> = [Note::new(480, 60)?, Note::rest(480)?, Note::new(480, 64)?]
//!     .into_iter()
//!     .map(Chord::from)
//!     .collect();
//! sequencer.set_sequence(Sequence::from_chords(&chords, &[], &[], None)?);
//! sequencer.toggle();
//! scheduler.render(&mut left, &mut right);
//! ```

mod config;
mod playback;
mod state;
mod step;

use std::sync::Arc;

use tiletone_core::{quantize_tick_up, SchedulerHandle, TICKS_PER_QUARTER};
use tiletone_synth::SynthVoice;

use crate::Result;
use state::SequencerShared;

pub use config::{Program, SequencerConfig};
pub use step::{
    detached_duration, Chord, FinishedCallback, Sequence, Step, StepCallback, SIMON_SAYS_GAP,
};

/// How a play-through advances from step to step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    FreeRunning,
    SimonSays,
}

/// What a start, stop or toggle call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Stopped,
    /// The call did not apply in the current state.
    None,
}

/// Plays a [`Sequence`] on a scheduler's audio thread.
///
/// Cheap to clone; clones control the same playback.
pub struct NoteSequencer<G> {
    handle: SchedulerHandle<G>,
    shared: Arc<SequencerShared>,
}

impl<G> Clone for NoteSequencer<G> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G> NoteSequencer<G>
where
    G: SynthVoice + Send + 'static,
{
    pub fn new(handle: SchedulerHandle<G>, config: SequencerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            handle,
            shared: Arc::new(SequencerShared::new(config, Sequence::default())),
        })
    }

    /// Play from the first step, starting on the next quarter note.
    pub fn start(&self) -> Transition {
        let first = quantize_tick_up(self.handle.current_tick(), TICKS_PER_QUARTER);
        self.launch(PlaybackMode::FreeRunning, first)
    }

    /// Play as call-and-response tiles, starting one gap from now.
    pub fn start_simon_says(&self) -> Transition {
        let first = self.handle.current_tick().saturating_add(SIMON_SAYS_GAP);
        self.launch(PlaybackMode::SimonSays, first)
    }

    /// Cancel the outstanding step. Notes already sounding still get released.
    pub fn stop(&self) -> Transition {
        let Some(pending) = self.shared.halt() else {
            return Transition::None;
        };
        if let Some(event) = pending {
            self.handle.remove(event);
        }
        tracing::debug!(epoch = self.shared.epoch(), "sequencer stopped");
        Transition::Stopped
    }

    /// Stop if playing, otherwise start free-running.
    pub fn toggle(&self) -> Transition {
        if self.is_playing() {
            self.stop()
        } else {
            self.start()
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.shared.is_playing()
    }

    /// Swap in a new note list.
    ///
    /// Events already posted keep the notes they started; the next step is
    /// read from the new list. Steps past its end finish the play-through.
    pub fn set_sequence(&self, sequence: Sequence) {
        tracing::debug!(steps = sequence.len(), "sequence replaced");
        self.shared.sequence.store(Arc::new(sequence));
        if !self.is_playing() {
            self.shared.set_cursor(0);
        }
    }

    pub fn sequence(&self) -> Arc<Sequence> {
        self.shared.sequence.load_full()
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.shared.config
    }

    pub fn looping(&self) -> bool {
        self.shared.looping()
    }

    /// Takes effect the next time the last step ends.
    pub fn set_looping(&self, looping: bool) {
        self.shared.set_looping(looping);
    }

    /// Index of the next step to play, at most the number of steps.
    pub fn cursor(&self) -> usize {
        self.shared.cursor().min(self.shared.sequence.load().len())
    }

    fn launch(&self, mode: PlaybackMode, first_tick: tiletone_core::Tick) -> Transition {
        let Some(epoch) = self.shared.begin() else {
            return Transition::None;
        };

        if self.shared.sequence.load().is_empty() {
            if self.shared.finish(epoch) {
                tracing::debug!(epoch, "empty sequence, finished immediately");
                self.shared.sequence.load().notify_finished();
            }
            return Transition::None;
        }

        tracing::debug!(epoch, ?mode, first_tick, "sequencer started");
        let event = self
            .handle
            .post_boxed(first_tick, playback::begin(Arc::clone(&self.shared), epoch, mode));
        self.shared.claim_pending(event);
        Transition::Started
    }
}
