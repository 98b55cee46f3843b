//! Events a sequencer posts, run on the audio thread.
//!
//! Each event plays one step and posts its successor, so at most one chain
//! event is outstanding per play-through. Releases (note offs and tile
//! deactivations) are posted as separate events that stop never cancels.

use std::sync::Arc;

use smallvec::SmallVec;
use tiletone_core::{EventFn, Scheduler, Tick};
use tiletone_synth::SynthVoice;

use super::state::SequencerShared;
use super::step::{detached_duration, StepCallback, SIMON_SAYS_GAP};
use super::PlaybackMode;

/// First event of a play-through: program change, then the first step.
pub(crate) fn begin<G>(shared: Arc<SequencerShared>, epoch: u64, mode: PlaybackMode) -> EventFn<G>
where
    G: SynthVoice + Send + 'static,
{
    Box::new(move |sched: &mut Scheduler<G>, tick: Tick| {
        if !shared.is_current(epoch) {
            return;
        }
        let config = shared.config;
        sched
            .generator_mut()
            .program_change(config.channel, config.program.bank, config.program.preset);
        shared.set_cursor(0);

        match mode {
            PlaybackMode::FreeRunning => play_step(sched, tick, &shared, epoch),
            PlaybackMode::SimonSays => simon_on(sched, tick, &shared, epoch),
        }
    })
}

fn next_step<G>(shared: Arc<SequencerShared>, epoch: u64) -> EventFn<G>
where
    G: SynthVoice + Send + 'static,
{
    Box::new(move |sched: &mut Scheduler<G>, tick: Tick| play_step(sched, tick, &shared, epoch))
}

fn play_step<G>(sched: &mut Scheduler<G>, tick: Tick, shared: &Arc<SequencerShared>, epoch: u64)
where
    G: SynthVoice + Send + 'static,
{
    if !shared.is_current(epoch) {
        return;
    }
    let sequence = shared.sequence.load();

    let mut index = shared.cursor();
    if shared.looping() && index >= sequence.len() {
        index = 0;
    }
    let Some(step) = sequence.step(index) else {
        finish(shared, epoch);
        return;
    };

    let config = shared.config;
    let pitches: SmallVec<[u8; 4]> = step.sounding().collect();
    for &pitch in &pitches {
        sched
            .generator_mut()
            .note_on(config.channel, pitch, config.velocity);
    }
    if !pitches.is_empty() {
        sched.post_boxed(
            tick.saturating_add(detached_duration(step.duration())),
            release(config.channel, pitches, None),
        );
    }

    shared.set_cursor(index + 1);
    let next = sched.post_boxed(
        tick.saturating_add(step.duration()),
        next_step(Arc::clone(shared), epoch),
    );
    shared.set_pending(next);
}

fn simon_on<G>(sched: &mut Scheduler<G>, tick: Tick, shared: &Arc<SequencerShared>, epoch: u64)
where
    G: SynthVoice + Send + 'static,
{
    if !shared.is_current(epoch) {
        return;
    }
    let sequence = shared.sequence.load();
    let Some(step) = sequence.step(shared.cursor()) else {
        finish(shared, epoch);
        return;
    };

    let config = shared.config;
    let pitches: SmallVec<[u8; 4]> = step.sounding().collect();
    for &pitch in &pitches {
        sched
            .generator_mut()
            .note_on(config.channel, pitch, config.velocity);
    }
    if let Some(activate) = step.on_activate() {
        activate();
    }

    let off_tick = tick.saturating_add(step.duration());
    sched.post_boxed(
        off_tick,
        release(config.channel, pitches, step.on_deactivate().cloned()),
    );

    let shared_next = Arc::clone(shared);
    let next = sched.post_boxed(
        off_tick,
        Box::new(move |sched: &mut Scheduler<G>, tick: Tick| {
            simon_gap(sched, tick, &shared_next, epoch)
        }),
    );
    shared.set_pending(next);
}

/// Tile is dark again: move on and light the next one after the gap.
fn simon_gap<G>(sched: &mut Scheduler<G>, tick: Tick, shared: &Arc<SequencerShared>, epoch: u64)
where
    G: SynthVoice + Send + 'static,
{
    if !shared.is_current(epoch) {
        return;
    }
    shared.set_cursor(shared.cursor() + 1);

    let shared_next = Arc::clone(shared);
    let next = sched.post_boxed(
        tick.saturating_add(SIMON_SAYS_GAP),
        Box::new(move |sched: &mut Scheduler<G>, tick: Tick| {
            simon_on(sched, tick, &shared_next, epoch)
        }),
    );
    shared.set_pending(next);
}

/// Note offs for `pitches`, then the step's deactivate callback.
fn release<G>(channel: u8, pitches: SmallVec<[u8; 4]>, on_deactivate: Option<StepCallback>) -> EventFn<G>
where
    G: SynthVoice + Send + 'static,
{
    Box::new(move |sched: &mut Scheduler<G>, _tick: Tick| {
        for &pitch in &pitches {
            sched.generator_mut().note_off(channel, pitch);
        }
        if let Some(deactivate) = on_deactivate {
            deactivate();
        }
    })
}

fn finish(shared: &SequencerShared, epoch: u64) {
    if shared.finish(epoch) {
        tracing::debug!(epoch, "sequence finished");
        shared.sequence.load().notify_finished();
    }
}
