//! One puzzle's worth of audio: scheduler, synth voice and note sequencer.

use tiletone_core::{ClockReadout, Scheduler, SchedulerHandle, TempoMap};
use tiletone_synth::SynthVoice;

#[cfg(feature = "output")]
use tiletone_core::AudioOutput;

use crate::builder::PuzzleSoundBuilder;
use crate::sequencer::{
    Chord, FinishedCallback, NoteSequencer, Sequence, SequencerConfig, StepCallback, Transition,
};
use crate::Result;

/// Where rendered audio goes.
pub(crate) enum AudioDriver<G> {
    /// No device: `on_update` renders into scratch buffers.
    Headless {
        scheduler: Scheduler<G>,
        left: Vec<f32>,
        right: Vec<f32>,
    },
    /// The scheduler lives on the device's callback thread.
    #[cfg(feature = "output")]
    Device(AudioOutput),
}

/// Audio for one puzzle instance.
///
/// Holds the note list the puzzle currently plays, the tile callbacks bound
/// to it, and the sequencer that turns them into scheduled events.
///
/// # Example
///
/// ```ignore
/// use tiletone::prelude::*;
///
/// let mut sound = PuzzleSound::builder()
///     .program(Program::new(0, 0))
///     .build_soundfont("data/FluidR3_GM.sf2")?;
///
/// let song = [(480, 60), (480, 62), (480, 64), (480, 62), (480, 64), (480, 59), (960, 60)];
/// let notes = song
///     .iter()
///     .map(|&(dur, pitch)| Note::new(dur, pitch))
///     .collect::<std::result::Result<Vec<_>, _>>()?;
/// sound.set_notes(notes, Vec::new(), Vec::new(), None)?;
///
/// // Game loop
/// sound.toggle();
/// sound.on_update();
/// ```
pub struct PuzzleSound<G> {
    driver: AudioDriver<G>,
    handle: SchedulerHandle<G>,
    config: SequencerConfig,
    sequencer: Option<NoteSequencer<G>>,
    notes: Vec<Chord>,
    cb_ons: Vec<StepCallback>,
    cb_offs: Vec<StepCallback>,
    on_finished: Option<FinishedCallback>,
}

impl PuzzleSound<()> {
    pub fn builder() -> PuzzleSoundBuilder {
        PuzzleSoundBuilder::default()
    }
}

impl<G> PuzzleSound<G>
where
    G: SynthVoice + Send + 'static,
{
    pub(crate) fn from_parts(
        driver: AudioDriver<G>,
        handle: SchedulerHandle<G>,
        config: SequencerConfig,
    ) -> Self {
        Self {
            driver,
            handle,
            config,
            sequencer: None,
            notes: Vec::new(),
            cb_ons: Vec::new(),
            cb_offs: Vec::new(),
            on_finished: None,
        }
    }

    /// Replace the note list and every callback.
    ///
    /// Playback is stopped first; the next start plays the new list from
    /// the first step. `cb_ons[i]` and `cb_offs[i]` belong to step `i` and may
    /// be shorter than `notes`.
    pub fn set_notes<I>(
        &mut self,
        notes: I,
        cb_ons: Vec<StepCallback>,
        cb_offs: Vec<StepCallback>,
        on_finished: Option<FinishedCallback>,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Chord>,
    {
        let notes: Vec<Chord> = notes.into_iter().map(Into::into).collect();
        let sequence = Sequence::from_chords(&notes, &cb_ons, &cb_offs, on_finished.clone())?;

        let sequencer = self.sequencer()?;
        sequencer.stop();
        sequencer.set_sequence(sequence);

        self.notes = notes;
        self.cb_ons = cb_ons;
        self.cb_offs = cb_offs;
        self.on_finished = on_finished;
        Ok(())
    }

    /// Replace the per-step "tile on" callbacks, keeping the notes.
    pub fn set_cb_ons(&mut self, cb_ons: Vec<StepCallback>) -> Result<()> {
        self.cb_ons = cb_ons;
        self.rebuild()
    }

    /// Replace the per-step "tile off" callbacks, keeping the notes.
    pub fn set_cb_offs(&mut self, cb_offs: Vec<StepCallback>) -> Result<()> {
        self.cb_offs = cb_offs;
        self.rebuild()
    }

    pub fn set_on_finished(&mut self, on_finished: Option<FinishedCallback>) -> Result<()> {
        self.on_finished = on_finished;
        self.rebuild()
    }

    /// Start or stop free-running playback. Does nothing before any notes are set.
    pub fn toggle(&mut self) -> Transition {
        match &self.sequencer {
            Some(sequencer) => sequencer.toggle(),
            None => Transition::None,
        }
    }

    pub fn start(&mut self) -> Transition {
        match &self.sequencer {
            Some(sequencer) => sequencer.start(),
            None => Transition::None,
        }
    }

    pub fn start_simon_says(&mut self) -> Transition {
        match &self.sequencer {
            Some(sequencer) => sequencer.start_simon_says(),
            None => Transition::None,
        }
    }

    pub fn stop(&mut self) -> Transition {
        match &self.sequencer {
            Some(sequencer) => sequencer.stop(),
            None => Transition::None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.as_ref().is_some_and(NoteSequencer::is_playing)
    }

    /// Pump audio for one game frame.
    ///
    /// Headless, this renders the next slice of audio and fires whatever
    /// became due. With a device, the device pulls audio on its own and this
    /// only reports stream errors.
    pub fn on_update(&mut self) {
        match &mut self.driver {
            AudioDriver::Headless {
                scheduler,
                left,
                right,
            } => scheduler.render(left, right),
            #[cfg(feature = "output")]
            AudioDriver::Device(output) => {
                for error in output.drain_errors() {
                    tracing::warn!(%error, "audio stream error");
                }
            }
        }
    }

    /// Labels of every step, chords joined by spaces.
    pub fn letters(&self) -> Vec<String> {
        self.notes.iter().map(Chord::label).collect()
    }

    pub fn notes(&self) -> &[Chord] {
        &self.notes
    }

    pub fn sequencer_config(&self) -> &SequencerConfig {
        &self.config
    }

    /// The sequencer, once notes have been set.
    pub fn note_sequencer(&self) -> Option<&NoteSequencer<G>> {
        self.sequencer.as_ref()
    }

    /// Handle to the scheduler for posting extra game events.
    pub fn handle(&self) -> &SchedulerHandle<G> {
        &self.handle
    }

    pub fn tempo_map(&self) -> &TempoMap {
        self.handle.tempo_map()
    }

    pub fn sample_rate(&self) -> f64 {
        self.tempo_map().sample_rate()
    }

    /// Frames rendered per [`on_update`](Self::on_update) when headless.
    pub fn frames_per_update(&self) -> Option<usize> {
        match &self.driver {
            AudioDriver::Headless { left, .. } => Some(left.len()),
            #[cfg(feature = "output")]
            AudioDriver::Device(_) => None,
        }
    }

    pub fn is_headless(&self) -> bool {
        matches!(self.driver, AudioDriver::Headless { .. })
    }

    /// The scheduler itself, reachable only when no device owns it.
    pub fn scheduler_mut(&mut self) -> Option<&mut Scheduler<G>> {
        match &mut self.driver {
            AudioDriver::Headless { scheduler, .. } => Some(scheduler),
            #[cfg(feature = "output")]
            AudioDriver::Device(_) => None,
        }
    }

    pub fn readout(&self) -> ClockReadout {
        self.handle.readout()
    }

    /// Clock position for on-screen display.
    pub fn now_str(&self) -> String {
        self.handle.now_str()
    }

    fn sequencer(&mut self) -> Result<&NoteSequencer<G>> {
        let sequencer = match self.sequencer.take() {
            Some(sequencer) => sequencer,
            None => NoteSequencer::new(self.handle.clone(), self.config)?,
        };
        let sequencer: &NoteSequencer<G> = self.sequencer.insert(sequencer);
        Ok(sequencer)
    }

    fn rebuild(&mut self) -> Result<()> {
        let sequence = Sequence::from_chords(
            &self.notes,
            &self.cb_ons,
            &self.cb_offs,
            self.on_finished.clone(),
        )?;
        self.sequencer()?.set_sequence(sequence);
        Ok(())
    }
}
