//! Builder for configuring and constructing a `PuzzleSound`.

use tiletone_core::{EngineConfig, Scheduler};
use tiletone_synth::{RecordingSynth, SynthLog, SynthVoice};

#[cfg(feature = "output")]
use tiletone_core::AudioOutput;

#[cfg(feature = "soundfont")]
use std::path::Path;
#[cfg(feature = "soundfont")]
use tiletone_synth::SoundFontSynth;

use crate::puzzle_sound::{AudioDriver, PuzzleSound};
use crate::sequencer::{Chord, Program, SequencerConfig};
use crate::{Error, Result};

/// Game frames per second assumed when sizing headless updates.
const UPDATES_PER_SECOND: f64 = 60.0;

/// Configures tempo, program and audio destination for a [`PuzzleSound`].
///
/// With the `output` feature the sound plays on an output device and the
/// sample rate is whatever the device runs at. `.headless()` (or building
/// without `output`) renders only when [`PuzzleSound::on_update`] is called,
/// at the sample rate set here.
///
/// # Example
///
/// ```ignore
/// use tiletone::prelude::*;
///
/// let (mut sound, log) = PuzzleSound::builder()
///     .bpm(120.0)
///     .sample_rate(48000.0)
///     .headless()
///     .percussion()
///     .build_recording()?;
/// ```
pub struct PuzzleSoundBuilder {
    bpm: f64,
    sample_rate: f64,
    config: SequencerConfig,
    #[cfg_attr(not(feature = "output"), allow(dead_code))]
    output_device: Option<usize>,
    headless: bool,
    frames_per_update: Option<usize>,
    notes: Vec<Chord>,
}

impl Default for PuzzleSoundBuilder {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            sample_rate: EngineConfig::default().sample_rate,
            config: SequencerConfig::default(),
            output_device: None,
            headless: !cfg!(feature = "output"),
            frames_per_update: None,
            notes: Vec::new(),
        }
    }
}

impl PuzzleSoundBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default: 120
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Headless sample rate. A device always uses its own. Default: 44100
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Default: 1
    pub fn channel(mut self, channel: u8) -> Self {
        self.config.channel = channel;
        self
    }

    pub fn program(mut self, program: Program) -> Self {
        self.config.program = program;
        self
    }

    /// Drum kit on the General MIDI percussion channel.
    pub fn percussion(mut self) -> Self {
        let looping = self.config.looping;
        self.config = SequencerConfig {
            looping,
            ..SequencerConfig::percussion()
        };
        self
    }

    /// Default: 60
    pub fn velocity(mut self, velocity: u8) -> Self {
        self.config.velocity = velocity;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.config.looping = looping;
        self
    }

    pub fn sequencer_config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    #[cfg(feature = "output")]
    pub fn output_device(mut self, index: usize) -> Self {
        self.output_device = Some(index);
        self
    }

    /// Render only from [`PuzzleSound::on_update`], without opening a device.
    pub fn headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Frames rendered per headless update. Default: one 60th of a second.
    pub fn frames_per_update(mut self, frames: usize) -> Self {
        self.frames_per_update = Some(frames);
        self
    }

    /// Initial note list, without callbacks.
    pub fn notes<I>(mut self, notes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Chord>,
    {
        self.notes = notes.into_iter().map(Into::into).collect();
        self
    }

    /// Build with the voice returned by `make_synth`, which receives the
    /// sample rate the sound will run at.
    pub fn build<G, F, E>(self, make_synth: F) -> Result<PuzzleSound<G>>
    where
        G: SynthVoice + Send + 'static,
        F: FnOnce(f64) -> std::result::Result<G, E>,
        E: Into<Error>,
    {
        self.config.validate()?;
        if let Some(0) = self.frames_per_update {
            return Err(Error::InvalidConfig(
                "frames_per_update must be at least 1".into(),
            ));
        }

        let notes = self.notes.clone();
        let config = self.config;

        let mut sound = if self.headless {
            self.build_headless(make_synth)?
        } else {
            self.build_device(make_synth)?
        };

        if !notes.is_empty() {
            sound.set_notes(notes, Vec::new(), Vec::new(), None)?;
        }
        tracing::debug!(
            sample_rate = sound.sample_rate(),
            channel = config.channel,
            headless = sound.is_headless(),
            "puzzle sound ready"
        );
        Ok(sound)
    }

    /// Build with a [`RecordingSynth`] and return its log alongside.
    pub fn build_recording(self) -> Result<(PuzzleSound<RecordingSynth>, SynthLog)> {
        let synth = RecordingSynth::new();
        let log = synth.log();
        let sound = self.build(move |_| Ok::<_, Error>(synth))?;
        Ok((sound, log))
    }

    /// Build with a [`SoundFontSynth`] playing the font at `path`.
    #[cfg(feature = "soundfont")]
    pub fn build_soundfont(self, path: impl AsRef<Path>) -> Result<PuzzleSound<SoundFontSynth>> {
        let path = path.as_ref().to_path_buf();
        self.build(move |sample_rate| SoundFontSynth::from_file(&path, sample_rate))
    }

    fn engine_config(&self, sample_rate: f64) -> Result<EngineConfig> {
        let config = EngineConfig {
            sample_rate,
            bpm: self.bpm,
            ..EngineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn build_headless<G, F, E>(self, make_synth: F) -> Result<PuzzleSound<G>>
    where
        G: SynthVoice + Send + 'static,
        F: FnOnce(f64) -> std::result::Result<G, E>,
        E: Into<Error>,
    {
        let engine = self.engine_config(self.sample_rate)?;
        let synth = make_synth(engine.sample_rate).map_err(Into::<Error>::into)?;
        let scheduler = Scheduler::from_config(&engine, synth)?;
        let handle = scheduler.handle();

        let frames = self
            .frames_per_update
            .unwrap_or_else(|| (engine.sample_rate / UPDATES_PER_SECOND).round() as usize);
        let driver = AudioDriver::Headless {
            scheduler,
            left: vec![0.0; frames],
            right: vec![0.0; frames],
        };
        Ok(PuzzleSound::from_parts(driver, handle, self.config))
    }

    #[cfg(feature = "output")]
    fn build_device<G, F, E>(self, make_synth: F) -> Result<PuzzleSound<G>>
    where
        G: SynthVoice + Send + 'static,
        F: FnOnce(f64) -> std::result::Result<G, E>,
        E: Into<Error>,
    {
        let mut output = AudioOutput::open(self.output_device)?;
        let engine = self.engine_config(output.sample_rate())?;
        let synth = make_synth(engine.sample_rate).map_err(Into::<Error>::into)?;
        let scheduler = Scheduler::from_config(&engine, synth)?;
        let handle = scheduler.handle();

        output.start(scheduler)?;
        Ok(PuzzleSound::from_parts(
            AudioDriver::Device(output),
            handle,
            self.config,
        ))
    }

    #[cfg(not(feature = "output"))]
    fn build_device<G, F, E>(self, make_synth: F) -> Result<PuzzleSound<G>>
    where
        G: SynthVoice + Send + 'static,
        F: FnOnce(f64) -> std::result::Result<G, E>,
        E: Into<Error>,
    {
        self.build_headless(make_synth)
    }
}
