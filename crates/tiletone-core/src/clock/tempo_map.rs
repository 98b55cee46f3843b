//! Constant-tempo map between musical ticks, seconds and sample frames.

use core::fmt;

use crate::{EngineConfig, Error, Result};

/// Musical time in ticks. A quarter note is [`TICKS_PER_QUARTER`] ticks.
pub type Tick = u64;

pub const TICKS_PER_QUARTER: Tick = 480;

/// Absorbs float noise so that an exact grid position maps back onto itself.
const FRAME_EPSILON: f64 = 1e-9;

/// Round `tick` up to the next multiple of `resolution`.
///
/// A tick already on the grid is returned unchanged. A zero resolution leaves
/// the tick as is.
#[inline]
pub fn quantize_tick_up(tick: Tick, resolution: Tick) -> Tick {
    if resolution == 0 {
        return tick;
    }
    tick.div_ceil(resolution).saturating_mul(resolution)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Bar length in quarter notes.
    #[inline]
    pub fn beats_per_bar(&self) -> f64 {
        self.numerator as f64 * 4.0 / self.denominator as f64
    }

    #[inline]
    pub fn ticks_per_bar(&self) -> Tick {
        self.numerator as Tick * TICKS_PER_QUARTER * 4 / self.denominator as Tick
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// Bar/beat/tick position. Bars and beats are 1-indexed, ticks count within the beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BBT {
    pub bar: u32,
    pub beat: u32,
    pub ticks: u32,
}

impl BBT {
    pub fn new(bar: u32, beat: u32, ticks: u32) -> Self {
        Self { bar, beat, ticks }
    }
}

impl fmt::Display for BBT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{:03}", self.bar, self.beat, self.ticks)
    }
}

/// Tempo map for a fixed tempo.
///
/// The tempo cannot change after construction. Ticks already handed to a
/// scheduler would otherwise need to be re-derived.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    bpm: f64,
    sample_rate: f64,
    time_signature: TimeSignature,
    frames_per_tick: f64,
}

impl TempoMap {
    pub fn new(bpm: f64, sample_rate: f64) -> Result<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(Error::InvalidTempo(bpm));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }

        Ok(Self {
            bpm,
            sample_rate,
            time_signature: TimeSignature::default(),
            frames_per_tick: sample_rate * 60.0 / (bpm * TICKS_PER_QUARTER as f64),
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.bpm, config.sample_rate)
    }

    pub fn with_time_signature(mut self, numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 || !denominator.is_power_of_two() {
            return Err(Error::InvalidTimeSignature {
                numerator,
                denominator,
            });
        }
        self.time_signature = TimeSignature::new(numerator, denominator);
        Ok(self)
    }

    #[inline]
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    #[inline]
    pub fn frames_per_tick(&self) -> f64 {
        self.frames_per_tick
    }

    #[inline]
    pub fn ticks_to_seconds(&self, ticks: f64) -> f64 {
        ticks / TICKS_PER_QUARTER as f64 * (60.0 / self.bpm)
    }

    #[inline]
    pub fn seconds_to_ticks(&self, seconds: f64) -> f64 {
        seconds * (self.bpm / 60.0) * TICKS_PER_QUARTER as f64
    }

    /// First frame at which `tick` has been reached.
    #[inline]
    pub fn tick_to_frame(&self, tick: Tick) -> u64 {
        (tick as f64 * self.frames_per_tick - FRAME_EPSILON)
            .ceil()
            .max(0.0) as u64
    }

    /// Whole ticks elapsed after `frame` frames.
    #[inline]
    pub fn frame_to_tick(&self, frame: u64) -> Tick {
        (frame as f64 / self.frames_per_tick + FRAME_EPSILON).floor() as Tick
    }

    #[inline]
    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.sample_rate
    }

    pub fn tick_to_bbt(&self, tick: Tick) -> BBT {
        let per_bar = self.time_signature.ticks_per_bar().max(1);
        let bar = tick / per_bar;
        let in_bar = tick % per_bar;

        BBT {
            bar: bar as u32 + 1,
            beat: (in_bar / TICKS_PER_QUARTER) as u32 + 1,
            ticks: (in_bar % TICKS_PER_QUARTER) as u32,
        }
    }

    pub fn bbt_to_tick(&self, bbt: BBT) -> Tick {
        let per_bar = self.time_signature.ticks_per_bar();
        bbt.bar.saturating_sub(1) as Tick * per_bar
            + bbt.beat.saturating_sub(1) as Tick * TICKS_PER_QUARTER
            + bbt.ticks as Tick
    }
}

impl Default for TempoMap {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            sample_rate: 44100.0,
            time_signature: TimeSignature::default(),
            frames_per_tick: 44100.0 * 60.0 / (120.0 * TICKS_PER_QUARTER as f64),
        }
    }
}
