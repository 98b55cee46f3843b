//! Per-sequencer playback settings.

use tiletone_synth::{GM_PERCUSSION_CHANNEL, PERCUSSION_BANK};

use crate::{Error, Result};

/// SoundFont bank and preset, applied once at the start of each play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Program {
    pub bank: u16,
    pub preset: u8,
}

impl Program {
    pub fn new(bank: u16, preset: u8) -> Self {
        Self { bank, preset }
    }

    /// Drum kit `preset` from the percussion bank.
    pub fn percussion(preset: u8) -> Self {
        Self::new(PERCUSSION_BANK, preset)
    }

    pub fn is_percussion(&self) -> bool {
        self.bank >= PERCUSSION_BANK
    }
}

/// Channel, program and velocity a sequencer plays with.
///
/// # Example
/// ```ignore
/// let config = SequencerConfig {
///     program: Program::new(0, 33),
///     looping: true,
///     ..Default::default()
/// };
/// config.validate()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Zero-based MIDI channel (default: 1)
    pub channel: u8,
    pub program: Program,
    /// Note-on velocity (default: 60)
    pub velocity: u8,
    /// Start again from the first step instead of finishing
    pub looping: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            channel: 1,
            program: Program::default(),
            velocity: 60,
            looping: false,
        }
    }
}

impl SequencerConfig {
    /// General MIDI drum channel with the first percussion kit.
    pub fn percussion() -> Self {
        Self {
            channel: GM_PERCUSSION_CHANNEL,
            program: Program::percussion(0),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        tiletone_midi::validate_channel(self.channel)?;
        tiletone_midi::validate_velocity(self.velocity)?;
        if self.program.preset > 127 {
            return Err(Error::InvalidConfig(format!(
                "preset must be 0-127, got {}",
                self.program.preset
            )));
        }
        if self.program.is_percussion() && self.channel != GM_PERCUSSION_CHANNEL {
            tracing::warn!(
                channel = self.channel,
                bank = self.program.bank,
                "percussion bank selected off the drum channel"
            );
        }
        Ok(())
    }
}
