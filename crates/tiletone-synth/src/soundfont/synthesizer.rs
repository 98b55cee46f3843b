//! SoundFont synthesizer voice

use std::path::Path;
use std::sync::Arc;

use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use tiletone_core::AudioGenerator;

use super::load_soundfont;
use crate::voice::PERCUSSION_BANK;
use crate::{Error, Result, SynthVoice};

const BANK_SELECT: i32 = 0x00;
const CONTROL_CHANGE: i32 = 0xB0;
const PROGRAM_CHANGE: i32 = 0xC0;

/// [`SynthVoice`] backed by a RustySynth SoundFont synthesizer.
///
/// Bank 128 selects the percussion kits, which RustySynth only plays on the
/// General MIDI drum channel (9).
pub struct SoundFontSynth {
    synthesizer: Synthesizer,
    sample_rate: u32,
}

impl SoundFontSynth {
    pub fn new(soundfont: &Arc<SoundFont>, sample_rate: f64) -> Result<Self> {
        if !(16000.0..=192000.0).contains(&sample_rate) {
            return Err(Error::SampleRate(sample_rate));
        }
        let settings = SynthesizerSettings::new(sample_rate as i32);
        let synthesizer = Synthesizer::new(soundfont, &settings)
            .map_err(|e| Error::SoundFont(format!("Failed to create synthesizer: {e}")))?;

        Ok(Self {
            synthesizer,
            sample_rate: sample_rate as u32,
        })
    }

    /// Load `path` and build a synthesizer at `sample_rate`.
    pub fn from_file(path: impl AsRef<Path>, sample_rate: f64) -> Result<Self> {
        let soundfont = load_soundfont(path)?;
        Self::new(&soundfont, sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Silence every note on every channel.
    pub fn reset(&mut self) {
        self.synthesizer.note_off_all(false);
    }
}

impl AudioGenerator for SoundFontSynth {
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.synthesizer.render(left, right);
    }
}

impl SynthVoice for SoundFontSynth {
    fn program_change(&mut self, channel: u8, bank: u16, preset: u8) {
        let channel = channel as i32;
        // The drum channel adds the percussion offset itself.
        let bank = if bank >= PERCUSSION_BANK {
            bank - PERCUSSION_BANK
        } else {
            bank
        };
        self.synthesizer
            .process_midi_message(channel, CONTROL_CHANGE, BANK_SELECT, (bank & 0x7F) as i32);
        self.synthesizer
            .process_midi_message(channel, PROGRAM_CHANGE, preset as i32, 0);
    }

    fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8) {
        self.synthesizer
            .note_on(channel as i32, pitch as i32, velocity as i32);
    }

    fn note_off(&mut self, channel: u8, pitch: u8) {
        self.synthesizer.note_off(channel as i32, pitch as i32);
    }
}
