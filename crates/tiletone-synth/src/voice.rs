//! The voice interface the sequencer plays through.

use tiletone_core::AudioGenerator;

/// General MIDI percussion bank, as used by SoundFont drum kits.
pub const PERCUSSION_BANK: u16 = 128;

/// Zero-based channel that General MIDI reserves for drums.
pub const GM_PERCUSSION_CHANNEL: u8 = 9;

/// A MIDI-driven synthesizer that renders through [`AudioGenerator`].
///
/// All methods are called from the audio thread between rendered sub-blocks,
/// so they must not block.
pub trait SynthVoice: AudioGenerator {
    /// Select `bank` and `preset` for `channel`.
    fn program_change(&mut self, channel: u8, bank: u16, preset: u8);

    fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8);

    fn note_off(&mut self, channel: u8, pitch: u8);
}

impl<V: SynthVoice + ?Sized> SynthVoice for Box<V> {
    #[inline]
    fn program_change(&mut self, channel: u8, bank: u16, preset: u8) {
        (**self).program_change(channel, bank, preset);
    }

    #[inline]
    fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8) {
        (**self).note_on(channel, pitch, velocity);
    }

    #[inline]
    fn note_off(&mut self, channel: u8, pitch: u8) {
        (**self).note_off(channel, pitch);
    }
}
