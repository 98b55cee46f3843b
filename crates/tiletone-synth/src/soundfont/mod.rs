//! SoundFont (.sf2) synthesis via RustySynth.
//!
//! Provides [`SoundFontSynth`] for MIDI-driven sample playback and
//! [`SoundFontLibrary`] for sharing parsed fonts.

mod library;
mod synthesizer;

pub use library::{load_soundfont, SoundFontLibrary};
pub use rustysynth::SoundFont;
pub use synthesizer::SoundFontSynth;
