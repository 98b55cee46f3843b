//! Synth voices for tiletone.
//!
//! The note sequencer drives a [`SynthVoice`]: a MIDI-style interface on top
//! of [`AudioGenerator`](tiletone_core::AudioGenerator) so the same voice can
//! be rendered by the scheduler and spoken to by scheduled events.
//!
//! - **[`SoundFontSynth`]** - SoundFont (.sf2) playback via RustySynth (feature: `soundfont`)
//! - **[`RecordingSynth`]** - Silent voice that logs every message, for headless runs and tests
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `soundfont` | SoundFont (.sf2) synthesis (default) |

pub mod error;
pub use error::{Error, Result};

mod voice;
pub use voice::{SynthVoice, GM_PERCUSSION_CHANNEL, PERCUSSION_BANK};

mod recorder;
pub use recorder::{RecordingSynth, SynthLog};

#[cfg(feature = "soundfont")]
mod soundfont;

#[cfg(feature = "soundfont")]
pub use soundfont::{load_soundfont, SoundFont, SoundFontLibrary, SoundFontSynth};
