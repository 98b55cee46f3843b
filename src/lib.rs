//! # tiletone - puzzle audio on a tick-accurate clock
//!
//! Plays short note sequences for music puzzles: melodies that loop while a
//! player explores, drum patterns, and "Simon Says" rounds where tiles light
//! up in time with their notes.
//!
//! ## Architecture
//!
//! tiletone is an umbrella crate that coordinates:
//! - **tiletone-core** - Tempo map, tick scheduler, device output
//! - **tiletone-midi** - Notes with accidentals, sample-stamped MIDI events
//! - **tiletone-synth** - Synth voices (SoundFont, recording)
//!
//! and adds the [`NoteSequencer`] state machine plus the [`PuzzleSound`]
//! facade a puzzle talks to.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tiletone::prelude::*;
//!
//! let mut sound = PuzzleSound::builder()
//!     .program(Program::new(0, 0))
//!     .build_soundfont("data/FluidR3_GM.sf2")?;
//!
//! sound.set_notes(
//!     [Note::new(480, 60)?, Note::rest(480)?, Note::new(480, 64)?],
//!     Vec::new(),
//!     Vec::new(),
//!     None,
//! )?;
//! sound.toggle();
//!
//! loop {
//!     sound.on_update();
//!     println!("{}", sound.now_str());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `output` and `soundfont`
//! - `output` - Play through an audio device (CPAL)
//! - `soundfont` - SoundFont (.sf2) voice (RustySynth)

/// Re-export of tiletone-core for direct access
pub use tiletone_core as core;

/// Re-export of tiletone-midi for direct access
pub use tiletone_midi as midi;

/// Re-export of tiletone-synth for direct access
pub use tiletone_synth as synth;

// Clock and scheduling
pub use tiletone_core::{
    quantize_tick_up, AudioGenerator, ClockReadout, EngineConfig, EventHandle, Scheduler,
    SchedulerHandle, TempoMap, Tick, TimeSignature, BBT, TICKS_PER_QUARTER,
};

#[cfg(feature = "output")]
pub use tiletone_core::AudioOutput;

// Notes and voices
pub use tiletone_midi::{MidiEvent, Note};
pub use tiletone_synth::{RecordingSynth, SynthLog, SynthVoice};

#[cfg(feature = "soundfont")]
pub use tiletone_synth::{load_soundfont, SoundFontSynth};

pub mod error;
pub use error::{Error, Result};

pub mod sequencer;
pub use sequencer::{
    detached_duration, Chord, FinishedCallback, NoteSequencer, PlaybackMode, Program, Sequence,
    SequencerConfig, Step, StepCallback, Transition, SIMON_SAYS_GAP,
};

mod builder;
mod puzzle_sound;

pub use builder::PuzzleSoundBuilder;
pub use puzzle_sound::PuzzleSound;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        Chord, Error, FinishedCallback, NoteSequencer, Program, PuzzleSound, PuzzleSoundBuilder,
        Result, Sequence, SequencerConfig, StepCallback, Transition,
    };

    pub use crate::{Note, RecordingSynth, Scheduler, SynthVoice, TempoMap, Tick, TICKS_PER_QUARTER};

    #[cfg(feature = "soundfont")]
    pub use crate::SoundFontSynth;
}
