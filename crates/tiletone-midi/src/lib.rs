//! Note values and MIDI events for tiletone.
//!
//! - [`Note`]: a pitch held for a number of ticks, with reversible sharps and flats
//! - [`MidiEvent`]: channel voice message stamped with the frame it happened at
//! - [`note_name`], [`note_to_hz`]: pitch helpers

pub mod error;
pub use error::{Error, Result};

mod event;
pub use event::MidiEvent;

mod note;
pub use note::{Note, REST};

mod utils;
pub use utils::{note_name, note_to_hz, validate_channel, validate_velocity};

pub use midi_msg::{Channel, ChannelVoiceMsg, ControlChange};
