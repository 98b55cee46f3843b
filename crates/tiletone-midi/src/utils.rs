//! MIDI utility functions

use crate::{Error, Result};

const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scientific pitch name, e.g. `60` -> `"C4"`, `61` -> `"C#4"`.
pub fn note_name(pitch: u8) -> String {
    let octave = (pitch / 12) as i8 - 1;
    format!("{}{}", PITCH_CLASS_NAMES[(pitch % 12) as usize], octave)
}

#[inline]
pub fn note_to_hz(note: f32) -> f32 {
    440.0 * 2.0f32.powf((note - 69.0) / 12.0)
}

#[inline]
pub fn validate_channel(channel: u8) -> Result<u8> {
    if channel > 15 {
        return Err(Error::InvalidChannel(channel));
    }
    Ok(channel)
}

#[inline]
pub fn validate_velocity(velocity: u8) -> Result<u8> {
    if velocity > 127 {
        return Err(Error::InvalidVelocity(velocity));
    }
    Ok(velocity)
}
