//! Timed note values with reversible accidentals.
//!
//! # Example
//! ```ignore
//! use tiletone_midi::Note;
//!
//! let mut note = Note::new(480, 60)?;
//! assert_eq!(note.label(), "C4");
//!
//! note.add_sharp()?;
//! assert_eq!(note.label(), "C#4");
//! note.remove_sharp()?;
//! assert_eq!(note.pitch(), 60);
//! ```

use crate::utils::note_name;
use crate::{Error, Result};

/// Pitch value reserved for rests.
pub const REST: u8 = 0;

/// A pitch held for a number of ticks.
///
/// Pitch 0 is a rest: it takes up time but never sounds. Sharps and flats each
/// shift the pitch by one semitone; applying one twice is a no-op and removing
/// it restores the previous pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    duration: u64,
    pitch: u8,
    sharp: bool,
    flat: bool,
}

impl Note {
    pub fn new(duration: u64, pitch: u8) -> Result<Self> {
        Ok(Self {
            duration: check_duration(duration)?,
            pitch: check_pitch(pitch as i16)?,
            sharp: false,
            flat: false,
        })
    }

    pub fn rest(duration: u64) -> Result<Self> {
        Self::new(duration, REST)
    }

    /// Length in ticks.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.duration
    }

    #[inline]
    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    #[inline]
    pub fn is_rest(&self) -> bool {
        self.pitch == REST
    }

    #[inline]
    pub fn is_sharp(&self) -> bool {
        self.sharp
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        self.flat
    }

    /// Letter and octave, e.g. `"D#5"`. Rests read `"rest"`.
    pub fn label(&self) -> String {
        if self.is_rest() {
            return "rest".into();
        }
        note_name(self.pitch)
    }

    /// Returns -1 to 9.
    pub fn octave(&self) -> i8 {
        (self.pitch / 12) as i8 - 1
    }

    /// 0-11, where 0 = C.
    pub fn pitch_class(&self) -> u8 {
        self.pitch % 12
    }

    /// Frequency in Hz (A4 = 440 Hz, equal temperament).
    pub fn frequency(&self) -> f64 {
        440.0 * 2.0f64.powf((self.pitch as f64 - 69.0) / 12.0)
    }

    pub fn set_dur(&mut self, duration: u64) -> Result<()> {
        self.duration = check_duration(duration)?;
        Ok(())
    }

    /// Replace the pitch. Accidental flags are left as they are.
    pub fn set_note(&mut self, pitch: u8) -> Result<()> {
        self.pitch = check_pitch(pitch as i16)?;
        Ok(())
    }

    pub fn add_sharp(&mut self) -> Result<()> {
        if !self.sharp {
            self.shift(1)?;
            self.sharp = true;
        }
        Ok(())
    }

    pub fn remove_sharp(&mut self) -> Result<()> {
        if self.sharp {
            self.shift(-1)?;
            self.sharp = false;
        }
        Ok(())
    }

    pub fn add_flat(&mut self) -> Result<()> {
        if !self.flat {
            self.shift(-1)?;
            self.flat = true;
        }
        Ok(())
    }

    pub fn remove_flat(&mut self) -> Result<()> {
        if self.flat {
            self.shift(1)?;
            self.flat = false;
        }
        Ok(())
    }

    fn shift(&mut self, semitones: i16) -> Result<()> {
        self.pitch = check_pitch(self.pitch as i16 + semitones)?;
        Ok(())
    }
}

fn check_pitch(pitch: i16) -> Result<u8> {
    if !(0..=127).contains(&pitch) {
        return Err(Error::PitchOutOfRange(pitch));
    }
    Ok(pitch as u8)
}

fn check_duration(duration: u64) -> Result<u64> {
    if duration == 0 {
        return Err(Error::InvalidDuration(duration));
    }
    Ok(duration)
}
