//! Error types for tiletone-midi.

use thiserror::Error;

/// Result type alias for tiletone-midi operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Pitch {0} out of MIDI range (0-127)")]
    PitchOutOfRange(i16),

    #[error("Invalid duration: {0} ticks. Must be greater than 0")]
    InvalidDuration(u64),

    #[error("Invalid MIDI channel: {0} (0-15)")]
    InvalidChannel(u8),

    #[error("Invalid velocity: {0} (0-127)")]
    InvalidVelocity(u8),
}
