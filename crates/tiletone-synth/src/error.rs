//! Error types for tiletone-synth.

use thiserror::Error;

/// Result type alias for tiletone-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or creating a synth voice.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sample rate the synthesizer cannot run at.
    #[error("Unsupported sample rate: {0} Hz")]
    SampleRate(f64),

    /// SoundFont parsing or synthesizer creation error.
    #[error("SoundFont error: {0}")]
    SoundFont(String),
}
