//! Centralized error type for the tiletone umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] tiletone_core::Error),

    #[error("Note: {0}")]
    Midi(#[from] tiletone_midi::Error),

    #[error("Synth: {0}")]
    Synth(#[from] tiletone_synth::Error),

    /// A step was built from an empty chord.
    #[error("Step {0} has no notes")]
    EmptyStep(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
