//! Tick-accurate audio clock and event scheduler.
//!
//! # Primary API
//!
//! - [`TempoMap`]: ticks (480 per quarter note) to seconds and sample frames
//! - [`Scheduler`]: tick-ordered callbacks fired from the audio callback
//! - [`SchedulerHandle`]: post and cancel events from the game thread
//! - [`AudioGenerator`]: pull-based audio source the scheduler drives
//!
//! # Feature-gated APIs
//!
//! - `"output"`: [`AudioOutput`], CPAL device output (enabled by default)
//!
//! # Example
//!
//! ```ignore
//! use tiletone_core::prelude::*;
//!
//! let tempo_map = TempoMap::new(120.0, 48000.0)?;
//! let mut scheduler = Scheduler::new(tempo_map, Silence);
//!
//! let next_beat = quantize_tick_up(scheduler.current_tick(), TICKS_PER_QUARTER);
//! scheduler.post_at_tick(next_beat, |sched, tick| {
//!     println!("beat at {tick}: {}", sched.now_str());
//! });
//!
//! let mut output = AudioOutput::open(None)?;
//! output.start(scheduler)?;
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::EngineConfig;

pub(crate) mod clock;
pub use clock::{quantize_tick_up, ClockReadout, TempoMap, Tick, TimeSignature, BBT, TICKS_PER_QUARTER};

mod generator;
pub use generator::{AudioGenerator, Silence};

mod scheduler;
pub use scheduler::{EventFn, EventHandle, Scheduler, SchedulerHandle};

pub(crate) mod lockfree;
pub use lockfree::{AtomicCounter, AtomicFlag};

#[cfg(feature = "output")]
mod output;
#[cfg(feature = "output")]
pub use output::AudioOutput;

pub mod prelude {
    pub use crate::{
        quantize_tick_up, AudioGenerator, EngineConfig, Error, EventHandle, Result, Scheduler,
        SchedulerHandle, Silence, TempoMap, Tick, TICKS_PER_QUARTER,
    };

    #[cfg(feature = "output")]
    pub use crate::AudioOutput;
}
