//! Musical time: ticks, tempo and clock readouts.

mod readout;
mod tempo_map;

pub use readout::ClockReadout;
pub use tempo_map::{quantize_tick_up, TempoMap, Tick, TimeSignature, BBT, TICKS_PER_QUARTER};
