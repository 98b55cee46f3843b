//! Human-readable clock position for on-screen debug labels.

use core::fmt;

use super::tempo_map::{TempoMap, Tick, BBT, TICKS_PER_QUARTER};

/// Snapshot of a scheduler clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReadout {
    pub seconds: f64,
    pub tick: Tick,
    pub bbt: BBT,
}

impl ClockReadout {
    pub fn new(tempo_map: &TempoMap, frames: u64, tick: Tick) -> Self {
        Self {
            seconds: tempo_map.frames_to_seconds(frames),
            tick,
            bbt: tempo_map.tick_to_bbt(tick),
        }
    }

    /// Position in quarter notes.
    #[inline]
    pub fn beat(&self) -> f64 {
        self.tick as f64 / TICKS_PER_QUARTER as f64
    }
}

impl fmt::Display for ClockReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time:{:.2}\ntick:{}\nbeat:{:.2}\nbbt:{}",
            self.seconds,
            self.tick,
            self.beat(),
            self.bbt
        )
    }
}
