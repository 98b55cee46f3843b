//! Test helpers and fixtures for tiletone integration tests
//!
//! Every sound here is headless and plays through a [`RecordingSynth`], so
//! tests drive the audio clock by hand and read back exactly which frame each
//! note on, note off and program change landed on.
//!
//! At [`TEST_SAMPLE_RATE`] and [`TEST_BPM`] one tick is exactly
//! [`FRAMES_PER_TICK`] frames, so tick positions can be asserted exactly.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tiletone::prelude::*;
use tiletone::{SchedulerHandle, SynthLog};

/// Test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

pub const TEST_BPM: f64 = 120.0;

/// 48000 Hz * 60 s / 120 BPM / 480 ticks
pub const FRAMES_PER_TICK: u64 = 50;

/// Standard buffer size for deterministic testing
pub const TEST_BUFFER_SIZE: usize = 512;

/// Headless sound on a recording synth at the test rate and tempo.
pub fn test_sound() -> (PuzzleSound<RecordingSynth>, SynthLog) {
    test_sound_with(PuzzleSound::builder())
}

/// Like [`test_sound`], starting from a customised builder.
pub fn test_sound_with(builder: PuzzleSoundBuilder) -> (PuzzleSound<RecordingSynth>, SynthLog) {
    builder
        .headless()
        .sample_rate(TEST_SAMPLE_RATE)
        .bpm(TEST_BPM)
        .frames_per_update(TEST_BUFFER_SIZE)
        .build_recording()
        .expect("Failed to create test sound")
}

/// Notes from `(duration, pitch)` pairs.
pub fn notes(pairs: &[(u64, u8)]) -> Vec<Note> {
    pairs
        .iter()
        .map(|&(duration, pitch)| Note::new(duration, pitch).expect("valid test note"))
        .collect()
}

/// Render until the clock reaches `tick` exactly.
pub fn run_until(sound: &mut PuzzleSound<RecordingSynth>, tick: Tick) {
    let scheduler = sound.scheduler_mut().expect("test sounds are headless");
    let target = tick * FRAMES_PER_TICK;
    let mut left = vec![0.0f32; TEST_BUFFER_SIZE];
    let mut right = vec![0.0f32; TEST_BUFFER_SIZE];

    while scheduler.frames() < target {
        let block = ((target - scheduler.frames()) as usize).min(TEST_BUFFER_SIZE);
        scheduler.render(&mut left[..block], &mut right[..block]);
    }
}

/// Render `ticks` more ticks.
pub fn run_ticks(sound: &mut PuzzleSound<RecordingSynth>, ticks: Tick) {
    let now = sound.handle().current_tick();
    run_until(sound, now + ticks);
}

/// `(frame, pitch)` pairs converted to `(tick, pitch)`.
pub fn in_ticks(events: Vec<(u64, u8)>) -> Vec<(Tick, u8)> {
    events
        .into_iter()
        .map(|(frame, pitch)| (frame / FRAMES_PER_TICK, pitch))
        .collect()
}

pub fn pitches(events: Vec<(u64, u8)>) -> Vec<u8> {
    events.into_iter().map(|(_, pitch)| pitch).collect()
}

/// Records game callbacks with the tick they fired on.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(String, Tick)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that logs `label` at the scheduler's current tick.
    pub fn callback(&self, handle: &SchedulerHandle<RecordingSynth>, label: &str) -> StepCallback {
        let calls = Arc::clone(&self.calls);
        let handle = handle.clone();
        let label = label.to_string();
        Arc::new(move || {
            calls
                .lock()
                .unwrap()
                .push((label.clone(), handle.current_tick()));
        })
    }

    pub fn calls(&self) -> Vec<(String, Tick)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls().into_iter().map(|(label, _)| label).collect()
    }

    pub fn count(&self, label: &str) -> usize {
        self.calls().iter().filter(|(l, _)| l == label).count()
    }
}
