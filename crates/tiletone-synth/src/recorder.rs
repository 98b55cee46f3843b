//! Voice that records every call instead of making sound.
//!
//! Used for headless puzzles and tests: each call is stored as a [`MidiEvent`]
//! stamped with the number of frames rendered before it, which is exactly the
//! frame the scheduler fired it on.

use std::sync::Arc;

use parking_lot::Mutex;
use tiletone_core::AudioGenerator;
use tiletone_midi::MidiEvent;

use crate::SynthVoice;

/// Shared view of a [`RecordingSynth`]'s event log.
///
/// Clone it before handing the synth to a scheduler to keep reading the log
/// from the test or game thread.
#[derive(Clone, Default)]
pub struct SynthLog {
    events: Arc<Mutex<Vec<MidiEvent>>>,
}

impl SynthLog {
    pub fn events(&self) -> Vec<MidiEvent> {
        self.events.lock().clone()
    }

    /// `(frame, pitch)` of every note on.
    pub fn note_ons(&self) -> Vec<(u64, u8)> {
        self.collect(MidiEvent::is_note_on)
    }

    /// `(frame, pitch)` of every note off.
    pub fn note_offs(&self) -> Vec<(u64, u8)> {
        self.collect(MidiEvent::is_note_off)
    }

    /// `(frame, program)` of every program change.
    pub fn programs(&self) -> Vec<(u64, u8)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| e.program().map(|p| (e.frame, p)))
            .collect()
    }

    /// Pitches switched on and not yet switched off, in the order they started.
    pub fn sounding(&self) -> Vec<u8> {
        let mut held = Vec::new();
        for event in self.events.lock().iter() {
            match event.note() {
                Some(note) if event.is_note_on() => held.push(note),
                Some(note) if event.is_note_off() => {
                    if let Some(pos) = held.iter().position(|&n| n == note) {
                        held.remove(pos);
                    }
                }
                _ => {}
            }
        }
        held
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: MidiEvent) {
        self.events.lock().push(event);
    }

    fn collect(&self, keep: impl Fn(&MidiEvent) -> bool) -> Vec<(u64, u8)> {
        self.events
            .lock()
            .iter()
            .filter(|e| keep(*e))
            .filter_map(|e| e.note().map(|n| (e.frame, n)))
            .collect()
    }
}

/// Silent [`SynthVoice`] that logs note and program messages.
#[derive(Default)]
pub struct RecordingSynth {
    frame: u64,
    log: SynthLog,
}

impl RecordingSynth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> SynthLog {
        self.log.clone()
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl AudioGenerator for RecordingSynth {
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        left.fill(0.0);
        right.fill(0.0);
        self.frame += left.len() as u64;
    }
}

impl SynthVoice for RecordingSynth {
    fn program_change(&mut self, channel: u8, bank: u16, preset: u8) {
        self.log
            .push(MidiEvent::bank_select(self.frame, channel, bank));
        self.log
            .push(MidiEvent::program_change(self.frame, channel, preset));
    }

    fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8) {
        self.log
            .push(MidiEvent::note_on(self.frame, channel, pitch, velocity));
    }

    fn note_off(&mut self, channel: u8, pitch: u8) {
        self.log
            .push(MidiEvent::note_off(self.frame, channel, pitch));
    }
}
