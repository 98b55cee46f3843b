//! Audio thread integration tests
//!
//! The scheduler renders on its own thread, the way a device callback runs
//! it, while the game thread toggles playback and swaps note lists.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tiletone::prelude::*;

use crate::helpers::*;

/// Frames per render call on the audio thread.
const AUDIO_BLOCK: usize = 64;

fn sequence(pairs: &[(u64, u8)], finished: &Arc<AtomicUsize>) -> Sequence {
    let chords: Vec<Chord> = notes(pairs).into_iter().map(Chord::from).collect();
    let counter = Arc::clone(finished);
    let on_finished: FinishedCallback = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    Sequence::from_chords(&chords, &[], &[], Some(on_finished)).unwrap()
}

#[test]
fn test_control_calls_race_rendering() {
    let tempo_map = TempoMap::new(TEST_BPM, TEST_SAMPLE_RATE).unwrap();
    let synth = RecordingSynth::new();
    let log = synth.log();
    let mut scheduler = Scheduler::new(tempo_map, synth);
    let sequencer = NoteSequencer::new(scheduler.handle(), SequencerConfig::default()).unwrap();

    let finished = Arc::new(AtomicUsize::new(0));
    let melodies = [
        sequence(&[(480, 60), (240, 0), (240, 64)], &finished),
        sequence(&[(120, 67), (120, 69)], &finished),
        sequence(&[(240, 48), (480, 52), (240, 55), (240, 57)], &finished),
    ];
    sequencer.set_sequence(melodies[0].clone());

    let done = Arc::new(AtomicBool::new(false));
    let audio_done = Arc::clone(&done);
    let audio = thread::spawn(move || {
        let mut left = vec![0.0f32; AUDIO_BLOCK];
        let mut right = vec![0.0f32; AUDIO_BLOCK];
        while !audio_done.load(Ordering::Acquire) {
            scheduler.render(&mut left, &mut right);
            thread::sleep(Duration::from_micros(50));
        }

        // Long enough for every release and every cancelled chain to surface.
        let drain_blocks = (3000 * FRAMES_PER_TICK) as usize / AUDIO_BLOCK + 1;
        for _ in 0..drain_blocks {
            scheduler.render(&mut left, &mut right);
        }
        scheduler
    });

    let mut starts = 0;
    for round in 0..60 {
        let transition = match round % 5 {
            0 | 1 => sequencer.toggle(),
            2 => sequencer.start_simon_says(),
            3 => {
                // Swap while possibly playing.
                sequencer.set_sequence(melodies[round % melodies.len()].clone());
                Transition::None
            }
            _ => {
                sequencer.stop();
                sequencer.set_sequence(melodies[(round + 1) % melodies.len()].clone());
                Transition::None
            }
        };
        if transition == Transition::Started {
            starts += 1;
        }
        assert!(sequencer.cursor() <= sequencer.sequence().len());
        thread::sleep(Duration::from_millis(2));
    }
    sequencer.stop();
    done.store(true, Ordering::Release);

    let scheduler = audio.join().expect("audio thread panicked");

    assert!(starts > 0);
    assert!(finished.load(Ordering::SeqCst) <= starts);
    assert!(!sequencer.is_playing());
    assert!(log.sounding().is_empty());
    assert_eq!(log.note_ons().len(), log.note_offs().len());
    assert_eq!(scheduler.pending_count(), 0);
}

/// Events posted from the game thread while the audio thread renders all
/// fire, in tick order.
#[test]
fn test_handle_posts_from_game_thread() {
    let tempo_map = TempoMap::new(TEST_BPM, TEST_SAMPLE_RATE).unwrap();
    let mut scheduler = Scheduler::new(tempo_map, RecordingSynth::new());
    let handle = scheduler.handle();

    let done = Arc::new(AtomicBool::new(false));
    let audio_done = Arc::clone(&done);
    let audio = thread::spawn(move || {
        let mut left = vec![0.0f32; AUDIO_BLOCK];
        let mut right = vec![0.0f32; AUDIO_BLOCK];
        while !audio_done.load(Ordering::Acquire) {
            scheduler.render(&mut left, &mut right);
            thread::sleep(Duration::from_micros(50));
        }
        let drain_blocks = (2000 * FRAMES_PER_TICK) as usize / AUDIO_BLOCK + 1;
        for _ in 0..drain_blocks {
            scheduler.render(&mut left, &mut right);
        }
        scheduler
    });

    let fired = Arc::new(Mutex::new(Vec::new()));
    for i in 0..50u64 {
        let fired = Arc::clone(&fired);
        let due = handle.current_tick() + 200 + (i % 7) * 10;
        handle.post_at_tick(due, move |_, tick| fired.lock().unwrap().push(tick));
        thread::sleep(Duration::from_micros(200));
    }
    done.store(true, Ordering::Release);

    let scheduler = audio.join().expect("audio thread panicked");
    let ticks: Vec<Tick> = fired.lock().unwrap().clone();

    assert_eq!(ticks.len(), 50);
    assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(scheduler.pending_count(), 0);
}
