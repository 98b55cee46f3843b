//! Free-running sequencer integration tests
//!
//! Plays note lists through a headless puzzle sound and checks the exact
//! ticks each synth message lands on.

use tiletone::prelude::*;

use crate::helpers::*;

// =============================================================================
// Timing
// =============================================================================

/// Note, rest, note: the rest takes time but never reaches the synth, and
/// the sequencer stops itself once the last step has run out.
#[test]
fn test_melody_with_rest() {
    let (mut sound, log) = test_sound();
    let calls = CallLog::new();
    let finished = calls.callback(sound.handle(), "finished");
    sound
        .set_notes(
            notes(&[(480, 60), (480, 0), (480, 64)]),
            Vec::new(),
            Vec::new(),
            Some(finished),
        )
        .unwrap();

    // First note waits for the next quarter note.
    run_until(&mut sound, 100);
    assert_eq!(sound.toggle(), Transition::Started);
    let t0 = 480;

    run_until(&mut sound, t0 + 1439);
    assert!(sound.is_playing());
    assert_eq!(calls.count("finished"), 0);

    run_until(&mut sound, t0 + 1440);
    assert!(!sound.is_playing());
    assert_eq!(calls.calls(), vec![("finished".to_string(), t0 + 1440)]);

    assert_eq!(in_ticks(log.note_ons()), vec![(t0, 60), (t0 + 960, 64)]);
    assert_eq!(
        in_ticks(log.note_offs()),
        vec![(t0 + 432, 60), (t0 + 1392, 64)]
    );
    assert_eq!(in_ticks(log.programs()), vec![(t0, 0)]);

    // Nothing else happens afterwards, and the callback stays at one.
    run_ticks(&mut sound, 4800);
    assert_eq!(log.note_ons().len(), 2);
    assert_eq!(calls.count("finished"), 1);
}

/// A 480-tick note is released at +432, before the next one starts at +480.
#[test]
fn test_detached_release_precedes_next_note() {
    let (mut sound, log) = test_sound();
    sound
        .set_notes(notes(&[(480, 60), (480, 62)]), Vec::new(), Vec::new(), None)
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 960);

    let events = log.events();
    let timeline: Vec<(bool, u8, Tick)> = events
        .iter()
        .filter(|e| e.is_note_on() || e.is_note_off())
        .map(|e| (e.is_note_on(), e.note().unwrap(), e.frame / FRAMES_PER_TICK))
        .collect();

    assert_eq!(
        timeline,
        vec![
            (true, 60, 0),
            (false, 60, 432),
            (true, 62, 480),
            (false, 62, 912),
        ]
    );
    assert!(log.sounding().is_empty());
}

/// Starting exactly on a quarter note plays immediately.
#[test]
fn test_start_on_grid_plays_now() {
    let (mut sound, log) = test_sound();
    sound
        .set_notes(notes(&[(240, 67)]), Vec::new(), Vec::new(), None)
        .unwrap();

    run_until(&mut sound, 960);
    sound.start();
    run_ticks(&mut sound, 240);

    assert_eq!(in_ticks(log.note_ons()), vec![(960, 67)]);
    assert_eq!(in_ticks(log.note_offs()), vec![(960 + 216, 67)]);
}

// =============================================================================
// Looping
// =============================================================================

/// Three looping notes fire p0, p1, p2, p0, p1, p2 over six steps.
#[test]
fn test_loop_repeats_in_order() {
    let (mut sound, log) = test_sound_with(PuzzleSound::builder().looping(true));
    let calls = CallLog::new();
    let finished = calls.callback(sound.handle(), "finished");
    sound
        .set_notes(
            notes(&[(480, 60), (480, 64), (480, 67)]),
            Vec::new(),
            Vec::new(),
            Some(finished),
        )
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 2400);

    assert_eq!(pitches(log.note_ons()), vec![60, 64, 67, 60, 64, 67]);
    assert!(sound.is_playing());
    assert_eq!(calls.count("finished"), 0);

    sound.toggle();
    run_ticks(&mut sound, 2400);
    assert_eq!(log.note_ons().len(), 6);
    assert!(log.sounding().is_empty());
    // Stopping is not finishing.
    assert_eq!(calls.count("finished"), 0);
}

// =============================================================================
// Start / stop
// =============================================================================

#[test]
fn test_start_and_stop_are_idempotent() {
    let (mut sound, log) = test_sound();
    sound
        .set_notes(notes(&[(480, 60), (480, 62)]), Vec::new(), Vec::new(), None)
        .unwrap();

    assert_eq!(sound.stop(), Transition::None);
    assert_eq!(sound.start(), Transition::Started);
    assert_eq!(sound.start(), Transition::None);
    run_ticks(&mut sound, 100);

    assert_eq!(sound.stop(), Transition::Stopped);
    assert_eq!(sound.stop(), Transition::None);
    run_ticks(&mut sound, 2000);

    // One program change and one note: the second start was ignored.
    assert_eq!(log.programs().len(), 1);
    assert_eq!(pitches(log.note_ons()), vec![60]);
    assert!(log.sounding().is_empty());
}

/// Stopping and starting again restarts from the first step.
#[test]
fn test_restart_plays_from_first_step() {
    let (mut sound, log) = test_sound();
    sound
        .set_notes(
            notes(&[(480, 60), (480, 62), (480, 64)]),
            Vec::new(),
            Vec::new(),
            None,
        )
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 500);
    sound.toggle();
    run_until(&mut sound, 700);
    sound.toggle();
    run_until(&mut sound, 960 + 1440);

    assert_eq!(
        in_ticks(log.note_ons()),
        vec![(0, 60), (480, 62), (960, 60), (1440, 62), (1920, 64)]
    );
    assert_eq!(log.programs().len(), 2);
    assert!(!sound.is_playing());
}

/// Natural completion ends the play-through; a later toggle starts a new one.
#[test]
fn test_finished_fires_once_per_play_through() {
    let (mut sound, _log) = test_sound();
    let calls = CallLog::new();
    let finished = calls.callback(sound.handle(), "finished");
    sound
        .set_notes(notes(&[(480, 60)]), Vec::new(), Vec::new(), Some(finished))
        .unwrap();

    sound.toggle();
    run_ticks(&mut sound, 1920);
    assert_eq!(calls.count("finished"), 1);
    assert!(!sound.is_playing());

    assert_eq!(sound.toggle(), Transition::Started);
    run_ticks(&mut sound, 1920);
    assert_eq!(calls.count("finished"), 2);
}

#[test]
fn test_empty_note_list_finishes_immediately() {
    let (mut sound, log) = test_sound();
    let calls = CallLog::new();
    let finished = calls.callback(sound.handle(), "finished");
    sound
        .set_notes(Vec::<Note>::new(), Vec::new(), Vec::new(), Some(finished))
        .unwrap();

    assert_eq!(sound.toggle(), Transition::None);
    assert!(!sound.is_playing());
    assert_eq!(calls.count("finished"), 1);

    run_ticks(&mut sound, 960);
    assert!(log.is_empty());
}

// =============================================================================
// Chords and note list swaps
// =============================================================================

/// All pitches of a chord start together and are released together.
#[test]
fn test_chord_step() {
    let (mut sound, log) = test_sound();
    let chord = notes(&[(480, 60), (480, 64), (480, 67)]);
    sound
        .set_notes(vec![chord], Vec::new(), Vec::new(), None)
        .unwrap();
    assert_eq!(sound.letters(), vec!["C4 E4 G4"]);

    sound.toggle();
    run_until(&mut sound, 480);

    assert_eq!(
        in_ticks(log.note_ons()),
        vec![(0, 60), (0, 64), (0, 67)]
    );
    assert_eq!(
        in_ticks(log.note_offs()),
        vec![(432, 60), (432, 64), (432, 67)]
    );
}

/// Replacing notes while stopped, then starting, plays the new list from index 0.
#[test]
fn test_replace_notes_while_stopped() {
    let (mut sound, log) = test_sound();
    sound
        .set_notes(
            notes(&[(480, 60), (480, 62), (480, 64)]),
            Vec::new(),
            Vec::new(),
            None,
        )
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 500);
    sound.toggle();

    sound
        .set_notes(notes(&[(480, 72), (480, 74)]), Vec::new(), Vec::new(), None)
        .unwrap();
    assert_eq!(sound.letters(), vec!["C5", "D5"]);

    sound.toggle();
    run_until(&mut sound, 960 + 960);

    assert_eq!(pitches(log.note_ons()), vec![60, 62, 72, 74]);
    assert_eq!(in_ticks(log.note_ons())[2], (960, 72));
    assert!(!sound.is_playing());
}

/// A shorter list after a finished play-through never leaves the cursor past its end.
#[test]
fn test_cursor_stays_within_shorter_list() {
    let (mut sound, _log) = test_sound();
    sound
        .set_notes(
            notes(&[(480, 60), (480, 62), (480, 64)]),
            Vec::new(),
            Vec::new(),
            None,
        )
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 1500);
    assert!(!sound.is_playing());

    sound
        .set_notes(notes(&[(480, 67)]), Vec::new(), Vec::new(), None)
        .unwrap();
    let sequencer = sound.note_sequencer().unwrap().clone();
    assert_eq!(sequencer.cursor(), 0);

    run_until(&mut sound, 1600);
    assert_eq!(sound.toggle(), Transition::Started);
    assert_eq!(sequencer.cursor(), 0);
    assert!(sequencer.cursor() <= sequencer.sequence().len());

    run_until(&mut sound, 1920);
    assert_eq!(sequencer.cursor(), 1);
}

/// Setting notes mid-play stops playback; sounding notes are still released.
#[test]
fn test_set_notes_while_playing_stops() {
    let (mut sound, log) = test_sound();
    sound
        .set_notes(notes(&[(960, 60), (960, 62)]), Vec::new(), Vec::new(), None)
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 100);
    assert_eq!(log.sounding(), vec![60]);

    sound
        .set_notes(notes(&[(480, 48)]), Vec::new(), Vec::new(), None)
        .unwrap();
    assert!(!sound.is_playing());

    run_until(&mut sound, 3000);
    assert_eq!(pitches(log.note_ons()), vec![60]);
    assert!(log.sounding().is_empty());
}

/// Accidentals change what is played and what is displayed.
#[test]
fn test_accidentals_flow_through() {
    let (mut sound, log) = test_sound();
    let mut melody = notes(&[(480, 60), (480, 64)]);
    melody[0].add_sharp().unwrap();
    melody[1].add_flat().unwrap();
    melody[1].add_flat().unwrap();

    sound
        .set_notes(melody.clone(), Vec::new(), Vec::new(), None)
        .unwrap();
    assert_eq!(sound.letters(), vec!["C#4", "D#4"]);

    sound.toggle();
    run_until(&mut sound, 960);
    assert_eq!(pitches(log.note_ons()), vec![61, 63]);

    melody[0].remove_sharp().unwrap();
    melody[1].remove_flat().unwrap();
    sound
        .set_notes(melody, Vec::new(), Vec::new(), None)
        .unwrap();
    assert_eq!(sound.letters(), vec!["C4", "E4"]);
}

/// Program and channel reach the synth once per start.
#[test]
fn test_program_and_channel() {
    let (mut sound, log) = test_sound_with(
        PuzzleSound::builder()
            .channel(3)
            .program(Program::new(0, 33))
            .velocity(90),
    );
    sound
        .set_notes(notes(&[(480, 40)]), Vec::new(), Vec::new(), None)
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 960);

    let events = log.events();
    assert!(events.iter().all(|e| e.channel_num() == 3));
    assert_eq!(log.programs(), vec![(0, 33)]);

    let on = events.iter().find(|e| e.is_note_on()).unwrap();
    assert_eq!(on.note(), Some(40));
}
