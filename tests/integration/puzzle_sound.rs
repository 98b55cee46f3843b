//! PuzzleSound facade integration tests
//!
//! Covers the game-loop side: note list management, `on_update` pumping
//! and the clock readout shown on screen.

use tiletone::prelude::*;

use crate::helpers::*;

#[test]
fn test_toggle_before_notes_does_nothing() {
    let (mut sound, log) = test_sound();

    assert_eq!(sound.toggle(), Transition::None);
    assert_eq!(sound.start_simon_says(), Transition::None);
    assert!(!sound.is_playing());
    assert!(sound.note_sequencer().is_none());

    sound.on_update();
    assert!(log.is_empty());
}

/// Each update renders one block and fires whatever became due in it.
#[test]
fn test_on_update_drives_playback() {
    let (mut sound, log) = test_sound_with(PuzzleSound::builder().frames_per_update(2400));
    sound
        .set_notes(notes(&[(480, 60), (480, 62)]), Vec::new(), Vec::new(), None)
        .unwrap();
    assert_eq!(sound.frames_per_update(), Some(2400));

    sound.toggle();
    // 2400 frames = 48 ticks per update.
    for _ in 0..10 {
        sound.on_update();
    }

    assert_eq!(sound.handle().current_tick(), 480);
    assert_eq!(in_ticks(log.note_ons()), vec![(0, 60), (480, 62)]);
    assert_eq!(in_ticks(log.note_offs()), vec![(432, 60)]);
}

#[test]
fn test_letters_follow_notes() {
    let (mut sound, _log) = test_sound();
    assert!(sound.letters().is_empty());

    sound
        .set_notes(
            notes(&[(480, 60), (480, 0), (480, 70)]),
            Vec::new(),
            Vec::new(),
            None,
        )
        .unwrap();
    assert_eq!(sound.letters(), vec!["C4", "rest", "A#4"]);
    assert_eq!(sound.notes().len(), 3);
}

#[test]
fn test_empty_chord_is_rejected() {
    let (mut sound, _log) = test_sound();
    let result = sound.set_notes(vec![Chord::default()], Vec::new(), Vec::new(), None);
    assert!(matches!(result, Err(Error::EmptyStep(0))));
}

#[test]
fn test_now_str_tracks_clock() {
    let (mut sound, _log) = test_sound();
    run_until(&mut sound, 960);

    assert_eq!(sound.now_str(), "time:1.00\ntick:960\nbeat:2.00\nbbt:1.3.000");

    let readout = sound.readout();
    assert_eq!(readout.tick, 960);
    assert_eq!(readout.bbt.to_string(), "1.3.000");
}

#[test]
fn test_initial_notes_from_builder() {
    let (mut sound, log) =
        test_sound_with(PuzzleSound::builder().notes(notes(&[(480, 48), (480, 52)])));
    assert_eq!(sound.letters(), vec!["C3", "E3"]);

    sound.toggle();
    run_until(&mut sound, 960);
    assert_eq!(pitches(log.note_ons()), vec![48, 52]);
}

/// Extra game events can share the puzzle's clock.
#[test]
fn test_handle_posts_game_events() {
    let (mut sound, log) = test_sound();
    let calls = CallLog::new();
    let beat = calls.callback(sound.handle(), "beat");

    sound.handle().post_at_tick(720, move |sched, _tick| {
        sched.generator_mut().note_on(0, 36, 100);
        beat();
    });
    run_until(&mut sound, 1000);

    assert_eq!(calls.calls(), vec![("beat".to_string(), 720)]);
    assert_eq!(in_ticks(log.note_ons()), vec![(720, 36)]);
}

#[test]
fn test_percussion_sound() {
    let (mut sound, log) = test_sound_with(PuzzleSound::builder().percussion());
    sound
        .set_notes(notes(&[(240, 36), (240, 38)]), Vec::new(), Vec::new(), None)
        .unwrap();

    sound.toggle();
    run_until(&mut sound, 480);

    let events = log.events();
    assert!(events.iter().all(|e| e.channel_num() == 9));
    assert_eq!(pitches(log.note_ons()), vec![36, 38]);
}
