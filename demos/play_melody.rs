//! # Play Melody
//!
//! Plays a puzzle melody through a SoundFont on the default output device,
//! toggling it on and off and printing the clock once per game frame.
//!
//! **Concepts:** `PuzzleSound::builder()`, `set_notes`, `toggle`, `on_update`, `now_str`
//!
//! ```bash
//! SOUNDFONT_PATH=data/FluidR3_GM.sf2 cargo run --example play_melody
//! ```

use std::time::Duration;
use tiletone::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> tiletone::Result<()> {
    tracing_subscriber::fmt::init();

    let soundfont_path = std::env::var("SOUNDFONT_PATH")
        .unwrap_or_else(|_| "assets/soundfonts/FluidR3_GM.sf2".to_string());

    if !std::path::Path::new(&soundfont_path).exists() {
        println!("SoundFont not found: {}", soundfont_path);
        println!("Set SOUNDFONT_PATH to a General MIDI .sf2 file");
        return Ok(());
    }

    let mut sound = PuzzleSound::builder()
        .bpm(120.0)
        .program(Program::new(0, 0))
        .build_soundfont(&soundfont_path)?;

    let song = [
        (480, 60),
        (480, 62),
        (480, 64),
        (480, 62),
        (480, 64),
        (480, 59),
        (960, 60),
    ];
    let notes = song
        .iter()
        .map(|&(duration, pitch)| Note::new(duration, pitch))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    sound.set_notes(
        notes,
        Vec::new(),
        Vec::new(),
        Some(std::sync::Arc::new(|| println!("melody finished"))),
    )?;
    println!("Notes: {}", sound.letters().join(" "));

    // Three rounds; the middle one is cut short.
    for round in 0..3 {
        sound.toggle();
        let frames = if round == 1 { 60 } else { 150 };
        for _ in 0..frames {
            sound.on_update();
            std::thread::sleep(FRAME);
        }
        println!("{}\n", sound.now_str());
        if sound.is_playing() {
            sound.toggle();
        }
    }

    std::thread::sleep(Duration::from_millis(500));
    Ok(())
}
