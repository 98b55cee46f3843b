//! SoundFont file loading with a per-path cache

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rustysynth::SoundFont;

use crate::{Error, Result};

/// Loaded SoundFonts keyed by the path they were read from.
///
/// Puzzles rebuilt with the same font share one parsed copy.
#[derive(Default)]
pub struct SoundFontLibrary {
    fonts: DashMap<PathBuf, Arc<SoundFont>>,
}

impl SoundFontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a SoundFont from file or return the cached copy.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<SoundFont>> {
        let path = path.as_ref().to_path_buf();

        if let Some(font) = self.fonts.get(&path) {
            return Ok(Arc::clone(font.value()));
        }

        // Parse outside the map so a slow read never holds a shard lock.
        let font = read_soundfont(&path)?;
        tracing::debug!(path = %path.display(), "loaded soundfont");

        Ok(Arc::clone(
            self.fonts.entry(path).or_insert(font).value(),
        ))
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.fonts.contains_key(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drop every cached font. Synthesizers keep their own reference.
    pub fn clear(&self) {
        self.fonts.clear();
    }
}

/// Load `path` through the process-wide [`SoundFontLibrary`].
pub fn load_soundfont(path: impl AsRef<Path>) -> Result<Arc<SoundFont>> {
    static LIBRARY: OnceLock<SoundFontLibrary> = OnceLock::new();
    LIBRARY.get_or_init(SoundFontLibrary::new).load(path)
}

fn read_soundfont(path: &Path) -> Result<Arc<SoundFont>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let font = SoundFont::new(&mut reader).map_err(|e| {
        Error::SoundFont(format!(
            "Failed to parse SoundFont file '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(Arc::new(font))
}
