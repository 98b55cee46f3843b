//! Steps, chords and the immutable sequence snapshot the audio thread reads.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tiletone_core::Tick;
use tiletone_midi::Note;

use crate::{Error, Result};

/// Ticks between one Simon Says tile switching off and the next switching on.
pub const SIMON_SAYS_GAP: Tick = 240;

/// Game callback fired when a step starts or ends.
pub type StepCallback = Arc<dyn Fn() + Send + Sync>;

/// Game callback fired once when a play-through ends on its own.
pub type FinishedCallback = Arc<dyn Fn() + Send + Sync>;

/// Ticks after a note on at which a free-running note is released (90% of the step).
#[inline]
pub fn detached_duration(duration: Tick) -> Tick {
    (duration.saturating_mul(9) / 10).max(1)
}

/// One or more notes that start together.
///
/// A single note converts into a one-note chord, so note lists and chord
/// lists feed the sequencer the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chord(SmallVec<[Note; 4]>);

impl Chord {
    pub fn new(notes: impl IntoIterator<Item = Note>) -> Self {
        Self(notes.into_iter().collect())
    }

    pub fn notes(&self) -> &[Note] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels of every note, space separated ("C4 E4 G4").
    pub fn label(&self) -> String {
        self.0
            .iter()
            .map(Note::label)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Note> for Chord {
    fn from(note: Note) -> Self {
        Self(smallvec::smallvec![note])
    }
}

impl From<Vec<Note>> for Chord {
    fn from(notes: Vec<Note>) -> Self {
        Self(SmallVec::from_vec(notes))
    }
}

impl From<&[Note]> for Chord {
    fn from(notes: &[Note]) -> Self {
        Self(SmallVec::from_slice(notes))
    }
}

/// A timed group of pitches plus the tile callbacks bound to it.
#[derive(Clone)]
pub struct Step {
    duration: Tick,
    pitches: SmallVec<[u8; 4]>,
    on_activate: Option<StepCallback>,
    on_deactivate: Option<StepCallback>,
}

impl Step {
    /// Build the step for position `index` from a chord.
    ///
    /// The step lasts as long as the chord's first note; notes with a
    /// different duration still start together but share that length.
    pub fn from_chord(index: usize, chord: &Chord) -> Result<Self> {
        let Some(first) = chord.notes().first() else {
            return Err(Error::EmptyStep(index));
        };
        let duration = first.duration();
        if chord.notes().iter().any(|n| n.duration() != duration) {
            tracing::warn!(
                index,
                duration,
                "chord mixes note durations, using the first note's"
            );
        }

        Ok(Self {
            duration,
            pitches: chord.notes().iter().map(Note::pitch).collect(),
            on_activate: None,
            on_deactivate: None,
        })
    }

    pub fn with_on_activate(mut self, callback: Option<StepCallback>) -> Self {
        self.on_activate = callback;
        self
    }

    pub fn with_on_deactivate(mut self, callback: Option<StepCallback>) -> Self {
        self.on_deactivate = callback;
        self
    }

    #[inline]
    pub fn duration(&self) -> Tick {
        self.duration
    }

    /// All pitches, rests included.
    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    /// Pitches that actually sound.
    pub fn sounding(&self) -> impl Iterator<Item = u8> + '_ {
        self.pitches.iter().copied().filter(|&p| p != tiletone_midi::REST)
    }

    pub fn is_rest(&self) -> bool {
        self.sounding().next().is_none()
    }

    pub fn on_activate(&self) -> Option<&StepCallback> {
        self.on_activate.as_ref()
    }

    pub fn on_deactivate(&self) -> Option<&StepCallback> {
        self.on_deactivate.as_ref()
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("duration", &self.duration)
            .field("pitches", &self.pitches)
            .field("on_activate", &self.on_activate.is_some())
            .field("on_deactivate", &self.on_deactivate.is_some())
            .finish()
    }
}

/// Everything one play-through needs, swapped in as a whole.
#[derive(Clone, Default)]
pub struct Sequence {
    steps: Vec<Step>,
    on_finished: Option<FinishedCallback>,
}

impl Sequence {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            on_finished: None,
        }
    }

    /// Build steps from chords, pairing step `i` with `cb_ons[i]` and `cb_offs[i]`.
    ///
    /// Callback lists may be shorter than `chords`; missing entries mean no callback.
    pub fn from_chords(
        chords: &[Chord],
        cb_ons: &[StepCallback],
        cb_offs: &[StepCallback],
        on_finished: Option<FinishedCallback>,
    ) -> Result<Self> {
        let steps = chords
            .iter()
            .enumerate()
            .map(|(i, chord)| {
                Ok(Step::from_chord(i, chord)?
                    .with_on_activate(cb_ons.get(i).cloned())
                    .with_on_deactivate(cb_offs.get(i).cloned()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps, on_finished })
    }

    pub fn with_on_finished(mut self, callback: Option<FinishedCallback>) -> Self {
        self.on_finished = callback;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[inline]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total length of one play-through in ticks.
    pub fn total_ticks(&self) -> Tick {
        self.steps.iter().map(Step::duration).sum()
    }

    pub(crate) fn notify_finished(&self) {
        if let Some(callback) = &self.on_finished {
            callback();
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("steps", &self.steps)
            .field("on_finished", &self.on_finished.is_some())
            .finish()
    }
}
