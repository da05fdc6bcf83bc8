//! Splitting a requested duration into tied notes
//!
//! A duration that no single glyph can express is written as consecutive tied
//! notes. The decomposition itself sits behind [`NoteSplitter`] so a layout-aware
//! implementation (the renderer's `splitNote`) can stand in for [`GreedySplitter`].

use crate::models::{tied_duration, Division, Fraction, Note, NoteValue, TiedNote};

/// Decomposes a duration starting at some time in a bar into notatable divisions
///
/// Implementations must be pure: the same inputs always give the same divisions.
/// An empty result means the duration cannot be notated.
pub trait NoteSplitter {
    fn split_note(&self, bar_idx: usize, start: Fraction, duration: Fraction) -> TiedNote;
}

/// Greedy largest-power-of-two-first decomposition, at most one dot per division
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySplitter;

impl GreedySplitter {
    /// Longest note value whose undotted length fits in `remaining`
    fn largest_fitting(remaining: Fraction) -> Option<NoteValue> {
        (NoteValue::SHORTEST.log2()..=NoteValue::LONGEST.log2())
            .rev()
            .filter_map(NoteValue::new)
            .find(|value| value.count() <= remaining)
    }
}

impl NoteSplitter for GreedySplitter {
    fn split_note(&self, _bar_idx: usize, start: Fraction, duration: Fraction) -> TiedNote {
        let mut divisions = TiedNote::new();
        let mut remaining = duration;
        let mut time = start;

        while remaining.is_positive() {
            let Some(value) = Self::largest_fitting(remaining) else {
                // Not expressible in 256ths (a tuplet length, for instance)
                return TiedNote::new();
            };
            let dotted = Fraction::from_duration(value, 1);
            let (dots, length) = if value != NoteValue::SHORTEST && dotted <= remaining {
                (1, dotted)
            } else {
                (0, value.count())
            };

            divisions.push(Division::new(value, dots, time));
            time += length;
            remaining = remaining - length;
        }

        divisions
    }
}

/// Compute the tied-note decomposition of a note inserted at `start`
///
/// Returns `None` when the duration cannot be notated or when the new note would
/// intersect any note already in the bar. Exact adjacency is allowed; existing
/// notes are never split or trimmed.
pub fn split_duration_into_parts(
    splitter: &impl NoteSplitter,
    bar_idx: usize,
    bar_notes: &[Note],
    start: Fraction,
    duration: Fraction,
) -> Option<TiedNote> {
    let divisions = splitter.split_note(bar_idx, start, duration);
    if divisions.is_empty() {
        log::debug!("split rejected: {} at {} has no notatable decomposition", duration, start);
        return None;
    }

    let end = start + tied_duration(&divisions);
    if let Some(conflict) = bar_notes.iter().find(|note| note.overlaps(start, end)) {
        log::debug!(
            "split rejected: [{}, {}) overlaps note at [{}, {})",
            start,
            end,
            conflict.start_time,
            conflict.end_time()
        );
        return None;
    }

    Some(divisions)
}
