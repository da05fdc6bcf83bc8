//! Core document model: Song, Part, Bar and Note
//!
//! A Song owns one Part of Bars; each Bar exclusively owns its Notes. Only the
//! reducer mutates a Song; everything else reads it.

use serde::{Deserialize, Serialize};

use super::barlines::{retag_barlines, Barline};
use super::duration::{tied_duration, TiedNote};
use super::fraction::Fraction;
use super::pitch::Pitch;
use super::serde_helpers::serialize_option_as_null;
use super::signature::{Signature, SignatureTimeline};

/// Schema version written by this crate
pub const CURRENT_VERSION: u32 = 2;

/// Bar count of a fresh document
pub const DEFAULT_BAR_COUNT: usize = 9;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub start_time: Fraction,
    pub divisions: TiedNote,
    #[serde(default)]
    pub pitch: Pitch,
}

impl Note {
    pub fn new(start_time: Fraction, divisions: TiedNote, pitch: Pitch) -> Self {
        Self { start_time, divisions, pitch }
    }

    pub fn duration(&self) -> Fraction {
        tied_duration(&self.divisions)
    }

    /// Exclusive end of the occupied range `[start_time, end_time)`
    pub fn end_time(&self) -> Fraction {
        self.start_time + self.duration()
    }

    /// Whether the half-open ranges of the two spans intersect
    pub fn overlaps(&self, start: Fraction, end: Fraction) -> bool {
        start < self.end_time() && self.start_time < end
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bar {
    #[serde(default)]
    pub barline: Barline,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Bar {
    pub fn new(barline: Barline) -> Self {
        Self { barline, notes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note_at(&self, start_time: Fraction) -> Option<&Note> {
        self.notes.iter().find(|note| note.start_time == start_time)
    }

    /// Insert keeping notes ordered by start time
    pub fn insert_note(&mut self, note: Note) {
        let idx = self
            .notes
            .partition_point(|existing| existing.start_time < note.start_time);
        self.notes.insert(idx, note);
    }

    /// Remove every note starting at `start_time`; returns whether one was removed
    pub fn remove_note_at(&mut self, start_time: Fraction) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.start_time != start_time);
        self.notes.len() != before
    }

    /// Whether any two notes occupy intersecting ranges
    pub fn has_overlaps(&self) -> bool {
        let mut sorted: Vec<&Note> = self.notes.iter().collect();
        sorted.sort_by_key(|note| note.start_time);
        sorted
            .windows(2)
            .any(|pair| pair[0].end_time() > pair[1].start_time)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Part {
    pub bars: Vec<Bar>,
}

impl Part {
    /// `count` empty bars, the last one final
    pub fn with_empty_bars(count: usize) -> Self {
        let mut bars = vec![Bar::default(); count.max(1)];
        retag_barlines(&mut bars);
        Self { bars }
    }

    /// Index one past the last bar that holds notes
    pub fn content_len(&self) -> usize {
        self.bars
            .iter()
            .rposition(|bar| !bar.is_empty())
            .map_or(0, |idx| idx + 1)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Global {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub signatures: SignatureTimeline,
    /// How much shorter than the nominal time signature the first bar is
    #[serde(default, serialize_with = "serialize_option_as_null")]
    pub pickup_skip: Option<Fraction>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Song {
    pub version: u32,
    pub global: Global,
    pub part: Part,
}

impl Song {
    /// A fresh document with `bar_count` empty bars under `signature`
    pub fn new(bar_count: usize, signature: Signature) -> Self {
        Self {
            version: CURRENT_VERSION,
            global: Global {
                title: String::new(),
                author: String::new(),
                signatures: SignatureTimeline::new(signature),
                pickup_skip: None,
            },
            part: Part::with_empty_bars(bar_count),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.part.bars
    }

    pub fn bar(&self, idx: usize) -> Option<&Bar> {
        self.part.bars.get(idx)
    }

    pub fn bar_count(&self) -> usize {
        self.part.bars.len()
    }

    pub fn effective_signature(&self, bar_idx: usize) -> Signature {
        self.global.signatures.effective(bar_idx)
    }

    /// Length of bar `bar_idx` in whole notes; bar 0 is shortened by the pickup skip
    pub fn bar_capacity(&self, bar_idx: usize) -> Fraction {
        let full = self.effective_signature(bar_idx).ts.bar_length();
        match self.global.pickup_skip {
            Some(skip) if bar_idx == 0 && skip < full => full - skip,
            _ => full,
        }
    }
}

impl Default for Song {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_COUNT, Signature::default())
    }
}
