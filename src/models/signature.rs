//! Time signatures, key signatures, clefs and the sparse signature timeline
//!
//! A signature entry is anchored at a bar boundary and applies from that bar onward
//! until the next entry. Index 0 is always fully populated; later entries are
//! partial overrides, resolved independently per field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fraction::Fraction;

/// A time signature as written (not reduced: 6/8 is not 3/4)
///
/// Serialized as the JSON pair `[num, den]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct TimeSignature {
    pub num: u32,
    pub den: u32,
}

impl TimeSignature {
    pub const COMMON: TimeSignature = TimeSignature { num: 4, den: 4 };

    pub fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Length of a full bar in whole notes
    pub fn bar_length(&self) -> Fraction {
        Fraction::new(i64::from(self.num), i64::from(self.den.max(1)))
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

impl From<(u32, u32)> for TimeSignature {
    fn from((num, den): (u32, u32)) -> Self {
        Self { num, den }
    }
}

impl From<TimeSignature> for (u32, u32) {
    fn from(ts: TimeSignature) -> Self {
        (ts.num, ts.den)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Clef {
    #[default]
    #[serde(rename = "g", alias = "treble")]
    Treble,
    #[serde(rename = "f", alias = "bass")]
    Bass,
    #[serde(rename = "percussion")]
    Percussion,
}

/// A fully populated signature (the effective value at some bar)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    pub ts: TimeSignature,
    /// Circle-of-fifths count: positive for sharps, negative for flats
    pub ks: i32,
    pub clef: Clef,
}

/// An override anchored at a bar boundary; absent fields are inherited
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartialSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<TimeSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ks: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clef: Option<Clef>,
}

impl PartialSignature {
    pub fn is_empty(&self) -> bool {
        self.ts.is_none() && self.ks.is_none() && self.clef.is_none()
    }

    /// Fields of `other` win where present
    pub fn merged_with(&self, other: &PartialSignature) -> PartialSignature {
        PartialSignature {
            ts: other.ts.or(self.ts),
            ks: other.ks.or(self.ks),
            clef: other.clef.or(self.clef),
        }
    }

    /// Fill absent fields from a full signature
    pub fn complete(&self, defaults: &Signature) -> Signature {
        Signature {
            ts: self.ts.unwrap_or(defaults.ts),
            ks: self.ks.unwrap_or(defaults.ks),
            clef: self.clef.unwrap_or(defaults.clef),
        }
    }
}

impl From<Signature> for PartialSignature {
    fn from(sig: Signature) -> Self {
        PartialSignature {
            ts: Some(sig.ts),
            ks: Some(sig.ks),
            clef: Some(sig.clef),
        }
    }
}

/// Sparse overlay of signature entries keyed by bar index
///
/// Empty entries are never stored, and the entry at index 0 is always complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureTimeline {
    entries: BTreeMap<usize, PartialSignature>,
}

impl SignatureTimeline {
    pub fn new(first: Signature) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(0, PartialSignature::from(first));
        Self { entries }
    }

    /// Build from raw entries, completing index 0 from `defaults` and dropping empty entries
    pub fn from_entries(
        entries: impl IntoIterator<Item = (usize, PartialSignature)>,
        defaults: &Signature,
    ) -> Self {
        let mut entries: BTreeMap<usize, PartialSignature> = entries
            .into_iter()
            .filter(|(_, entry)| !entry.is_empty())
            .collect();
        let first = entries.get(&0).copied().unwrap_or_default().complete(defaults);
        entries.insert(0, PartialSignature::from(first));
        Self { entries }
    }

    pub fn get(&self, idx: usize) -> Option<&PartialSignature> {
        self.entries.get(&idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PartialSignature)> {
        self.entries.iter().map(|(idx, entry)| (*idx, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest anchored index
    pub fn last_index(&self) -> usize {
        self.entries.keys().next_back().copied().unwrap_or(0)
    }

    /// Replace the entry at `idx`; `None` or an empty entry removes it.
    ///
    /// Index 0 can only be replaced by a value that completes it; its fields never
    /// become undefined.
    pub fn set(&mut self, idx: usize, entry: Option<PartialSignature>) {
        match entry {
            Some(entry) if idx == 0 => {
                let first = self.first();
                self.entries.insert(0, PartialSignature::from(entry.complete(&first)));
            }
            Some(entry) if !entry.is_empty() => {
                self.entries.insert(idx, entry);
            }
            _ if idx == 0 => {
                let first = self.first();
                self.entries.insert(0, PartialSignature::from(first));
            }
            _ => {
                self.entries.remove(&idx);
            }
        }
    }

    /// Apply `edit` to the entry at `idx` (an empty entry when absent)
    pub fn update(&mut self, idx: usize, edit: impl FnOnce(&mut PartialSignature)) {
        let mut entry = self.get(idx).copied().unwrap_or_default();
        edit(&mut entry);
        self.set(idx, Some(entry));
    }

    /// The complete signature at index 0
    pub fn first(&self) -> Signature {
        self.entries
            .get(&0)
            .copied()
            .unwrap_or_default()
            .complete(&Signature::default())
    }

    /// Effective signature at bar `idx`, resolved per field from the nearest preceding entries
    pub fn effective(&self, idx: usize) -> Signature {
        let mut resolved = PartialSignature::default();
        for (_, entry) in self.entries.range(..=idx).rev() {
            resolved = entry.merged_with(&resolved);
            if resolved.ts.is_some() && resolved.ks.is_some() && resolved.clef.is_some() {
                break;
            }
        }
        resolved.complete(&Signature::default())
    }

    /// Effective signature in force immediately before bar `idx`
    ///
    /// For bar 0 this is the entry at index 0.
    pub fn effective_before(&self, idx: usize) -> Signature {
        self.effective(idx.saturating_sub(1))
    }

    /// Open `count` empty slots at `at`: entries at or after `at` move up by `count`
    pub fn insert_slots(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let moved = self.entries.split_off(&at);
        self.entries
            .extend(moved.into_iter().map(|(idx, entry)| (idx + count, entry)));
    }

    /// Drop the slots `[at, at + count)` and close the gap: later entries move down by `count`
    ///
    /// Returns the dropped entries, keyed by their old index.
    pub fn remove_slots(&mut self, at: usize, count: usize) -> BTreeMap<usize, PartialSignature> {
        if count == 0 {
            return BTreeMap::new();
        }
        let mut tail = self.entries.split_off(&at);
        let after = tail.split_off(&(at + count));
        self.entries
            .extend(after.into_iter().map(|(idx, entry)| (idx - count, entry)));
        tail
    }

    /// Remove and return every entry at or after `from` (index 0 is kept)
    pub fn truncate(&mut self, from: usize) -> BTreeMap<usize, PartialSignature> {
        self.entries.split_off(&from.max(1))
    }
}

impl Default for SignatureTimeline {
    fn default() -> Self {
        Self::new(Signature::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts_only(num: u32, den: u32) -> PartialSignature {
        PartialSignature { ts: Some(TimeSignature::new(num, den)), ..Default::default() }
    }

    #[test]
    fn test_effective_resolves_fields_independently() {
        let mut timeline = SignatureTimeline::default();
        timeline.set(2, Some(ts_only(3, 4)));
        timeline.set(4, Some(PartialSignature { ks: Some(-2), ..Default::default() }));

        let at5 = timeline.effective(5);
        assert_eq!(at5.ts, TimeSignature::new(3, 4));
        assert_eq!(at5.ks, -2);
        assert_eq!(at5.clef, Clef::Treble);

        assert_eq!(timeline.effective(1).ts, TimeSignature::COMMON);
        assert_eq!(timeline.effective_before(2).ts, TimeSignature::COMMON);
        assert_eq!(timeline.effective_before(0).ts, TimeSignature::COMMON);
    }

    #[test]
    fn test_set_never_clears_index_zero() {
        let mut timeline = SignatureTimeline::default();
        timeline.set(0, None);
        timeline.set(0, Some(PartialSignature { ks: Some(3), ..Default::default() }));

        let first = timeline.first();
        assert_eq!(first.ks, 3);
        assert_eq!(first.ts, TimeSignature::COMMON);
    }

    #[test]
    fn test_empty_entries_are_not_stored() {
        let mut timeline = SignatureTimeline::default();
        timeline.set(3, Some(PartialSignature::default()));
        assert_eq!(timeline.len(), 1);

        timeline.set(3, Some(ts_only(5, 8)));
        timeline.update(3, |entry| entry.ts = None);
        assert!(timeline.get(3).is_none());
    }

    #[test]
    fn test_insert_and_remove_slots_shift_keys() {
        let mut timeline = SignatureTimeline::default();
        timeline.set(2, Some(ts_only(3, 4)));
        timeline.set(5, Some(ts_only(6, 8)));

        timeline.insert_slots(2, 2);
        assert!(timeline.get(2).is_none());
        assert_eq!(timeline.get(4), Some(&ts_only(3, 4)));
        assert_eq!(timeline.get(7), Some(&ts_only(6, 8)));

        let dropped = timeline.remove_slots(1, 3);
        assert!(dropped.is_empty());
        assert_eq!(timeline.get(1), Some(&ts_only(3, 4)));
        assert_eq!(timeline.get(4), Some(&ts_only(6, 8)));
    }

    #[test]
    fn test_truncate_keeps_index_zero() {
        let mut timeline = SignatureTimeline::default();
        timeline.set(3, Some(ts_only(3, 4)));

        let dropped = timeline.truncate(0);
        assert_eq!(dropped.len(), 1);
        assert_eq!(timeline.len(), 1);
        assert!(timeline.get(0).is_some());
    }
}
