//! Bar insertion, removal and bar-count changes
//!
//! Bars and the signature timeline are spliced together. Each action carries the
//! overlay entries around the edit point so its inverse restores them verbatim.

use serde::{Deserialize, Serialize};

use crate::models::{retag_barlines, Bar, PartialSignature, Song};

/// Insert `bar` at `bar_idx`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddBar {
    pub bar_idx: usize,
    pub bar: Bar,
    /// Entry anchored at the inserted bar
    pub signature: Option<PartialSignature>,
    /// Entry anchored at the bar that follows it
    pub next_signature: Option<PartialSignature>,
}

impl AddBar {
    /// The inserted bar inherits whatever is in force before it; the displaced bar keeps
    /// its own entry. Inserting at 0 copies the first entry so index 0 stays complete.
    pub fn plan(song: &Song, bar_idx: usize, bar: Bar) -> Option<AddBar> {
        if bar_idx > song.bar_count() {
            return None;
        }
        let timeline = &song.global.signatures;
        Some(AddBar {
            bar_idx,
            bar,
            signature: if bar_idx == 0 { timeline.get(0).copied() } else { None },
            next_signature: timeline.get(bar_idx).copied(),
        })
    }

    pub fn execute(&self, song: &mut Song) {
        if self.bar_idx > song.bar_count() {
            log::debug!("ADD_BAR at {} ignored: out of range", self.bar_idx);
            return;
        }
        let timeline = &mut song.global.signatures;
        let first = timeline.first();
        timeline.insert_slots(self.bar_idx, 1);
        let signature = match self.signature {
            None if self.bar_idx == 0 => Some(first.into()),
            signature => signature,
        };
        timeline.set(self.bar_idx, signature);
        timeline.set(self.bar_idx + 1, self.next_signature);

        song.part.bars.insert(self.bar_idx, self.bar.clone());
        retag_barlines(&mut song.part.bars);
    }

    pub fn inverse(&self) -> RemoveBar {
        RemoveBar {
            bar_idx: self.bar_idx,
            bar: self.bar.clone(),
            signature: self.signature,
            next_signature: self.next_signature,
        }
    }
}

/// Remove the bar at `bar_idx`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBar {
    pub bar_idx: usize,
    pub bar: Bar,
    pub signature: Option<PartialSignature>,
    pub next_signature: Option<PartialSignature>,
}

impl RemoveBar {
    /// `None` when the bar does not exist or is the only bar
    pub fn plan(song: &Song, bar_idx: usize) -> Option<RemoveBar> {
        let bar = song.bar(bar_idx)?;
        if song.bar_count() < 2 {
            return None;
        }
        let timeline = &song.global.signatures;
        Some(RemoveBar {
            bar_idx,
            bar: bar.clone(),
            signature: timeline.get(bar_idx).copied(),
            next_signature: timeline.get(bar_idx + 1).copied(),
        })
    }

    /// The removed bar's entry folds into the following bar's entry, so the bar that
    /// takes its index keeps its effective signature.
    pub fn execute(&self, song: &mut Song) {
        if self.bar_idx >= song.bar_count() || song.bar_count() < 2 {
            log::debug!("REMOVE_BAR at {} ignored: out of range", self.bar_idx);
            return;
        }
        song.part.bars.remove(self.bar_idx);

        let timeline = &mut song.global.signatures;
        timeline.remove_slots(self.bar_idx, 1);
        let folded = if self.bar_idx < song.part.bars.len() {
            match (self.signature, self.next_signature) {
                (Some(own), Some(next)) => Some(own.merged_with(&next)),
                (own, next) => next.or(own),
            }
        } else {
            self.next_signature
        };
        timeline.set(self.bar_idx, folded);

        retag_barlines(&mut song.part.bars);
    }

    pub fn inverse(&self) -> AddBar {
        AddBar {
            bar_idx: self.bar_idx,
            bar: self.bar.clone(),
            signature: self.signature,
            next_signature: self.next_signature,
        }
    }
}

/// Grow or shrink the part to `count` bars
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetBarCount {
    pub count: usize,
    pub prev_count: usize,
    /// Overlay entries anchored at or beyond the smaller of the two counts
    #[serde(default)]
    pub signatures: Vec<(usize, PartialSignature)>,
}

impl SetBarCount {
    /// Bars holding notes are never dropped: a target below one past the last
    /// non-empty bar (or zero) is rejected, as is a target equal to the current count.
    pub fn plan(song: &Song, count: usize) -> Option<SetBarCount> {
        let prev_count = song.bar_count();
        let floor = song.part.content_len().max(1);
        if count < floor || count == prev_count {
            return None;
        }
        let boundary = count.min(prev_count);
        Some(SetBarCount {
            count,
            prev_count,
            signatures: song
                .global
                .signatures
                .iter()
                .filter(|(idx, _)| *idx >= boundary && *idx > 0)
                .map(|(idx, entry)| (idx, *entry))
                .collect(),
        })
    }

    pub fn execute(&self, song: &mut Song) {
        if self.count == 0 {
            return;
        }
        let shrinking = self.count < song.bar_count();
        song.part.bars.resize_with(self.count, Bar::default);

        let timeline = &mut song.global.signatures;
        if shrinking {
            timeline.truncate(self.count);
        } else {
            for (idx, entry) in &self.signatures {
                timeline.set(*idx, Some(*entry));
            }
        }
        retag_barlines(&mut song.part.bars);
    }

    pub fn inverse(&self) -> SetBarCount {
        SetBarCount {
            count: self.prev_count,
            prev_count: self.count,
            signatures: self.signatures.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{barlines_are_consistent, Clef, Division, Fraction, Note, NoteValue, Pitch, Signature, TimeSignature};

    fn entry(num: u32, den: u32) -> PartialSignature {
        PartialSignature { ts: Some(TimeSignature::new(num, den)), ..Default::default() }
    }

    fn song_with_overrides() -> Song {
        let mut song = Song::new(6, Signature::default());
        song.global.signatures.set(2, Some(entry(3, 4)));
        song.global.signatures.set(3, Some(PartialSignature { clef: Some(Clef::Bass), ..Default::default() }));
        song.global.signatures.set(5, Some(entry(6, 8)));
        song
    }

    fn effective(song: &Song) -> Vec<Signature> {
        (0..song.bar_count()).map(|idx| song.effective_signature(idx)).collect()
    }

    #[test]
    fn test_add_bar_preserves_effective_signatures_of_existing_bars() {
        for idx in 0..=6 {
            let mut song = song_with_overrides();
            let before = effective(&song);

            AddBar::plan(&song, idx, Bar::default()).unwrap().execute(&mut song);
            let after = effective(&song);

            assert_eq!(song.bar_count(), 7);
            assert!(barlines_are_consistent(song.bars()));
            assert_eq!(after[..idx], before[..idx], "insert at {}", idx);
            assert_eq!(after[idx + 1..], before[idx..], "insert at {}", idx);
        }
    }

    #[test]
    fn test_remove_bar_preserves_effective_signatures_of_remaining_bars() {
        for idx in 0..6 {
            let mut song = song_with_overrides();
            let before = effective(&song);

            RemoveBar::plan(&song, idx).unwrap().execute(&mut song);
            let after = effective(&song);

            assert_eq!(song.bar_count(), 5);
            assert!(barlines_are_consistent(song.bars()));
            assert_eq!(after[..idx], before[..idx], "remove at {}", idx);
            assert_eq!(after[idx..], before[idx + 1..], "remove at {}", idx);
        }
    }

    #[test]
    fn test_remove_bar_zero_merges_into_new_first() {
        let mut song = song_with_overrides();
        song.global.signatures.set(1, Some(PartialSignature { ks: Some(4), ..Default::default() }));

        RemoveBar::plan(&song, 0).unwrap().execute(&mut song);
        let first = song.global.signatures.first();
        assert_eq!(first.ks, 4);
        assert_eq!(first.ts, TimeSignature::COMMON);
        assert_eq!(first.clef, Clef::Treble);
    }

    #[test]
    fn test_add_and_remove_are_exact_inverses() {
        for idx in 0..6 {
            let mut song = song_with_overrides();
            let original = song.clone();
            let add = AddBar::plan(&song, idx, Bar::default()).unwrap();
            add.execute(&mut song);
            add.inverse().execute(&mut song);
            assert_eq!(song, original, "add at {}", idx);

            let remove = RemoveBar::plan(&song, idx).unwrap();
            remove.execute(&mut song);
            remove.inverse().execute(&mut song);
            assert_eq!(song, original, "remove at {}", idx);
        }
    }

    #[test]
    fn test_remove_only_bar_is_rejected() {
        let song = Song::new(1, Signature::default());
        assert!(RemoveBar::plan(&song, 0).is_none());
        assert!(RemoveBar::plan(&Song::default(), 9).is_none());
    }

    #[test]
    fn test_set_bar_count_respects_content_floor() {
        let mut song = Song::default();
        let start = Fraction::zero();
        song.part.bars[4].insert_note(Note::new(start, vec![Division::new(NoteValue::Quarter, 0, start)], Pitch::C4));

        assert!(SetBarCount::plan(&song, 4).is_none());
        assert!(SetBarCount::plan(&song, 0).is_none());
        assert!(SetBarCount::plan(&song, 9).is_none());

        let shrink = SetBarCount::plan(&song, 5).unwrap();
        shrink.execute(&mut song);
        assert_eq!(song.bar_count(), 5);
        assert!(barlines_are_consistent(song.bars()));
    }

    #[test]
    fn test_set_bar_count_inverse_restores_dropped_entries() {
        let mut song = song_with_overrides();
        let original = song.clone();

        let shrink = SetBarCount::plan(&song, 3).unwrap();
        assert_eq!(shrink.signatures.len(), 2);
        shrink.execute(&mut song);
        assert!(song.global.signatures.get(5).is_none());

        shrink.inverse().execute(&mut song);
        assert_eq!(song, original);

        let grow = SetBarCount::plan(&song, 12).unwrap();
        grow.execute(&mut song);
        assert_eq!(song.bar_count(), 12);
        grow.inverse().execute(&mut song);
        assert_eq!(song, original);
    }
}
