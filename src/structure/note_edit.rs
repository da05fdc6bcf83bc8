//! Note insertion, removal and pitch changes
//!
//! Notes are identified by their bar and start time. Every mutation guards on the
//! bar existing and is a silent no-op otherwise.

use serde::{Deserialize, Serialize};

use crate::models::{Fraction, Note, Pitch, Song, TiedNote};

use super::duration_split::{split_duration_into_parts, NoteSplitter};

/// The payload shared by note insertion and removal
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteEdit {
    pub bar_idx: usize,
    pub start_time: Fraction,
    pub divisions: TiedNote,
    pub pitch: Pitch,
}

impl NoteEdit {
    /// Split `duration` against the bar's notes; `None` on rejection or a missing bar
    pub fn plan_insert(
        song: &Song,
        splitter: &impl NoteSplitter,
        bar_idx: usize,
        start_time: Fraction,
        duration: Fraction,
        pitch: Pitch,
    ) -> Option<NoteEdit> {
        let bar = song.bar(bar_idx)?;
        let divisions = split_duration_into_parts(splitter, bar_idx, &bar.notes, start_time, duration)?;
        Some(NoteEdit { bar_idx, start_time, divisions, pitch })
    }

    /// Capture the note starting at `start_time` so it can be re-inserted
    pub fn plan_remove(song: &Song, bar_idx: usize, start_time: Fraction) -> Option<NoteEdit> {
        let note = song.bar(bar_idx)?.note_at(start_time)?;
        Some(NoteEdit {
            bar_idx,
            start_time,
            divisions: note.divisions.clone(),
            pitch: note.pitch,
        })
    }

    pub fn end_time(&self) -> Fraction {
        self.start_time + crate::models::tied_duration(&self.divisions)
    }

    pub fn insert(&self, song: &mut Song) {
        let Some(bar) = song.part.bars.get_mut(self.bar_idx) else {
            log::debug!("ADD_NOTE ignored: no bar {}", self.bar_idx);
            return;
        };
        bar.insert_note(Note::new(self.start_time, self.divisions.clone(), self.pitch));
    }

    /// Matches on start time only
    pub fn remove(&self, song: &mut Song) {
        let Some(bar) = song.part.bars.get_mut(self.bar_idx) else {
            log::debug!("REMOVE_NOTE ignored: no bar {}", self.bar_idx);
            return;
        };
        if !bar.remove_note_at(self.start_time) {
            log::debug!(
                "REMOVE_NOTE ignored: no note at {} in bar {}",
                self.start_time,
                self.bar_idx
            );
        }
    }
}

/// Re-pitch the note starting at `start_time`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotePitch {
    pub bar_idx: usize,
    pub start_time: Fraction,
    pub pitch_before: Pitch,
    pub pitch_after: Pitch,
}

impl ChangeNotePitch {
    pub fn plan(song: &Song, bar_idx: usize, start_time: Fraction, pitch: Pitch) -> Option<ChangeNotePitch> {
        let note = song.bar(bar_idx)?.note_at(start_time)?;
        Some(ChangeNotePitch {
            bar_idx,
            start_time,
            pitch_before: note.pitch,
            pitch_after: pitch,
        })
    }

    pub fn execute(&self, song: &mut Song) {
        let note = song
            .part
            .bars
            .get_mut(self.bar_idx)
            .and_then(|bar| bar.notes.iter_mut().find(|note| note.start_time == self.start_time));
        if let Some(note) = note {
            note.pitch = self.pitch_after;
        }
    }

    pub fn inverse(&self) -> ChangeNotePitch {
        ChangeNotePitch {
            bar_idx: self.bar_idx,
            start_time: self.start_time,
            pitch_before: self.pitch_after,
            pitch_after: self.pitch_before,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::GreedySplitter;

    #[test]
    fn test_plan_insert_rejects_missing_bar_and_overlap() {
        let mut song = Song::default();
        assert!(NoteEdit::plan_insert(&song, &GreedySplitter, 42, Fraction::zero(), Fraction::new(1, 4), Pitch::C4).is_none());

        let first = NoteEdit::plan_insert(&song, &GreedySplitter, 0, Fraction::zero(), Fraction::new(1, 4), Pitch::C4).unwrap();
        first.insert(&mut song);
        assert!(NoteEdit::plan_insert(&song, &GreedySplitter, 0, Fraction::new(1, 8), Fraction::new(1, 4), Pitch::C4).is_none());
    }

    #[test]
    fn test_remove_matches_start_time_only() {
        let mut song = Song::default();
        let edit = NoteEdit::plan_insert(&song, &GreedySplitter, 1, Fraction::new(1, 2), Fraction::new(1, 8), Pitch::new(64, 0)).unwrap();
        edit.insert(&mut song);

        let stale = NoteEdit { pitch: Pitch::new(10, 1), divisions: vec![], ..edit.clone() };
        stale.remove(&mut song);
        assert!(song.bars()[1].is_empty());

        // Removing again, or from a missing bar, does nothing
        stale.remove(&mut song);
        NoteEdit { bar_idx: 99, ..edit }.remove(&mut song);
        assert_eq!(song, Song::default());
    }

    #[test]
    fn test_change_pitch_and_inverse() {
        let mut song = Song::default();
        NoteEdit::plan_insert(&song, &GreedySplitter, 0, Fraction::zero(), Fraction::new(1, 2), Pitch::C4)
            .unwrap()
            .insert(&mut song);

        let change = ChangeNotePitch::plan(&song, 0, Fraction::zero(), Pitch::new(67, 0)).unwrap();
        change.execute(&mut song);
        assert_eq!(song.bars()[0].notes[0].pitch, Pitch::new(67, 0));

        change.inverse().execute(&mut song);
        assert_eq!(song.bars()[0].notes[0].pitch, Pitch::C4);
        assert!(ChangeNotePitch::plan(&song, 0, Fraction::new(1, 2), Pitch::C4).is_none());
    }
}
