//! Signature timeline editing
//!
//! Time signature changes never reinterpret existing music. A new time signature
//! takes over a run of empty bars when one starts at the edit point; otherwise a
//! fresh bar is inserted to carry it. The signature that was in force after the
//! edited region is re-anchored so every bar outside the region keeps its effective
//! signature.

use serde::{Deserialize, Serialize};

use crate::models::{retag_barlines, Bar, Clef, PartialSignature, Song, TimeSignature};

/// Overlay entries at the two boundaries of an edited region
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureAnchors {
    pub start: Option<PartialSignature>,
    pub end: Option<PartialSignature>,
}

/// A time signature change at the boundary before `before_bar`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetTs {
    pub before_bar: usize,
    pub ts: TimeSignature,
    pub prev_ts: TimeSignature,

    // Existing music never changes time signature; a bar is added instead.
    pub bar_add_count: usize,
    pub bar_keep_count: usize,
    // Only non-zero when undoing an insertion.
    pub bar_remove_count: usize,

    /// Time signature that resumes after the edited region, if a bar follows it
    pub after: Option<TimeSignature>,

    /// Entries this edit writes
    pub anchors: SignatureAnchors,
    /// Entries this edit overwrites
    pub prev_anchors: SignatureAnchors,
}

impl SetTs {
    /// Plan a time signature change against the current song
    ///
    /// Returns `None` when `before_bar` is past the end of the part.
    pub fn plan(song: &Song, before_bar: usize, ts: TimeSignature) -> Option<SetTs> {
        let bars = song.bars();
        if before_bar > bars.len() {
            return None;
        }
        let timeline = &song.global.signatures;
        let prev_ts = timeline.effective_before(before_bar).ts;

        // Empty bars from the edit point, up to the next deliberately anchored entry.
        let mut bars_without_content = 0;
        while let Some(bar) = bars.get(before_bar + bars_without_content) {
            if !bar.is_empty()
                || (bars_without_content > 0
                    && timeline.get(before_bar + bars_without_content).is_some())
            {
                break;
            }
            bars_without_content += 1;
        }

        let (bar_add_count, bar_keep_count) = if bars_without_content == 0 {
            (1, 0)
        } else {
            (0, bars_without_content)
        };

        // Index, before the edit, of the first bar after the region.
        let resume_idx = before_bar + bar_keep_count;
        let after = (resume_idx < bars.len()).then(|| timeline.effective(resume_idx).ts);

        let prev_anchors = SignatureAnchors {
            start: timeline.get(before_bar).copied(),
            end: timeline.get(resume_idx).copied(),
        };

        let mut start = prev_anchors.start.unwrap_or_default();
        start.ts = if before_bar > 0 && ts == prev_ts { None } else { Some(ts) };

        let end = match after {
            Some(after) => {
                let mut end = prev_anchors.end.unwrap_or_default();
                end.ts = (after != ts).then_some(after);
                Some(end).filter(|entry| !entry.is_empty())
            }
            None => prev_anchors.end,
        };

        Some(SetTs {
            before_bar,
            ts,
            prev_ts,
            bar_add_count,
            bar_keep_count,
            bar_remove_count: 0,
            after,
            anchors: SignatureAnchors {
                start: Some(start).filter(|entry| !entry.is_empty()),
                end,
            },
            prev_anchors,
        })
    }

    /// Index of the end anchor once the splice has been applied
    pub fn end_idx(&self) -> usize {
        self.before_bar + self.bar_keep_count + self.bar_add_count
    }

    pub fn execute(&self, song: &mut Song) {
        let bar_count = song.bar_count();
        if self.before_bar > bar_count || self.before_bar + self.bar_remove_count > bar_count {
            log::debug!("SET_TS at bar {} ignored: out of range", self.before_bar);
            return;
        }

        let timeline = &mut song.global.signatures;
        timeline.remove_slots(self.before_bar, self.bar_remove_count);
        timeline.insert_slots(self.before_bar, self.bar_add_count);
        timeline.set(self.before_bar, self.anchors.start);
        timeline.set(self.end_idx(), self.anchors.end);

        let range = self.before_bar..self.before_bar + self.bar_remove_count;
        song.part.bars.splice(
            range,
            std::iter::repeat_with(Bar::default).take(self.bar_add_count),
        );
        retag_barlines(&mut song.part.bars);
    }

    pub fn inverse(&self) -> SetTs {
        SetTs {
            before_bar: self.before_bar,
            ts: self.prev_ts,
            prev_ts: self.ts,
            bar_add_count: self.bar_remove_count,
            bar_keep_count: self.bar_keep_count,
            bar_remove_count: self.bar_add_count,
            after: self.after,
            anchors: self.prev_anchors,
            prev_anchors: self.anchors,
        }
    }
}

/// A key signature write at the boundary before `before_bar`; `None` clears the override
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetKs {
    pub before_bar: usize,
    pub ks: Option<i32>,
    pub prev_ks: Option<i32>,
}

impl SetKs {
    pub fn plan(song: &Song, before_bar: usize, ks: i32) -> Option<SetKs> {
        if before_bar >= song.bar_count() {
            return None;
        }
        Some(SetKs {
            before_bar,
            ks: Some(ks),
            prev_ks: song.global.signatures.get(before_bar).and_then(|entry| entry.ks),
        })
    }

    pub fn execute(&self, song: &mut Song) {
        if self.before_bar >= song.bar_count() {
            return;
        }
        song.global
            .signatures
            .update(self.before_bar, |entry| entry.ks = self.ks);
    }

    pub fn inverse(&self) -> SetKs {
        SetKs {
            before_bar: self.before_bar,
            ks: self.prev_ks,
            prev_ks: self.ks,
        }
    }
}

/// A clef write at the boundary before `before_bar`; `None` clears the override
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetClef {
    pub before_bar: usize,
    pub clef: Option<Clef>,
    pub prev_clef: Option<Clef>,
}

impl SetClef {
    /// A clef equal to the one already in force before the bar is not written again
    pub fn plan(song: &Song, before_bar: usize, clef: Clef) -> Option<SetClef> {
        if before_bar >= song.bar_count() {
            return None;
        }
        let timeline = &song.global.signatures;
        let prior = timeline.effective_before(before_bar).clef;
        Some(SetClef {
            before_bar,
            clef: (before_bar == 0 || prior != clef).then_some(clef),
            prev_clef: timeline.get(before_bar).and_then(|entry| entry.clef),
        })
    }

    pub fn execute(&self, song: &mut Song) {
        if self.before_bar >= song.bar_count() {
            return;
        }
        song.global
            .signatures
            .update(self.before_bar, |entry| entry.clef = self.clef);
    }

    pub fn inverse(&self) -> SetClef {
        SetClef {
            before_bar: self.before_bar,
            clef: self.prev_clef,
            prev_clef: self.clef,
        }
    }
}
