//! Actions and their constructors
//!
//! An `Action` is either an invertible edit or a control message. Constructors read the
//! current state and capture every "before" value the edit needs, returning `None` when
//! the intent is rejected (missing bar, overlapping note, out-of-range boundary).

use serde::{Deserialize, Serialize};

use crate::models::{Bar, Clef, DocumentState, Fraction, Pitch, Song, TiedNote, TimeSignature};
use crate::structure::{
    AddBar, ChangeNotePitch, NoteEdit, NoteSplitter, RemoveBar, SetBarCount, SetClef, SetKs, SetTs,
};
use crate::undo::Invertible;

/// Messages that act on the history or the session rather than on the song
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Control {
    Undo,
    Redo,
    Reset,
    Load { song: Song },
    #[serde(rename_all = "camelCase")]
    MoveCursor { bar_idx: usize, time: Fraction },
}

/// Everything the reducer accepts
///
/// Both halves are tagged by `"type"`, so `{"type": "UNDO"}` and
/// `{"type": "SET_TITLE", ...}` deserialize into the same enum.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Action {
    Edit(Invertible),
    Control(Control),
}

impl Action {
    /// The `"type"` tag, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Edit(edit) => match edit {
                Invertible::AddNote(_) => "ADD_NOTE",
                Invertible::RemoveNote(_) => "REMOVE_NOTE",
                Invertible::ChangeNotePitch(_) => "CHANGE_NOTE_PITCH",
                Invertible::SetTs(_) => "SET_TS",
                Invertible::SetKs(_) => "SET_KS",
                Invertible::SetClef(_) => "SET_CLEF",
                Invertible::AddBar(_) => "ADD_BAR",
                Invertible::RemoveBar(_) => "REMOVE_BAR",
                Invertible::SetBarCount(_) => "SET_BAR_COUNT",
                Invertible::SetTitle { .. } => "SET_TITLE",
                Invertible::SetAuthor { .. } => "SET_AUTHOR",
                Invertible::SetPickup { .. } => "SET_PICKUP",
            },
            Action::Control(control) => match control {
                Control::Undo => "UNDO",
                Control::Redo => "REDO",
                Control::Reset => "RESET",
                Control::Load { .. } => "LOAD",
                Control::MoveCursor { .. } => "MOVE_CURSOR",
            },
        }
    }
}

impl From<Invertible> for Action {
    fn from(edit: Invertible) -> Self {
        Action::Edit(edit)
    }
}

impl From<Control> for Action {
    fn from(control: Control) -> Self {
        Action::Control(control)
    }
}

/// Insert a note of `duration` at `start_time`, split into tied divisions by `splitter`
pub fn add_note(
    state: &DocumentState,
    splitter: &impl NoteSplitter,
    bar_idx: usize,
    start_time: Fraction,
    duration: Fraction,
    pitch: Pitch,
) -> Option<Action> {
    let edit = NoteEdit::plan_insert(&state.song, splitter, bar_idx, start_time, duration, pitch);
    if edit.is_none() {
        log::debug!("ADD_NOTE rejected: bar {} at {} for {}", bar_idx, start_time, duration);
    }
    edit.map(|edit| Invertible::AddNote(edit).into())
}

/// Insert a note whose divisions were already computed
pub fn add_note_divisions(bar_idx: usize, start_time: Fraction, divisions: TiedNote, pitch: Pitch) -> Action {
    Invertible::AddNote(NoteEdit { bar_idx, start_time, divisions, pitch }).into()
}

pub fn remove_note(state: &DocumentState, bar_idx: usize, start_time: Fraction) -> Option<Action> {
    NoteEdit::plan_remove(&state.song, bar_idx, start_time).map(|edit| Invertible::RemoveNote(edit).into())
}

pub fn change_note_pitch(state: &DocumentState, bar_idx: usize, start_time: Fraction, pitch: Pitch) -> Option<Action> {
    ChangeNotePitch::plan(&state.song, bar_idx, start_time, pitch)
        .map(|change| Invertible::ChangeNotePitch(change).into())
}

/// Change the time signature from the boundary before `before_bar` onward
pub fn set_ts(state: &DocumentState, before_bar: usize, ts: TimeSignature) -> Option<Action> {
    SetTs::plan(&state.song, before_bar, ts).map(|set_ts| Invertible::SetTs(set_ts).into())
}

/// Write (`Some`) or clear (`None`) the key signature at `before_bar`
///
/// Bar 0 always carries a key signature, so clearing it is rejected.
pub fn set_ks(state: &DocumentState, before_bar: usize, ks: Option<i32>) -> Option<Action> {
    let set_ks = match ks {
        Some(ks) => SetKs::plan(&state.song, before_bar, ks)?,
        None => {
            if before_bar == 0 || before_bar >= state.song.bar_count() {
                return None;
            }
            SetKs {
                before_bar,
                ks: None,
                prev_ks: state.song.global.signatures.get(before_bar).and_then(|entry| entry.ks),
            }
        }
    };
    Some(Invertible::SetKs(set_ks).into())
}

/// Write (`Some`) or clear (`None`) the clef at `before_bar`
pub fn set_clef(state: &DocumentState, before_bar: usize, clef: Option<Clef>) -> Option<Action> {
    let set_clef = match clef {
        Some(clef) => SetClef::plan(&state.song, before_bar, clef)?,
        None => {
            if before_bar == 0 || before_bar >= state.song.bar_count() {
                return None;
            }
            SetClef {
                before_bar,
                clef: None,
                prev_clef: state.song.global.signatures.get(before_bar).and_then(|entry| entry.clef),
            }
        }
    };
    Some(Invertible::SetClef(set_clef).into())
}

pub fn add_bar(state: &DocumentState, bar_idx: usize, bar: Bar) -> Option<Action> {
    AddBar::plan(&state.song, bar_idx, bar).map(|add| Invertible::AddBar(add).into())
}

pub fn remove_bar(state: &DocumentState, bar_idx: usize) -> Option<Action> {
    RemoveBar::plan(&state.song, bar_idx).map(|remove| Invertible::RemoveBar(remove).into())
}

pub fn set_bar_count(state: &DocumentState, count: usize) -> Option<Action> {
    let set_count = SetBarCount::plan(&state.song, count);
    if set_count.is_none() {
        log::debug!(
            "SET_BAR_COUNT to {} rejected ({} bars, {} with content)",
            count,
            state.song.bar_count(),
            state.song.part.content_len()
        );
    }
    set_count.map(|set_count| Invertible::SetBarCount(set_count).into())
}

pub fn set_title(state: &DocumentState, title: impl Into<String>) -> Action {
    Invertible::SetTitle {
        title: title.into(),
        prev_title: state.song.global.title.clone(),
    }
    .into()
}

pub fn set_author(state: &DocumentState, author: impl Into<String>) -> Action {
    Invertible::SetAuthor {
        author: author.into(),
        prev_author: state.song.global.author.clone(),
    }
    .into()
}

/// Skip `skip` at the start of the first bar (an anacrusis)
pub fn set_pickup_skip(state: &DocumentState, skip: Fraction) -> Action {
    Invertible::SetPickup {
        pickup_skip: Some(skip),
        prev_pickup_skip: state.song.global.pickup_skip,
    }
    .into()
}

pub fn clear_pickup_skip(state: &DocumentState) -> Action {
    Invertible::SetPickup {
        pickup_skip: None,
        prev_pickup_skip: state.song.global.pickup_skip,
    }
    .into()
}

pub fn undo() -> Action {
    Control::Undo.into()
}

pub fn redo() -> Action {
    Control::Redo.into()
}

pub fn reset() -> Action {
    Control::Reset.into()
}

/// Replace the song; the caller is responsible for migrating it first
pub fn load(song: Song) -> Action {
    Control::Load { song }.into()
}

pub fn move_cursor(bar_idx: usize, time: Fraction) -> Action {
    Control::MoveCursor { bar_idx, time }.into()
}
