use crate::models::{Cursor, Fraction, Song};
use crate::structure::{AddBar, ChangeNotePitch, NoteEdit, RemoveBar, SetBarCount, SetClef, SetKs, SetTs};
use serde::{Deserialize, Serialize};

/// Represents a reversible edit
///
/// Every variant carries both its forward data and the "before" data captured when
/// it was constructed, so its inverse needs no lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Invertible {
    AddNote(NoteEdit),
    RemoveNote(NoteEdit),
    ChangeNotePitch(ChangeNotePitch),
    SetTs(SetTs),
    SetKs(SetKs),
    SetClef(SetClef),
    AddBar(AddBar),
    RemoveBar(RemoveBar),
    SetBarCount(SetBarCount),
    #[serde(rename_all = "camelCase")]
    SetTitle {
        title: String,
        prev_title: String,
    },
    #[serde(rename_all = "camelCase")]
    SetAuthor {
        author: String,
        prev_author: String,
    },
    #[serde(rename_all = "camelCase")]
    SetPickup {
        pickup_skip: Option<Fraction>,
        prev_pickup_skip: Option<Fraction>,
    },
}

impl Invertible {
    /// Execute this edit on the song
    pub fn execute(&self, song: &mut Song) {
        match self {
            Invertible::AddNote(edit) => edit.insert(song),
            Invertible::RemoveNote(edit) => edit.remove(song),
            Invertible::ChangeNotePitch(change) => change.execute(song),
            Invertible::SetTs(set_ts) => set_ts.execute(song),
            Invertible::SetKs(set_ks) => set_ks.execute(song),
            Invertible::SetClef(set_clef) => set_clef.execute(song),
            Invertible::AddBar(add) => add.execute(song),
            Invertible::RemoveBar(remove) => remove.execute(song),
            Invertible::SetBarCount(set_count) => set_count.execute(song),
            Invertible::SetTitle { title, .. } => song.global.title = title.clone(),
            Invertible::SetAuthor { author, .. } => song.global.author = author.clone(),
            Invertible::SetPickup { pickup_skip, .. } => song.global.pickup_skip = *pickup_skip,
        }
    }

    /// The edit that reverses this one
    pub fn inverse(&self) -> Invertible {
        match self {
            Invertible::AddNote(edit) => Invertible::RemoveNote(edit.clone()),
            Invertible::RemoveNote(edit) => Invertible::AddNote(edit.clone()),
            Invertible::ChangeNotePitch(change) => Invertible::ChangeNotePitch(change.inverse()),
            Invertible::SetTs(set_ts) => Invertible::SetTs(set_ts.inverse()),
            Invertible::SetKs(set_ks) => Invertible::SetKs(set_ks.inverse()),
            Invertible::SetClef(set_clef) => Invertible::SetClef(set_clef.inverse()),
            Invertible::AddBar(add) => Invertible::RemoveBar(add.inverse()),
            Invertible::RemoveBar(remove) => Invertible::AddBar(remove.inverse()),
            Invertible::SetBarCount(set_count) => Invertible::SetBarCount(set_count.inverse()),
            Invertible::SetTitle { title, prev_title } => Invertible::SetTitle {
                title: prev_title.clone(),
                prev_title: title.clone(),
            },
            Invertible::SetAuthor { author, prev_author } => Invertible::SetAuthor {
                author: prev_author.clone(),
                prev_author: author.clone(),
            },
            Invertible::SetPickup { pickup_skip, prev_pickup_skip } => Invertible::SetPickup {
                pickup_skip: *prev_pickup_skip,
                prev_pickup_skip: *pickup_skip,
            },
        }
    }

    /// Where the caret lands once this edit has been applied, if it moves at all
    pub fn cursor_after(&self) -> Option<Cursor> {
        match self {
            Invertible::AddNote(edit) => Some(Cursor::new(edit.bar_idx, edit.end_time())),
            Invertible::RemoveNote(edit) => Some(Cursor::new(edit.bar_idx, edit.start_time)),
            _ => None,
        }
    }

    /// Fold a later edit of the same text field into this one, keeping the first "before" value
    fn coalesce(&mut self, next: &Invertible) -> bool {
        match (self, next) {
            (Invertible::SetTitle { title, .. }, Invertible::SetTitle { title: next, .. }) => {
                *title = next.clone();
                true
            }
            (Invertible::SetAuthor { author, .. }, Invertible::SetAuthor { author: next, .. }) => {
                *author = next.clone();
                true
            }
            _ => false,
        }
    }
}

/// Manages undo/redo history
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoStack {
    /// Edits that can be undone, oldest first
    pub undo_stack: Vec<Invertible>,
    /// Undone edits that can be redone, most recently undone last
    pub redo_stack: Vec<Invertible>,
    /// Maximum number of edits to keep in history (unbounded when `None`)
    #[serde(skip)]
    max_size: Option<usize>,
}

impl PartialEq for UndoStack {
    fn eq(&self, other: &Self) -> bool {
        // Only compare serialized fields
        self.undo_stack == other.undo_stack && self.redo_stack == other.redo_stack
    }
}

impl UndoStack {
    pub fn new(max_size: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record an edit that has just been applied
    ///
    /// Clears the redo history. Consecutive title (or author) edits collapse into one entry.
    pub fn push(&mut self, action: Invertible) {
        self.redo_stack.clear();

        if let Some(top) = self.undo_stack.last_mut() {
            if top.coalesce(&action) {
                return;
            }
        }
        self.undo_stack.push(action);

        // Enforce max size
        if let Some(max_size) = self.max_size {
            if self.undo_stack.len() > max_size {
                let excess = self.undo_stack.len() - max_size;
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Undo the last edit; returns the inverse that was applied
    pub fn undo(&mut self, song: &mut Song) -> Option<Invertible> {
        let action = self.undo_stack.pop()?;
        let inverse = action.inverse();
        inverse.execute(song);
        self.redo_stack.push(action);
        Some(inverse)
    }

    /// Re-apply the last undone edit; returns it
    pub fn redo(&mut self, song: &mut Song) -> Option<Invertible> {
        let action = self.redo_stack.pop()?;
        action.execute(song);
        self.undo_stack.push(action.clone());
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}
