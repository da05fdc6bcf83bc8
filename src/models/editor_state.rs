//! Document state management
//!
//! `DocumentState` is the complete state owned by the reducer: the song, the
//! undo/redo history and the editing cursor.

use serde::{Deserialize, Serialize};

use super::core::Song;
use super::fraction::Fraction;
use crate::undo::UndoStack;

/// Caret position: a bar and a time offset inside it
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub bar_idx: usize,
    pub time: Fraction,
}

impl Cursor {
    pub fn new(bar_idx: usize, time: Fraction) -> Self {
        Self { bar_idx, time }
    }
}

/// Complete editor document state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DocumentState {
    pub song: Song,

    #[serde(flatten)]
    pub history: UndoStack,

    #[serde(default)]
    pub cursor: Cursor,
}

impl DocumentState {
    pub fn new(song: Song) -> Self {
        Self {
            song,
            history: UndoStack::default(),
            cursor: Cursor::default(),
        }
    }

    pub fn with_history_limit(song: Song, max_size: Option<usize>) -> Self {
        Self {
            song,
            history: UndoStack::new(max_size),
            cursor: Cursor::default(),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Clamp the cursor into the current bar range
    pub fn validate_cursor(&mut self) {
        let bar_count = self.song.bar_count();
        if self.cursor.bar_idx >= bar_count {
            self.cursor = Cursor::new(bar_count.saturating_sub(1), Fraction::zero());
        }
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new(Song::default())
    }
}
