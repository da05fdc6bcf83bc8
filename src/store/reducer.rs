//! The reducer: `(state, action) -> state`
//!
//! Editing actions are applied to the song and pushed onto the history. Control actions
//! walk the history, reset or replace the document, or move the cursor. Nothing here
//! fails; a rejected or out-of-range action leaves the state as it was.

use crate::config::EngineConfig;
use crate::models::{Cursor, DocumentState};
use crate::undo::Invertible;

use super::actions::{Action, Control};

/// A reducer bound to a configuration
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A fresh document: empty bars, the configured signature, no history
    pub fn initial_state(&self) -> DocumentState {
        DocumentState::with_history_limit(self.config.initial_song(), self.config.undo_limit)
    }

    pub fn apply(&self, mut state: DocumentState, action: Action) -> DocumentState {
        self.dispatch(&mut state, action);
        state
    }

    /// In-place form of [`Engine::apply`]
    pub fn dispatch(&self, state: &mut DocumentState, action: Action) {
        let kind = action.kind();
        log::debug!("dispatch {}", kind);

        match action {
            Action::Edit(edit) => {
                let before = state.song.clone();
                edit.execute(&mut state.song);
                // An edit that changed nothing is not recorded and keeps the redo history
                if state.song == before {
                    log::debug!("{} left the song unchanged", kind);
                    return;
                }
                follow_cursor(state, &edit);
                state.history.push(edit);
            }
            Action::Control(Control::Undo) => match state.history.undo(&mut state.song) {
                Some(inverse) => follow_cursor(state, &inverse),
                None => log::debug!("UNDO ignored: history is empty"),
            },
            Action::Control(Control::Redo) => match state.history.redo(&mut state.song) {
                Some(edit) => follow_cursor(state, &edit),
                None => log::debug!("REDO ignored: nothing to redo"),
            },
            Action::Control(Control::Reset) => {
                *state = self.initial_state();
            }
            Action::Control(Control::Load { song }) => {
                *state = DocumentState::with_history_limit(song, self.config.undo_limit);
                log::info!(
                    "loaded song \"{}\" with {} bars (undo limit {:?})",
                    state.song.global.title,
                    state.song.bar_count(),
                    state.history.max_size()
                );
            }
            Action::Control(Control::MoveCursor { bar_idx, time }) => {
                if bar_idx < state.song.bar_count() {
                    state.cursor = Cursor::new(bar_idx, time);
                } else {
                    log::debug!("MOVE_CURSOR ignored: no bar {}", bar_idx);
                }
            }
        }
    }
}

fn follow_cursor(state: &mut DocumentState, applied: &Invertible) {
    if let Some(cursor) = applied.cursor_after() {
        state.cursor = cursor;
    }
    state.validate_cursor();
}

/// A fresh document under the default configuration
pub fn get_initial_state() -> DocumentState {
    Engine::default().initial_state()
}

/// Apply `action` under the default configuration
pub fn apply(state: DocumentState, action: Action) -> DocumentState {
    Engine::default().apply(state, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fraction, Pitch, Signature, TimeSignature, DEFAULT_BAR_COUNT};
    use crate::store::actions;
    use crate::structure::GreedySplitter;

    #[test]
    fn test_initial_state() {
        let state = get_initial_state();
        assert_eq!(state.song.bar_count(), DEFAULT_BAR_COUNT);
        assert_eq!(state.song.global.signatures.first(), Signature::default());
        assert!(!state.can_undo());
        assert!(!state.can_redo());
        assert_eq!(state.cursor, Cursor::default());
    }

    #[test]
    fn test_cursor_follows_note_edits() {
        let state = get_initial_state();
        let add = actions::add_note(&state, &GreedySplitter, 2, Fraction::new(1, 4), Fraction::new(1, 2), Pitch::C4).unwrap();
        let state = apply(state, add);
        assert_eq!(state.cursor, Cursor::new(2, Fraction::new(3, 4)));

        let state = apply(state, actions::undo());
        assert_eq!(state.cursor, Cursor::new(2, Fraction::new(1, 4)));

        let state = apply(state, actions::move_cursor(20, Fraction::zero()));
        assert_eq!(state.cursor, Cursor::new(2, Fraction::new(1, 4)));
    }

    #[test]
    fn test_cursor_clamped_after_shrink() {
        let state = get_initial_state();
        let state = apply(state, actions::move_cursor(8, Fraction::new(1, 2)));
        let shrink = actions::set_bar_count(&state, 3).unwrap();
        let state = apply(state, shrink);
        assert_eq!(state.cursor, Cursor::new(2, Fraction::zero()));
    }

    #[test]
    fn test_undo_redo_on_empty_history_is_noop() {
        let state = get_initial_state();
        let undone = apply(state.clone(), actions::undo());
        assert_eq!(undone, state);
        let redone = apply(state.clone(), actions::redo());
        assert_eq!(redone, state);
    }

    #[test]
    fn test_unchanged_edit_is_not_recorded() {
        let state = get_initial_state();
        let retitle = actions::set_title(&state, "Air");
        let state = apply(apply(state, retitle), actions::undo());
        assert!(state.can_redo());

        let stray = actions::add_note_divisions(40, Fraction::zero(), Vec::new(), Pitch::C4);
        let after = apply(state.clone(), stray);
        assert_eq!(after, state);
        assert!(after.can_redo());
        assert!(!after.can_undo());
    }

    #[test]
    fn test_reset_and_load() {
        let engine = Engine::new(EngineConfig { initial_bar_count: 2, ..Default::default() });
        let state = engine.initial_state();
        let set = actions::set_ts(&state, 1, TimeSignature::new(6, 8)).unwrap();
        let state = engine.apply(state, set);
        assert!(state.can_undo());

        let state = engine.apply(state, actions::reset());
        assert_eq!(state, engine.initial_state());

        let mut song = engine.config().initial_song();
        song.global.title = "Loaded".to_string();
        let state = engine.apply(state, actions::set_title(&engine.initial_state(), "x"));
        let state = engine.apply(state, actions::load(song.clone()));
        assert_eq!(state.song, song);
        assert!(!state.can_undo());
        assert!(!state.can_redo());
    }

    #[test]
    fn test_history_limit_from_config() {
        let engine = Engine::new(EngineConfig { undo_limit: Some(2), ..Default::default() });
        let mut state = engine.initial_state();
        for count in [10, 11, 12] {
            let grow = actions::set_bar_count(&state, count).unwrap();
            engine.dispatch(&mut state, grow);
        }
        assert_eq!(state.history.undo_count(), 2);

        engine.dispatch(&mut state, actions::undo());
        engine.dispatch(&mut state, actions::undo());
        engine.dispatch(&mut state, actions::undo());
        assert_eq!(state.song.bar_count(), 10);
    }
}
