//! WASM API for the document store
//!
//! The single live document is owned here, behind a global lock. JavaScript reads
//! snapshots of it and sends actions; every mutation goes through the reducer.

use lazy_static::lazy_static;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, js_error, serialize, validate_fraction};
use crate::config::EngineConfig;
use crate::models::{DocumentState, Fraction, Pitch, TimeSignature};
use crate::store::{actions, migrate, Action, Engine};
use crate::structure::GreedySplitter;

/// The engine together with the document it manages
#[derive(Debug, Default)]
struct Store {
    engine: Engine,
    state: DocumentState,
}

impl Store {
    fn new(config: EngineConfig) -> Self {
        let engine = Engine::new(config);
        let state = engine.initial_state();
        Self { engine, state }
    }

    fn dispatch(&mut self, action: Action) {
        self.engine.dispatch(&mut self.state, action);
    }

    /// Dispatch `action` if the intent was accepted
    fn dispatch_planned(&mut self, action: Option<Action>) -> bool {
        match action {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    fn insert_note(&mut self, bar_idx: usize, start: Fraction, duration: Fraction, pitch: Pitch) -> bool {
        let action = actions::add_note(&self.state, &GreedySplitter, bar_idx, start, duration, pitch);
        self.dispatch_planned(action)
    }

    fn set_time_signature(&mut self, before_bar: usize, ts: TimeSignature) -> bool {
        let action = actions::set_ts(&self.state, before_bar, ts);
        self.dispatch_planned(action)
    }
}

// WASM-owned document storage (canonical source of truth)
lazy_static! {
    static ref STORE: Mutex<Option<Store>> = Mutex::new(None);
}

/// Run `f` against the live store, creating a default one on first use
fn with_store<R>(f: impl FnOnce(&mut Store) -> R) -> Result<R, JsValue> {
    let mut guard = STORE.lock().map_err(|_| js_error("Document store lock poisoned"))?;
    Ok(f(guard.get_or_insert_with(Store::default)))
}

/// (Re)create the store, optionally from a YAML engine config
#[wasm_bindgen(js_name = initStore)]
pub fn init_store(config_yaml: Option<String>) -> Result<(), JsValue> {
    let config = match config_yaml {
        Some(yaml) => EngineConfig::from_yaml_str(&yaml).map_err(|e| js_error(e.to_string()))?,
        None => EngineConfig::default(),
    };
    let mut guard = STORE.lock().map_err(|_| js_error("Document store lock poisoned"))?;
    *guard = Some(Store::new(config));
    log::info!("document store initialized");
    Ok(())
}

/// Snapshot of the whole state: song, history and cursor
#[wasm_bindgen(js_name = getState)]
pub fn get_state() -> Result<JsValue, JsValue> {
    with_store(|store| serialize(&store.state, "Failed to serialize state"))?
}

#[wasm_bindgen(js_name = getSong)]
pub fn get_song() -> Result<JsValue, JsValue> {
    with_store(|store| serialize(&store.state.song, "Failed to serialize song"))?
}

/// Apply a JSON action such as `{type: "SET_TITLE", title, prevTitle}`
#[wasm_bindgen]
pub fn dispatch(action: JsValue) -> Result<(), JsValue> {
    let action: Action = deserialize(action, "Invalid action")?;
    with_store(|store| store.dispatch(action))
}

/// Migrate a persisted song of any supported version and make it the live document
#[wasm_bindgen(js_name = loadSong)]
pub fn load_song(raw: JsValue) -> Result<(), JsValue> {
    let raw: serde_json::Value = deserialize(raw, "Invalid song")?;
    let song = migrate(raw).map_err(|e| js_error(format!("Failed to load song: {}", e)))?;
    with_store(|store| store.dispatch(actions::load(song)))
}

/// Split and insert a note; returns whether it was accepted
#[wasm_bindgen(js_name = insertNote)]
pub fn insert_note(
    bar_idx: usize,
    start_num: i32,
    start_den: i32,
    dur_num: i32,
    dur_den: i32,
    pitch_base: i32,
    pitch_modifier: i32,
) -> Result<bool, JsValue> {
    validate_fraction(start_num, start_den).map_err(js_error)?;
    validate_fraction(dur_num, dur_den).map_err(js_error)?;
    let start = Fraction::new(start_num.into(), start_den.into());
    let duration = Fraction::new(dur_num.into(), dur_den.into());
    let pitch = Pitch::new(pitch_base, pitch_modifier);
    with_store(|store| store.insert_note(bar_idx, start, duration, pitch))
}

#[wasm_bindgen(js_name = setTimeSignature)]
pub fn set_time_signature(before_bar: usize, num: u32, den: u32) -> Result<bool, JsValue> {
    if num == 0 || den == 0 {
        return Err(js_error(format!("Invalid time signature {}/{}", num, den)));
    }
    with_store(|store| store.set_time_signature(before_bar, TimeSignature::new(num, den)))
}

#[wasm_bindgen]
pub fn undo() -> Result<(), JsValue> {
    with_store(|store| store.dispatch(actions::undo()))
}

#[wasm_bindgen]
pub fn redo() -> Result<(), JsValue> {
    with_store(|store| store.dispatch(actions::redo()))
}

#[wasm_bindgen(js_name = canUndo)]
pub fn can_undo() -> Result<bool, JsValue> {
    with_store(|store| store.state.can_undo())
}

#[wasm_bindgen(js_name = canRedo)]
pub fn can_redo() -> Result<bool, JsValue> {
    with_store(|store| store.state.can_redo())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_insert_and_undo() {
        let mut store = Store::default();
        assert!(store.insert_note(0, Fraction::zero(), Fraction::new(3, 4), Pitch::C4));
        assert!(!store.insert_note(0, Fraction::new(1, 2), Fraction::new(1, 4), Pitch::C4));
        assert_eq!(store.state.song.bars()[0].notes.len(), 1);

        store.dispatch(actions::undo());
        assert!(store.state.song.bars()[0].is_empty());
        assert!(store.state.can_redo());
    }

    #[test]
    fn test_store_uses_config() {
        let config = EngineConfig::from_yaml_str("initial_bar_count: 3\nundo_limit: 1").unwrap();
        let mut store = Store::new(config);
        assert_eq!(store.state.song.bar_count(), 3);

        assert!(store.set_time_signature(1, TimeSignature::new(3, 4)));
        assert!(store.set_time_signature(2, TimeSignature::new(2, 4)));
        assert_eq!(store.state.history.undo_count(), 1);
        assert!(!store.set_time_signature(7, TimeSignature::new(2, 4)));
    }
}
