//! Score Store WASM Module
//!
//! The authoritative score document of the music notation editor and the only
//! place it is mutated: exact fractional timing, the sparse signature timeline,
//! tied-note splitting and a reducer with exact undo/redo.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod structure;
pub mod undo;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{ConfigError, MigrationError};
pub use models::core::*;
pub use models::{Barline, Clef, Cursor, Division, DocumentState, Fraction, NoteValue, PartialSignature, Pitch};
pub use models::{Signature, SignatureTimeline, TiedNote, TimeSignature};
pub use store::{apply, get_initial_state, migrate, migrate_str, Action, Control, Engine};
pub use undo::{Invertible, UndoStack};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::warn!("logger was already initialized");
    }

    log::info!("Score store WASM module initialized");
}
