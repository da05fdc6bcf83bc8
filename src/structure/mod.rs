//! Structural editing
//!
//! Stateless editors that plan and apply changes to a Song. Each planner reads the
//! current song and returns an action payload carrying everything needed to apply
//! and to invert it; applying never consults anything but the payload and the song.
//!
//! ## Modules
//!
//! - `duration_split`: tied-note decomposition and overlap rejection
//! - `signature_edit`: time/key signature and clef changes on the sparse timeline
//! - `bar_edit`: bar insertion, removal and bar-count changes
//! - `note_edit`: note insertion, removal and re-pitching

pub mod bar_edit;
pub mod duration_split;
pub mod note_edit;
pub mod signature_edit;

pub use bar_edit::{AddBar, RemoveBar, SetBarCount};
pub use duration_split::{split_duration_into_parts, GreedySplitter, NoteSplitter};
pub use note_edit::{ChangeNotePitch, NoteEdit};
pub use signature_edit::{SetClef, SetKs, SetTs, SignatureAnchors};
