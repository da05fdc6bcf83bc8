//! Models module for the score store
//!
//! This module contains the data models of a score document: exact fractions,
//! durations, pitches, barlines, the signature timeline and the song itself.

pub mod barlines;
pub mod core;
pub mod duration;
pub mod editor_state;
pub mod fraction;
pub mod pitch;
pub mod serde_helpers;
pub mod signature;

// Re-export commonly used types
pub use barlines::{barlines_are_consistent, retag_barlines, Barline};
pub use self::core::*;
pub use duration::{tied_duration, Division, NoteValue, TiedNote};
pub use editor_state::{Cursor, DocumentState};
pub use fraction::Fraction;
pub use pitch::Pitch;
pub use signature::{Clef, PartialSignature, Signature, SignatureTimeline, TimeSignature};
