//! Pitch representation

use serde::{Deserialize, Serialize};

/// A notated pitch
///
/// `base` is the MIDI-like note number of the unmodified scale step and
/// `modifier` the semitone offset applied to it (sharps positive, flats negative).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub base: i32,
    pub modifier: i32,
}

impl Pitch {
    /// Middle C
    pub const C4: Pitch = Pitch { base: 60, modifier: 0 };

    pub fn new(base: i32, modifier: i32) -> Self {
        Self { base, modifier }
    }
}
