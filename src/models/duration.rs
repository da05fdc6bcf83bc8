//! Notated durations and tied notes

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::fraction::Fraction;

/// The unmodified relative duration of a note, as log2 of a whole note.
///
/// Serialized as its integer value (`0` = whole, `-2` = quarter).
#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum NoteValue {
    Maxima = 3,
    Longa = 2,
    DoubleWhole = 1,
    Whole = 0,
    Half = -1,
    Quarter = -2,
    Eighth = -3,
    Sixteenth = -4,
    ThirtySecond = -5,
    SixtyFourth = -6,
    HundredTwentyEighth = -7,
    TwoHundredFiftySixth = -8,
}

impl NoteValue {
    pub const LONGEST: NoteValue = NoteValue::Maxima;
    pub const SHORTEST: NoteValue = NoteValue::TwoHundredFiftySixth;

    pub fn new(log2: i8) -> Option<NoteValue> {
        match log2 {
            3 => Some(NoteValue::Maxima),
            2 => Some(NoteValue::Longa),
            1 => Some(NoteValue::DoubleWhole),
            0 => Some(NoteValue::Whole),
            -1 => Some(NoteValue::Half),
            -2 => Some(NoteValue::Quarter),
            -3 => Some(NoteValue::Eighth),
            -4 => Some(NoteValue::Sixteenth),
            -5 => Some(NoteValue::ThirtySecond),
            -6 => Some(NoteValue::SixtyFourth),
            -7 => Some(NoteValue::HundredTwentyEighth),
            -8 => Some(NoteValue::TwoHundredFiftySixth),
            _ => None,
        }
    }

    pub fn log2(self) -> i8 {
        self as i8
    }

    /// Number of whole notes, ignoring dots
    pub fn count(self) -> Fraction {
        Fraction::pow2(i32::from(self.log2()))
    }

    /// Most dots this value can carry before the last dot is shorter than a 256th
    pub fn max_dots(self) -> u8 {
        self.log2().abs_diff(Self::SHORTEST.log2())
    }
}

/// One notated fragment of a tied note
///
/// Deserialization rejects more dots than [`NoteValue::max_dots`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", try_from = "RawDivision")]
pub struct Division {
    pub note_value: NoteValue,
    pub dots: u8,
    pub start_time: Fraction,
}

impl Division {
    pub fn new(note_value: NoteValue, dots: u8, start_time: Fraction) -> Self {
        Self { note_value, dots, start_time }
    }

    pub fn duration(&self) -> Fraction {
        Fraction::from_duration(self.note_value, self.dots)
    }

    pub fn end_time(&self) -> Fraction {
        self.start_time + self.duration()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDivision {
    note_value: NoteValue,
    dots: u8,
    start_time: Fraction,
}

impl TryFrom<RawDivision> for Division {
    type Error = String;

    fn try_from(raw: RawDivision) -> Result<Self, Self::Error> {
        if raw.dots > raw.note_value.max_dots() {
            return Err(format!(
                "{:?} carries {} dots, at most {} can be notated",
                raw.note_value,
                raw.dots,
                raw.note_value.max_dots()
            ));
        }
        Ok(Division::new(raw.note_value, raw.dots, raw.start_time))
    }
}

/// A single logical note written as several tied fragments
pub type TiedNote = Vec<Division>;

/// Sum of the durations of every division
pub fn tied_duration(divisions: &[Division]) -> Fraction {
    divisions
        .iter()
        .fold(Fraction::zero(), |sum, division| sum + division.duration())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_value_roundtrips_log2() {
        for log2 in -8..=3 {
            assert_eq!(NoteValue::new(log2).map(NoteValue::log2), Some(log2));
        }
        assert_eq!(NoteValue::new(4), None);
        assert_eq!(NoteValue::new(-9), None);
    }

    #[test]
    fn test_tied_duration() {
        let divisions = vec![
            Division::new(NoteValue::Half, 1, Fraction::zero()),
            Division::new(NoteValue::Eighth, 0, Fraction::new(3, 4)),
        ];
        assert_eq!(tied_duration(&divisions), Fraction::new(7, 8));
        assert_eq!(divisions[1].end_time(), Fraction::new(7, 8));
    }

    #[test]
    fn test_division_json_shape() {
        let division = Division::new(NoteValue::Quarter, 0, Fraction::new(1, 4));
        let json = serde_json::to_value(division).unwrap();
        assert_eq!(json, serde_json::json!({"noteValue": -2, "dots": 0, "startTime": [1, 4]}));
    }

    #[test]
    fn test_division_dots_are_bounded() {
        assert_eq!(NoteValue::Maxima.max_dots(), 11);
        assert_eq!(NoteValue::Quarter.max_dots(), 6);
        assert_eq!(NoteValue::SHORTEST.max_dots(), 0);

        let dotted: Division =
            serde_json::from_value(serde_json::json!({"noteValue": -2, "dots": 6, "startTime": [0, 1]})).unwrap();
        assert_eq!(dotted.duration(), Fraction::new(127, 256));
        let overdotted = serde_json::json!({"noteValue": 0, "dots": 40, "startTime": [0, 1]});
        assert!(serde_json::from_value::<Division>(overdotted).is_err());

        // Constructed in code, extra dots stop at the shortest value
        let built = Division::new(NoteValue::Whole, 40, Fraction::zero());
        assert_eq!(built.duration(), Fraction::new(511, 256));
    }
}
