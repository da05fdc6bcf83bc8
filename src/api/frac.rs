//! Fraction arithmetic and note splitting for JavaScript
//!
//! Fractions cross the boundary as flat `[num, den]` arrays of 32-bit integers.
//! Results are always reduced; a result that does not fit is an error.

use wasm_bindgen::prelude::*;

use super::helpers::{js_error, validate_fraction};
use crate::models::{Fraction, NoteValue};
use crate::structure::{GreedySplitter, NoteSplitter};

#[wasm_bindgen]
pub struct JsFrac;

fn checked(num: i32, den: i32) -> Result<Fraction, String> {
    validate_fraction(num, den)?;
    Ok(Fraction::new(num.into(), den.into()))
}

fn pair(frac: Fraction) -> Result<Vec<i32>, String> {
    match (i32::try_from(frac.num()), i32::try_from(frac.den())) {
        (Ok(num), Ok(den)) => Ok(vec![num, den]),
        _ => Err(format!("Fraction {} does not fit in 32-bit integers", frac)),
    }
}

fn sum(lhs: (i32, i32), rhs: (i32, i32)) -> Result<Vec<i32>, String> {
    pair(checked(lhs.0, lhs.1)? + checked(rhs.0, rhs.1)?)
}

fn compare(lhs: (i32, i32), rhs: (i32, i32)) -> Result<std::cmp::Ordering, String> {
    Ok(checked(lhs.0, lhs.1)?.cmp(&checked(rhs.0, rhs.1)?))
}

fn duration_pair(note_value: i8, dots: u8) -> Result<Vec<i32>, String> {
    let value = NoteValue::new(note_value).ok_or_else(|| format!("Invalid note value: {}", note_value))?;
    if dots > value.max_dots() {
        return Err(format!(
            "Note value {} takes at most {} dots, got {}",
            note_value,
            value.max_dots(),
            dots
        ));
    }
    pair(Fraction::from_duration(value, dots))
}

#[wasm_bindgen]
impl JsFrac {
    pub fn reduce(num: i32, den: i32) -> Result<Vec<i32>, JsValue> {
        checked(num, den).and_then(pair).map_err(js_error)
    }

    pub fn add(num1: i32, den1: i32, num2: i32, den2: i32) -> Result<Vec<i32>, JsValue> {
        sum((num1, den1), (num2, den2)).map_err(js_error)
    }

    pub fn gt(num1: i32, den1: i32, num2: i32, den2: i32) -> Result<bool, JsValue> {
        compare((num1, den1), (num2, den2)).map(|ord| ord.is_gt()).map_err(js_error)
    }

    pub fn lt(num1: i32, den1: i32, num2: i32, den2: i32) -> Result<bool, JsValue> {
        compare((num1, den1), (num2, den2)).map(|ord| ord.is_lt()).map_err(js_error)
    }

    pub fn eq(num1: i32, den1: i32, num2: i32, den2: i32) -> Result<bool, JsValue> {
        compare((num1, den1), (num2, den2)).map(|ord| ord.is_eq()).map_err(js_error)
    }

    /// Length of a note value (log2 of whole notes) with `dots` augmentation dots
    #[wasm_bindgen(js_name = fromDuration)]
    pub fn from_duration(note_value: i8, dots: u8) -> Result<Vec<i32>, JsValue> {
        duration_pair(note_value, dots).map_err(js_error)
    }
}

/// Flatten divisions into `(noteValue, dots, startNum, startDen)` quadruples
fn split_note_flat(bar_idx: usize, start: Fraction, duration: Fraction) -> Result<Vec<i32>, String> {
    let mut flat = Vec::new();
    for division in GreedySplitter.split_note(bar_idx, start, duration) {
        flat.push(i32::from(division.note_value.log2()));
        flat.push(i32::from(division.dots));
        flat.extend(pair(division.start_time)?);
    }
    Ok(flat)
}

/// Split a duration into tied notes; empty when it cannot be notated
#[wasm_bindgen(js_name = splitNote)]
pub fn split_note(bar_idx: usize, start_num: i32, start_den: i32, dur_num: i32, dur_den: i32) -> Result<Vec<i32>, JsValue> {
    let start = checked(start_num, start_den).map_err(js_error)?;
    let duration = checked(dur_num, dur_den).map_err(js_error)?;
    split_note_flat(bar_idx, start, duration).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_checked_reduces_and_rejects_zero_denominator() {
        assert_eq!(checked(2, 8).and_then(pair), Ok(vec![1, 4]));
        assert_eq!(checked(3, -6).and_then(pair), Ok(vec![-1, 2]));
        assert!(checked(1, 0).is_err());
        // -(i32::MIN) has no 32-bit form
        assert!(checked(i32::MIN, -1).and_then(pair).is_err());
    }

    #[test]
    fn test_sum_reports_results_out_of_range() {
        assert_eq!(sum((1, 2), (1, 4)), Ok(vec![3, 4]));
        assert_eq!(sum((1, 65536), (1, 65537)), sum((1, 65537), (1, 65536)));
        assert!(sum((1, 65536), (1, 65537)).is_err());
        assert!(sum((i32::MAX, 1), (1, 1)).is_err());
        assert_eq!(sum((i32::MAX, 1), (-1, 1)), Ok(vec![i32::MAX - 1, 1]));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare((1, 2), (2, 4)), Ok(Ordering::Equal));
        assert_eq!(compare((3, 8), (1, 4)), Ok(Ordering::Greater));
        assert!(compare((1, 2), (1, 0)).is_err());
    }

    #[test]
    fn test_duration_pair_rejects_unnotatable_dots() {
        assert_eq!(duration_pair(-2, 1), Ok(vec![3, 8]));
        assert_eq!(duration_pair(0, 8), Ok(vec![511, 256]));
        assert!(duration_pair(0, 9).is_err());
        assert!(duration_pair(0, 40).is_err());
        assert!(duration_pair(4, 0).is_err());
    }

    #[test]
    fn test_split_note_flat_quadruples() {
        // A whole bar is one whole note
        let flat = split_note_flat(0, Fraction::zero(), Fraction::from_integer(1));
        assert_eq!(flat, Ok(vec![0, 0, 0, 1]));

        let flat = split_note_flat(0, Fraction::zero(), Fraction::new(5, 8));
        assert_eq!(flat, Ok(vec![-1, 0, 0, 1, -3, 0, 1, 2]));

        assert_eq!(split_note_flat(0, Fraction::zero(), Fraction::new(1, 3)), Ok(vec![]));
    }
}
