//! Barline handling
//!
//! Every part ends with a final barline; all other bars end with a normal one.

use serde::{Deserialize, Serialize};

use super::core::Bar;

/// Barline types
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Barline {
    #[default]
    Normal,
    Final,
}

/// Re-tag barlines so that exactly the last bar is `Final`
pub fn retag_barlines(bars: &mut [Bar]) {
    let last = bars.len().saturating_sub(1);
    for (idx, bar) in bars.iter_mut().enumerate() {
        bar.barline = if idx == last { Barline::Final } else { Barline::Normal };
    }
}

/// Whether exactly the last bar is `Final` and all others are `Normal`
pub fn barlines_are_consistent(bars: &[Bar]) -> bool {
    let last = bars.len().saturating_sub(1);
    bars.iter().enumerate().all(|(idx, bar)| {
        (idx == last) == (bar.barline == Barline::Final)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retag_barlines() {
        let mut bars = vec![Bar::new(Barline::Final), Bar::default(), Bar::default()];
        assert!(!barlines_are_consistent(&bars));

        retag_barlines(&mut bars);
        assert_eq!(bars[0].barline, Barline::Normal);
        assert_eq!(bars[2].barline, Barline::Final);
        assert!(barlines_are_consistent(&bars));
    }

    #[test]
    fn test_barline_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Barline::Final).unwrap(), "\"final\"");
    }
}
