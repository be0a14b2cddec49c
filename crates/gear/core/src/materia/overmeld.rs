//! Static overmeld success rates.
//!
//! Rows are materia grades (I through XII), columns the overmeld slot offset
//! counted from the first slot past the item's guaranteed slots. Values are
//! percentages as published by the game client.

/// Number of overmeld slots the game allows past the guaranteed ones.
pub const OVERMELD_OFFSETS: usize = 4;

const NQ_RATES: [[u8; OVERMELD_OFFSETS]; 12] = [
    [90, 48, 28, 16], // I
    [82, 44, 26, 16], // II
    [70, 38, 22, 14], // III
    [58, 32, 20, 12], // IV
    [17, 10, 7, 5],   // V
    [17, 0, 0, 0],    // VI
    [17, 10, 7, 5],   // VII
    [17, 0, 0, 0],    // VIII
    [17, 10, 7, 5],   // IX
    [17, 0, 0, 0],    // X
    [17, 10, 7, 5],   // XI
    [0, 0, 0, 0],     // XII
];

const HQ_RATES: [[u8; OVERMELD_OFFSETS]; 12] = [
    [80, 40, 20, 10], // I
    [72, 36, 18, 9],  // II
    [60, 30, 15, 8],  // III
    [48, 24, 12, 6],  // IV
    [12, 6, 3, 2],    // V
    [12, 0, 0, 0],    // VI
    [12, 6, 3, 2],    // VII
    [12, 0, 0, 0],    // VIII
    [12, 6, 3, 2],    // IX
    [12, 0, 0, 0],    // X
    [12, 6, 3, 2],    // XI
    [0, 0, 0, 0],     // XII
];

/// Probability (0.0..=1.0) that a materia of `grade` attaches in the overmeld
/// slot `offset` of an item.
///
/// Unknown grades and offsets past the table yield `0.0`.
pub fn overmeld_probability(grade: u8, offset: usize, is_high_quality: bool) -> f32 {
    let table = if is_high_quality { &HQ_RATES } else { &NQ_RATES };
    let Some(row) = (grade as usize).checked_sub(1).and_then(|idx| table.get(idx)) else {
        return 0.0;
    };
    row.get(offset).map_or(0.0, |pct| f32::from(*pct) / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_grades_have_high_first_slot_rates() {
        assert!((overmeld_probability(1, 0, false) - 0.90).abs() < f32::EPSILON);
        assert!((overmeld_probability(4, 3, false) - 0.12).abs() < f32::EPSILON);
    }

    #[test]
    fn high_quality_hosts_use_their_own_rates() {
        assert!((overmeld_probability(1, 0, true) - 0.80).abs() < f32::EPSILON);
        assert!((overmeld_probability(4, 3, true) - 0.06).abs() < f32::EPSILON);
        assert!(overmeld_probability(7, 0, true) < overmeld_probability(7, 0, false));
    }

    #[test]
    fn out_of_table_lookups_are_zero() {
        assert_eq!(overmeld_probability(0, 0, false), 0.0);
        assert_eq!(overmeld_probability(13, 0, false), 0.0);
        assert_eq!(overmeld_probability(5, OVERMELD_OFFSETS, false), 0.0);
        assert_eq!(overmeld_probability(10, 1, false), 0.0);
    }
}
