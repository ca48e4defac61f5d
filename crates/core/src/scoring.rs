//! Scoring module - line values, T-spins, combos and back-to-back
//!
//! Rules:
//! - Line clears and T-spins are worth their table value times the current level.
//! - A T-spin uses the T-spin table instead of the line table (it does not add both).
//! - B2B applies a 3/2 multiplier to the clear points (before the combo bonus) when this clear
//!   and the previous one are both difficult.
//! - Combo bonus is `50 * (combo - 1) * level`; the first clear of a chain earns none.
//! - Level starts at 1 and goes up every 10 lines.

use crate::types::{
    TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE, DROP_INTERVALS,
    DROP_INTERVAL_FLOOR_MS, HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS,
    TSPIN_FULL_SCORES, TSPIN_MINI_SCORES,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreResult {
    /// Base points for the clear (includes B2B multiplier, excludes combo bonus).
    pub line_clear_score: u32,
    /// Combo bonus added on top of `line_clear_score`.
    pub combo_bonus: u32,
    pub total: u32,
    /// Whether this clear counts as difficult (tetris, or T-spin with lines).
    pub difficult: bool,
    /// Whether a B2B multiplier was applied to this clear.
    pub b2b_applied: bool,
}

/// Line clear value at a level (0 for 0 or more than 4 lines)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES
        .get(lines)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// T-spin table value at a level, if the table has an entry for this line count
pub fn calculate_tspin_score(tspin: TSpinKind, lines: usize, level: u32) -> Option<u32> {
    let base = match tspin {
        TSpinKind::Full => TSPIN_FULL_SCORES.get(lines),
        TSpinKind::Mini => TSPIN_MINI_SCORES.get(lines),
        TSpinKind::None => None,
    }?;
    Some(base.saturating_mul(level))
}

/// Difficult clears build back-to-back chains
pub fn is_difficult(tspin: TSpinKind, lines: usize) -> bool {
    lines == 4 || (tspin != TSpinKind::None && lines >= 1)
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Combo counter after a lock that cleared `lines` rows
pub fn next_combo(combo: u32, lines: usize) -> u32 {
    if lines == 0 {
        0
    } else {
        combo.saturating_add(1)
    }
}

/// Combo bonus for a chain of `combo` consecutive clears (counter already incremented)
pub fn calculate_combo_bonus(combo: u32, level: u32) -> u32 {
    if combo <= 1 {
        return 0;
    }
    COMBO_BASE
        .saturating_mul(combo - 1)
        .saturating_mul(level)
}

/// Calculate the score of one lock
///
/// `combo` is the counter after this lock was counted (see [`next_combo`]), `previous_b2b` the
/// difficulty flag left by the previous lock.
pub fn calculate_score(
    lines: usize,
    level: u32,
    tspin: TSpinKind,
    combo: u32,
    previous_b2b: bool,
) -> ScoreResult {
    let difficult = is_difficult(tspin, lines);

    let base_points = calculate_tspin_score(tspin, lines, level)
        .unwrap_or_else(|| calculate_line_score(lines, level));

    let b2b_applied = difficult && previous_b2b;
    let line_clear_score = if b2b_applied {
        apply_b2b_multiplier(base_points)
    } else {
        base_points
    };

    let combo_bonus = if lines > 0 {
        calculate_combo_bonus(combo, level)
    } else {
        0
    };
    let total = line_clear_score.saturating_add(combo_bonus);

    ScoreResult {
        line_clear_score,
        combo_bonus,
        total,
        difficult,
        b2b_applied,
    }
}

/// Points for dropping: +1 per soft-dropped row, +2 per hard-dropped row
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    cells.saturating_mul(per_cell)
}

/// Level for a running line total (starts at 1)
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level (in milliseconds)
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let index = level.saturating_sub(1) as usize;
    DROP_INTERVALS
        .get(index)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(0, 1), 0);
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 300);
        assert_eq!(calculate_line_score(3, 1), 500);
        assert_eq!(calculate_line_score(4, 1), 800);
        assert_eq!(calculate_line_score(4, 3), 2400);
        assert_eq!(calculate_line_score(5, 1), 0);
    }

    #[test]
    fn test_tspin_scores() {
        assert_eq!(calculate_tspin_score(TSpinKind::Full, 0, 1), Some(400));
        assert_eq!(calculate_tspin_score(TSpinKind::Full, 3, 1), Some(1600));
        assert_eq!(calculate_tspin_score(TSpinKind::Full, 1, 2), Some(1600));
        assert_eq!(calculate_tspin_score(TSpinKind::Mini, 2, 1), Some(400));
        assert_eq!(calculate_tspin_score(TSpinKind::Mini, 3, 1), None);
        assert_eq!(calculate_tspin_score(TSpinKind::None, 1, 1), None);
    }

    #[test]
    fn test_difficult_clears() {
        assert!(is_difficult(TSpinKind::None, 4));
        assert!(is_difficult(TSpinKind::Full, 1));
        assert!(is_difficult(TSpinKind::Mini, 1));
        assert!(!is_difficult(TSpinKind::Full, 0));
        assert!(!is_difficult(TSpinKind::None, 3));
    }

    #[test]
    fn test_combo_counter() {
        assert_eq!(next_combo(0, 1), 1);
        assert_eq!(next_combo(3, 2), 4);
        assert_eq!(next_combo(3, 0), 0);
    }

    #[test]
    fn test_combo_bonus_skips_first_clear() {
        assert_eq!(calculate_combo_bonus(0, 1), 0);
        assert_eq!(calculate_combo_bonus(1, 1), 0);
        assert_eq!(calculate_combo_bonus(2, 1), 50);
        assert_eq!(calculate_combo_bonus(4, 2), 300);
    }

    #[test]
    fn test_tetris_scores_800() {
        let result = calculate_score(4, 1, TSpinKind::None, 1, false);
        assert_eq!(result.total, 800);
        assert!(result.difficult);
        assert!(!result.b2b_applied);
    }

    #[test]
    fn test_back_to_back_tetris() {
        let result = calculate_score(4, 1, TSpinKind::None, 2, true);
        assert_eq!(result.line_clear_score, 1200);
        assert_eq!(result.combo_bonus, 50);
        assert_eq!(result.total, 1250);
        assert!(result.b2b_applied);
    }

    #[test]
    fn test_tspin_triple() {
        let result = calculate_score(3, 1, TSpinKind::Full, 1, false);
        assert_eq!(result.total, 1600);
    }

    #[test]
    fn test_zero_line_tspin_scores_without_combo() {
        let result = calculate_score(0, 2, TSpinKind::Mini, 0, true);
        assert_eq!(result.line_clear_score, 200);
        assert_eq!(result.combo_bonus, 0);
        assert!(!result.difficult);
        assert!(!result.b2b_applied);
    }

    #[test]
    fn test_plain_lock_scores_nothing() {
        assert_eq!(
            calculate_score(0, 5, TSpinKind::None, 0, true),
            ScoreResult::default()
        );
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(10, false), 10);
        assert_eq!(calculate_drop_score(18, true), 36);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(29), 3);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(get_drop_interval_ms(0), 1000);
        assert_eq!(get_drop_interval_ms(1), 1000);
        assert_eq!(get_drop_interval_ms(9), 160);
        assert_eq!(get_drop_interval_ms(10), 120);
        assert_eq!(get_drop_interval_ms(40), 120);
    }
}
