//! Difficulty scaling
//!
//! Pure functions of the score-derived level. Every parameter is monotonic
//! in level and floored or capped, so difficulty never regresses within a
//! run and never leaves the playable range.

use crate::consts::*;

/// Difficulty level for a score. One level per 500 points.
#[inline]
pub fn level_for_score(score: u32) -> u32 {
    score / SCORE_PER_LEVEL
}

/// Vertical gap size for a level, scaled to the viewport height.
///
/// Short viewports get proportionally smaller gaps; viewports taller than
/// the reference height do not get extra slack.
pub fn gap(level: u32, viewport_h: f32) -> f32 {
    let effective_h = viewport_h.min(REFERENCE_HEIGHT);
    let base_ratio = BASE_START_GAP / REFERENCE_HEIGHT;
    (effective_h * base_ratio - level as f32 * GAP_STEP).max(MIN_PIPE_GAP)
}

/// Horizontal distance between consecutive pipes.
pub fn spacing(level: u32) -> f32 {
    (START_PIPE_SPACING - level as f32 * SPACING_STEP).max(MIN_PIPE_SPACING)
}

/// Downward acceleration per reference frame.
pub fn gravity(level: u32) -> f32 {
    (BASE_GRAVITY + level as f32 * GRAVITY_STEP).min(MAX_GRAVITY)
}

/// Flap impulse (negative = upward), strengthening with level down to a floor.
pub fn jump_impulse(level: u32) -> f32 {
    (BASE_JUMP_IMPULSE + level as f32 * JUMP_IMPULSE_STEP).max(MIN_JUMP_IMPULSE)
}

/// Horizontal scroll speed per reference frame.
pub fn scroll_speed(level: u32) -> f32 {
    BASE_SCROLL_SPEED + level as f32 * SCROLL_SPEED_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_score(0), 0);
        assert_eq!(level_for_score(499), 0);
        assert_eq!(level_for_score(500), 1);
        assert_eq!(level_for_score(2500), 5);
    }

    #[test]
    fn gap_on_short_viewport() {
        // 800x600 at level 0: 600 * 220/900
        let g = gap(0, 600.0);
        assert!((g - 600.0 * (220.0 / 900.0)).abs() < 1e-3);
        assert!((g - 146.666_67).abs() < 1e-2);
    }

    #[test]
    fn gap_ignores_extra_height() {
        // Taller than reference clamps to the reference gap
        assert_eq!(gap(0, 2000.0), BASE_START_GAP);
        assert_eq!(gap(0, 900.0), BASE_START_GAP);
    }

    #[test]
    fn level_five_parameters() {
        assert!((gravity(5) - 0.325).abs() < 1e-6);
        assert!((jump_impulse(5) - (-6.25)).abs() < 1e-6);
        assert!((scroll_speed(5) - 3.3).abs() < 1e-6);
    }

    #[test]
    fn spacing_floors_at_minimum() {
        // 420 - 20*level hits 90 at level 16.5, so 17+ floors
        assert_eq!(spacing(16), 100.0);
        assert_eq!(spacing(17), MIN_PIPE_SPACING);
        assert_eq!(spacing(1000), MIN_PIPE_SPACING);
    }

    proptest! {
        #[test]
        fn bounds_hold_for_any_score(score in 0u32..10_000_000) {
            let level = level_for_score(score);
            prop_assert!(gap(level, 900.0) >= MIN_PIPE_GAP);
            prop_assert!(gap(level, 300.0) >= MIN_PIPE_GAP);
            prop_assert!(spacing(level) >= MIN_PIPE_SPACING);
            prop_assert!(gravity(level) <= MAX_GRAVITY);
            prop_assert!(jump_impulse(level) >= MIN_JUMP_IMPULSE);
        }

        #[test]
        fn monotonic_in_level(a in 0u32..2_000, b in 0u32..2_000) {
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(gap(hi, 900.0) <= gap(lo, 900.0));
            prop_assert!(spacing(hi) <= spacing(lo));
            prop_assert!(gravity(hi) >= gravity(lo));
            prop_assert!(scroll_speed(hi) >= scroll_speed(lo));
            prop_assert!(jump_impulse(hi) <= jump_impulse(lo));
        }
    }
}
