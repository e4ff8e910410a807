//! Score and combo bookkeeping

use serde::{Deserialize, Serialize};

use super::chapter::chapter_index;
use crate::consts::*;

/// Points awarded for reaching a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorScore {
    pub points: u64,
    /// Combo multiplier was applied
    pub has_bonus: bool,
}

/// Base points for a floor: grows by `CHAPTER_SCORE_BONUS` every chapter
pub fn base_score_for_floor(floor: u32) -> u64 {
    BASE_SCORE_PER_FLOOR + chapter_index(floor) as u64 * CHAPTER_SCORE_BONUS
}

/// Apply the combo multiplier once the combo reaches the threshold
pub fn apply_combo_bonus(base: u64, combo: u32) -> u64 {
    if combo >= COMBO_THRESHOLD {
        (base as f64 * COMBO_MULTIPLIER).floor() as u64
    } else {
        base
    }
}

/// Score for reaching `floor` with the combo held before arrival
pub fn floor_score(floor: u32, combo: u32) -> FloorScore {
    let base = base_score_for_floor(floor);
    FloorScore {
        points: apply_combo_bonus(base, combo),
        has_bonus: combo >= COMBO_THRESHOLD,
    }
}

/// Whether a combo started at `last_at` is still alive at `now` (ms)
#[inline]
pub fn should_keep_combo(last_at: f64, now: f64) -> bool {
    now - last_at <= COMBO_TIMEOUT_MS
}

/// Combo after reaching a new floor.
///
/// The first floor of a run always continues the combo; otherwise the
/// combo restarts at 1 when the previous floor is too long ago.
pub fn next_combo(combo: u32, last_floor_at: Option<f64>, now: f64) -> u32 {
    match last_floor_at {
        Some(last) if !should_keep_combo(last, now) => 1,
        _ => combo.saturating_add(1),
    }
}

/// Add points, saturating at the scoreboard limit
#[inline]
pub fn add_score(score: u64, points: u64) -> u64 {
    score.saturating_add(points).min(MAX_SCORE)
}

/// Move the displayed score one step toward the real score.
///
/// Closes `DISPLAY_CATCH_UP` of the gap (at least 1 point) and never
/// overshoots, so it lands exactly on `score` in bounded steps.
pub fn advance_display_score(display: u64, score: u64) -> u64 {
    if display >= score {
        return score;
    }
    let gap = score - display;
    let step = ((gap as f64 * DISPLAY_CATCH_UP).ceil() as u64).max(1);
    (display + step).min(score)
}
