//! Score packaging for the on-chain scoreboard
//!
//! The wallet layer sends exactly what [`ScoreSubmission::to_json`] returns,
//! once per finished run.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_COMBO_LIMIT, MAX_FLOOR_LIMIT, MAX_SCORE};
use crate::sim::{RunState, RunStatus};

/// Final result of a run, clamped to the contract limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u64,
    pub max_floor: u32,
    pub max_combo: u32,
}

impl ScoreSubmission {
    pub fn new(score: u64, max_floor: u32, max_combo: u32) -> Self {
        Self {
            score: score.min(MAX_SCORE),
            max_floor: max_floor.min(MAX_FLOOR_LIMIT),
            max_combo: max_combo.min(MAX_COMBO_LIMIT),
        }
    }

    /// Package a finished run. `None` until the run is over.
    pub fn from_state(state: &RunState) -> Option<Self> {
        if state.status != RunStatus::GameOver {
            return None;
        }
        Some(Self::new(state.score, state.max_floor_reached, state.max_combo))
    }

    /// Empty runs are not worth a transaction
    pub fn is_worth_submitting(&self) -> bool {
        self.score > 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
