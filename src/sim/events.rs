//! Discrete game events
//!
//! The reducer only produces snapshots. Renderers, audio and the score
//! submitter consume events recovered by comparing two consecutive
//! snapshots with [`diff`].

use serde::Serialize;

use super::state::{RunState, RunStatus};
use crate::consts::COMBO_THRESHOLD;

/// Something worth reacting to between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    RunStarted {
        seed: u64,
    },
    Jumped,
    /// One or more new floors; `floor` is the highest
    FloorReached {
        floor: u32,
        points: u64,
        combo: u32,
    },
    HazardHit {
        floor: u32,
        damage: u32,
        hp: u32,
    },
    ChapterTransition {
        chapter: u32,
        name: &'static str,
    },
    GameOver {
        score: u64,
        max_floor: u32,
        max_combo: u32,
    },
    Paused,
    Resumed,
}

/// Procedural sound effects the audio layer knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundCue {
    Start,
    Jump,
    /// Ordinary floor clear
    Floor,
    /// Floor cleared with the combo multiplier active
    ComboFloor,
    Hit,
    Chapter,
    GameOver,
}

impl GameEvent {
    /// Sound for this event, if any
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::RunStarted { .. } => Some(SoundCue::Start),
            GameEvent::Jumped => Some(SoundCue::Jump),
            GameEvent::FloorReached { combo, .. } if *combo >= COMBO_THRESHOLD => Some(SoundCue::ComboFloor),
            GameEvent::FloorReached { .. } => Some(SoundCue::Floor),
            GameEvent::HazardHit { .. } => Some(SoundCue::Hit),
            GameEvent::ChapterTransition { .. } => Some(SoundCue::Chapter),
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            GameEvent::Paused | GameEvent::Resumed => None,
        }
    }
}

/// Sounds to play for a batch of events. Muted runs play nothing.
pub fn sound_cues(events: &[GameEvent], muted: bool) -> Vec<SoundCue> {
    if muted {
        return Vec::new();
    }
    events.iter().filter_map(GameEvent::sound_cue).collect()
}

/// Events that happened between `prev` and `next`
pub fn diff(prev: &RunState, next: &RunState) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let was_active = matches!(prev.status, RunStatus::Running | RunStatus::Paused);
    if next.status == RunStatus::Running && !was_active {
        // A fresh run shares nothing with the previous snapshot
        events.push(GameEvent::RunStarted { seed: next.seed });
        return events;
    }

    if prev.status == RunStatus::Paused && next.status == RunStatus::Running {
        events.push(GameEvent::Resumed);
    }

    let hp_lost = prev.player.hp.saturating_sub(next.player.hp);
    if prev.player.grounded && !next.player.grounded && hp_lost == 0 {
        events.push(GameEvent::Jumped);
    }

    if hp_lost > 0 {
        events.push(GameEvent::HazardHit {
            floor: next.last_hit_floor.unwrap_or(next.current_floor),
            damage: hp_lost,
            hp: next.player.hp,
        });
    }

    if next.max_floor_reached > prev.max_floor_reached {
        events.push(GameEvent::FloorReached {
            floor: next.max_floor_reached,
            points: next.score.saturating_sub(prev.score),
            combo: next.combo,
        });
    }

    if next.chapter_index > prev.chapter_index {
        events.push(GameEvent::ChapterTransition {
            chapter: next.chapter_index,
            name: next.chapter().name,
        });
    }

    if prev.status != RunStatus::GameOver && next.status == RunStatus::GameOver {
        events.push(GameEvent::GameOver {
            score: next.score,
            max_floor: next.max_floor_reached,
            max_combo: next.max_combo,
        });
    }

    if prev.status == RunStatus::Running && next.status == RunStatus::Paused {
        events.push(GameEvent::Paused);
    }

    events
}
