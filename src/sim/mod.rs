//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Every transition goes through [`apply`]
//! - Seeded RNG only (stored in the run state)
//! - Hazards are functions of elapsed time, never advanced per tick
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod chapter;
pub mod events;
pub mod hazard;
pub mod particles;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod tower;

pub use chapter::{CHAPTER_COUNT, Chapter, chapter_for_floor, chapter_index, is_chapter_transition};
pub use events::{GameEvent, SoundCue, diff, sound_cues};
pub use hazard::{HazardKind, damage_for, is_open, is_warning};
pub use particles::{ChestState, Particle, ParticleKind};
pub use scoring::{FloorScore, apply_combo_bonus, base_score_for_floor, should_keep_combo};
pub use state::{Player, RunState, RunStatus};
pub use tick::{Action, apply, reduce, tick};
pub use tower::{Floor, FloorWindow, HazardStatus};
