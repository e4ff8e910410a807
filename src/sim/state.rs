//! Run state and core simulation types
//!
//! Everything a frame needs to render lives in [`RunState`]; it is replaced
//! wholesale on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chapter::{Chapter, chapter_for_floor};
use super::particles::{ChestState, Particle};
use super::tower::FloorWindow;
use crate::consts::*;
use crate::floor_at_height;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Waiting for the first START
    Title,
    /// Active gameplay
    Running,
    /// Frozen until RESUME
    Paused,
    /// HP ran out; only START leaves this state
    GameOver,
}

/// The climber (y-up, units per frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Height above the tower base
    pub height: f32,
    pub velocity: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub grounded: bool,
    /// Frames of damage immunity after a hit
    pub invincible_timer: f32,
    /// Frames during which jumping is locked after a hit
    pub knockback_timer: f32,
    /// Frames of hazard immunity after touching down
    pub landing_grace_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            height: 0.0,
            velocity: 0.0,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            grounded: true,
            invincible_timer: 0.0,
            knockback_timer: 0.0,
            landing_grace_timer: 0.0,
        }
    }
}

impl Player {
    /// Start a jump if standing and not knocked back
    pub fn jump(&mut self) -> bool {
        if !self.grounded || self.knockback_timer > 0.0 {
            return false;
        }
        self.velocity = JUMP_FORCE;
        self.grounded = false;
        true
    }

    /// Subtract hp (clamped) and start the post-hit timers.
    ///
    /// Returns false when invincibility swallowed the hit.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        if self.invincible_timer > 0.0 {
            return false;
        }
        self.hp = self.hp.saturating_sub(damage).min(self.max_hp);
        self.invincible_timer = INVINCIBLE_FRAMES;
        self.knockback_timer = KNOCKBACK_FRAMES;
        self.velocity = KNOCKBACK_VELOCITY;
        self.grounded = false;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Whether post-hit immunity is active
    pub fn is_shielded(&self) -> bool {
        self.invincible_timer > 0.0 || self.knockback_timer > 0.0
    }

    /// Whether the player stands on the plane of `floor`
    pub fn grounded_on(&self, floor: u32) -> bool {
        self.grounded && floor_at_height(self.height) == floor
    }

    /// Screen-space anchor for particles spawned on the player
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(0.0, self.height)
    }

    /// Drain the timers by `frames` reference frames of elapsed time
    pub fn decay_timers(&mut self, frames: f32) {
        self.invincible_timer = (self.invincible_timer - frames).max(0.0);
        self.knockback_timer = (self.knockback_timer - frames).max(0.0);
        self.landing_grace_timer = (self.landing_grace_timer - frames).max(0.0);
    }
}

fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

fn unseeded_rng() -> Pcg32 {
    seeded_rng(0)
}

/// Complete run state (deterministic for a given seed and action sequence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub status: RunStatus,
    /// Run seed; START re-seeds the generator from it
    pub seed: u64,
    pub player: Player,
    pub current_floor: u32,
    pub max_floor_reached: u32,
    pub score: u64,
    /// Animated score shown by the HUD
    pub display_score: u64,
    pub combo: u32,
    pub max_combo: u32,
    /// Host timestamp (ms) of the last new floor; `None` before the first
    pub last_floor_timestamp: Option<f64>,
    pub chapter_index: u32,
    /// Chapter banner pulse, decays from 1 to 0
    pub chapter_transition: f32,
    /// Camera height, eased toward the player
    pub camera_offset: f32,
    pub floors: FloorWindow,
    pub particles: Vec<Particle>,
    pub chest: ChestState,
    pub screen_shake: f32,
    pub muted: bool,
    /// Particle budget (survives restarts)
    pub particle_cap: usize,
    /// Simulated time while running (ms); drives hazard cycles
    pub elapsed_ms: f64,
    /// Host timestamp of the latest tick
    pub timestamp: f64,
    /// Floor index and time of the last hazard hit (debounce)
    pub last_hit_floor: Option<u32>,
    pub last_hit_at: f64,
    /// Number of ticks integrated this run
    pub time_ticks: u64,
    #[serde(skip, default = "unseeded_rng")]
    pub(crate) rng: Pcg32,
}

impl RunState {
    /// Fresh state on the title screen
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let floors = FloorWindow::new(&mut rng);

        Self {
            status: RunStatus::Title,
            seed,
            player: Player::default(),
            current_floor: 0,
            max_floor_reached: 0,
            score: 0,
            display_score: 0,
            combo: 0,
            max_combo: 0,
            last_floor_timestamp: None,
            chapter_index: 0,
            chapter_transition: 0.0,
            camera_offset: 0.0,
            floors,
            particles: Vec::new(),
            chest: ChestState::closed(1),
            screen_shake: 0.0,
            muted: false,
            particle_cap: MAX_PARTICLES,
            elapsed_ms: 0.0,
            timestamp: 0.0,
            last_hit_floor: None,
            last_hit_at: 0.0,
            time_ticks: 0,
            rng,
        }
    }

    /// Discard the run and start over from the same seed.
    ///
    /// The particle budget and mute flag belong to the player, not the run.
    pub fn reset(&mut self) {
        let particle_cap = self.particle_cap;
        let muted = self.muted;
        let timestamp = self.timestamp;
        *self = Self::new(self.seed);
        self.particle_cap = particle_cap;
        self.muted = muted;
        self.timestamp = timestamp;
    }

    /// Chapter the player is currently in
    pub fn chapter(&self) -> Chapter {
        chapter_for_floor(self.current_floor)
    }

    /// Simulated time in seconds (hazard clock)
    pub fn elapsed_secs(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = RunState::new(5);
        assert_eq!(state.status, RunStatus::Title);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
        assert!(state.player.grounded);
        assert_eq!(state.floors.first_index(), Some(0));
        assert!(state.floors.is_contiguous());
        assert_eq!(state.chest.floor, 1);
    }

    #[test]
    fn test_jump_rules() {
        let mut player = Player::default();
        assert!(player.jump());
        assert_eq!(player.velocity, JUMP_FORCE);
        assert!(!player.grounded);

        // Airborne: no double jump
        player.velocity = -5.0;
        assert!(!player.jump());
        assert_eq!(player.velocity, -5.0);

        // Knocked back: locked
        let mut player = Player {
            knockback_timer: 10.0,
            ..Player::default()
        };
        assert!(!player.jump());
        assert_eq!(player.velocity, 0.0);
    }

    #[test]
    fn test_damage_clamps_and_arms_timers() {
        let mut player = Player::default();
        assert!(player.take_damage(25));
        assert_eq!(player.hp, PLAYER_MAX_HP - 25);
        assert_eq!(player.invincible_timer, INVINCIBLE_FRAMES);
        assert_eq!(player.knockback_timer, KNOCKBACK_FRAMES);
        assert_eq!(player.velocity, KNOCKBACK_VELOCITY);

        // Invincible: swallowed
        assert!(!player.take_damage(25));
        assert_eq!(player.hp, PLAYER_MAX_HP - 25);

        let mut player = Player::default();
        player.take_damage(10_000);
        assert_eq!(player.hp, 0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_timers_decay_to_zero() {
        let mut player = Player {
            invincible_timer: 2.0,
            knockback_timer: 1.0,
            landing_grace_timer: 5.0,
            ..Player::default()
        };
        player.decay_timers(3.0);
        assert_eq!(player.invincible_timer, 0.0);
        assert_eq!(player.knockback_timer, 0.0);
        assert_eq!(player.landing_grace_timer, 2.0);

        // A zero-length tick drains nothing
        player.decay_timers(0.0);
        assert_eq!(player.landing_grace_timer, 2.0);
        player.decay_timers(0.5);
        assert_eq!(player.landing_grace_timer, 1.5);
    }

    #[test]
    fn test_reset_keeps_player_preferences() {
        let mut state = RunState::new(11);
        state.particle_cap = 12;
        state.muted = true;
        state.score = 900;
        state.current_floor = 7;
        state.reset();

        let mut fresh = RunState::new(11);
        fresh.particle_cap = 12;
        fresh.muted = true;
        assert_eq!(state, fresh);
    }
}
