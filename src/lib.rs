//! Gimmick Tower - An endless tower-climbing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, hazards, scoring, particles)
//! - `session`: Host-facing session (frame clock, events, score submission)
//! - `settings`: Player preferences and particle budget
//! - `submission`: Score packaging for the on-chain scoreboard
//! - `platform`: Browser bindings (wasm32 only)

pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod submission;

pub use session::{HostContext, SafeAreaInsets, Session};
pub use settings::{QualityPreset, Settings};
pub use submission::ScoreSubmission;

/// Game configuration constants
pub mod consts {
    /// Duration of one reference frame (60 Hz) in milliseconds.
    /// Per-frame physics constants are scaled by `dt / FRAME_MS`.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest `deltaTime` a single tick integrates (tab stalls are clamped)
    pub const MAX_TICK_MS: f32 = 50.0;
    /// Maximum ticks the session feeds for one host frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player physics (units per frame, y-up)
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_FORCE: f32 = 14.0;
    pub const MAX_FALL_SPEED: f32 = 15.0;
    pub const KNOCKBACK_VELOCITY: f32 = 8.0;
    pub const PLAYER_MAX_HP: u32 = 100;

    /// Vertical distance between two floor planes
    pub const FLOOR_HEIGHT: f32 = 120.0;
    /// Floors at the bottom of the tower that never carry a hazard
    pub const SAFE_FLOORS: u32 = 3;
    /// Floors kept behind / generated ahead of the player
    pub const WINDOW_BACK_MARGIN: u32 = 10;
    pub const WINDOW_AHEAD_MARGIN: u32 = 5;

    /// Scoring
    pub const BASE_SCORE_PER_FLOOR: u64 = 100;
    pub const CHAPTER_SCORE_BONUS: u64 = 50;
    pub const COMBO_MULTIPLIER: f64 = 1.5;
    pub const COMBO_THRESHOLD: u32 = 10;
    pub const COMBO_TIMEOUT_MS: f64 = 5000.0;
    pub const DISPLAY_CATCH_UP: f64 = 0.15;

    /// Difficulty
    pub const FLOORS_PER_CHAPTER: u32 = 50;
    /// Hazard speed added for every completed loop of the chapter catalog
    pub const LOOP_SPEED_BONUS: f32 = 0.2;

    /// Damage tiers
    pub const DAMAGE_LIGHT: u32 = 10;
    pub const DAMAGE_MEDIUM: u32 = 20;
    pub const DAMAGE_HEAVY: u32 = 30;

    /// Timers (reference frames, drained by elapsed time)
    pub const INVINCIBLE_FRAMES: f32 = 60.0;
    pub const KNOCKBACK_FRAMES: f32 = 15.0;
    pub const LANDING_GRACE_FRAMES: f32 = 15.0;
    /// Same-floor hit debounce
    pub const HIT_DEBOUNCE_MS: f64 = 1000.0;

    /// Hazard telegraph lead (fraction of a cycle)
    pub const WARNING_LEAD: f32 = 0.1;

    /// Particles
    pub const MAX_PARTICLES: usize = 100;
    pub const PARTICLE_REDUCE_THRESHOLD_FPS: f32 = 30.0;
    pub const COIN_PARTICLE_COUNT: usize = 4;
    pub const BIG_COIN_PARTICLE_COUNT: usize = 6;
    pub const SPARK_PARTICLE_COUNT: usize = 6;
    pub const PARTICLE_GRAVITY: f32 = 0.2;

    /// Treasure chest open animation speed (per frame)
    pub const CHEST_OPEN_RATE: f32 = 0.05;

    /// Presentation
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const HIT_SHAKE: f32 = 3.0;
    pub const FLOOR_SHAKE: f32 = 1.0;
    pub const BIG_COMBO_SHAKE: f32 = 4.0;
    pub const CHAPTER_TRANSITION_DECAY: f32 = 0.02;

    /// Scoreboard contract limits
    pub const MAX_SCORE: u64 = 1_000_000_000;
    pub const MAX_FLOOR_LIMIT: u32 = 100_000;
    pub const MAX_COMBO_LIMIT: u32 = 10_000;
}

/// Wrap a value into the unit interval [0, 1)
#[inline]
pub fn wrap_unit(x: f32) -> f32 {
    let t = x.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if t >= 1.0 { 0.0 } else { t }
}

/// Floor index whose cell contains the given height
#[inline]
pub fn floor_at_height(height: f32) -> u32 {
    (height.max(0.0) / consts::FLOOR_HEIGHT).floor() as u32
}

/// Height of a floor plane
#[inline]
pub fn floor_plane(index: u32) -> f32 {
    index as f32 * consts::FLOOR_HEIGHT
}
