//! Simulation reducer
//!
//! Every transition of a run goes through [`apply`]. Ticks integrate physics,
//! resolve hazard hits and floor arrivals, then decay the cosmetic timers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chapter::{chapter_for_floor, chapter_index, is_chapter_transition};
use super::particles::{ChestState, coin_burst, spark_burst, spawn_allowance, update_particles};
use super::scoring::{add_score, advance_display_score, floor_score, next_combo, should_keep_combo};
use super::state::{Player, RunState, RunStatus};
use crate::consts::*;
use crate::{floor_at_height, floor_plane};

/// Host inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Start,
    Jump,
    /// One animation frame: `delta_ms` of simulated time at host `timestamp`
    Tick { delta_ms: f64, timestamp: f64 },
    Pause,
    Resume,
    ToggleMute,
    SetParticleCap { cap: usize },
}

/// Apply an action in place. Actions outside their valid state are no-ops.
pub fn apply(state: &mut RunState, action: &Action) {
    match *action {
        Action::Start => match state.status {
            RunStatus::Title | RunStatus::GameOver => {
                state.reset();
                state.status = RunStatus::Running;
                log::info!("Run started (seed {})", state.seed);
            }
            RunStatus::Running | RunStatus::Paused => {}
        },
        Action::Jump => {
            if state.is_running() {
                state.player.jump();
            }
        }
        Action::Tick { delta_ms, timestamp } => tick(state, delta_ms, timestamp),
        Action::Pause => {
            if state.status == RunStatus::Running {
                state.status = RunStatus::Paused;
            }
        }
        Action::Resume => {
            if state.status == RunStatus::Paused {
                state.status = RunStatus::Running;
            }
        }
        Action::ToggleMute => state.muted = !state.muted,
        Action::SetParticleCap { cap } => state.particle_cap = cap,
    }
}

/// Pure form of [`apply`]: returns the next snapshot, leaving `state` untouched
pub fn reduce(state: &RunState, action: &Action) -> RunState {
    let mut next = state.clone();
    apply(&mut next, action);
    next
}

/// Advance a running game by one frame.
///
/// Paused, title and game-over states are frozen: the tick is ignored.
pub fn tick(state: &mut RunState, delta_ms: f64, timestamp: f64) {
    if !state.is_running() {
        return;
    }

    let dt = if delta_ms.is_finite() {
        (delta_ms as f32).clamp(0.0, MAX_TICK_MS)
    } else {
        0.0
    };
    let frames = dt / FRAME_MS;
    let now = timestamp;

    state.time_ticks += 1;
    state.elapsed_ms += dt as f64;
    state.timestamp = now;

    // Combo timeout
    if let Some(last) = state.last_floor_timestamp {
        if !should_keep_combo(last, now) {
            state.combo = 0;
        }
    }

    let prev_height = state.player.height;
    integrate_player(&mut state.player, frames);

    let hit = resolve_hazards(state, prev_height, now);

    if state.player.is_dead() {
        state.status = RunStatus::GameOver;
        log::info!(
            "Game over: score {} floor {} max combo {}",
            state.score,
            state.max_floor_reached,
            state.max_combo
        );
    } else {
        reach_floors(state, now, hit);
    }

    // Window, particles and timers
    state.floors.advance(state.current_floor, &mut state.rng);
    update_particles(&mut state.particles, frames);
    state.chest.update(frames);
    state.player.decay_timers(frames);

    state.screen_shake *= SHAKE_DECAY.powf(frames);
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }
    state.chapter_transition = (state.chapter_transition - CHAPTER_TRANSITION_DECAY * frames).max(0.0);

    let follow = (CAMERA_SMOOTHING * frames).min(1.0);
    state.camera_offset += (state.player.height - state.camera_offset) * follow;

    state.display_score = advance_display_score(state.display_score, state.score);
}

/// Gravity, fall clamp and landing on the floor plane below
fn integrate_player(player: &mut Player, frames: f32) {
    if player.grounded {
        player.velocity = 0.0;
        return;
    }

    player.velocity = (player.velocity - GRAVITY * frames).max(-MAX_FALL_SPEED);

    // Plane the player would land on, taken before moving
    let landing_level = floor_plane(floor_at_height(player.height));
    player.height += player.velocity * frames;

    if player.velocity < 0.0 && player.height <= landing_level {
        player.height = landing_level;
        player.velocity = 0.0;
        player.grounded = true;
        player.landing_grace_timer = LANDING_GRACE_FRAMES;
    }
}

/// Check the hazard on the player's floor. Returns true when damage landed.
fn resolve_hazards(state: &mut RunState, prev_height: f32, now: f64) -> bool {
    let player = &state.player;
    if player.is_shielded() {
        return false;
    }

    let height = player.height;
    let floor_index = floor_at_height(height);
    let Some(floor) = state.floors.get(floor_index) else {
        return false;
    };
    let (Some(kind), Some(line)) = (floor.hazard, floor.trigger_height()) else {
        return false;
    };

    let touched = if kind.grounded_only() {
        // Crumbling sections only bite while standing on them
        player.grounded && (height - line).abs() < 0.5
    } else {
        // Before/after comparison so a fast tick cannot skip the line
        (prev_height < line) != (height < line)
    };
    if !touched || !floor.is_lethal(state.elapsed_secs()) {
        return false;
    }

    if player.landing_grace_timer > 0.0 && player.grounded_on(floor_index) {
        return false;
    }
    if state.last_hit_floor == Some(floor_index) && now - state.last_hit_at < HIT_DEBOUNCE_MS {
        return false;
    }

    let damage = floor.damage;
    if !state.player.take_damage(damage) {
        return false;
    }

    state.combo = 0;
    state.last_hit_floor = Some(floor_index);
    state.last_hit_at = now;
    state.screen_shake = HIT_SHAKE;

    let count = spawn_allowance(state.particles.len(), state.particle_cap, SPARK_PARTICLE_COUNT);
    let sparks = spark_burst(state.player.anchor(), count, &mut state.rng);
    state.particles.extend(sparks);

    log::debug!(
        "Hit by {} on floor {} for {} (hp {})",
        kind.as_str(),
        floor_index,
        damage,
        state.player.hp
    );
    true
}

/// Credit every floor newly reached this tick
fn reach_floors(state: &mut RunState, now: f64, hit_this_tick: bool) {
    let reached = floor_at_height(state.player.height);
    if reached <= state.current_floor {
        return;
    }
    state.current_floor = reached;

    while state.max_floor_reached < reached {
        let floor = state.max_floor_reached + 1;
        state.max_floor_reached = floor;

        let gained = floor_score(floor, state.combo);
        state.score = add_score(state.score, gained.points);

        // A hit this tick keeps the combo at zero
        if !hit_this_tick {
            state.combo = next_combo(state.combo, state.last_floor_timestamp, now);
            state.max_combo = state.max_combo.max(state.combo);
        }
        state.last_floor_timestamp = Some(now);

        let big_combo = state.combo >= COMBO_THRESHOLD;
        state.chest = ChestState::closed(floor);
        state.chest.open();

        let full = if big_combo {
            BIG_COIN_PARTICLE_COUNT
        } else {
            COIN_PARTICLE_COUNT
        };
        let count = spawn_allowance(state.particles.len(), state.particle_cap, full);
        let coins = coin_burst(Vec2::new(0.0, floor_plane(floor)), big_combo, count, &mut state.rng);
        state.particles.extend(coins);

        let shake = if big_combo { BIG_COMBO_SHAKE } else { FLOOR_SHAKE };
        state.screen_shake = state.screen_shake.max(shake);

        if is_chapter_transition(floor) {
            state.chapter_index = chapter_index(floor);
            state.chapter_transition = 1.0;
            log::info!("Entering chapter {} ({})", state.chapter_index, chapter_for_floor(floor).name);
        }

        log::debug!("Floor {} reached: +{} (combo {})", floor, gained.points, state.combo);
    }
}
