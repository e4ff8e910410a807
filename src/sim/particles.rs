//! Reward and hit-feedback particles, plus the treasure chest
//!
//! Particles are presentation only. They never influence gameplay, but they
//! live in the run state so the whole frame stays a single snapshot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Particle sub-types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Coin,
    /// Large coin from a big-combo chest
    BigCoin,
    /// Hit spark
    Spark,
}

/// A ballistic particle (y-up, units per frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// Remaining life in frames
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// Advance by `frames` reference frames
    pub fn integrate(&mut self, frames: f32) {
        self.pos += self.vel * frames;
        self.vel.y -= PARTICLE_GRAVITY * frames;
        self.life -= frames;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// How many of `requested` particles fit in the budget
#[inline]
pub fn spawn_allowance(current: usize, cap: usize, requested: usize) -> usize {
    requested.min(cap.saturating_sub(current))
}

/// Coin fountain from an opened chest.
///
/// A big combo produces a larger burst with at least one big coin.
pub fn coin_burst<R: Rng + ?Sized>(origin: Vec2, big_combo: bool, count: usize, rng: &mut R) -> Vec<Particle> {
    let full = if big_combo {
        BIG_COIN_PARTICLE_COUNT
    } else {
        COIN_PARTICLE_COUNT
    };
    let count = count.min(full);

    (0..count)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / full as f32 + rng.random_range(0.0..0.3);
            let speed = rng.random_range(3.0..7.0);
            let big = big_combo && (i == 0 || rng.random_bool(0.5));
            // Coins pop upward before falling
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed + 5.0);

            Particle {
                pos: origin,
                vel,
                kind: if big { ParticleKind::BigCoin } else { ParticleKind::Coin },
                life: rng.random_range(60.0..90.0),
                max_life: 90.0,
                size: if big { 12.0 } else { 6.0 },
            }
        })
        .collect()
}

/// Spark spray at the point of a hazard hit
pub fn spark_burst<R: Rng + ?Sized>(origin: Vec2, count: usize, rng: &mut R) -> Vec<Particle> {
    (0..count.min(SPARK_PARTICLE_COUNT))
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(2.0..5.0);
            Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                kind: ParticleKind::Spark,
                life: rng.random_range(20.0..30.0),
                max_life: 30.0,
                size: rng.random_range(3.0..6.0),
            }
        })
        .collect()
}

/// Integrate all particles and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>, frames: f32) {
    for particle in particles.iter_mut() {
        particle.integrate(frames);
    }
    particles.retain(Particle::is_alive);
}

/// The treasure chest waiting above the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChestState {
    pub floor: u32,
    pub opened: bool,
    /// Open animation progress in [0, 1]
    pub open_phase: f32,
}

impl ChestState {
    pub fn closed(floor: u32) -> Self {
        Self {
            floor,
            opened: false,
            open_phase: 0.0,
        }
    }

    /// Pop the chest open (idempotent)
    pub fn open(&mut self) {
        self.opened = true;
    }

    /// Animate; a finished chest is replaced by a fresh one a floor higher
    pub fn update(&mut self, frames: f32) {
        if !self.opened {
            return;
        }
        self.open_phase = (self.open_phase + CHEST_OPEN_RATE * frames).min(1.0);
        if self.open_phase >= 1.0 {
            *self = Self::closed(self.floor.saturating_add(1));
        }
    }
}
