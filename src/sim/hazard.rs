//! Hazard ("gimmick") model
//!
//! Hazards are stateless: danger at any instant is derived from the hazard
//! kind, the floor's fixed phase and elapsed time measured in hazard cycles.
//! Nothing here is stored or advanced per tick.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wrap_unit;

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Door sliding across the shaft
    SlideDoor,
    /// Bar spinning around the shaft center
    RotatingBar,
    /// Crushing press dropping from above
    Press,
    /// Horizontal laser beam
    Laser,
    /// Crumbling floor section (hurts only grounded players)
    Crumble,
    /// Flame jet
    Flame,
}

impl HazardKind {
    pub const ALL: [HazardKind; 6] = [
        Self::SlideDoor,
        Self::RotatingBar,
        Self::Press,
        Self::Laser,
        Self::Crumble,
        Self::Flame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::SlideDoor => "slideDoor",
            HazardKind::RotatingBar => "rotatingBar",
            HazardKind::Press => "press",
            HazardKind::Laser => "laser",
            HazardKind::Crumble => "crumble",
            HazardKind::Flame => "flame",
        }
    }

    /// Base cycles per second before chapter scaling
    pub fn base_speed(&self) -> f32 {
        match self {
            HazardKind::SlideDoor => 0.6,
            HazardKind::RotatingBar => 0.8,
            HazardKind::Press => 0.28,
            HazardKind::Laser => 0.15,
            HazardKind::Crumble => 0.4,
            HazardKind::Flame => 0.4,
        }
    }

    /// Height of the trigger line above the owning floor plane
    pub fn trigger_offset(&self) -> f32 {
        match self {
            HazardKind::Crumble => 0.0,
            _ => FLOOR_HEIGHT / 2.0,
        }
    }

    /// Whether the hazard only affects a player standing on the floor
    pub fn grounded_only(&self) -> bool {
        *self == HazardKind::Crumble
    }
}

/// Position within the hazard cycle, in [0, 1)
#[inline]
pub fn cycle_position(time: f32, phase: f32) -> f32 {
    wrap_unit(time + phase)
}

/// Lethal window on the unit cycle
fn is_lethal_at(kind: HazardKind, t: f32) -> bool {
    match kind {
        HazardKind::SlideDoor => t > 0.3 && t < 0.7,
        HazardKind::RotatingBar => {
            // Dangerous while the bar sweeps near horizontal
            let angle = t * std::f32::consts::TAU;
            angle.sin().abs() > 0.7
        }
        HazardKind::Press => t > 0.6 && t < 0.9,
        HazardKind::Laser => t > 0.5 && t < 0.8,
        HazardKind::Crumble => t > 0.5 && t < 0.85,
        HazardKind::Flame => t > 0.3 && t < 0.6,
    }
}

/// Whether the hazard is passable. `time` is measured in hazard cycles.
pub fn is_open(kind: HazardKind, time: f32, phase: f32) -> bool {
    !is_lethal_at(kind, cycle_position(time, phase))
}

/// Whether the hazard is about to become lethal.
///
/// Presentation hint only; collision never consults it.
pub fn is_warning(kind: HazardKind, time: f32, phase: f32) -> bool {
    let t = cycle_position(time, phase);
    !is_lethal_at(kind, t) && is_lethal_at(kind, wrap_unit(t + WARNING_LEAD))
}

/// Fixed damage tier per hazard type
pub fn damage_for(kind: HazardKind) -> u32 {
    match kind {
        HazardKind::SlideDoor | HazardKind::Crumble => DAMAGE_LIGHT,
        HazardKind::RotatingBar | HazardKind::Flame => DAMAGE_MEDIUM,
        HazardKind::Press | HazardKind::Laser => DAMAGE_HEAVY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_door_windows() {
        assert!(is_open(HazardKind::SlideDoor, 0.1, 0.0));
        assert!(!is_open(HazardKind::SlideDoor, 0.5, 0.0));
        assert!(is_open(HazardKind::SlideDoor, 0.8, 0.0));
        // Phase shifts the cycle
        assert!(!is_open(HazardKind::SlideDoor, 0.1, 0.4));
        // Whole cycles are irrelevant
        assert!(!is_open(HazardKind::SlideDoor, 7.5, 0.0));
    }

    #[test]
    fn test_rotating_bar_near_horizontal() {
        // sin peaks at t = 0.25 and 0.75
        assert!(!is_open(HazardKind::RotatingBar, 0.25, 0.0));
        assert!(!is_open(HazardKind::RotatingBar, 0.75, 0.0));
        assert!(is_open(HazardKind::RotatingBar, 0.0, 0.0));
        assert!(is_open(HazardKind::RotatingBar, 0.5, 0.0));
    }

    #[test]
    fn test_press_late_window() {
        assert!(is_open(HazardKind::Press, 0.5, 0.0));
        assert!(!is_open(HazardKind::Press, 0.75, 0.0));
        assert!(is_open(HazardKind::Press, 0.95, 0.0));
    }

    #[test]
    fn test_warning_precedes_lethal_window() {
        // Laser turns lethal after 0.5
        assert!(is_warning(HazardKind::Laser, 0.45, 0.0));
        assert!(!is_warning(HazardKind::Laser, 0.3, 0.0));
        // Never warns while already lethal
        assert!(!is_warning(HazardKind::Laser, 0.6, 0.0));
        // Press window wraps the warning across the lead
        assert!(is_warning(HazardKind::Press, 0.55, 0.0));
    }

    #[test]
    fn test_warning_never_lethal() {
        for kind in HazardKind::ALL {
            for i in 0..200 {
                let t = i as f32 / 200.0;
                if is_warning(kind, t, 0.0) {
                    assert!(is_open(kind, t, 0.0), "{} at {t}", kind.as_str());
                }
            }
        }
    }

    #[test]
    fn test_damage_tiers() {
        assert_eq!(damage_for(HazardKind::SlideDoor), DAMAGE_LIGHT);
        assert_eq!(damage_for(HazardKind::Crumble), DAMAGE_LIGHT);
        assert_eq!(damage_for(HazardKind::RotatingBar), DAMAGE_MEDIUM);
        assert_eq!(damage_for(HazardKind::Flame), DAMAGE_MEDIUM);
        assert_eq!(damage_for(HazardKind::Press), DAMAGE_HEAVY);
        assert_eq!(damage_for(HazardKind::Laser), DAMAGE_HEAVY);
    }
}
