//! Chapter catalog
//!
//! A chapter spans `FLOORS_PER_CHAPTER` floors and fixes which hazards can
//! appear. After the last catalog entry the tower loops back to the first,
//! each loop adding `LOOP_SPEED_BONUS` to the hazard speed.

use serde::Serialize;

use super::hazard::HazardKind;
use super::hazard::HazardKind::{Crumble, Flame, Laser, Press, RotatingBar, SlideDoor};
use crate::consts::*;

/// Static catalog entry
#[derive(Debug)]
struct ChapterDef {
    name: &'static str,
    hazards: &'static [HazardKind],
    speed_multiplier: f32,
}

const CATALOG: [ChapterDef; 6] = [
    ChapterDef {
        name: "Dark Cellar",
        hazards: &[SlideDoor, Crumble],
        speed_multiplier: 1.0,
    },
    ChapterDef {
        name: "Crumbling Keep",
        hazards: &[SlideDoor, RotatingBar, Press],
        speed_multiplier: 1.1,
    },
    ChapterDef {
        name: "Storm Battlement",
        hazards: &[Flame, Crumble, Press],
        speed_multiplier: 1.2,
    },
    ChapterDef {
        name: "Frozen Parapet",
        hazards: &[SlideDoor, Laser, Crumble],
        speed_multiplier: 1.3,
    },
    ChapterDef {
        name: "Mossy Ruins",
        hazards: &[RotatingBar, Flame, Crumble],
        speed_multiplier: 1.4,
    },
    ChapterDef {
        name: "Haunted Peak",
        hazards: &[Laser, RotatingBar, Press, Flame],
        speed_multiplier: 1.5,
    },
];

/// Number of distinct chapters before the catalog loops
pub const CHAPTER_COUNT: u32 = CATALOG.len() as u32;

/// A resolved chapter for some floor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    /// Absolute chapter index (keeps counting across loops)
    pub index: u32,
    pub name: &'static str,
    pub hazards: &'static [HazardKind],
    /// Hazard speed scaling, including the loop bonus
    pub speed_multiplier: f32,
    /// Opaque palette reference for the renderer (catalog slot)
    pub palette: u32,
}

impl Chapter {
    /// How many times the catalog has been completed before this chapter
    pub fn loop_count(&self) -> u32 {
        self.index / CHAPTER_COUNT
    }
}

/// Absolute chapter index for a floor
#[inline]
pub fn chapter_index(floor: u32) -> u32 {
    floor / FLOORS_PER_CHAPTER
}

/// Resolve the chapter owning a floor. Defined for every index.
pub fn chapter_for_floor(floor: u32) -> Chapter {
    let index = chapter_index(floor);
    let slot = index % CHAPTER_COUNT;
    let loops = index / CHAPTER_COUNT;
    let def = &CATALOG[slot as usize];

    Chapter {
        index,
        name: def.name,
        hazards: def.hazards,
        speed_multiplier: def.speed_multiplier + loops as f32 * LOOP_SPEED_BONUS,
        palette: slot,
    }
}

/// Whether reaching this floor enters a new chapter
#[inline]
pub fn is_chapter_transition(floor: u32) -> bool {
    floor > 0 && floor.is_multiple_of(FLOORS_PER_CHAPTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_boundaries() {
        assert_eq!(chapter_for_floor(0).index, 0);
        assert_eq!(chapter_for_floor(49).index, 0);
        assert_eq!(chapter_for_floor(50).index, 1);
        assert_eq!(chapter_for_floor(50).name, "Crumbling Keep");
        assert_eq!(chapter_for_floor(299).name, "Haunted Peak");
    }

    #[test]
    fn test_catalog_loops_harder() {
        let first = chapter_for_floor(0);
        let looped = chapter_for_floor(FLOORS_PER_CHAPTER * CHAPTER_COUNT);
        assert_eq!(looped.name, first.name);
        assert_eq!(looped.palette, first.palette);
        assert_eq!(looped.loop_count(), 1);
        assert!((looped.speed_multiplier - (first.speed_multiplier + LOOP_SPEED_BONUS)).abs() < 1e-6);

        let twice = chapter_for_floor(FLOORS_PER_CHAPTER * CHAPTER_COUNT * 2 + 10);
        assert!(twice.speed_multiplier > looped.speed_multiplier);
    }

    #[test]
    fn test_huge_floor_is_well_defined() {
        let chapter = chapter_for_floor(u32::MAX);
        assert!(!chapter.hazards.is_empty());
        assert!(chapter.palette < CHAPTER_COUNT);
    }

    #[test]
    fn test_chapter_transition_floors() {
        assert!(!is_chapter_transition(0));
        assert!(!is_chapter_transition(49));
        assert!(is_chapter_transition(50));
        assert!(is_chapter_transition(100));
        assert!(!is_chapter_transition(101));
    }
}
