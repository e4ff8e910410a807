//! Tower generation
//!
//! Floors are generated lazily into a sliding window around the player. A
//! floor's phase is rolled once at creation and never changes afterwards.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chapter::chapter_for_floor;
use super::hazard::{self, HazardKind};
use crate::consts::*;
use crate::floor_plane;

/// One rung of the tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub index: u32,
    /// Height of the floor plane
    pub vertical_offset: f32,
    /// `None` for the safe floors at the bottom of the tower
    pub hazard: Option<HazardKind>,
    /// Cycle offset in [0, 1)
    pub phase: f32,
    /// Hazard cycles per second (chapter scaled)
    pub speed: f32,
    pub damage: u32,
}

impl Floor {
    /// Elapsed time expressed in hazard cycles
    #[inline]
    pub fn hazard_time(&self, elapsed_secs: f32) -> f32 {
        elapsed_secs * self.speed
    }

    /// Height of the line whose crossing triggers the hazard
    pub fn trigger_height(&self) -> Option<f32> {
        self.hazard.map(|kind| self.vertical_offset + kind.trigger_offset())
    }

    /// Whether the hazard is lethal right now
    pub fn is_lethal(&self, elapsed_secs: f32) -> bool {
        match self.hazard {
            Some(kind) => !hazard::is_open(kind, self.hazard_time(elapsed_secs), self.phase),
            None => false,
        }
    }

    /// Telegraph flag for renderers/audio
    pub fn is_warning(&self, elapsed_secs: f32) -> bool {
        match self.hazard {
            Some(kind) => hazard::is_warning(kind, self.hazard_time(elapsed_secs), self.phase),
            None => false,
        }
    }

    /// Hazard state to draw; `None` on safe floors
    pub fn status(&self, elapsed_secs: f32) -> Option<HazardStatus> {
        let kind = self.hazard?;
        Some(HazardStatus {
            floor: self.index,
            kind,
            cycle: hazard::cycle_position(self.hazard_time(elapsed_secs), self.phase),
            lethal: self.is_lethal(elapsed_secs),
            warning: self.is_warning(elapsed_secs),
        })
    }
}

/// What a renderer needs to animate one hazard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardStatus {
    pub floor: u32,
    pub kind: HazardKind,
    /// Position in the hazard cycle, in [0, 1)
    pub cycle: f32,
    pub lethal: bool,
    pub warning: bool,
}

/// Build the floor at `index` with a freshly rolled phase
pub fn make_floor<R: Rng + ?Sized>(index: u32, rng: &mut R) -> Floor {
    let chapter = chapter_for_floor(index);
    let phase: f32 = rng.random();

    let kind = if index < SAFE_FLOORS {
        None
    } else {
        let slot = index as usize % chapter.hazards.len();
        Some(chapter.hazards[slot])
    };

    Floor {
        index,
        vertical_offset: floor_plane(index),
        hazard: kind,
        phase,
        speed: kind.map_or(0.0, |k| k.base_speed() * chapter.speed_multiplier),
        damage: kind.map_or(0, hazard::damage_for),
    }
}

/// Contiguous, strictly ordered run of buffered floors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorWindow {
    floors: VecDeque<Floor>,
}

impl FloorWindow {
    /// Window for a player standing on the bottom floor
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut window = Self::default();
        window.advance(0, rng);
        window
    }

    /// Lowest buffered index
    pub fn first_index(&self) -> Option<u32> {
        self.floors.front().map(|f| f.index)
    }

    /// Highest buffered index
    pub fn last_index(&self) -> Option<u32> {
        self.floors.back().map(|f| f.index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Floor> {
        self.floors.iter()
    }

    /// Floor lookup by tower index
    pub fn get(&self, index: u32) -> Option<&Floor> {
        let first = self.first_index()?;
        let offset = index.checked_sub(first)?;
        self.floors.get(offset as usize)
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, index: u32) -> Option<&mut Floor> {
        let first = self.first_index()?;
        let offset = index.checked_sub(first)?;
        self.floors.get_mut(offset as usize)
    }

    /// Slide the window so it covers
    /// `[player_floor - WINDOW_BACK_MARGIN, player_floor + WINDOW_AHEAD_MARGIN]`.
    ///
    /// Appends new floors on top and evicts passed floors from the bottom;
    /// existing floors are never regenerated or reordered.
    pub fn advance<R: Rng + ?Sized>(&mut self, player_floor: u32, rng: &mut R) {
        let low = player_floor.saturating_sub(WINDOW_BACK_MARGIN);
        let high = player_floor.saturating_add(WINDOW_AHEAD_MARGIN);

        // A window entirely behind the player is rebuilt from the back margin
        if self.last_index().is_some_and(|last| last < low) {
            self.floors.clear();
        }

        let start = match self.last_index() {
            Some(last) => last.checked_add(1),
            None => Some(low),
        };
        if let Some(start) = start {
            for index in start..=high {
                self.floors.push_back(make_floor(index, rng));
            }
        }

        while self.first_index().is_some_and(|first| first < low) {
            self.floors.pop_front();
        }
    }

    /// Status of every buffered hazard, bottom to top
    pub fn hazard_statuses(&self, elapsed_secs: f32) -> Vec<HazardStatus> {
        self.iter().filter_map(|floor| floor.status(elapsed_secs)).collect()
    }

    /// Whether indices form a gap-free ascending run
    pub fn is_contiguous(&self) -> bool {
        self.floors
            .iter()
            .zip(self.floors.iter().skip(1))
            .all(|(a, b)| b.index == a.index + 1)
    }
}
