//! Mushroom field
//!
//! Destructible grid-aligned obstacles. A mushroom survives one hit
//! (becoming damaged) and is removed from the field on the second.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::rect::{Bounded, Rect};
use super::state::EntityIds;
use crate::consts::MUSHROOM_HEALTH;

/// A single mushroom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mushroom {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// 2 = fresh, 1 = damaged, 0 = destroyed
    pub health: u8,
}

impl Mushroom {
    pub fn new(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            size,
            health: MUSHROOM_HEALTH,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Damaged mushrooms render with the cracked sprite
    pub fn is_damaged(&self) -> bool {
        self.health == 1
    }
}

impl Bounded for Mushroom {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Result of hitting a mushroom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MushroomHit {
    Damaged,
    Destroyed,
}

/// The obstacle field; owns every mushroom
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MushroomField {
    mushrooms: Vec<Mushroom>,
}

impl MushroomField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field with `count` mushrooms on random grid cells.
    ///
    /// Candidate cells leave a one-cell border at the top, left and right and
    /// a three-cell border at the bottom for the player.
    pub fn generate(
        &mut self,
        count: usize,
        field_size: Vec2,
        cell: Vec2,
        rng: &mut impl Rng,
        ids: &mut EntityIds,
    ) {
        self.mushrooms.clear();

        let cols = (field_size.x / cell.x).floor() as i32;
        let rows = (field_size.y / cell.y).floor() as i32;
        let mut cells: Vec<Vec2> = (1..cols - 1)
            .flat_map(|col| (1..rows - 3).map(move |row| Vec2::new(col as f32, row as f32)))
            .map(|grid| grid * cell)
            .collect();
        cells.shuffle(rng);

        for pos in cells.into_iter().take(count) {
            self.mushrooms.push(Mushroom::new(ids.next_id(), pos, cell));
        }

        log::debug!("Generated field with {} mushrooms", self.mushrooms.len());
    }

    /// Add a fresh mushroom at `pos`
    pub fn add(&mut self, id: u32, pos: Vec2, size: Vec2) {
        self.mushrooms.push(Mushroom::new(id, pos, size));
    }

    /// Remove every mushroom
    pub fn clear(&mut self) {
        self.mushrooms.clear();
    }

    /// Live mushrooms in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Mushroom> {
        self.mushrooms.iter().filter(|m| m.is_alive())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: u32) -> Option<&Mushroom> {
        self.iter().find(|m| m.id == id)
    }

    /// First live mushroom overlapping `bounds`
    pub fn first_overlapping(&self, bounds: &Rect) -> Option<&Mushroom> {
        self.iter().find(|m| m.bounds().intersects(bounds))
    }

    /// Whether any live mushroom overlaps `bounds`
    pub fn any_overlapping(&self, bounds: &Rect) -> bool {
        self.first_overlapping(bounds).is_some()
    }

    /// Take one hit. The mushroom leaves the field when its health reaches 0.
    pub fn hit(&mut self, id: u32) -> Option<MushroomHit> {
        let mushroom = self.mushrooms.iter_mut().find(|m| m.id == id && m.is_alive())?;
        mushroom.health -= 1;
        if mushroom.is_alive() {
            Some(MushroomHit::Damaged)
        } else {
            self.mushrooms.retain(|m| m.id != id);
            Some(MushroomHit::Destroyed)
        }
    }

    /// Destroy every mushroom overlapping `bounds` regardless of health.
    /// Returns the ids that were removed.
    pub fn destroy_overlapping(&mut self, bounds: &Rect) -> Vec<u32> {
        let mut destroyed = Vec::new();
        self.mushrooms.retain(|m| {
            let hit = m.bounds().intersects(bounds);
            if hit {
                destroyed.push(m.id);
            }
            !hit
        });
        destroyed
    }
}
