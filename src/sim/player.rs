//! The player's blaster and its laser blasts

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::MushroomField;
use super::rect::{Bounded, Rect};
use super::state::EntityIds;
use crate::settings::Settings;

/// Movement request for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::None => Vec2::ZERO,
        }
    }
}

/// A single upward-travelling shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserBlast {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl LaserBlast {
    /// Move one tick up the field
    pub fn advance(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Whether the blast has left the field vertically
    pub fn is_out_of_bounds(&self, field_height: f32) -> bool {
        self.pos.y < 0.0 || self.pos.y > field_height
    }
}

impl Bounded for LaserBlast {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// The player actor. Owns every blast in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blaster {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub lives: u8,
    pub score: u64,
    /// Best score this process has seen
    pub high_score: u64,
    pub blasts: Vec<LaserBlast>,
    blast_size: Vec2,
    blast_speed: f32,
    reload_time: f32,
    /// Seconds since the last shot
    since_shot: f32,
    starting_lives: u8,
    field_size: Vec2,
}

impl Blaster {
    pub fn new(settings: &Settings) -> Self {
        let mut blaster = Self {
            pos: Vec2::ZERO,
            size: settings.sprites.blaster,
            speed: settings.blaster_speed,
            lives: settings.starting_lives,
            score: 0,
            high_score: 0,
            blasts: Vec::new(),
            blast_size: settings.sprites.blast,
            blast_speed: settings.blast_speed,
            reload_time: settings.reload_time,
            // Ready to fire straight away
            since_shot: settings.reload_time,
            starting_lives: settings.starting_lives,
            field_size: Vec2::new(settings.field_width, settings.field_height),
        };
        blaster.reset_position();
        blaster
    }

    /// Spawn point: horizontally centered, two sprite heights above the bottom
    pub fn spawn_position(&self) -> Vec2 {
        Vec2::new(
            0.5 * self.field_size.x,
            self.field_size.y - 2.0 * self.size.y,
        )
    }

    pub fn reset_position(&mut self) {
        self.pos = self.spawn_position();
    }

    /// Fresh game: no blasts, zero score, full lives, back at spawn.
    /// The high score survives.
    pub fn reset(&mut self) {
        self.blasts.clear();
        self.score = 0;
        self.lives = self.starting_lives;
        self.since_shot = self.reload_time;
        self.reset_position();
    }

    /// Try to move one step. Rejected moves leave the blaster where it is.
    ///
    /// The blaster stays in the lower half of the field and cannot pass
    /// through mushrooms. Returns whether the move happened.
    pub fn try_move(&mut self, direction: Direction, field: &MushroomField) -> bool {
        if direction == Direction::None {
            return false;
        }
        let next = self.pos + direction.delta() * self.speed;
        let in_bounds = next.x >= 0.0
            && next.x + self.size.x <= self.field_size.x
            && next.y >= 0.5 * self.field_size.y
            && next.y + self.size.y <= self.field_size.y;
        if !in_bounds || field.any_overlapping(&Rect::new(next, self.size)) {
            return false;
        }
        self.pos = next;
        true
    }

    /// Count down the reload timer
    pub fn cool_down(&mut self, dt: f32) {
        self.since_shot += dt;
    }

    pub fn can_shoot(&self) -> bool {
        self.since_shot >= self.reload_time
    }

    /// Fire a blast from the nose of the ship. A request while reloading is
    /// ignored. Returns the id of the new blast.
    pub fn shoot(&mut self, ids: &mut EntityIds) -> Option<u32> {
        if !self.can_shoot() {
            return None;
        }
        self.since_shot = 0.0;

        let id = ids.next_id();
        let x = self.pos.x + 0.5 * self.size.x - 0.5 * self.blast_size.x;
        self.blasts.push(LaserBlast {
            id,
            pos: Vec2::new(x, self.pos.y),
            size: self.blast_size,
            speed: self.blast_speed,
        });
        Some(id)
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    pub fn update_high_score(&mut self) {
        self.high_score = self.high_score.max(self.score);
    }

    /// Lose a life and go back to spawn. Score is kept.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.reset_position();
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }
}

impl Bounded for Blaster {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}
