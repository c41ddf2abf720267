//! The spider
//!
//! Bounces around the lower half of the field on a random walk, eating any
//! mushroom it touches. When shot it stays dead for a fixed delay and then
//! respawns at a random edge.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::centipede::Life;
use super::field::MushroomField;
use super::rect::{Bounded, Rect};
use crate::settings::Settings;

/// Ticks per animation frame
const ANIMATION_TICKS: u32 = 10;
const ANIMATION_FRAMES: u8 = 2;

/// A random unit step: -1, 0 or 1
fn random_direction(rng: &mut impl Rng) -> f32 {
    rng.random_range(-1i8..=1) as f32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spider {
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity; rescaled to `speed` every tick
    pub vel: Vec2,
    pub life: Life,
    pub speed: f32,
    initial_speed: f32,
    field_size: Vec2,
    respawn_delay: f32,
    turn_chance: f64,
    /// Seconds spent dead
    dead_for: f32,
    pub frame: u8,
    anim_tick: u32,
}

impl Spider {
    pub fn new(settings: &Settings, rng: &mut impl Rng) -> Self {
        let mut spider = Self {
            pos: Vec2::ZERO,
            size: settings.sprites.spider,
            vel: Vec2::ZERO,
            life: Life::Alive,
            speed: settings.spider_speed,
            initial_speed: settings.spider_speed,
            field_size: Vec2::new(settings.field_width, settings.field_height),
            respawn_delay: settings.spider_respawn_delay,
            turn_chance: settings.spider_turn_chance,
            dead_for: 0.0,
            frame: 0,
            anim_tick: 0,
        };
        spider.reset(true, rng);
        spider
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == Life::Alive
    }

    /// Top edge of the band the spider roams in
    fn band_top(&self) -> f32 {
        0.5 * self.field_size.y
    }

    /// Respawn at a random side edge, heading inward.
    ///
    /// `reset_speed` restores the initial speed.
    pub fn reset(&mut self, reset_speed: bool, rng: &mut impl Rng) {
        self.life = Life::Alive;
        self.dead_for = 0.0;

        let from_left = rng.random_bool(0.5);
        let x = if from_left {
            0.0
        } else {
            self.field_size.x - self.size.x
        };
        let low = self.band_top();
        let high = (self.field_size.y - self.size.y).max(low);
        let y = rng.random_range(low..=high);
        self.pos = Vec2::new(x, y);

        // Horizontal component is never zero, so the spider always moves
        let dx = if from_left { 1.0 } else { -1.0 };
        self.vel = Vec2::new(dx, random_direction(rng));

        if reset_speed {
            self.speed = self.initial_speed;
        }
    }

    /// Kill the spider and start the respawn timer
    pub fn kill(&mut self) {
        self.life = Life::Dead;
        self.dead_for = 0.0;
    }

    /// Pick a completely new direction
    pub fn change_direction(&mut self, rng: &mut impl Rng) {
        let dir = Vec2::new(random_direction(rng), random_direction(rng));
        self.vel = if dir == Vec2::ZERO { Vec2::ONE } else { dir };
    }

    /// Advance one tick. Returns the ids of mushrooms eaten this tick.
    pub fn update(&mut self, dt: f32, field: &mut MushroomField, rng: &mut impl Rng) -> Vec<u32> {
        if !self.is_alive() {
            self.dead_for += dt;
            if self.dead_for <= self.respawn_delay {
                return Vec::new();
            }
            self.reset(false, rng);
            log::debug!("Spider respawned at {}", self.pos);
        }

        // Constant speed in every direction, diagonals included
        self.vel = self.vel.normalize_or_zero() * self.speed;

        // Reflect first so the step never leaves the band
        let next = self.pos + self.vel;
        if next.x < 0.0 || next.x + self.size.x > self.field_size.x {
            self.vel.x = -self.vel.x;
        }
        let top = self.band_top();
        if next.y < top || next.y + self.size.y > self.field_size.y {
            self.vel.y = -self.vel.y;
        }

        self.pos += self.vel;
        self.pos.x = self.pos.x.clamp(0.0, (self.field_size.x - self.size.x).max(0.0));
        self.pos.y = self.pos.y.clamp(top, (self.field_size.y - self.size.y).max(top));

        if rng.random_bool(self.turn_chance) {
            self.change_direction(rng);
        }

        field.destroy_overlapping(&self.bounds())
    }

    pub fn animate(&mut self) {
        if !self.is_alive() {
            return;
        }
        if self.anim_tick % ANIMATION_TICKS == 0 {
            self.frame = (self.frame + 1) % ANIMATION_FRAMES;
        }
        self.anim_tick = self.anim_tick.wrapping_add(1);
    }
}

impl Bounded for Spider {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}
