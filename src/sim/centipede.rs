//! The centipede: a chain of grid-snapping segments
//!
//! Heads steer themselves: they reverse on mushrooms, on other segments and
//! at the field edges, and only stop moving vertically on a grid row. Bodies
//! replay their predecessor's motion through a fixed-lag delay line, so the
//! chain reads as one connected creature without storing a path.
//!
//! A segment never collides with its *trailing bodies*, the run of living
//! body segments directly behind it. It does collide with anything ahead of
//! it and with runs that have been cut off by a kill.

use std::ops::Range;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::delay::DelayLine;
use super::field::MushroomField;
use super::rect::{Bounded, Rect};
use super::state::EntityIds;
use crate::settings::Settings;
use crate::sign;

/// Ticks per animation frame
const ANIMATION_TICKS: u32 = 15;
/// Animation frames per segment sprite
const ANIMATION_FRAMES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentRole {
    Head,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Life {
    Alive,
    Dead,
}

/// Sprite orientation derived from the direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
    /// Rotated -90 degrees
    Up,
    /// Rotated 90 degrees
    Down,
}

impl Facing {
    /// Vertical travel wins over horizontal
    pub fn from_direction(dx: i8, dy: i8) -> Self {
        match (dx, dy) {
            (_, 1) => Facing::Down,
            (_, -1) => Facing::Up,
            (-1, _) => Facing::Left,
            _ => Facing::Right,
        }
    }

    /// Whether the sprite is mirrored horizontally
    pub fn flipped(&self) -> bool {
        *self == Facing::Left
    }
}

/// One tick of segment motion, as replayed by the following body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub pos: Vec2,
    pub dx: i8,
    pub dy: i8,
}

/// Delay-line length: ticks needed to travel one sprite width.
///
/// A stalled or broken speed gets the shortest line.
pub fn delay_ticks(sprite_width: f32, speed: f32) -> usize {
    let ticks = (sprite_width / speed).ceil();
    if ticks.is_finite() && ticks >= 1.0 {
        ticks as usize
    } else {
        1
    }
}

/// A single centipede segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub role: SegmentRole,
    pub life: Life,
    /// Top-left corner; x is continuous, y rests on grid rows
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal direction (-1, 0, 1)
    pub dx: i8,
    /// Vertical direction (-1, 0, 1)
    pub dy: i8,
    /// Vertical intent held while the way down/up is blocked
    pub saved_dy: i8,
    /// Predecessor motion waiting to be replayed (bodies only)
    pub trail: DelayLine<Step>,
    pub facing: Facing,
    /// Current animation frame
    pub frame: u8,
    anim_tick: u32,
}

impl Segment {
    pub fn new(id: u32, role: SegmentRole, pos: Vec2, size: Vec2, speed: f32) -> Self {
        let (dx, dy) = (1, 1);
        Self {
            id,
            role,
            life: Life::Alive,
            pos,
            size,
            dx,
            dy,
            saved_dy: 0,
            trail: DelayLine::new(delay_ticks(size.x, speed), Step { pos, dx, dy }),
            facing: Facing::from_direction(dx, dy),
            frame: 0,
            anim_tick: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == Life::Alive
    }

    #[inline]
    pub fn is_head(&self) -> bool {
        self.role == SegmentRole::Head
    }

    /// Current position and direction
    pub fn step(&self) -> Step {
        Step {
            pos: self.pos,
            dx: self.dx,
            dy: self.dy,
        }
    }

    /// Bounds after one step in direction (`dx`, `dy`)
    pub fn next_bounds(&self, dx: i8, dy: i8, speed: f32) -> Rect {
        self.bounds().offset(Vec2::new(dx as f32, dy as f32) * speed)
    }

    /// Advance a head by one tick.
    ///
    /// Vertical travel takes priority and ends exactly on a grid row;
    /// horizontal travel is continuous.
    pub fn head_move(&mut self, speed: f32) {
        let row_height = self.size.y;
        let row = |y: f32| (y / row_height).floor();
        let on_row = |y: f32| y.rem_euclid(row_height) == 0.0;

        let y = self.pos.y;
        if self.dy != 0 {
            let next_y = y + self.dy as f32 * speed;
            if self.dy > 0 {
                if on_row(next_y) || (row(y) < row(next_y) && !on_row(y)) {
                    self.pos.y = row(next_y) * row_height;
                    self.dy = 0;
                } else {
                    self.pos.y = next_y;
                }
            } else if on_row(next_y) || (row(y) > row(next_y) && !on_row(y)) {
                self.pos.y = row(y) * row_height;
                self.dy = 0;
            } else {
                self.pos.y = next_y;
            }
        } else {
            self.pos.x += self.dx as f32 * speed;
        }

        self.facing = Facing::from_direction(self.dx, self.dy);
    }

    /// Queue the predecessor's latest step and take on the oldest queued one
    pub fn body_move(&mut self, leader: Step) {
        let Step { pos, dx, dy } = self.trail.push(leader);
        self.pos = pos;
        self.dx = dx;
        self.dy = dy;
        self.facing = Facing::from_direction(dx, dy);
    }

    fn animate(&mut self) {
        if self.anim_tick % ANIMATION_TICKS == 0 {
            self.frame = (self.frame + 1) % ANIMATION_FRAMES;
        }
        self.anim_tick = self.anim_tick.wrapping_add(1);
    }
}

impl Bounded for Segment {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// What a head needs to know about the world outside its chain
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub field: &'a MushroomField,
    pub field_size: Vec2,
    /// Directed heads steer toward this row
    pub player_y: f32,
}

/// A segment that was just killed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KilledSegment {
    pub id: u32,
    pub role: SegmentRole,
    pub pos: Vec2,
}

/// The whole creature; owns its segments in head-to-tail order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Centipede {
    segments: Vec<Segment>,
    length: usize,
    initial_speed: f32,
    speed: f32,
    /// Attract-screen wandering instead of chasing the player
    random_walk: bool,
    /// Shared vertical bias used while random walking
    random_walk_dy: i8,
    segment_size: Vec2,
    spawn: Vec2,
}

impl Centipede {
    pub fn new(settings: &Settings, ids: &mut EntityIds) -> Self {
        let mut centipede = Self {
            segments: Vec::with_capacity(settings.centipede_length),
            length: settings.centipede_length,
            initial_speed: settings.centipede_speed,
            speed: settings.centipede_speed,
            random_walk: false,
            random_walk_dy: 0,
            segment_size: settings.sprites.segment,
            spawn: Vec2::new((settings.field_width / 2.0).floor(), 0.0),
        };
        centipede.spawn_segments(ids);
        centipede
    }

    fn spawn_segments(&mut self, ids: &mut EntityIds) {
        self.segments = (0..self.length)
            .map(|i| {
                let role = if i == 0 {
                    SegmentRole::Head
                } else {
                    SegmentRole::Body
                };
                Segment::new(ids.next_id(), role, self.spawn, self.segment_size, self.speed)
            })
            .collect();
    }

    /// Rebuild every segment at the spawn point.
    ///
    /// `reset_speed` restores the initial speed; otherwise the current speed
    /// (and difficulty) carries over.
    pub fn reset(&mut self, reset_speed: bool, ids: &mut EntityIds) {
        if reset_speed {
            self.speed = self.initial_speed;
        }
        self.spawn_segments(ids);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[cfg(test)]
    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn alive_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_alive())
    }

    /// True once every segment is dead
    pub fn is_cleared(&self) -> bool {
        !self.segments.iter().any(|s| s.is_alive())
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the chain speed and rescale every delay line to match
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        for segment in &mut self.segments {
            segment.trail.resize(delay_ticks(segment.size.x, speed));
        }
    }

    pub fn random_walk(&self) -> bool {
        self.random_walk
    }

    pub fn random_walk_dy(&self) -> i8 {
        self.random_walk_dy
    }

    /// Toggle attract-screen wandering; wandering starts heading down
    pub fn set_random_walk(&mut self, random_walk: bool) {
        self.random_walk = random_walk;
        self.random_walk_dy = if random_walk { 1 } else { 0 };
    }

    /// Index range of the living bodies directly behind `index`
    pub fn trailing_range(&self, index: usize) -> Range<usize> {
        let start = (index + 1).min(self.segments.len());
        let run = self.segments[start..]
            .iter()
            .take_while(|s| s.role == SegmentRole::Body && s.is_alive())
            .count();
        start..start + run
    }

    /// The living bodies directly behind `index`, in chain order
    pub fn trailing_bodies(&self, index: usize) -> &[Segment] {
        &self.segments[self.trailing_range(index)]
    }

    /// Living segments that `index` can collide with
    fn obstacles_for(&self, index: usize) -> impl Iterator<Item = &Segment> {
        let trailing = self.trailing_range(index);
        self.segments
            .iter()
            .enumerate()
            .filter(move |(i, s)| *i != index && s.is_alive() && !trailing.contains(i))
            .map(|(_, s)| s)
    }

    /// Whether segment `index` may occupy `bounds`: no living, non-trailing
    /// segment and no live mushroom in the way.
    pub fn segment_can_move(&self, index: usize, bounds: &Rect, field: &MushroomField) -> bool {
        !self.obstacles_for(index).any(|s| s.bounds().intersects(bounds))
            && !field.any_overlapping(bounds)
    }

    /// Every grid cell segment `index` could occupy
    pub fn find_open_spots(&self, index: usize, env: &Surroundings) -> Vec<Vec2> {
        let cell = self.segment_size;
        let cols = (env.field_size.x / cell.x).floor() as i32;
        let rows = (env.field_size.y / cell.y).floor() as i32;

        (0..cols)
            .flat_map(|col| (0..rows).map(move |row| Vec2::new(col as f32, row as f32) * cell))
            .filter(|&spot| self.segment_can_move(index, &Rect::new(spot, cell), env.field))
            .collect()
    }

    /// Nearest open grid cell; the first one found wins ties
    pub fn closest_open_spot(&self, index: usize, env: &Surroundings) -> Option<Vec2> {
        let current = self.segments.get(index)?.pos;
        let mut best: Option<(Vec2, f32)> = None;
        for spot in self.find_open_spots(index, env) {
            let distance = spot.distance(current);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((spot, distance));
            }
        }
        best.map(|(spot, _)| spot)
    }

    /// Decide the next direction for head `index`
    pub fn check_collisions(&mut self, index: usize, env: &Surroundings) {
        let Some(segment) = self.segments.get(index) else {
            return;
        };
        let speed = self.speed;
        let random_walk = self.random_walk;
        let size = segment.size;
        let mut probe = segment.clone();
        let mut bias = self.random_walk_dy;

        let steer = |y: f32, bias: i8| {
            if random_walk {
                bias
            } else {
                sign(env.player_y - y)
            }
        };

        // Stuck inside a mushroom: jump out, or wait for a later frame
        if env.field.any_overlapping(&probe.bounds()) {
            match self.closest_open_spot(index, env) {
                Some(spot) => {
                    log::debug!("Segment {} rescued from {} to {}", probe.id, probe.pos, spot);
                    probe.pos = spot;
                }
                None => log::debug!("Segment {} stuck with no open cell", probe.id),
            }
        } else {
            let next = probe.next_bounds(probe.dx, probe.dy, speed);
            let blocked = env.field.any_overlapping(&next)
                || self
                    .obstacles_for(index)
                    .any(|s| s.bounds().intersects(&next));
            if blocked {
                probe.dx = -probe.dx;
                probe.dy = steer(probe.pos.y, bias);
            }
        }

        // Horizontal edges: head back toward the middle
        let step_x = probe.pos.x + probe.dx as f32 * speed;
        if step_x < 0.0 || step_x + size.x > env.field_size.x {
            probe.dx = sign(0.5 * env.field_size.x - probe.pos.x);
            probe.dy = steer(probe.pos.y, bias);
        }

        // Vertical edges, measured against the last whole grid row
        let usable_height = (env.field_size.y / size.y).floor() * size.y;
        let step_y = probe.pos.y + probe.dy as f32 * speed;
        if step_y < 0.0 || step_y + size.y > usable_height {
            if random_walk {
                probe.dy = sign(0.5 * env.field_size.y - probe.pos.y);
                bias = probe.dy;
            } else {
                probe.dy = sign(env.player_y - probe.pos.y);
            }
        }

        // Vertical first; when blocked, hold the intent and try sideways
        let (try_dx, try_dy) = if probe.dy != 0 { (0, probe.dy) } else { (probe.dx, 0) };
        if !self.segment_can_move(index, &probe.next_bounds(try_dx, try_dy, speed), env.field) {
            if probe.dy != 0 {
                probe.saved_dy = probe.dy;
                probe.dy = 0;
            }
            if !self.segment_can_move(index, &probe.next_bounds(probe.dx, 0, speed), env.field) {
                probe.dx = -probe.dx;
            }
        }

        if probe.saved_dy != 0
            && self.segment_can_move(index, &probe.next_bounds(0, probe.saved_dy, speed), env.field)
        {
            probe.dy = probe.saved_dy;
            probe.saved_dy = 0;
        }

        let segment = &mut self.segments[index];
        segment.pos = probe.pos;
        segment.dx = probe.dx;
        segment.dy = probe.dy;
        segment.saved_dy = probe.saved_dy;
        self.random_walk_dy = bias;
    }

    /// Advance the whole chain by one tick, head to tail
    pub fn advance(&mut self, env: &Surroundings) {
        let mut leader: Option<Step> = None;
        for index in 0..self.segments.len() {
            if !self.segments[index].is_alive() {
                continue;
            }
            if self.segments[index].is_head() {
                self.check_collisions(index, env);
                let speed = self.speed;
                let head = &mut self.segments[index];
                head.head_move(speed);
                leader = Some(head.step());
            } else {
                let body = &mut self.segments[index];
                let step = leader.unwrap_or_else(|| body.step());
                body.body_move(step);
                leader = Some(body.step());
            }
        }
    }

    /// Step every living segment's animation
    pub fn animate(&mut self) {
        for segment in self.segments.iter_mut().filter(|s| s.is_alive()) {
            segment.animate();
        }
    }

    /// First living segment overlapping `bounds`
    pub fn first_alive_overlapping(&self, bounds: &Rect) -> Option<usize> {
        self.segments
            .iter()
            .position(|s| s.is_alive() && s.bounds().intersects(bounds))
    }

    /// Kill segment `index`. The living segment right behind it becomes a
    /// head, keeping its position, direction and queued motion.
    pub fn kill(&mut self, index: usize) -> Option<KilledSegment> {
        let segment = self.segments.get_mut(index).filter(|s| s.is_alive())?;
        segment.life = Life::Dead;
        let killed = KilledSegment {
            id: segment.id,
            role: segment.role,
            pos: segment.pos,
        };

        if let Some(next) = self.segments.get_mut(index + 1).filter(|s| s.is_alive()) {
            next.role = SegmentRole::Head;
        }

        Some(killed)
    }
}
