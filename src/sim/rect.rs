//! Axis-aligned bounding boxes
//!
//! Every entity is a sprite-sized box anchored at its top-left corner.
//! All collision checks in the simulation go through `Rect::intersects`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left().max(other.left()) < self.right().min(other.right())
            && self.top().max(other.top()) < self.bottom().min(other.bottom())
    }

    /// The same rectangle moved by `delta`
    #[inline]
    pub fn offset(&self, delta: Vec2) -> Rect {
        Rect {
            pos: self.pos + delta,
            size: self.size,
        }
    }
}

/// Anything with a position and a sprite-sized bounding box
pub trait Bounded {
    fn bounds(&self) -> Rect;

    /// Whether this entity's box overlaps another's
    fn overlaps(&self, other: &impl Bounded) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}
