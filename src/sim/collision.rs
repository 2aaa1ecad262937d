//! Axis-aligned bounding box tests and wall handling
//!
//! Every collision in the game is a box/box overlap. Boxes are described by
//! their top-left corner and size, in screen coordinates (y grows downward).

use glam::Vec2;

/// An axis-aligned box: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Square box of side `side` at `min`
    pub fn square(min: Vec2, side: f32) -> Self {
        Self::new(min, Vec2::splat(side))
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test; boxes that only touch along an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Clamp a box of `size` at `pos` so it stays fully inside `field`
#[inline]
pub fn clamp_to_field(pos: Vec2, size: f32, field: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, field.x - size),
        pos.y.clamp(0.0, field.y - size),
    )
}

/// Reflect a velocity component if the box has left the field on that axis.
///
/// `pos` is the already-advanced position. The position is not corrected, so
/// a box may sit up to one step outside the field before bouncing back.
#[inline]
pub fn bounce_off_walls(pos: Vec2, vel: Vec2, size: f32, field: Vec2) -> Vec2 {
    let mut vel = vel;
    if pos.x < 0.0 || pos.x > field.x - size {
        vel.x = -vel.x;
    }
    if pos.y < 0.0 || pos.y > field.y - size {
        vel.y = -vel.y;
    }
    vel
}
