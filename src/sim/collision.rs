//! Collision detection for the bird against pipes and world bounds
//!
//! The bird is an axis-aligned box inset from its nominal sprite size by a
//! small forgiveness margin. A pipe is two solid bands above and below its
//! gap; a hit is any strict overlap with either band.

use glam::Vec2;

use crate::consts::*;
use super::pipes::Pipe;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test. Boxes that merely touch do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Collision box for the bird at its fixed column and current height.
pub fn bird_box(bird_x: f32, y: f32) -> Aabb {
    let size = Vec2::new(
        BIRD_WIDTH - 2.0 * COLLISION_MARGIN,
        BIRD_HEIGHT - 2.0 * COLLISION_MARGIN,
    );
    Aabb::from_center(Vec2::new(bird_x, y), size)
}

/// Solid bands of a pipe: everything above the gap and everything below it.
pub fn pipe_bands(pipe: &Pipe, viewport_h: f32) -> (Aabb, Aabb) {
    let top = Aabb::new(
        Vec2::new(pipe.x, 0.0),
        Vec2::new(pipe.right(), pipe.gap_top()),
    );
    let bottom = Aabb::new(
        Vec2::new(pipe.x, pipe.gap_bottom()),
        Vec2::new(pipe.right(), viewport_h),
    );
    (top, bottom)
}

/// True when the bird box is horizontally inside the pipe but not fully
/// contained in its gap.
pub fn bird_hits_pipe(bird: &Aabb, pipe: &Pipe, viewport_h: f32) -> bool {
    let (top, bottom) = pipe_bands(pipe, viewport_h);
    bird.overlaps(&top) || bird.overlaps(&bottom)
}

/// Bird center dropped into the ground band.
#[inline]
pub fn hits_floor(y: f32, viewport_h: f32) -> bool {
    y > viewport_h - FLOOR_MARGIN
}

/// Bird center above the top of the viewport.
#[inline]
pub fn hits_ceiling(y: f32) -> bool {
    y < 0.0
}
