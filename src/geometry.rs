/*
 * Geometry Module
 *
 * Axis-aligned rectangles described by a center and half extents. These are
 * the node boundaries of the quadtree, the query ranges used for neighbor
 * lookups and the world bounds of the simulation.
 */

use glam::Vec2;

/// An axis-aligned rectangle stored as center plus half width / half height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAlignedRect {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
}

impl AxisAlignedRect {
    pub fn new(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    /// Square centered on `center` with the same half extent on both axes.
    pub fn square(center: Vec2, half_extent: f32) -> Self {
        Self::new(center, half_extent, half_extent)
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half_width
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half_width
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_height
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half_height
    }

    /// Strict interior test. A point lying exactly on an edge is outside.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.left()
            && point.x < self.right()
            && point.y > self.bottom()
            && point.y < self.top()
    }

    /// Overlap test. Rectangles that only touch along an edge still intersect.
    #[inline]
    pub fn intersects(&self, other: &AxisAlignedRect) -> bool {
        !(other.left() > self.right()
            || other.right() < self.left()
            || other.bottom() > self.top()
            || other.top() < self.bottom())
    }

    // The four quadrants split at the center, ordered NW, NE, SW, SE
    pub(crate) fn quadrants(&self) -> [AxisAlignedRect; 4] {
        let hw = self.half_width / 2.0;
        let hh = self.half_height / 2.0;
        let c = self.center;

        [
            Self::new(Vec2::new(c.x - hw, c.y + hh), hw, hh),
            Self::new(Vec2::new(c.x + hw, c.y + hh), hw, hh),
            Self::new(Vec2::new(c.x - hw, c.y - hh), hw, hh),
            Self::new(Vec2::new(c.x + hw, c.y - hh), hw, hh),
        ]
    }
}
