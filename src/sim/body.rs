//! Axis-aligned rectangle geometry for bodies
//!
//! A body is a rectangle centered on its position:
//! - half extents are width/2 and height/2
//! - edges are position ± half extents
//!
//! Collision checks test a *candidate* center against another body's
//! current rectangle, so most queries take the center as a parameter.

use serde::{Deserialize, Serialize};

use super::vector::Vector2;

/// A positioned rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center of the rectangle (world space)
    pub position: Vector2,
    /// Collision box width in pixels
    pub width: u32,
    /// Collision box height in pixels
    pub height: u32,
}

impl Body {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vector2::ZERO,
            width,
            height,
        }
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width as f32 * 0.5
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height as f32 * 0.5
    }

    /// Vertical overlap between this box centered at `center` and `other`
    #[inline]
    pub fn overlaps_vertically(&self, center: Vector2, other: &Body) -> bool {
        center.y - self.half_height() < other.position.y + other.half_height()
            && center.y + self.half_height() > other.position.y - other.half_height()
    }

    /// Horizontal overlap between this box centered at `center` and `other`
    #[inline]
    pub fn overlaps_horizontally(&self, center: Vector2, other: &Body) -> bool {
        center.x - self.half_width() < other.position.x + other.half_width()
            && center.x + self.half_width() > other.position.x - other.half_width()
    }

    /// Full AABB overlap (both axes, strict, touching edges do not count)
    #[inline]
    pub fn overlaps_at(&self, center: Vector2, other: &Body) -> bool {
        self.overlaps_vertically(center, other) && self.overlaps_horizontally(center, other)
    }

    /// Top edge of the box centered at `center` is above `top`
    #[inline]
    pub fn above(&self, center: Vector2, top: f32) -> bool {
        center.y - self.half_height() < top
    }

    /// Bottom edge of the box centered at `center` is below `bottom`
    #[inline]
    pub fn below(&self, center: Vector2, bottom: f32) -> bool {
        center.y + self.half_height() > bottom
    }

    /// Left edge of the box centered at `center` is left of `left`
    #[inline]
    pub fn left_of(&self, center: Vector2, left: f32) -> bool {
        center.x - self.half_width() < left
    }

    /// Right edge of the box centered at `center` is right of `right`
    #[inline]
    pub fn right_of(&self, center: Vector2, right: f32) -> bool {
        center.x + self.half_width() > right
    }
}
