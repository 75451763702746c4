//! 2D vector semantics used by the physics core
//!
//! `glam::Vec2` already provides the component-wise operators (scalar and
//! vector, plain and compound-assignment) and exact `PartialEq`. The extension
//! trait adds the game's own flavour of normalization and magnitude clamping.

use glam::Vec2;

/// Position/velocity/acceleration vector
pub type Vector2 = Vec2;

/// Game-specific vector helpers
pub trait VectorExt: Sized {
    /// Euclidean length
    fn magnitude(self) -> f32;

    /// Squared Euclidean length
    fn sqr_magnitude(self) -> f32;

    /// Unit vector in the same direction. A zero vector is divided by 1
    /// instead of 0, so it comes back unchanged.
    fn normalized(self) -> Self;

    /// In-place form of [`VectorExt::normalized`]
    fn normalize_in_place(&mut self);

    /// Rescale to exactly `max` length (not a conditional cap)
    fn clamp_magnitude(self, max: f32) -> Self;
}

impl VectorExt for Vec2 {
    #[inline]
    fn magnitude(self) -> f32 {
        self.length()
    }

    #[inline]
    fn sqr_magnitude(self) -> f32 {
        self.length_squared()
    }

    #[inline]
    fn normalized(self) -> Self {
        let mut mag = self.magnitude();
        if mag == 0.0 {
            mag = 1.0;
        }
        self / mag
    }

    #[inline]
    fn normalize_in_place(&mut self) {
        *self = self.normalized();
    }

    #[inline]
    fn clamp_magnitude(self, max: f32) -> Self {
        self.normalized() * max
    }
}

/// Dot product
#[inline]
pub fn dot(a: Vector2, b: Vector2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Distance between two points
#[inline]
pub fn distance(a: Vector2, b: Vector2) -> f32 {
    (b - a).magnitude()
}
