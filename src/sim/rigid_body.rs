//! Rigid body record and force integration
//!
//! Every mobile entity shares this record. Integration is split in two:
//! - `integrate` computes a candidate [`Motion`] (friction, zero-snap, speed cap,
//!   trapezoidal position step)
//! - `commit` applies or discards it once collision hooks have run
//!
//! The collision sweep between the two lives in `collision.rs`.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::vector::{Vector2, VectorExt};
use crate::consts::GRAVITY;

/// How an applied force turns into acceleration
///
/// | mode           | acceleration       |
/// |----------------|--------------------|
/// | Force          | force * dt / mass  |
/// | Acceleration   | force * dt         |
/// | Impulse        | force / mass       |
/// | VelocityChange | force              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceMode {
    Force,
    Acceleration,
    Impulse,
    VelocityChange,
}

/// Which side a body is on, gates collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Car,
}

/// Candidate state for the current tick, before collision response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub velocity: Vector2,
    pub position: Vector2,
}

/// Shared physics state of every entity
///
/// Cloning keeps the `id`: a clone is the same body, not a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub id: u32,
    pub body: Body,
    pub velocity: Vector2,
    /// Last applied acceleration. Overwritten by `add_force`, adjusted by
    /// friction, zeroed per axis when that axis comes to rest.
    pub acceleration: Vector2,
    pub mass: f32,
    pub max_velocity: f32,
    pub force_amount_per_frame: f32,
    /// Between 0.0 and 1.0
    pub friction_coefficient: f32,
    pub faction: Faction,
    /// Immune to collision damage
    pub intangible: bool,
}

impl RigidBody {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        width: u32,
        height: u32,
        max_velocity: f32,
        force_amount_per_frame: f32,
        friction_coefficient: f32,
        mass: f32,
        faction: Faction,
    ) -> Self {
        Self {
            id,
            body: Body::new(width, height),
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            mass,
            max_velocity,
            force_amount_per_frame,
            friction_coefficient,
            faction,
            intangible: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        self.body.position
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.body.set_position(position);
    }

    /// Replace the acceleration with the one produced by `force`, then add it
    /// to the velocity immediately.
    pub fn add_force(&mut self, force: Vector2, mode: ForceMode, dt: f32) {
        self.acceleration = match mode {
            ForceMode::Force => force * dt / self.mass,
            ForceMode::Acceleration => force * dt,
            ForceMode::Impulse => force / self.mass,
            ForceMode::VelocityChange => force,
        };
        self.velocity += self.acceleration;
    }

    /// Kinetic friction opposing the current velocity
    fn friction(&self) -> Vector2 {
        -self.velocity.normalized() * (GRAVITY * self.mass * self.friction_coefficient)
    }

    /// Compute the candidate velocity and position for this tick.
    ///
    /// Mutates `acceleration` (friction is folded in, resting axes are reset),
    /// but leaves velocity and position alone.
    pub fn integrate(&mut self, dt: f32) -> Motion {
        if self.velocity.magnitude() > 0.0 {
            let applied = self.acceleration * self.mass;
            self.acceleration = (applied + self.friction()) / self.mass;
        }

        let delta = self.acceleration * dt;

        // An axis that would cross (or land on) zero this tick stops dead
        let mut velocity = Vector2::ZERO;
        if crosses_zero(self.velocity.x, delta.x) {
            self.acceleration.x = 0.0;
        } else {
            velocity.x = self.velocity.x + delta.x;
        }
        if crosses_zero(self.velocity.y, delta.y) {
            self.acceleration.y = 0.0;
        } else {
            velocity.y = self.velocity.y + delta.y;
        }

        if velocity.magnitude() > self.max_velocity {
            velocity = velocity.clamp_magnitude(self.max_velocity);
        }

        let position = self.position() + (self.velocity + velocity) / 2.0 * dt;

        Motion { velocity, position }
    }

    /// Apply the candidate motion, or freeze in place when a collision asked to stop
    pub fn commit(&mut self, motion: Motion, stop: bool) {
        if stop {
            self.velocity = Vector2::ZERO;
        } else {
            self.velocity = motion.velocity;
            self.body.position = motion.position;
        }
    }
}

#[inline]
fn crosses_zero(velocity: f32, delta: f32) -> bool {
    (velocity > 0.0 && -velocity >= delta) || (velocity < 0.0 && -velocity <= delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_body(mass: f32, friction: f32, max_velocity: f32) -> RigidBody {
        RigidBody::new(0, 10, 10, max_velocity, 100.0, friction, mass, Faction::Car)
    }

    #[test]
    fn test_add_force_modes() {
        let force = Vector2::new(10.0, -20.0);
        let dt = 0.5;

        let mut rb = test_body(4.0, 0.0, 1000.0);
        rb.add_force(force, ForceMode::Force, dt);
        assert_eq!(rb.acceleration, Vector2::new(1.25, -2.5));
        assert_eq!(rb.velocity, Vector2::new(1.25, -2.5));

        let mut rb = test_body(4.0, 0.0, 1000.0);
        rb.add_force(force, ForceMode::Impulse, dt);
        assert_eq!(rb.acceleration, Vector2::new(2.5, -5.0));

        let mut rb = test_body(4.0, 0.0, 1000.0);
        rb.add_force(force, ForceMode::VelocityChange, dt);
        assert_eq!(rb.acceleration, force);
        assert_eq!(rb.velocity, force);
    }

    #[test]
    fn test_acceleration_mode_overwrites_previous() {
        let mut rb = test_body(100.0, 0.0, 1000.0);
        rb.acceleration = Vector2::new(999.0, 999.0);
        rb.add_force(Vector2::new(750.0, -300.0), ForceMode::Acceleration, 0.1);
        assert_eq!(rb.acceleration, Vector2::new(750.0, -300.0) * 0.1);
        assert_eq!(rb.velocity, Vector2::new(750.0, -300.0) * 0.1);
    }

    #[test]
    fn test_friction_snaps_to_zero_instead_of_reversing() {
        let mut rb = test_body(100.0, 1.0, 1000.0);
        rb.velocity = Vector2::new(100.0, 0.0);

        // Friction decelerates at 9.80665/s, so 20s would overshoot by ~96
        let motion = rb.integrate(20.0);
        assert_eq!(motion.velocity.x, 0.0);
        assert_eq!(motion.velocity.y, 0.0);
        assert_eq!(rb.acceleration.x, 0.0);
    }

    #[test]
    fn test_friction_slows_without_snapping() {
        let mut rb = test_body(100.0, 1.0, 1000.0);
        rb.velocity = Vector2::new(0.0, -100.0);

        let motion = rb.integrate(1.0);
        assert!((motion.velocity.y - (-100.0 + GRAVITY)).abs() < 1e-3);
        // Trapezoidal step averages old and new velocity
        let expected_y = (-100.0 + motion.velocity.y) / 2.0;
        assert!((motion.position.y - expected_y).abs() < 1e-3);
    }

    #[test]
    fn test_resting_body_stays_put() {
        let mut rb = test_body(100.0, 1.0, 1000.0);
        let motion = rb.integrate(1.0 / 60.0);
        assert_eq!(motion.velocity, Vector2::ZERO);
        assert_eq!(motion.position, Vector2::ZERO);
    }

    #[test]
    fn test_speed_cap_rescales() {
        let mut rb = test_body(1.0, 0.0, 50.0);
        rb.velocity = Vector2::new(40.0, 30.0);
        rb.acceleration = Vector2::new(400.0, 300.0);

        let motion = rb.integrate(1.0);
        assert!((motion.velocity.magnitude() - 50.0).abs() < 1e-3);
        assert!((motion.velocity.x - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_commit_stop_freezes_position() {
        let mut rb = test_body(1.0, 0.0, 50.0);
        rb.set_position(Vector2::new(5.0, 5.0));
        rb.velocity = Vector2::new(10.0, 0.0);

        let motion = rb.integrate(1.0);
        rb.commit(motion, true);
        assert_eq!(rb.position(), Vector2::new(5.0, 5.0));
        assert_eq!(rb.velocity, Vector2::ZERO);

        rb.velocity = Vector2::new(10.0, 0.0);
        let motion = rb.integrate(1.0);
        rb.commit(motion, false);
        assert_eq!(rb.position(), Vector2::new(15.0, 5.0));
    }

    #[test]
    fn test_clone_keeps_identity() {
        let rb = RigidBody::new(42, 10, 10, 1.0, 1.0, 0.0, 1.0, Faction::Player);
        assert_eq!(rb.clone().id, 42);
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_cap(
            vx in -2000.0f32..2000.0,
            vy in -2000.0f32..2000.0,
            ax in -5000.0f32..5000.0,
            ay in -5000.0f32..5000.0,
            mass in 1.0f32..500.0,
            friction in 0.0f32..1.0,
            max_velocity in 1.0f32..2000.0,
            dt in 0.0f32..0.5,
        ) {
            let mut rb = test_body(mass, friction, max_velocity);
            rb.velocity = Vector2::new(vx, vy);
            rb.acceleration = Vector2::new(ax, ay);

            let motion = rb.integrate(dt);
            rb.commit(motion, false);
            prop_assert!(rb.velocity.magnitude() <= max_velocity * (1.0 + 1.0e-4) + 1.0e-3);
        }

        #[test]
        fn prop_friction_never_flips_sign(
            vx in 1.0f32..500.0,
            mass in 1.0f32..500.0,
            friction in 0.01f32..1.0,
            dt in 0.0f32..100.0,
        ) {
            let mut rb = test_body(mass, friction, 10_000.0);
            rb.velocity = Vector2::new(vx, 0.0);

            let motion = rb.integrate(dt);
            prop_assert!(motion.velocity.x >= 0.0);
        }
    }
}
