//! Collision detection and response between bodies and the window
//!
//! One body moves at a time. Its candidate position is tested against every
//! other live body's *current* rectangle, so bodies earlier in the list are
//! seen at their new position and later ones at their old position. First
//! mover wins ties.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::entity::Entity;
use super::rigid_body::{Faction, RigidBody};
use super::vector::Vector2;

/// Read-only snapshot of a body handed to another body's collision hook
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: u32,
    pub faction: Faction,
    pub position: Vector2,
}

impl Contact {
    pub fn of(rb: &RigidBody) -> Self {
        Self {
            id: rb.id,
            faction: rb.faction,
            position: rb.position(),
        }
    }
}

/// Which window edge was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// A window edge crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowHit {
    pub edge: WindowEdge,
    /// Edge coordinate in window space (0 for top/left, window size otherwise)
    pub window_pos: f32,
    /// Camera offset along the same axis
    pub camera_pos: f32,
}

/// Top edge takes precedence over bottom
pub fn vertical_window_hit(
    body: &Body,
    candidate: Vector2,
    window: Vector2,
    camera: Vector2,
) -> Option<WindowHit> {
    if body.above(candidate, camera.y) {
        Some(WindowHit {
            edge: WindowEdge::Top,
            window_pos: 0.0,
            camera_pos: camera.y,
        })
    } else if body.below(candidate, window.y + camera.y) {
        Some(WindowHit {
            edge: WindowEdge::Bottom,
            window_pos: window.y,
            camera_pos: camera.y,
        })
    } else {
        None
    }
}

/// Left edge takes precedence over right
pub fn horizontal_window_hit(
    body: &Body,
    candidate: Vector2,
    window: Vector2,
    camera: Vector2,
) -> Option<WindowHit> {
    if body.left_of(candidate, camera.x) {
        Some(WindowHit {
            edge: WindowEdge::Left,
            window_pos: 0.0,
            camera_pos: camera.x,
        })
    } else if body.right_of(candidate, window.x + camera.x) {
        Some(WindowHit {
            edge: WindowEdge::Right,
            window_pos: window.x,
            camera_pos: camera.x,
        })
    } else {
        None
    }
}

/// Integrate `entities[index]`, resolve collisions, and commit.
///
/// For each overlapping live body the other body's hook runs first, then the
/// mover's own hook. If any of the mover's hooks asks to stop, the mover keeps
/// its position and loses all velocity this tick.
pub fn update_next_pos(
    entities: &mut [Entity],
    index: usize,
    window: Vector2,
    camera: Vector2,
    dt: f32,
) {
    let mut motion = entities[index].rb.integrate(dt);

    let mut stop = false;
    for other in 0..entities.len() {
        if other == index || !entities[other].is_alive() {
            continue;
        }
        if !entities[index]
            .rb
            .body
            .overlaps_at(motion.position, &entities[other].rb.body)
        {
            continue;
        }

        let mover = Contact::of(&entities[index].rb);
        entities[other].on_object_collision(&mover);

        let target = Contact::of(&entities[other].rb);
        let stopping = entities[index].on_object_collision(&target);
        stop = stop || stopping;
    }

    let entity = &mut entities[index];
    if let Some(hit) = vertical_window_hit(&entity.rb.body, motion.position, window, camera) {
        entity.on_vertical_window_hit(&mut motion, hit);
    }
    if let Some(hit) = horizontal_window_hit(&entity.rb.body, motion.position, window, camera) {
        entity.on_horizontal_window_hit(&mut motion, hit);
    }

    entity.rb.commit(motion, stop);
}
