//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable update order: cars in spawn order, then the player last
//!   (stored with the player first)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod entity;
pub mod rigid_body;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vector;

pub use body::Body;
pub use collision::{Contact, WindowEdge, WindowHit, update_next_pos};
pub use entity::{Car, Controls, Entity, EntityKind, Hooks, Player, update};
pub use rigid_body::{Faction, ForceMode, Motion, RigidBody};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use vector::{Vector2, VectorExt};
