//! Speed Racer - A top-down traffic dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rigid bodies, collisions, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{CarModel, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Standard gravity, used as the normal force for kinetic friction
    pub const GRAVITY: f32 = 9.80665;

    /// Window dimensions in pixels
    pub const WINDOW_WIDTH: f32 = 750.0;
    pub const WINDOW_HEIGHT: f32 = 1250.0;
}
