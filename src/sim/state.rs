//! Game state and core simulation types
//!
//! Everything the driver mutates between ticks lives here, including the
//! entity id counter and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entity::{Entity, Player};
use crate::tuning::{Tuning, TuningError};

/// The player is spawned first and never removed
pub const PLAYER_INDEX: usize = 0;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Health ran out with a winning score
    Won,
    /// Health ran out short of the winning score
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    CarSpawned { id: u32 },
    /// A car left the bottom of the screen
    CarDodged { id: u32 },
    PlayerHit { health: i32 },
    GameOver { won: bool, score: f32 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Player first, then cars in spawn order
    pub entities: Vec<Entity>,
    /// World position of the window's top-left corner
    pub camera: Vec2,
    pub score: f32,
    pub cars_dodged: u32,
    /// Current car cap (grows with distance travelled)
    pub max_cars: u32,
    /// Seconds since the last spawn
    pub spawn_timer: f32,
    /// Seconds to wait before the next spawn
    pub desired_spawn_time: f32,
    /// Events since the caller last drained them
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Validate `tuning`, then start a game with it
    pub fn try_with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::with_tuning(seed, tuning))
    }

    /// Create a new game with the player and the opening traffic in place.
    ///
    /// `tuning` must already be valid (see [`Tuning::validate`]); spawning
    /// panics on an empty car model list. Use [`GameState::try_with_tuning`]
    /// for unchecked input.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            camera: Vec2::new(0.0, tuning.camera_vertical_offset),
            max_cars: tuning.car.start_max_amount,
            desired_spawn_time: tuning.car.max_spawn_time,
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            entities: Vec::new(),
            score: 0.0,
            cars_dodged: 0,
            spawn_timer: 0.0,
            events: Vec::new(),
            next_id: 0,
        };

        state.spawn_player();
        for _ in 0..state.tuning.car.start_amount {
            state.spawn_car(state.tuning.camera_vertical_offset);
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.tuning.window_width, self.tuning.window_height)
    }

    pub fn player_entity(&self) -> &Entity {
        &self.entities[PLAYER_INDEX]
    }

    pub fn player_entity_mut(&mut self) -> &mut Entity {
        &mut self.entities[PLAYER_INDEX]
    }

    pub fn player(&self) -> Option<&Player> {
        self.player_entity().as_player()
    }

    /// Remaining health (0 if the player is somehow missing)
    pub fn player_health(&self) -> i32 {
        self.player().map_or(0, |p| p.health)
    }

    /// Upward distance travelled from the start line
    pub fn distance(&self) -> f32 {
        -self.player_entity().rb.position().y
    }

    /// Cars currently on the road (not yet marked for removal)
    pub fn car_count(&self) -> u32 {
        self.entities
            .iter()
            .filter(|e| e.as_car().is_some_and(|c| c.alive))
            .count() as u32
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
