//! Entity spawning
//!
//! Sizes, forces and positions come from the tuning; every random draw goes
//! through the state's seeded RNG so a run replays exactly from its seed.

use glam::Vec2;
use rand::Rng;

use super::entity::{Car, Entity, Player};
use super::rigid_body::{Faction, RigidBody};
use super::state::{GameEvent, GameState};

impl GameState {
    /// Spawn the player at the horizontal center of the start line
    pub fn spawn_player(&mut self) -> u32 {
        let id = self.next_entity_id();
        let tuning = &self.tuning.player;
        let (width, height) = tuning.hurtbox();

        let mut rb = RigidBody::new(
            id,
            width,
            height,
            tuning.max_velocity,
            tuning.force_amount,
            tuning.friction_coefficient,
            tuning.mass,
            Faction::Player,
        );
        rb.set_position(Vec2::new(self.tuning.window_width * 0.5, 0.0));

        let player = Player::new(tuning.max_health, tuning.max_intangible_time);
        self.entities.push(Entity::player(rb, player));
        id
    }

    /// Spawn a random car somewhere above the window whose top sits at `camera_y`
    pub fn spawn_car(&mut self, camera_y: f32) -> u32 {
        let id = self.next_entity_id();
        let car = &self.tuning.car;

        let model = &car.models[self.rng.random_range(0..car.models.len())];
        let (width, height) = (model.width, model.height);

        let force = self.rng.random_range(car.force_min..=car.force_max);
        let horizontal_multiplier = self
            .rng
            .random_range(car.horizontal_multiplier_min..=car.horizontal_multiplier_max);
        let spawn_offset = self
            .rng
            .random_range(car.spawn_offset_min..=car.spawn_offset_max);
        let horizontal_dir = self.rng.random_bool(0.5);

        let half_width = width as f32 * 0.5;
        let x = self.rng.random::<f32>() * (self.tuning.window_width - width as f32) + half_width;
        let y = -(height as f32) * 0.5 - spawn_offset + camera_y;

        let mut rb = RigidBody::new(
            id,
            width,
            height,
            car.max_velocity,
            force,
            car.friction_coefficient,
            car.mass,
            Faction::Car,
        );
        rb.set_position(Vec2::new(x, y));

        log::debug!(
            "Spawned car {} ({}) at ({:.0}, {:.0}) force={:.0} drift={:.2}",
            id,
            model.name,
            x,
            y,
            force,
            horizontal_multiplier
        );

        self.entities
            .push(Entity::car(rb, Car::new(horizontal_multiplier, horizontal_dir)));
        self.events.push(GameEvent::CarSpawned { id });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PLAYER_INDEX;

    #[test]
    fn test_player_spawn() {
        let state = GameState::new(1);
        let player = &state.entities[PLAYER_INDEX];

        assert_eq!(player.id(), 0);
        assert_eq!(player.rb.faction, Faction::Player);
        assert_eq!(player.rb.position(), Vec2::new(375.0, 0.0));
        assert_eq!((player.rb.body.width, player.rb.body.height), (32, 72));
        assert_eq!(state.player_health(), 3);
    }

    #[test]
    fn test_cars_spawn_above_window_within_bounds() {
        let mut state = GameState::new(7);
        let camera_y = -5000.0;

        for _ in 0..200 {
            let id = state.spawn_car(camera_y);
            let car = state.entities.last().unwrap();
            assert_eq!(car.id(), id);

            let pos = car.rb.position();
            let half_w = car.rb.body.half_width();
            let half_h = car.rb.body.half_height();
            assert!(pos.x - half_w >= -1e-3);
            assert!(pos.x + half_w <= state.tuning.window_width + 1e-3);
            // Bottom edge at or above the top of the window
            assert!(pos.y + half_h <= camera_y + 1e-3);
            assert!(pos.y + half_h >= camera_y - state.tuning.car.spawn_offset_max - 1e-3);

            let force = car.rb.force_amount_per_frame;
            assert!((50.0..=400.0).contains(&force));
            let drift = car.as_car().unwrap().horizontal_multiplier;
            assert!((0.0..=1.5).contains(&drift));
        }
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut state = GameState::new(3);
        let before = state.entities.iter().map(|e| e.id()).collect::<Vec<_>>();
        assert_eq!(before, vec![0, 1, 2]);

        let id = state.spawn_car(0.0);
        assert_eq!(id, 3);
    }

    #[test]
    fn test_degenerate_ranges_are_allowed() {
        let mut tuning = crate::Tuning::default();
        tuning.car.force_min = 100.0;
        tuning.car.force_max = 100.0;
        tuning.car.spawn_offset_max = 0.0;

        let mut state = GameState::with_tuning(5, tuning);
        state.spawn_car(0.0);
        let car = state.entities.last().unwrap();
        assert_eq!(car.rb.force_amount_per_frame, 100.0);
        assert_eq!(car.rb.position().y, -car.rb.body.half_height());
    }
}
