//! Simulation tick
//!
//! Core game loop that advances the simulation by one frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{self, Controls};
use super::state::{GameEvent, GamePhase, GameState, PLAYER_INDEX};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Held direction keys
    pub controls: Controls,
    /// Demo mode - a simple AI drives instead of the keys
    pub autopilot: bool,
}

/// Vertical distance within which the autopilot reacts to traffic
const AUTOPILOT_LOOKAHEAD: f32 = 450.0;
/// Closer than this (and still driving forward) the autopilot brakes
const AUTOPILOT_BRAKE_DISTANCE: f32 = 220.0;
/// Extra horizontal clearance the autopilot keeps around cars
const AUTOPILOT_MARGIN: f32 = 24.0;

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase.is_over() {
        return;
    }

    state.time_ticks += 1;

    // Difficulty, score and camera all follow the distance covered so far
    let distance = state.distance();
    let steps = (distance / state.tuning.difficulty_distance) as i64;
    state.max_cars = (state.tuning.car.start_max_amount as i64 + steps).max(0) as u32;

    state.score =
        state.cars_dodged as f32 * state.tuning.score_per_dodge + distance * state.tuning.score_per_distance;

    let player_y = state.player_entity().rb.position().y;
    state.camera.y = player_y + state.tuning.camera_vertical_offset;

    update_spawning(state, dt);

    let window = state.window_size();
    let camera = state.camera;

    // Cars first, in spawn order. Dead cars stay in the list until the end of
    // the tick but are skipped by every later sweep.
    let mut removed = 0;
    for index in 0..state.entities.len() {
        if index == PLAYER_INDEX || !state.entities[index].is_alive() {
            continue;
        }

        state.entities[index].movement_logic(&Controls::default(), dt);
        entity::update(&mut state.entities, index, window, camera, dt);

        if !state.entities[index].is_alive() {
            let id = state.entities[index].id();
            state.score += state.tuning.score_per_dodge;
            state.cars_dodged += 1;
            removed += 1;
            state.events.push(GameEvent::CarDodged { id });
            log::debug!("Car {} dodged ({} total)", id, state.cars_dodged);
        }
    }

    let controls = if input.autopilot {
        autopilot(state)
    } else {
        input.controls
    };
    state.entities[PLAYER_INDEX].movement_logic(&controls, dt);
    entity::update(&mut state.entities, PLAYER_INDEX, window, camera, dt);

    handle_player_hit(state);

    if removed > 0 {
        state.entities.retain(|e| e.is_alive());
    }
}

/// Spawn a car when the timer is up and the road has room. The next wait
/// shrinks the further the road is below its cap.
fn update_spawning(state: &mut GameState, dt: f32) {
    if state.spawn_timer >= state.desired_spawn_time {
        if state.car_count() < state.max_cars {
            state.spawn_car(state.camera.y);

            state.spawn_timer = 0.0;
            let room = (state.max_cars as i64 - state.car_count() as i64).max(1);
            state.desired_spawn_time = state.tuning.car.max_spawn_time / room as f32;
        }
    } else {
        state.spawn_timer += dt;
    }
}

/// Consume the player's one-tick hit flag
fn handle_player_hit(state: &mut GameState) {
    let Some(player) = state.player_entity_mut().as_player_mut() else {
        return;
    };
    if !player.hit {
        return;
    }
    player.hit = false;
    let health = player.health;

    log::info!("Player hit, {} health left", health);
    state.events.push(GameEvent::PlayerHit { health });

    if health <= 0 {
        let won = state.score >= state.tuning.win_score;
        state.phase = if won { GamePhase::Won } else { GamePhase::Lost };
        state.events.push(GameEvent::GameOver {
            won,
            score: state.score,
        });
        log::info!(
            "Game over: {} with score {:.2} ({} cars dodged)",
            if won { "won" } else { "lost" },
            state.score,
            state.cars_dodged
        );
    }
}

/// Drive forward, sidestep the nearest car ahead, brake when one is close
fn autopilot(state: &GameState) -> Controls {
    let player = &state.player_entity().rb;
    let pos = player.position();
    let half_width = player.body.half_width();

    let threat = state
        .entities
        .iter()
        .filter(|e| e.is_alive() && e.as_car().is_some())
        .filter(|e| {
            let car = e.rb.position();
            let ahead = pos.y - car.y;
            let lane = half_width + e.rb.body.half_width() + AUTOPILOT_MARGIN;
            ahead > 0.0 && ahead < AUTOPILOT_LOOKAHEAD && (car.x - pos.x).abs() < lane
        })
        .min_by(|a, b| {
            let da = pos.y - a.rb.position().y;
            let db = pos.y - b.rb.position().y;
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(car) = threat else {
        return Controls {
            up: true,
            ..Default::default()
        };
    };

    let car_pos: Vec2 = car.rb.position();
    let room_left = car_pos.x - car.rb.body.half_width();
    let room_right = state.tuning.window_width - (car_pos.x + car.rb.body.half_width());
    let go_left = room_left > room_right;
    let close = pos.y - car_pos.y < AUTOPILOT_BRAKE_DISTANCE;

    Controls {
        left: go_left,
        right: !go_left,
        up: !close,
        down: close,
    }
}
