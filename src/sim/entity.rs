//! Player and car entities
//!
//! An [`Entity`] is a shared [`RigidBody`] plus per-kind state. Kind-specific
//! behaviour goes through a [`Hooks`] table: each kind starts from
//! `Hooks::DEFAULT` and overrides only the hooks it cares about.

use serde::{Deserialize, Serialize};

use super::collision::{Contact, WindowEdge, WindowHit, update_next_pos};
use super::rigid_body::{Faction, ForceMode, Motion, RigidBody};
use super::vector::Vector2;

/// Held direction keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Per-kind behaviour table
pub struct Hooks<S> {
    /// Apply this tick's driving force
    pub movement: fn(&mut S, &mut RigidBody, &Controls, f32),
    /// Runs right before the physics step
    pub before_physics: fn(&mut S, &mut RigidBody, f32),
    /// React to overlapping `other`; returning true freezes this body for the tick
    pub on_object_collision: fn(&mut S, &mut RigidBody, &Contact) -> bool,
    /// Top/bottom window edge crossed by the candidate position
    pub on_vertical_window_hit: fn(&mut S, &mut RigidBody, &mut Motion, WindowHit),
    /// Left/right window edge crossed by the candidate position
    pub on_horizontal_window_hit: fn(&mut S, &mut RigidBody, &mut Motion, WindowHit),
}

impl<S> Hooks<S> {
    pub const DEFAULT: Self = Self {
        movement: |_, _, _, _| {},
        before_physics: |_, _, _| {},
        on_object_collision: |_, _, _| false,
        on_vertical_window_hit: |_, _, _, _| {},
        on_horizontal_window_hit: |_, _, _, _| {},
    };
}

const PLAYER_HOOKS: Hooks<Player> = Hooks {
    movement: Player::movement_logic,
    before_physics: Player::tick_intangibility,
    on_object_collision: Player::on_object_collision,
    on_horizontal_window_hit: Player::on_horizontal_window_hit,
    ..Hooks::DEFAULT
};

const CAR_HOOKS: Hooks<Car> = Hooks {
    movement: Car::movement_logic,
    on_object_collision: Car::on_object_collision,
    on_vertical_window_hit: Car::on_vertical_window_hit,
    on_horizontal_window_hit: Car::on_horizontal_window_hit,
    ..Hooks::DEFAULT
};

/// The player's vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub health: i32,
    pub max_health: i32,
    /// Set when the player took damage this tick; the driver clears it
    pub hit: bool,
    /// How long the player stays intangible after a hit (seconds)
    pub max_intangible_time: f32,
    pub intangible_timer: f32,
}

impl Player {
    pub fn new(max_health: i32, max_intangible_time: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            hit: false,
            max_intangible_time,
            intangible_timer: max_intangible_time,
        }
    }

    /// Steering from held keys. Down only brakes (it never pushes the player
    /// backwards) but brakes three times harder than up accelerates.
    pub fn movement_logic(&mut self, rb: &mut RigidBody, controls: &Controls, dt: f32) {
        let force = rb.force_amount_per_frame;

        let horizontal = match (controls.left, controls.right) {
            (true, false) => -force,
            (false, true) => force,
            _ => 0.0,
        };
        let vertical = if controls.up {
            -force
        } else if controls.down && rb.velocity.y < 0.0 {
            force * 3.0
        } else {
            0.0
        };

        if horizontal != 0.0 || vertical != 0.0 {
            rb.add_force(Vector2::new(horizontal, vertical), ForceMode::Acceleration, dt);
        }
    }

    pub fn tick_intangibility(&mut self, rb: &mut RigidBody, dt: f32) {
        if rb.intangible {
            self.intangible_timer += dt;
            if self.intangible_timer >= self.max_intangible_time {
                rb.intangible = false;
            }
        }
    }

    pub fn on_object_collision(&mut self, rb: &mut RigidBody, other: &Contact) -> bool {
        if other.faction != Faction::Car || rb.intangible {
            return false;
        }

        self.hit = true;
        self.health -= 1;
        rb.velocity = Vector2::ZERO;

        self.intangible_timer = 0.0;
        rb.intangible = true;
        true
    }

    /// Keep the player inside the window horizontally
    pub fn on_horizontal_window_hit(
        &mut self,
        rb: &mut RigidBody,
        motion: &mut Motion,
        hit: WindowHit,
    ) {
        motion.velocity.x = 0.0;
        let edge = hit.window_pos + hit.camera_pos;
        let half_width = rb.body.half_width();
        motion.position.x = match hit.edge {
            WindowEdge::Left => edge + half_width,
            _ => edge - half_width,
        };
    }

    /// Blink while intangible (renderers skip odd tenths of a second)
    pub fn visible(&self, rb: &RigidBody) -> bool {
        !rb.intangible || (self.intangible_timer * 10.0) as i32 % 2 == 0
    }
}

/// An autonomous traffic car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    /// Cleared once the car drops off the bottom of the screen
    pub alive: bool,
    /// Scales the sideways drift force
    pub horizontal_multiplier: f32,
    /// true = drifting right
    pub horizontal_dir: bool,
    /// Last car this one bounced off, so a lingering overlap only reacts once
    pub last_hit_id: Option<u32>,
}

impl Car {
    pub fn new(horizontal_multiplier: f32, horizontal_dir: bool) -> Self {
        Self {
            alive: true,
            horizontal_multiplier,
            horizontal_dir,
            last_hit_id: None,
        }
    }

    #[inline]
    fn dir_sign(&self) -> f32 {
        if self.horizontal_dir { 1.0 } else { -1.0 }
    }

    /// Constant downward push plus sideways drift
    pub fn movement_logic(&mut self, rb: &mut RigidBody, _controls: &Controls, dt: f32) {
        let force = rb.force_amount_per_frame;
        let drive = Vector2::new(force * self.horizontal_multiplier * self.dir_sign(), force);
        rb.add_force(drive, ForceMode::Acceleration, dt);
    }

    /// Steer away from another car
    pub fn on_object_collision(&mut self, rb: &mut RigidBody, other: &Contact) -> bool {
        if other.faction != Faction::Car || self.last_hit_id == Some(other.id) {
            return false;
        }
        self.last_hit_id = Some(other.id);

        if rb.position().x < other.position.x {
            rb.velocity.x = -rb.velocity.x.abs();
            self.horizontal_dir = false;
        } else {
            rb.velocity.x = rb.velocity.x.abs();
            self.horizontal_dir = true;
        }
        true
    }

    /// Dropping past the bottom edge kills the car; the top edge is ignored so
    /// cars can spawn above the screen.
    pub fn on_vertical_window_hit(
        &mut self,
        rb: &mut RigidBody,
        motion: &mut Motion,
        hit: WindowHit,
    ) {
        if hit.edge == WindowEdge::Bottom
            && motion.position.y - hit.camera_pos - hit.window_pos > rb.body.half_height()
        {
            self.alive = false;
        }
    }

    /// Elastic bounce off the side walls
    pub fn on_horizontal_window_hit(
        &mut self,
        _rb: &mut RigidBody,
        motion: &mut Motion,
        hit: WindowHit,
    ) {
        match hit.edge {
            WindowEdge::Left => {
                motion.velocity.x = motion.velocity.x.abs();
                self.horizontal_dir = true;
            }
            _ => {
                motion.velocity.x = -motion.velocity.x.abs();
                self.horizontal_dir = false;
            }
        }
    }
}

/// Per-kind state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Player(Player),
    Car(Car),
}

/// A simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub rb: RigidBody,
    pub kind: EntityKind,
}

impl Entity {
    pub fn player(rb: RigidBody, player: Player) -> Self {
        Self {
            rb,
            kind: EntityKind::Player(player),
        }
    }

    pub fn car(rb: RigidBody, car: Car) -> Self {
        Self {
            rb,
            kind: EntityKind::Car(car),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.rb.id
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(player) => Some(player),
            EntityKind::Car(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(player) => Some(player),
            EntityKind::Car(_) => None,
        }
    }

    pub fn as_car(&self) -> Option<&Car> {
        match &self.kind {
            EntityKind::Car(car) => Some(car),
            EntityKind::Player(_) => None,
        }
    }

    pub fn as_car_mut(&mut self) -> Option<&mut Car> {
        match &mut self.kind {
            EntityKind::Car(car) => Some(car),
            EntityKind::Player(_) => None,
        }
    }

    /// False once a car has been marked for removal
    pub fn is_alive(&self) -> bool {
        match &self.kind {
            EntityKind::Player(_) => true,
            EntityKind::Car(car) => car.alive,
        }
    }

    pub fn movement_logic(&mut self, controls: &Controls, dt: f32) {
        match &mut self.kind {
            EntityKind::Player(p) => (PLAYER_HOOKS.movement)(p, &mut self.rb, controls, dt),
            EntityKind::Car(c) => (CAR_HOOKS.movement)(c, &mut self.rb, controls, dt),
        }
    }

    pub fn before_physics(&mut self, dt: f32) {
        match &mut self.kind {
            EntityKind::Player(p) => (PLAYER_HOOKS.before_physics)(p, &mut self.rb, dt),
            EntityKind::Car(c) => (CAR_HOOKS.before_physics)(c, &mut self.rb, dt),
        }
    }

    pub fn on_object_collision(&mut self, other: &Contact) -> bool {
        match &mut self.kind {
            EntityKind::Player(p) => (PLAYER_HOOKS.on_object_collision)(p, &mut self.rb, other),
            EntityKind::Car(c) => (CAR_HOOKS.on_object_collision)(c, &mut self.rb, other),
        }
    }

    pub fn on_vertical_window_hit(&mut self, motion: &mut Motion, hit: WindowHit) {
        match &mut self.kind {
            EntityKind::Player(p) => {
                (PLAYER_HOOKS.on_vertical_window_hit)(p, &mut self.rb, motion, hit)
            }
            EntityKind::Car(c) => (CAR_HOOKS.on_vertical_window_hit)(c, &mut self.rb, motion, hit),
        }
    }

    pub fn on_horizontal_window_hit(&mut self, motion: &mut Motion, hit: WindowHit) {
        match &mut self.kind {
            EntityKind::Player(p) => {
                (PLAYER_HOOKS.on_horizontal_window_hit)(p, &mut self.rb, motion, hit)
            }
            EntityKind::Car(c) => {
                (CAR_HOOKS.on_horizontal_window_hit)(c, &mut self.rb, motion, hit)
            }
        }
    }
}

/// Advance `entities[index]` by one tick: pre-physics hook, then integration,
/// collision response and commit. The movement policy runs separately so the
/// driver can feed it input first.
pub fn update(entities: &mut [Entity], index: usize, window: Vector2, camera: Vector2, dt: f32) {
    entities[index].before_physics(dt);
    update_next_pos(entities, index, window, camera, dt);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_player(id: u32) -> Entity {
        let rb = RigidBody::new(id, 32, 72, 1500.0, 750.0, 1.0, 100.0, Faction::Player);
        Entity::player(rb, Player::new(3, 3.0))
    }

    fn test_car(id: u32, dir: bool) -> Entity {
        let rb = RigidBody::new(id, 70, 120, 400.0, 200.0, 1.0, 100.0, Faction::Car);
        Entity::car(rb, Car::new(1.0, dir))
    }

    fn contact(id: u32, faction: Faction, x: f32) -> Contact {
        Contact {
            id,
            faction,
            position: Vector2::new(x, 0.0),
        }
    }

    #[test]
    fn test_player_movement_keys() {
        let mut player = test_player(0);

        player.movement_logic(&Controls { left: true, right: true, ..Default::default() }, 0.1);
        assert_eq!(player.rb.velocity, Vector2::ZERO);

        player.movement_logic(&Controls { left: true, ..Default::default() }, 0.1);
        assert_eq!(player.rb.acceleration, Vector2::new(-75.0, 0.0));
        assert_eq!(player.rb.velocity, Vector2::new(-75.0, 0.0));
    }

    #[test]
    fn test_player_down_only_brakes() {
        let mut player = test_player(0);
        let down = Controls { down: true, ..Default::default() };

        // At rest, down does nothing
        player.movement_logic(&down, 0.1);
        assert_eq!(player.rb.velocity, Vector2::ZERO);

        // Moving forward (negative y), down brakes at triple force
        player.rb.velocity = Vector2::new(0.0, -500.0);
        player.movement_logic(&down, 0.1);
        assert_eq!(player.rb.acceleration, Vector2::new(0.0, 225.0));
        assert_eq!(player.rb.velocity, Vector2::new(0.0, -275.0));
    }

    #[test]
    fn test_player_takes_damage_once_while_intangible() {
        let mut player = test_player(0);
        player.rb.velocity = Vector2::new(10.0, -200.0);

        assert!(player.on_object_collision(&contact(1, Faction::Car, 0.0)));
        let state = player.as_player().unwrap();
        assert_eq!(state.health, 2);
        assert!(state.hit);
        assert_eq!(state.intangible_timer, 0.0);
        assert!(player.rb.intangible);
        assert_eq!(player.rb.velocity, Vector2::ZERO);

        // Half the invulnerability window later, another car passes through
        player.before_physics(1.5);
        assert!(!player.on_object_collision(&contact(2, Faction::Car, 0.0)));
        assert_eq!(player.as_player().unwrap().health, 2);

        // Window over
        player.before_physics(1.5);
        assert!(!player.rb.intangible);
        assert!(player.on_object_collision(&contact(2, Faction::Car, 0.0)));
        assert_eq!(player.as_player().unwrap().health, 1);
    }

    #[test]
    fn test_player_ignores_other_factions() {
        let mut player = test_player(0);
        assert!(!player.on_object_collision(&contact(1, Faction::Player, 0.0)));
        assert_eq!(player.as_player().unwrap().health, 3);
    }

    #[test]
    fn test_player_blinks_while_intangible() {
        let mut player = test_player(0);
        player.on_object_collision(&contact(1, Faction::Car, 0.0));
        let p = player.as_player().unwrap();
        assert!(p.visible(&player.rb));

        player.before_physics(0.15);
        let p = player.as_player().unwrap();
        assert!(!p.visible(&player.rb));
    }

    #[test]
    fn test_player_clamped_inside_window() {
        let mut player = test_player(0);
        let mut motion = Motion {
            velocity: Vector2::new(-300.0, -10.0),
            position: Vector2::new(5.0, 0.0),
        };
        player.on_horizontal_window_hit(
            &mut motion,
            WindowHit { edge: WindowEdge::Left, window_pos: 0.0, camera_pos: 0.0 },
        );
        assert_eq!(motion.velocity, Vector2::new(0.0, -10.0));
        assert_eq!(motion.position.x, 16.0);

        motion.position.x = 749.0;
        player.on_horizontal_window_hit(
            &mut motion,
            WindowHit { edge: WindowEdge::Right, window_pos: 750.0, camera_pos: 0.0 },
        );
        assert_eq!(motion.position.x, 734.0);
    }

    #[test]
    fn test_car_movement_drifts() {
        let mut car = test_car(1, false);
        car.movement_logic(&Controls::default(), 0.5);
        assert_eq!(car.rb.acceleration, Vector2::new(-100.0, 100.0));
    }

    #[test]
    fn test_car_deflects_once_per_neighbour() {
        let mut car = test_car(1, true);
        car.rb.velocity = Vector2::new(50.0, 100.0);

        // Neighbour on the right pushes this car left
        assert!(car.on_object_collision(&contact(2, Faction::Car, 30.0)));
        assert_eq!(car.rb.velocity.x, -50.0);
        let state = car.as_car().unwrap();
        assert!(!state.horizontal_dir);
        assert_eq!(state.last_hit_id, Some(2));

        // Still overlapping the same car: nothing happens
        car.rb.velocity.x = 50.0;
        assert!(!car.on_object_collision(&contact(2, Faction::Car, 30.0)));
        assert_eq!(car.rb.velocity.x, 50.0);

        // A different car on the left reacts again
        assert!(car.on_object_collision(&contact(3, Faction::Car, -30.0)));
        assert_eq!(car.rb.velocity.x, 50.0);
        assert!(car.as_car().unwrap().horizontal_dir);
    }

    #[test]
    fn test_car_ignores_player() {
        let mut car = test_car(1, true);
        assert!(!car.on_object_collision(&contact(0, Faction::Player, 0.0)));
        assert_eq!(car.as_car().unwrap().last_hit_id, None);
    }

    #[test]
    fn test_car_dies_below_bottom_only() {
        let mut car = test_car(1, true);
        let bottom = WindowHit { edge: WindowEdge::Bottom, window_pos: 1250.0, camera_pos: -100.0 };

        // Crossing, but not yet by half the height
        let mut motion = Motion { velocity: Vector2::ZERO, position: Vector2::new(0.0, 1200.0) };
        car.on_vertical_window_hit(&mut motion, bottom);
        assert!(car.is_alive());

        motion.position.y = 1210.1;
        car.on_vertical_window_hit(&mut motion, bottom);
        assert!(!car.is_alive());

        let mut car = test_car(2, true);
        let top = WindowHit { edge: WindowEdge::Top, window_pos: 0.0, camera_pos: -100.0 };
        motion.position.y = -5000.0;
        car.on_vertical_window_hit(&mut motion, top);
        assert!(car.is_alive());
    }

    #[test]
    fn test_car_bounces_off_walls() {
        let mut car = test_car(1, true);
        let mut motion = Motion { velocity: Vector2::new(80.0, 10.0), position: Vector2::ZERO };

        car.on_horizontal_window_hit(
            &mut motion,
            WindowHit { edge: WindowEdge::Right, window_pos: 750.0, camera_pos: 0.0 },
        );
        assert_eq!(motion.velocity, Vector2::new(-80.0, 10.0));
        assert!(!car.as_car().unwrap().horizontal_dir);

        car.on_horizontal_window_hit(
            &mut motion,
            WindowHit { edge: WindowEdge::Left, window_pos: 0.0, camera_pos: 0.0 },
        );
        assert_eq!(motion.velocity, Vector2::new(80.0, 10.0));
        assert!(car.as_car().unwrap().horizontal_dir);
    }
}
