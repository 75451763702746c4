//! Data-driven game balance
//!
//! Every gameplay constant lives here. Defaults reproduce the shipped game;
//! a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// A traffic car sprite and its collision size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarModel {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl CarModel {
    fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }
}

/// Player vehicle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Sprite size in pixels
    pub sprite_width: u32,
    pub sprite_height: u32,
    /// Pixels shaved off the sprite to get the collision box
    pub hurtbox_leeway_width: u32,
    pub hurtbox_leeway_height: u32,
    pub force_amount: f32,
    pub friction_coefficient: f32,
    pub max_velocity: f32,
    pub mass: f32,
    pub max_health: i32,
    /// Seconds of invulnerability after a hit
    pub max_intangible_time: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            sprite_width: 40,
            sprite_height: 80,
            hurtbox_leeway_width: 8,
            hurtbox_leeway_height: 8,
            force_amount: 750.0,
            friction_coefficient: 1.0,
            max_velocity: 1500.0,
            mass: 100.0,
            max_health: 3,
            max_intangible_time: 3.0,
        }
    }
}

impl PlayerTuning {
    pub fn hurtbox(&self) -> (u32, u32) {
        (
            self.sprite_width.saturating_sub(self.hurtbox_leeway_width),
            self.sprite_height.saturating_sub(self.hurtbox_leeway_height),
        )
    }
}

/// Traffic tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarTuning {
    pub max_velocity: f32,
    pub mass: f32,
    pub friction_coefficient: f32,
    /// Range of the per-car driving force
    pub force_min: f32,
    pub force_max: f32,
    /// Range of the sideways drift multiplier (sideways force = force * multiplier)
    pub horizontal_multiplier_min: f32,
    pub horizontal_multiplier_max: f32,
    /// How far above the top of the window a car may spawn
    pub spawn_offset_min: f32,
    pub spawn_offset_max: f32,
    /// Car cap at the start of a run (grows with distance)
    pub start_max_amount: u32,
    /// Cars on the road when a run starts
    pub start_amount: u32,
    /// Longest wait between spawns (seconds)
    pub max_spawn_time: f32,
    pub models: Vec<CarModel>,
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            max_velocity: 400.0,
            mass: 100.0,
            friction_coefficient: 1.0,
            force_min: 50.0,
            force_max: 400.0,
            horizontal_multiplier_min: 0.0,
            horizontal_multiplier_max: 1.5,
            spawn_offset_min: 0.0,
            spawn_offset_max: crate::consts::WINDOW_HEIGHT * 0.5,
            start_max_amount: 3,
            start_amount: 2,
            max_spawn_time: 3.0,
            models: vec![
                CarModel::new("black", 71, 131),
                CarModel::new("blue", 70, 121),
                CarModel::new("green", 71, 116),
                CarModel::new("orange", 70, 121),
                CarModel::new("yellow", 71, 131),
            ],
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub window_width: f32,
    pub window_height: f32,
    /// Camera y relative to the player (negative keeps the player near the bottom)
    pub camera_vertical_offset: f32,
    /// Score per pixel travelled upward
    pub score_per_distance: f32,
    /// Score per car that leaves the bottom of the screen
    pub score_per_dodge: f32,
    /// Score needed for a win when the run ends
    pub win_score: f32,
    /// Distance travelled per extra allowed car
    pub difficulty_distance: f32,
    pub player: PlayerTuning,
    pub car: CarTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_width: crate::consts::WINDOW_WIDTH,
            window_height: crate::consts::WINDOW_HEIGHT,
            camera_vertical_offset: -1150.0,
            score_per_distance: 0.01,
            score_per_dodge: 10.0,
            win_score: 1000.0,
            difficulty_distance: 5000.0,
            player: PlayerTuning::default(),
            car: CarTuning::default(),
        }
    }
}

/// Failure to load a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Validation(String),
}

impl Display for TuningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse `{}`: {source}", path.display())
            }
            Self::Validation(message) => write!(f, "invalid tuning: {message}"),
        }
    }
}

impl Error for TuningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

impl Tuning {
    /// Read and validate a JSON tuning file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let raw = fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning: Tuning = serde_json::from_str(&raw).map_err(|source| TuningError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning from `{}` ({} car models)",
            path.display(),
            tuning.car.models.len()
        );
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("window_width", self.window_width)?;
        positive("window_height", self.window_height)?;
        positive("difficulty_distance", self.difficulty_distance)?;

        let player = &self.player;
        positive("player.mass", player.mass)?;
        positive("player.max_velocity", player.max_velocity)?;
        non_negative("player.max_intangible_time", player.max_intangible_time)?;
        if player.max_health <= 0 {
            return Err(invalid("player.max_health must be at least 1"));
        }
        let (width, height) = player.hurtbox();
        if width == 0 || height == 0 {
            return Err(invalid("player hurtbox leeway leaves no collision box"));
        }

        let car = &self.car;
        positive("car.mass", car.mass)?;
        positive("car.max_velocity", car.max_velocity)?;
        non_negative("car.max_spawn_time", car.max_spawn_time)?;
        ordered("car.force", car.force_min, car.force_max)?;
        ordered(
            "car.horizontal_multiplier",
            car.horizontal_multiplier_min,
            car.horizontal_multiplier_max,
        )?;
        ordered("car.spawn_offset", car.spawn_offset_min, car.spawn_offset_max)?;

        if car.models.is_empty() {
            return Err(invalid("car.models must not be empty"));
        }
        if let Some(model) = car.models.iter().find(|m| m.width == 0 || m.height == 0) {
            return Err(TuningError::Validation(format!(
                "car model `{}` has an empty size",
                model.name
            )));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> TuningError {
    TuningError::Validation(message.to_string())
}

fn positive(label: &str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Validation(format!("{label} must be positive, got {value}")))
    }
}

fn non_negative(label: &str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Validation(format!("{label} must not be negative, got {value}")))
    }
}

fn ordered(label: &str, min: f32, max: f32) -> Result<(), TuningError> {
    if min <= max {
        Ok(())
    } else {
        Err(TuningError::Validation(format!(
            "{label}_min ({min}) is greater than {label}_max ({max})"
        )))
    }
}
