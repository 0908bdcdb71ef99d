//! Data-driven game balance and level layout
//!
//! Everything the simulation reads as fixed configuration: physics constants,
//! platform rectangles, enemy spawns/bounds, the goal, world size. `Default`
//! reproduces the shipped level; a JSON file can override any subset of fields.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::entity::EnemyKind;
use crate::sim::platform::PlatformStyle;
use crate::sim::rect::Rect;

/// Environment variable naming the tuning file (native only)
pub const TUNING_PATH_ENV: &str = "LEDGE_RUNNER_TUNING";
/// Default tuning file location (native only)
pub const DEFAULT_TUNING_PATH: &str = "config/tuning.json";

/// Errors produced while loading a tuning file
#[derive(Debug)]
pub enum TuningError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "failed to read tuning file: {e}"),
            Self::Parse(e) => write!(f, "failed to parse tuning file: {e}"),
            Self::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl TuningError {
    /// The file does not exist
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Read(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

/// Per-frame movement constants (downward-positive y)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub double_jump_factor: f32,
    pub speed: f32,
    pub dash_speed: f32,
    pub dash_cooldown: f32,
    pub bump_speed: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            double_jump_factor: DOUBLE_JUMP_FACTOR,
            speed: SPEED,
            dash_speed: DASH_SPEED,
            dash_cooldown: DASH_COOLDOWN,
            bump_speed: BUMP_SPEED,
        }
    }
}

/// A static platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub rect: Rect,
    #[serde(default)]
    pub style: PlatformStyle,
}

/// A platform sliding horizontally between two bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingPlatformSpec {
    pub rect: Rect,
    pub vx: f32,
    pub limit_left: f32,
    pub limit_right: f32,
    #[serde(default)]
    pub style: PlatformStyle,
}

/// An animated enemy; bounds are applied to its center x
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vx: f32,
    pub limit_left: f32,
    pub limit_right: f32,
    pub frame_time: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

/// The level: world bounds, spawn, platforms, enemies and goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    pub tile_size: f32,
    pub player_spawn: Vec2,
    pub player_hitbox: Vec2,
    pub player_sprite: Vec2,
    pub platforms: Vec<PlatformSpec>,
    pub moving_platforms: Vec<MovingPlatformSpec>,
    pub enemies: Vec<EnemySpec>,
    pub goal: Rect,
}

impl Default for LevelLayout {
    fn default() -> Self {
        let tiled = |x, y, w, h| PlatformSpec {
            rect: Rect::new(x, y, w, h),
            style: PlatformStyle::Tiled,
        };

        Self {
            width: WIDTH,
            height: HEIGHT,
            ground_y: GROUND_Y,
            tile_size: TILE_SIZE,
            player_spawn: Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1),
            player_hitbox: Vec2::splat(PLAYER_HITBOX),
            player_sprite: Vec2::new(PLAYER_SPRITE.0, PLAYER_SPRITE.1),
            platforms: vec![
                tiled(200.0, 450.0, 200.0, 20.0),
                tiled(500.0, 350.0, 200.0, 20.0),
                tiled(150.0, 250.0, 150.0, 20.0),
                tiled(420.0, 250.0, 50.0, 20.0),
                tiled(350.0, 150.0, 100.0, 20.0),
                // Ground
                PlatformSpec {
                    rect: Rect::new(0.0, GROUND_Y, WIDTH, TILE_SIZE),
                    style: PlatformStyle::Solid,
                },
            ],
            moving_platforms: vec![MovingPlatformSpec {
                rect: Rect::new(600.0, 150.0, 50.0, 20.0),
                vx: 1.5,
                limit_left: 550.0,
                limit_right: 750.0,
                style: PlatformStyle::Tiled,
            }],
            enemies: vec![
                EnemySpec {
                    kind: EnemyKind::Bee,
                    pos: Vec2::new(500.0, 290.0),
                    vx: 1.6,
                    limit_left: 500.0,
                    limit_right: 700.0,
                    frame_time: 0.1,
                    scale: 1.2,
                },
                EnemySpec {
                    kind: EnemyKind::Slime,
                    pos: Vec2::new(400.0, 130.0),
                    vx: 1.0,
                    limit_left: 360.0,
                    limit_right: 440.0,
                    frame_time: 0.25,
                    scale: 1.0,
                },
                EnemySpec {
                    kind: EnemyKind::LavaSlime,
                    pos: Vec2::new(WIDTH / 2.0, GROUND_Y - 20.0),
                    vx: 1.8,
                    limit_left: 0.0,
                    limit_right: WIDTH,
                    frame_time: 0.35,
                    scale: 1.0,
                },
            ],
            goal: Rect::new(700.0, 100.0, 40.0, 40.0),
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub level: LevelLayout,
}

impl Tuning {
    /// Parse and validate a JSON tuning document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject layouts the simulation cannot honor (bounds narrower than the
    /// platform, inverted patrol ranges, empty world)
    pub fn validate(&self) -> Result<(), TuningError> {
        let level = &self.level;
        if level.width <= 0.0 || level.height <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "world size must be positive, got {}x{}",
                level.width, level.height
            )));
        }
        for (i, mp) in level.moving_platforms.iter().enumerate() {
            if mp.limit_right - mp.limit_left < mp.rect.w {
                return Err(TuningError::Invalid(format!(
                    "moving platform {i}: bounds [{}, {}] narrower than platform width {}",
                    mp.limit_left, mp.limit_right, mp.rect.w
                )));
            }
        }
        for (i, enemy) in level.enemies.iter().enumerate() {
            if enemy.limit_left > enemy.limit_right {
                return Err(TuningError::Invalid(format!(
                    "enemy {i}: limit_left {} > limit_right {}",
                    enemy.limit_left, enemy.limit_right
                )));
            }
            if enemy.frame_time <= 0.0 {
                return Err(TuningError::Invalid(format!(
                    "enemy {i}: frame_time must be positive"
                )));
            }
        }
        Ok(())
    }

    /// Read a tuning file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &str) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(TuningError::Read)?;
        Self::from_json(&json)
    }

    /// Load tuning from `$LEDGE_RUNNER_TUNING` (or the default path).
    /// Falls back to defaults if the file is missing or invalid.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(TUNING_PATH_ENV) {
            Ok(path) => Self::load_from(&path, true),
            Err(_) => Self::load_from(DEFAULT_TUNING_PATH, false),
        }
    }

    /// Load `path`, or defaults on failure. Only a missing file at a path the
    /// user did not ask for is silent.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &str, explicit: bool) -> Self {
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) if !explicit && e.is_missing_file() => Self::default(),
            Err(e) => {
                log::warn!("{e} ({path}), using defaults");
                Self::default()
            }
        }
    }

    /// The web build ships the built-in level
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }
}
