//! Sprite catalog
//!
//! Sprites are drawn as colored quads, so a sprite here is just a size and a
//! color. Lookups are explicit: `get` returns `None` for unknown names and
//! `sprite_or_placeholder` always yields something drawable.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Environment variable naming the sprite override file (native only)
pub const SPRITES_PATH_ENV: &str = "LEDGE_RUNNER_SPRITES";
/// Default sprite override location (native only)
pub const DEFAULT_SPRITES_PATH: &str = "config/sprites.json";

/// Error loading a sprite catalog
#[derive(Debug)]
pub enum AssetError {
    Read(std::io::Error),
    Parse(serde_json::Error),
}

impl AssetError {
    pub fn is_missing_file(&self) -> bool {
        matches!(self, AssetError::Read(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Read(e) => write!(f, "failed to read sprite catalog: {e}"),
            AssetError::Parse(e) => write!(f, "failed to parse sprite catalog: {e}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Read(e) => Some(e),
            AssetError::Parse(e) => Some(e),
        }
    }
}

/// A drawable sprite: native size and RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub size: Vec2,
    pub color: [f32; 4],
}

impl Sprite {
    pub const fn new(w: f32, h: f32, color: [f32; 4]) -> Self {
        Self {
            size: Vec2::new(w, h),
            color,
        }
    }
}

/// Magenta box drawn for any missing sprite
pub const PLACEHOLDER: Sprite = Sprite::new(32.0, 32.0, [1.0, 0.0, 1.0, 1.0]);

/// Named sprites
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    sprites: HashMap<String, Sprite>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        let builtin = [
            ("player_idle0", Sprite::new(32.0, 40.0, [0.95, 0.80, 0.35, 1.0])),
            ("player_run0", Sprite::new(32.0, 40.0, [1.0, 0.70, 0.25, 1.0])),
            ("player_jump0", Sprite::new(32.0, 40.0, [1.0, 0.90, 0.45, 1.0])),
            ("player_down0", Sprite::new(32.0, 40.0, [0.85, 0.65, 0.30, 1.0])),
            ("platformbg", Sprite::new(50.0, 50.0, [0.45, 0.30, 0.20, 1.0])),
            ("bg_ground", Sprite::new(50.0, 50.0, [0.30, 0.55, 0.25, 1.0])),
            ("door1", Sprite::new(40.0, 40.0, [0.55, 0.35, 0.85, 1.0])),
            ("bee1", Sprite::new(36.0, 32.0, [1.0, 0.85, 0.10, 1.0])),
            ("bee2", Sprite::new(36.0, 32.0, [0.95, 0.80, 0.10, 1.0])),
            ("bee3", Sprite::new(36.0, 32.0, [1.0, 0.85, 0.10, 1.0])),
            ("bee4", Sprite::new(36.0, 32.0, [0.90, 0.75, 0.05, 1.0])),
            ("slime1", Sprite::new(40.0, 28.0, [0.35, 0.85, 0.35, 1.0])),
            ("slime2", Sprite::new(40.0, 28.0, [0.30, 0.75, 0.30, 1.0])),
            ("slime_red1", Sprite::new(40.0, 28.0, [0.95, 0.25, 0.15, 1.0])),
            ("slime_red2", Sprite::new(40.0, 28.0, [0.85, 0.20, 0.10, 1.0])),
            ("bg_menu", Sprite::new(800.0, 600.0, [0.10, 0.12, 0.25, 1.0])),
        ];

        Self {
            sprites: builtin
                .into_iter()
                .map(|(name, sprite)| (name.to_string(), sprite))
                .collect(),
        }
    }
}

impl AssetCatalog {
    /// An empty catalog; every lookup falls back to the placeholder
    pub fn empty() -> Self {
        Self {
            sprites: HashMap::new(),
        }
    }

    /// Built-in sprites overridden by a JSON object of `name -> Sprite`
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let overrides: HashMap<String, Sprite> = serde_json::from_str(json).map_err(AssetError::Parse)?;
        let mut catalog = Self::default();
        catalog.sprites.extend(overrides);
        Ok(catalog)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &str) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path).map_err(AssetError::Read)?;
        Self::from_json(&json)
    }

    /// Built-ins plus overrides from `$LEDGE_RUNNER_SPRITES` (or the default path)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(SPRITES_PATH_ENV) {
            Ok(path) => Self::load_from(&path, true),
            Err(_) => Self::load_from(DEFAULT_SPRITES_PATH, false),
        }
    }

    /// Overrides from `path`, or the built-ins on failure. A missing file at
    /// the default path is silent.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &str, explicit: bool) -> Self {
        match Self::from_file(path) {
            Ok(catalog) => {
                log::info!("Loaded sprite catalog from {path} ({} sprites)", catalog.len());
                catalog
            }
            Err(e) if !explicit && e.is_missing_file() => Self::default(),
            Err(e) => {
                log::warn!("{e} ({path}), using built-in sprites");
                Self::default()
            }
        }
    }

    /// The web build ships the built-in sprites
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    /// The named sprite, or the placeholder when it is missing
    pub fn sprite_or_placeholder(&self, name: &str) -> Sprite {
        match self.get(name) {
            Some(sprite) => *sprite,
            None => {
                log::debug!("Missing sprite '{name}', using placeholder");
                PLACEHOLDER
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnemyKind, PlayerPose};

    #[test]
    fn test_builtin_covers_game_sprites() {
        let catalog = AssetCatalog::default();
        for kind in [EnemyKind::Slime, EnemyKind::Bee, EnemyKind::LavaSlime] {
            for frame in kind.frames() {
                assert!(catalog.get(frame).is_some(), "missing {frame}");
            }
        }
        for pose in [PlayerPose::Idle, PlayerPose::Run, PlayerPose::Jump, PlayerPose::Crouch] {
            assert!(catalog.get(pose.sprite_name()).is_some());
        }
        assert!(catalog.get("door1").is_some());
    }

    #[test]
    fn test_missing_sprite_is_placeholder() {
        let catalog = AssetCatalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.get("bee1").is_none());
        assert_eq!(catalog.sprite_or_placeholder("bee1"), PLACEHOLDER);
    }

    #[test]
    fn test_json_overrides_builtin() {
        let json = r#"{ "door1": { "size": [20.0, 60.0], "color": [0.0, 1.0, 0.0, 1.0] } }"#;
        let catalog = AssetCatalog::from_json(json).unwrap();
        let door = catalog.sprite_or_placeholder("door1");
        assert_eq!(door.size, Vec2::new(20.0, 60.0));
        assert_eq!(catalog.len(), AssetCatalog::default().len());
    }

    #[test]
    fn test_load_from_applies_override_file() {
        let path = std::env::temp_dir().join(format!("ledge_runner_sprites_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "bee1": { "size": [10.0, 10.0], "color": [0.0, 0.0, 1.0, 1.0] } }"#).unwrap();
        let catalog = AssetCatalog::load_from(path.to_str().unwrap(), true);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalog.sprite_or_placeholder("bee1").size, Vec2::splat(10.0));
        assert!(catalog.get("door1").is_some());
    }

    #[test]
    fn test_load_from_unreadable_falls_back_to_builtin() {
        let catalog = AssetCatalog::load_from("no/such/dir/sprites.json", false);
        assert_eq!(catalog.len(), AssetCatalog::default().len());
        let err = AssetCatalog::from_file("no/such/dir/sprites.json").unwrap_err();
        assert!(err.is_missing_file());
    }

    #[test]
    fn test_bad_json_is_error() {
        let err = AssetCatalog::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("sprite catalog"));
    }
}
