//! Ledge Runner - a single-level 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, platforms, enemies, game flow)
//! - `renderer`: WebGPU rendering of the current frame
//! - `audio`: Sound effects and music driven by simulation events
//! - `ui`: Menu buttons and HUD values
//! - `tuning`: Data-driven physics constants and level layout
//! - `assets`: Sprite catalog with placeholder fallback

pub mod assets;
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use assets::{AssetCatalog, Sprite};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. Movement constants are expressed per frame at this rate.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// World dimensions (origin top-left, y grows downward)
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;
    pub const TILE_SIZE: f32 = 50.0;
    pub const GROUND_Y: f32 = 550.0;

    /// Downward acceleration added to vy every frame
    pub const GRAVITY: f32 = 0.8;
    /// Ground jump impulse (negative = up)
    pub const JUMP_FORCE: f32 = -14.0;
    /// Air jump strength relative to JUMP_FORCE
    pub const DOUBLE_JUMP_FACTOR: f32 = 0.8;
    /// Horizontal move per frame
    pub const SPEED: f32 = 5.0;
    /// Instant dash displacement
    pub const DASH_SPEED: f32 = 15.0;
    /// Seconds between dashes
    pub const DASH_COOLDOWN: f32 = 0.5;
    /// Landing faster than this plays the bump sound
    pub const BUMP_SPEED: f32 = 2.0;

    /// Seconds on the win screen before returning to the menu
    pub const WIN_DELAY: f32 = 3.0;
    /// Score points per second survived
    pub const SCORE_PER_SECOND: f32 = 10.0;
    /// Time bonus: (PAR_TIME - t) * BONUS_PER_SECOND, floored at zero
    pub const PAR_TIME: f32 = 60.0;
    pub const BONUS_PER_SECOND: f32 = 20.0;
    /// Flat bonus for reaching the goal
    pub const GOAL_BONUS: u64 = 1000;

    /// Player defaults
    pub const PLAYER_SPAWN: (f32, f32) = (50.0, 50.0);
    pub const PLAYER_HITBOX: f32 = 30.0;
    pub const PLAYER_SPRITE: (f32, f32) = (32.0, 40.0);
}

/// Score for an elapsed run time while playing
#[inline]
pub fn running_score(game_timer: f32) -> u64 {
    (game_timer * consts::SCORE_PER_SECOND).max(0.0).floor() as u64
}

/// Bonus awarded on reaching the goal (time bonus + flat goal bonus)
#[inline]
pub fn win_bonus(game_timer: f32) -> u64 {
    let time_bonus = ((consts::PAR_TIME - game_timer) * consts::BONUS_PER_SECOND)
        .max(0.0)
        .floor() as u64;
    time_bonus + consts::GOAL_BONUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_score_floors() {
        assert_eq!(running_score(0.0), 0);
        assert_eq!(running_score(1.25), 12);
        assert_eq!(running_score(10.0), 100);
    }

    #[test]
    fn test_win_bonus() {
        assert_eq!(win_bonus(10.0), 1000 + 1000);
        // Past par time only the flat bonus remains
        assert_eq!(win_bonus(75.0), 1000);
    }
}
