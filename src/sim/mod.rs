//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, all movement expressed per frame
//! - Stable iteration order (static platforms, then moving, then enemies)
//! - No rendering or platform dependencies

pub mod entity;
pub mod platform;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use entity::{Animation, EnemyKind, PatrolBounds, PatrolEntity};
pub use platform::{Motion, Platform, PlatformStyle};
pub use player::{InputOutcome, JumpKind, Player, PlayerPose};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{FrameInput, tick};
