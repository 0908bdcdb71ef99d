//! Game state and the game-flow state machine
//!
//! `GameState` is the simulation context: it owns every entity, the score
//! and timers, and the current `GamePhase`. The phase only changes through
//! the named actions below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::PatrolEntity;
use super::platform::Platform;
use super::player::Player;
use super::rect::Rect;
use crate::tuning::Tuning;
use crate::win_bonus;

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen (initial)
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen, pause menu shown
    Paused,
    /// Controls help, reachable only from Paused
    Controls,
    /// Player died
    GameOver,
    /// Goal reached; returns to Menu after the win delay
    Win,
}

/// Things that happened this frame, consumed by audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    DoubleJumped,
    Dashed,
    /// Hard landing on a platform
    Landed,
    Died,
    GoalReached { score: u64 },
    /// A menu action was confirmed
    MenuSelect,
    MusicStart,
    MusicStop,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    phase: GamePhase,
    /// Current score
    pub score: u64,
    /// Best winning score this process run (never persisted)
    pub high_score: u64,
    /// Seconds spent playing this run
    pub game_timer: f32,
    /// Seconds spent on the win screen
    pub win_timer: f32,
    pub music_enabled: bool,
    pub player: Player,
    /// Static platforms first, then moving ones
    pub platforms: Vec<Platform>,
    pub enemies: Vec<PatrolEntity>,
    pub goal: Rect,
    pub tuning: Tuning,
    events: Vec<GameEvent>,
    /// Whether the last music event was a start
    music_wanted: bool,
}

impl GameState {
    /// Build the level from `tuning`, starting in the menu
    pub fn new(tuning: Tuning, music_enabled: bool) -> Self {
        let level = &tuning.level;
        let platforms = level
            .platforms
            .iter()
            .map(Platform::from_spec)
            .chain(level.moving_platforms.iter().map(Platform::from_moving_spec))
            .collect();
        let enemies = level.enemies.iter().map(PatrolEntity::from_spec).collect();

        let mut state = Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score: 0,
            game_timer: 0.0,
            win_timer: 0.0,
            music_enabled,
            player: Player::from_layout(level),
            platforms,
            enemies,
            goal: level.goal,
            tuning,
            events: Vec::new(),
            music_wanted: false,
        };
        state.play_music();
        state
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.tuning.level.width, self.tuning.level.height)
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::MusicStart => self.music_wanted = true,
            GameEvent::MusicStop => self.music_wanted = false,
            _ => {}
        }
        self.events.push(event);
    }

    /// True while the game expects background music to be playing.
    /// Hosts use this to resume music after an interruption.
    pub fn music_wanted(&self) -> bool {
        self.music_wanted
    }

    fn set_phase(&mut self, next: GamePhase) {
        if self.phase != next {
            log::info!("Phase {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
    }

    fn play_music(&mut self) {
        if self.music_enabled {
            self.emit(GameEvent::MusicStart);
        }
    }

    fn select_sound(&mut self) {
        if self.music_enabled {
            self.emit(GameEvent::MenuSelect);
        }
    }

    /// Player, platforms and enemies back to their initial pose and velocity
    pub fn reset_entities(&mut self) {
        self.player.reset();
        for platform in &mut self.platforms {
            platform.reset();
        }
        for enemy in &mut self.enemies {
            enemy.reset();
        }
    }

    fn reset_run(&mut self) {
        self.reset_entities();
        self.win_timer = 0.0;
        self.score = 0;
        self.game_timer = 0.0;
    }

    // === Actions ===

    /// Menu -> Playing: fresh run, restart music
    pub fn start(&mut self) {
        self.reset_run();
        self.emit(GameEvent::MusicStop);
        self.play_music();
        self.set_phase(GamePhase::Playing);
    }

    /// Playing -> Paused
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
        }
    }

    /// Paused -> Playing, no reset
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Paused -> Controls
    pub fn show_controls(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Controls);
        }
    }

    /// Controls -> Paused
    pub fn hide_controls(&mut self) {
        if self.phase == GamePhase::Controls {
            self.set_phase(GamePhase::Paused);
        }
    }

    /// Any phase -> Menu with a full reset
    pub fn return_to_menu(&mut self) {
        self.reset_run();
        self.emit(GameEvent::MusicStop);
        self.play_music();
        self.set_phase(GamePhase::Menu);
    }

    /// Playing -> GameOver
    pub fn trigger_game_over(&mut self) {
        self.player.kill();
        if self.music_enabled {
            self.emit(GameEvent::Died);
        }
        self.emit(GameEvent::MusicStop);
        self.set_phase(GamePhase::GameOver);
    }

    /// Playing -> Win: add the time and goal bonus, update the high score
    pub fn trigger_win(&mut self) {
        self.win_timer = 0.0;
        self.score += win_bonus(self.game_timer);
        self.high_score = self.high_score.max(self.score);
        log::info!(
            "Goal reached in {:.1}s, score {} (best {})",
            self.game_timer,
            self.score,
            self.high_score
        );
        if self.music_enabled {
            self.emit(GameEvent::GoalReached { score: self.score });
        }
        self.emit(GameEvent::MusicStop);
        self.set_phase(GamePhase::Win);
    }

    /// GameOver/Win -> Playing with a full reset
    pub fn restart(&mut self) {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Win) {
            self.select_sound();
            self.reset_run();
            self.play_music();
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Flip the music/sound flag
    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        log::info!("Sound {}", if self.music_enabled { "on" } else { "off" });

        if !self.music_enabled {
            self.emit(GameEvent::MusicStop);
        } else if self.phase == GamePhase::Menu {
            self.emit(GameEvent::MusicStart);
        }
        self.select_sound();
    }
}
