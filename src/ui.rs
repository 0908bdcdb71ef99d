//! Menu buttons and HUD values
//!
//! Buttons are laid out per phase in world coordinates. A click is routed to
//! the first button under the pointer and applied through the game's named
//! actions; `Quit` is handed back to the host untouched.

use glam::Vec2;

use crate::consts::{HEIGHT, WIDTH, WIN_DELAY};
use crate::sim::{GamePhase, GameState, Rect};

pub const BUTTON_WIDTH: f32 = 300.0;
pub const BUTTON_HEIGHT: f32 = 50.0;
pub const BUTTON_Y_START: f32 = HEIGHT / 2.0 - 100.0;
pub const BUTTON_SPACING: f32 = 70.0;

/// What a button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    ToggleSound,
    /// Leave the game; only the host can do this
    Quit,
    Resume,
    ShowControls,
    MainMenu,
    /// Controls screen back to the pause menu
    Back,
    /// In-game pause button
    Pause,
}

impl MenuAction {
    pub fn label(&self, music_enabled: bool) -> &'static str {
        match self {
            MenuAction::Start => "START GAME",
            MenuAction::ToggleSound if music_enabled => "SOUND: ON",
            MenuAction::ToggleSound => "SOUND: OFF",
            MenuAction::Quit => "QUIT",
            MenuAction::Resume => "RESUME",
            MenuAction::ShowControls => "CONTROLS",
            MenuAction::MainMenu => "MAIN MENU",
            MenuAction::Back => "BACK",
            MenuAction::Pause => "PAUSE",
        }
    }

    /// Apply to the game. Quit is left to the caller.
    pub fn apply(&self, state: &mut GameState) {
        match self {
            MenuAction::Start => state.start(),
            MenuAction::ToggleSound => state.toggle_music(),
            MenuAction::Quit => {}
            MenuAction::Resume => state.resume(),
            MenuAction::ShowControls => state.show_controls(),
            MenuAction::MainMenu => state.return_to_menu(),
            MenuAction::Back => state.hide_controls(),
            MenuAction::Pause => state.pause(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub action: MenuAction,
}

impl Button {
    /// Right and bottom edges are outside the button
    pub fn is_clicked(&self, pos: Vec2) -> bool {
        self.rect.contains_point(pos)
    }
}

/// Centered column button at `row`
fn column_button(row: usize, action: MenuAction) -> Button {
    Button {
        rect: Rect::new(
            WIDTH / 2.0 - BUTTON_WIDTH / 2.0,
            BUTTON_Y_START + row as f32 * BUTTON_SPACING,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        ),
        action,
    }
}

/// Buttons visible in `phase`, in hit-test order
pub fn buttons_for(phase: GamePhase) -> Vec<Button> {
    match phase {
        GamePhase::Menu => vec![
            column_button(0, MenuAction::Start),
            column_button(1, MenuAction::ToggleSound),
            column_button(2, MenuAction::Quit),
        ],
        GamePhase::Paused => vec![
            column_button(0, MenuAction::Resume),
            column_button(1, MenuAction::ShowControls),
            column_button(2, MenuAction::ToggleSound),
            column_button(3, MenuAction::MainMenu),
        ],
        GamePhase::Controls => vec![Button {
            rect: Rect::new(WIDTH / 2.0 - 100.0, HEIGHT - 100.0, 200.0, 50.0),
            action: MenuAction::Back,
        }],
        GamePhase::Playing => vec![Button {
            rect: Rect::new(WIDTH - 120.0, 10.0, 110.0, 40.0),
            action: MenuAction::Pause,
        }],
        GamePhase::GameOver | GamePhase::Win => Vec::new(),
    }
}

/// Route a click at `pos` (world coordinates). Returns the action taken.
pub fn handle_click(state: &mut GameState, pos: Vec2) -> Option<MenuAction> {
    let button = buttons_for(state.phase())
        .into_iter()
        .find(|b| b.is_clicked(pos))?;

    log::debug!("Clicked {:?}", button.action);
    button.action.apply(state);
    Some(button.action)
}

/// Values shown on screen for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    /// Whole seconds played
    pub seconds: u64,
    /// Remaining dash cooldown, `None` when dash is ready
    pub dash_cooldown: Option<f32>,
    /// Airborne with the air jump still available
    pub double_jump_ready: bool,
    /// Best score, shown in the menu once there is one
    pub high_score: Option<u64>,
    /// Seconds until the win screen returns to the menu
    pub win_countdown: Option<f32>,
    pub music_enabled: bool,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let player = &state.player;
        let win_countdown = (state.phase() == GamePhase::Win)
            .then(|| WIN_DELAY - state.win_timer)
            .filter(|left| *left > 0.0);

        Self {
            phase: state.phase(),
            score: state.score,
            seconds: state.game_timer.max(0.0) as u64,
            dash_cooldown: (player.dash_cooldown > 0.0).then_some(player.dash_cooldown),
            double_jump_ready: player.can_double_jump && !player.grounded,
            high_score: (state.high_score > 0).then_some(state.high_score),
            win_countdown,
            music_enabled: state.music_enabled,
        }
    }

    /// Dash status line
    pub fn dash_text(&self) -> String {
        match self.dash_cooldown {
            Some(left) => format!("DASH: {left:.1}s"),
            None => "DASH: READY".to_string(),
        }
    }
}
