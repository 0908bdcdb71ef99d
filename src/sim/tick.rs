//! Per-frame update
//!
//! `tick` dispatches on the current phase; while Playing it runs the fixed
//! simulation step: input, physics, platform collisions, enemies, then the
//! death and win checks.

use super::state::{GameEvent, GamePhase, GameState};
use super::player::JumpKind;
use crate::consts::WIN_DELAY;
use crate::running_score;

/// Input state for a single frame.
///
/// Movement, jump and dash keys are the held state this frame. `pause` and
/// `restart` are presses delivered once by the host.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    /// Jump key held (edge detection happens in the player)
    pub jump: bool,
    pub dash: bool,
    pub pause: bool,
    pub restart: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &FrameInput, dt: f32) {
    match state.phase() {
        GamePhase::Menu => {}
        GamePhase::Paused => {
            if input.pause {
                state.resume();
            }
        }
        GamePhase::Controls => {
            if input.pause {
                state.hide_controls();
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
        }
        GamePhase::Win => {
            state.win_timer += dt;
            if state.win_timer >= WIN_DELAY {
                state.return_to_menu();
            } else if input.restart {
                state.restart();
            }
        }
        GamePhase::Playing => {
            step(state, input, dt);
            return;
        }
    }
    // Off the playfield the jump key is still tracked, so a key held into
    // a new run needs a fresh press
    state.player.jump_held = input.jump;
}

/// One frame of gameplay. Order is fixed; see the numbered stages.
fn step(state: &mut GameState, input: &FrameInput, dt: f32) {
    // 1. Clock and running score
    state.game_timer += dt;
    state.score = running_score(state.game_timer);

    // 2. Pause freezes everything else this frame
    if input.pause {
        state.pause();
        return;
    }

    // 3. Player input and physics
    let physics = &state.tuning.physics;
    let outcome = state.player.handle_input(input, physics);
    state.player.update_cooldowns(dt);
    state.player.apply_physics(physics, state.tuning.level.width);

    if state.music_enabled {
        if outcome.dashed {
            state.emit(GameEvent::Dashed);
        }
        match outcome.jump {
            Some(JumpKind::Ground) => state.emit(GameEvent::Jumped),
            Some(JumpKind::Air) => state.emit(GameEvent::DoubleJumped),
            None => {}
        }
    }

    // 4. Moving platforms
    for platform in &mut state.platforms {
        platform.update();
    }

    // 5-6. Grounding is earned fresh every frame: static platforms, then
    // moving platforms with carry
    state.player.grounded = false;
    let impact_speed = state.player.vy;
    let mut landed = false;
    for platform in state.platforms.iter().filter(|p| !p.is_moving()) {
        landed |= state.player.check_platform_collision(&platform.rect, None);
    }
    for platform in state.platforms.iter().filter(|p| p.is_moving()) {
        landed |= state
            .player
            .check_platform_collision(&platform.rect, Some(platform.vx()));
    }
    if landed && impact_speed > state.tuning.physics.bump_speed && state.music_enabled {
        state.emit(GameEvent::Landed);
    }

    // 7. Enemies
    for enemy in &mut state.enemies {
        enemy.update(dt);
    }

    // 8-9. Death: fell off the bottom or touched an enemy
    let fell = state.player.sprite_rect().top() > state.tuning.level.height;
    let hit = state
        .enemies
        .iter()
        .any(|e| e.check_collision(&state.player.hitbox));
    if fell || hit {
        log::debug!("Player died (fell: {fell}, hit: {hit})");
        state.trigger_game_over();
    }

    // 10. Win; runs even after a death this frame and takes precedence
    if state.player.hitbox.intersects(&state.goal) {
        state.trigger_win();
    }
}
