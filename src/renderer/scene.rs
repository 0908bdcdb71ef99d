//! Frame scene building
//!
//! Turns the game state into a flat list of colored triangles in world
//! coordinates. Pure: reads the state, never changes it.

use glam::Vec2;

use super::shapes::{push_outline, push_rect, with_alpha};
use super::vertex::{Vertex, colors};
use crate::assets::AssetCatalog;
use crate::consts::WIN_DELAY;
use crate::sim::{GamePhase, GameState, PlatformStyle, Rect};
use crate::ui::{Button, MenuAction, buttons_for};

/// Build every vertex for the current frame, back to front
pub fn build_scene(state: &GameState, assets: &AssetCatalog) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(1024);
    let world = state.world_size();
    let screen = Rect::new(0.0, 0.0, world.x, world.y);

    match state.phase() {
        GamePhase::Menu => {
            let bg = assets.sprite_or_placeholder("bg_menu");
            push_rect(&mut out, &screen, bg.color);
        }
        GamePhase::Controls => push_rect(&mut out, &screen, colors::CONTROLS_BG),
        _ => push_world(&mut out, state, assets),
    }

    match state.phase() {
        GamePhase::Playing => push_hud(&mut out, state),
        GamePhase::Paused => push_rect(&mut out, &screen, colors::PAUSE_SHADE),
        GamePhase::GameOver => push_rect(&mut out, &screen, colors::GAME_OVER_SHADE),
        GamePhase::Win => {
            push_rect(&mut out, &screen, colors::WIN_SHADE);
            // Countdown bar shrinking toward the return to the menu
            let left = ((WIN_DELAY - state.win_timer) / WIN_DELAY).clamp(0.0, 1.0);
            let bar = Rect::new(world.x / 2.0 - 150.0, world.y / 2.0 + 50.0, 300.0 * left, 10.0);
            push_rect(&mut out, &bar, colors::DASH_READY);
        }
        GamePhase::Menu | GamePhase::Controls => {}
    }

    for button in buttons_for(state.phase()) {
        push_button(&mut out, &button, state.music_enabled);
    }

    out
}

/// Level, goal, enemies and player
fn push_world(out: &mut Vec<Vertex>, state: &GameState, assets: &AssetCatalog) {
    let world = state.world_size();
    push_rect(out, &Rect::new(0.0, 0.0, world.x, world.y), colors::SKY);

    let tile_size = state.tuning.level.tile_size;
    for platform in &state.platforms {
        let sprite_name = match platform.style {
            PlatformStyle::Tiled => "platformbg",
            PlatformStyle::Solid => "bg_ground",
        };
        let sprite = assets.sprite_or_placeholder(sprite_name);
        match platform.style {
            PlatformStyle::Tiled => {
                // Tiles are clipped to the platform's own height
                for tile in platform.tiles(tile_size) {
                    let clipped = Rect::new(tile.x, tile.y, tile.w, platform.rect.h);
                    push_rect(out, &clipped, sprite.color);
                    push_outline(out, &clipped, 1.0, colors::TILE_EDGE);
                }
            }
            PlatformStyle::Solid => {
                push_rect(out, &platform.rect, sprite.color);
                for tile in platform.tiles(tile_size) {
                    push_outline(out, &tile, 1.0, colors::TILE_EDGE);
                }
            }
        }
    }

    let door = assets.sprite_or_placeholder("door1");
    push_rect(out, &Rect::from_center(state.goal.center(), door.size), door.color);

    for enemy in &state.enemies {
        let sprite = assets.sprite_or_placeholder(enemy.sprite_name());
        let rect = Rect::from_center(enemy.pos, sprite.size * enemy.scale);
        push_rect(out, &rect, sprite.color);
        push_facing_mark(out, &rect, enemy.facing_left);
    }

    let player = &state.player;
    // Drawn at the size the fall check uses; the catalog only supplies color
    let sprite = assets.sprite_or_placeholder(player.pose().sprite_name());
    let rect = player.sprite_rect();
    push_rect(out, &rect, sprite.color);
    push_facing_mark(out, &rect, player.facing_left);
}

/// Small dark square on the side a sprite faces
fn push_facing_mark(out: &mut Vec<Vertex>, rect: &Rect, facing_left: bool) {
    let size = (rect.w.min(rect.h) * 0.2).max(2.0);
    let x = if facing_left {
        rect.left() + size
    } else {
        rect.right() - 2.0 * size
    };
    push_rect(out, &Rect::new(x, rect.top() + size, size, size), [0.0, 0.0, 0.0, 0.8]);
}

/// Dash meter and double-jump indicator
fn push_hud(out: &mut Vec<Vertex>, state: &GameState) {
    let player = &state.player;
    let frame = Rect::new(10.0, 75.0, 100.0, 12.0);
    push_rect(out, &frame, colors::BUTTON);

    if player.dash_cooldown > 0.0 {
        let full = state.tuning.physics.dash_cooldown;
        let fill = 1.0 - (player.dash_cooldown / full).clamp(0.0, 1.0);
        let bar = Rect::new(frame.x, frame.y, frame.w * fill, frame.h);
        push_rect(out, &bar, colors::DASH_COOLING);
    } else {
        push_rect(out, &frame, colors::DASH_READY);
    }

    if player.can_double_jump && !player.grounded {
        push_rect(out, &Rect::new(10.0, 100.0, 12.0, 12.0), [0.39, 0.78, 1.0, 1.0]);
    }
}

fn push_button(out: &mut Vec<Vertex>, button: &Button, music_enabled: bool) {
    push_rect(out, &button.rect, colors::BUTTON);
    push_outline(out, &button.rect, 2.0, colors::BUTTON_BORDER);

    if button.action == MenuAction::ToggleSound {
        let color = if music_enabled {
            colors::SOUND_ON
        } else {
            colors::SOUND_OFF
        };
        let lamp = Rect::from_center(
            Vec2::new(button.rect.right() - 25.0, button.rect.center().y),
            Vec2::splat(16.0),
        );
        push_rect(out, &lamp, with_alpha(color, 0.9));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(Tuning::default(), true)
    }

    fn contains_rect(verts: &[Vertex], rect: &Rect, color: [f32; 4]) -> bool {
        verts.chunks(6).any(|q| {
            q.len() == 6
                && q[0].color == color
                && q[0].position == [rect.left(), rect.top()]
                && q[5].position == [rect.right(), rect.bottom()]
        })
    }

    #[test]
    fn test_menu_scene_has_background_and_buttons() {
        let s = state();
        let verts = build_scene(&s, &AssetCatalog::default());
        // Background + 3 buttons (fill + 4 border quads) + sound lamp
        assert_eq!(verts.len(), 6 * (1 + 3 * 5 + 1));
    }

    #[test]
    fn test_playing_scene_draws_player_sprite() {
        let mut s = state();
        s.start();
        let assets = AssetCatalog::default();
        let verts = build_scene(&s, &assets);
        let sprite = assets.sprite_or_placeholder("player_jump0");
        assert!(contains_rect(&verts, &s.player.sprite_rect(), sprite.color));
    }

    #[test]
    fn test_player_drawn_at_layout_size_not_catalog_size() {
        let mut s = state();
        s.start();
        let json = r#"{ "player_jump0": { "size": [8.0, 8.0], "color": [0.0, 0.0, 1.0, 1.0] } }"#;
        let assets = AssetCatalog::from_json(json).unwrap();
        let verts = build_scene(&s, &assets);
        assert!(contains_rect(&verts, &s.player.sprite_rect(), [0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_dash_meter_uses_tuned_cooldown() {
        let mut tuning = Tuning::default();
        tuning.physics.dash_cooldown = 1.0;
        let mut s = GameState::new(tuning, true);
        s.start();
        s.player.dash_cooldown = 0.5;
        let verts = build_scene(&s, &AssetCatalog::default());
        let half = Rect::new(10.0, 75.0, 50.0, 12.0);
        assert!(contains_rect(&verts, &half, colors::DASH_COOLING));
    }

    #[test]
    fn test_empty_catalog_uses_placeholder() {
        let mut s = state();
        s.start();
        let verts = build_scene(&s, &AssetCatalog::empty());
        let placeholder = crate::assets::PLACEHOLDER;
        assert!(verts.iter().any(|v| v.color == placeholder.color));
    }

    #[test]
    fn test_scene_does_not_change_state() {
        let mut s = state();
        s.start();
        let before = s.player.pos;
        build_scene(&s, &AssetCatalog::default());
        assert_eq!(s.player.pos, before);
    }

    #[test]
    fn test_pause_overlay_drawn_over_world() {
        let mut s = state();
        s.start();
        s.pause();
        let verts = build_scene(&s, &AssetCatalog::default());
        let screen = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(contains_rect(&verts, &screen, colors::SKY));
        assert!(contains_rect(&verts, &screen, colors::PAUSE_SHADE));
    }
}
