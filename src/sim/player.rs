//! The player character
//!
//! Movement is per frame: horizontal input shifts position directly, gravity
//! accumulates into `vy`. Collision only resolves landings from above.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tick::FrameInput;
use crate::tuning::{LevelLayout, PhysicsTuning};

/// Which jump fired this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Air,
}

/// What `handle_input` did, for sound cues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub jump: Option<JumpKind>,
    pub dashed: bool,
}

/// Display pose, derived from movement flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPose {
    Idle,
    Run,
    Jump,
    Crouch,
}

impl PlayerPose {
    pub fn sprite_name(&self) -> &'static str {
        match self {
            PlayerPose::Idle => "player_idle0",
            PlayerPose::Run => "player_run0",
            PlayerPose::Jump => "player_jump0",
            PlayerPose::Crouch => "player_down0",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    /// Collision box, always centered on `pos`
    pub hitbox: Rect,
    /// Drawn size; used for screen clamping and the fall-off check
    pub sprite_size: Vec2,
    pub vy: f32,
    pub grounded: bool,
    pub can_double_jump: bool,
    /// Seconds until dash is usable again (may dip slightly below zero)
    pub dash_cooldown: f32,
    pub alive: bool,
    pub facing_left: bool,
    /// Jump key state last frame, for edge detection
    pub jump_held: bool,
    pub moving: bool,
    pub crouching: bool,
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2, hitbox_size: Vec2, sprite_size: Vec2) -> Self {
        Self {
            pos: spawn,
            hitbox: Rect::from_center(spawn, hitbox_size),
            sprite_size,
            vy: 0.0,
            grounded: false,
            can_double_jump: true,
            dash_cooldown: 0.0,
            alive: true,
            facing_left: false,
            jump_held: false,
            moving: false,
            crouching: false,
            spawn,
        }
    }

    pub fn from_layout(level: &LevelLayout) -> Self {
        Self::new(level.player_spawn, level.player_hitbox, level.player_sprite)
    }

    #[inline]
    fn sync_hitbox(&mut self) {
        self.hitbox.set_center(self.pos);
    }

    /// Drawn rectangle
    pub fn sprite_rect(&self) -> Rect {
        Rect::from_center(self.pos, self.sprite_size)
    }

    /// Apply movement, dash and jump input for this frame
    pub fn handle_input(&mut self, input: &FrameInput, physics: &PhysicsTuning) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        if !self.alive {
            return outcome;
        }

        // Both keys held: the moves cancel, right sets facing
        self.moving = false;
        if input.left {
            self.pos.x -= physics.speed;
            self.facing_left = true;
            self.moving = true;
        }
        if input.right {
            self.pos.x += physics.speed;
            self.facing_left = false;
            self.moving = true;
        }

        if input.dash && self.dash_cooldown <= 0.0 {
            let direction = if self.facing_left { -1.0 } else { 1.0 };
            self.pos.x += physics.dash_speed * direction;
            self.dash_cooldown = physics.dash_cooldown;
            outcome.dashed = true;
        }

        if input.jump && !self.jump_held {
            if self.grounded {
                self.vy = physics.jump_force;
                self.grounded = false;
                self.can_double_jump = true;
                outcome.jump = Some(JumpKind::Ground);
            } else if self.can_double_jump {
                self.vy = physics.jump_force * physics.double_jump_factor;
                self.can_double_jump = false;
                outcome.jump = Some(JumpKind::Air);
            }
        }
        self.jump_held = input.jump;
        self.crouching = input.down;

        outcome
    }

    pub fn update_cooldowns(&mut self, dt: f32) {
        if self.dash_cooldown > 0.0 {
            self.dash_cooldown -= dt;
        }
    }

    /// Gravity, vertical integration, and horizontal screen clamping
    pub fn apply_physics(&mut self, physics: &PhysicsTuning, world_width: f32) {
        if !self.alive {
            return;
        }

        self.vy += physics.gravity;
        self.pos.y += self.vy;

        let half_width = self.sprite_size.x / 2.0;
        if self.pos.x - half_width < 0.0 {
            self.pos.x = half_width;
        }
        if self.pos.x + half_width > world_width {
            self.pos.x = world_width - half_width;
        }
        self.sync_hitbox();
    }

    /// Resolve a landing on `platform`. Only a falling player whose feet are
    /// within the platform's span is snapped on top; side and underside
    /// contacts pass through. `carry_vx` shifts a player landing on a moving
    /// platform along with it. Returns true when the player was grounded.
    pub fn check_platform_collision(&mut self, platform: &Rect, carry_vx: Option<f32>) -> bool {
        if !self.hitbox.intersects(platform) {
            return false;
        }

        if self.vy > 0.0 && self.hitbox.bottom() <= platform.bottom() {
            self.hitbox.set_bottom(platform.top());
            self.pos.y = self.hitbox.center().y;
            self.vy = 0.0;
            self.grounded = true;
            self.can_double_jump = true;

            if let Some(vx) = carry_vx {
                self.pos.x += vx;
                self.sync_hitbox();
            }
            return true;
        }

        false
    }

    pub fn pose(&self) -> PlayerPose {
        if !self.grounded {
            PlayerPose::Jump
        } else if self.moving {
            PlayerPose::Run
        } else if self.crouching {
            PlayerPose::Crouch
        } else {
            PlayerPose::Idle
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.sync_hitbox();
        self.vy = 0.0;
        self.grounded = false;
        self.alive = true;
        self.can_double_jump = true;
        self.dash_cooldown = 0.0;
        self.facing_left = false;
        self.moving = false;
        self.crouching = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn player() -> Player {
        Player::new(Vec2::new(50.0, 50.0), Vec2::splat(30.0), Vec2::new(32.0, 40.0))
    }

    fn ground() -> Rect {
        Rect::new(0.0, GROUND_Y, WIDTH, TILE_SIZE)
    }

    /// Drop the player onto the ground and let one collision ground it
    fn landed_player(physics: &PhysicsTuning) -> Player {
        let mut p = player();
        p.pos = Vec2::new(100.0, GROUND_Y - 15.0 - 1.0);
        p.vy = 0.5;
        p.apply_physics(physics, WIDTH);
        assert!(p.check_platform_collision(&ground(), None));
        p
    }

    fn jump() -> FrameInput {
        FrameInput {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_hitbox_centered_after_physics() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        p.pos.x = 120.0;
        p.apply_physics(&physics, WIDTH);
        assert_eq!(p.hitbox.center(), p.pos);
    }

    #[test]
    fn test_gravity_accumulates_while_airborne() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        let mut last_vy = p.vy;
        for _ in 0..10 {
            p.apply_physics(&physics, WIDTH);
            assert!((p.vy - (last_vy + GRAVITY)).abs() < 1e-5);
            last_vy = p.vy;
        }
    }

    #[test]
    fn test_dead_player_ignores_input_and_physics() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        p.kill();
        let outcome = p.handle_input(&FrameInput { right: true, jump: true, ..Default::default() }, &physics);
        p.apply_physics(&physics, WIDTH);
        assert_eq!(outcome, InputOutcome::default());
        assert_eq!(p.pos, Vec2::new(50.0, 50.0));
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn test_ground_jump_from_rest() {
        let physics = PhysicsTuning::default();
        let mut p = landed_player(&physics);
        assert!(p.grounded);
        let outcome = p.handle_input(&jump(), &physics);
        assert_eq!(outcome.jump, Some(JumpKind::Ground));
        assert_eq!(p.vy, JUMP_FORCE);
        assert!(!p.grounded);
        assert!(p.can_double_jump);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let physics = PhysicsTuning::default();
        let mut p = landed_player(&physics);
        p.handle_input(&jump(), &physics);
        let vy = p.vy;
        // Still held: no air jump
        let outcome = p.handle_input(&jump(), &physics);
        assert_eq!(outcome.jump, None);
        assert_eq!(p.vy, vy);
        assert!(p.can_double_jump);
    }

    #[test]
    fn test_at_most_one_air_jump() {
        let physics = PhysicsTuning::default();
        let mut p = landed_player(&physics);
        p.handle_input(&jump(), &physics);
        p.handle_input(&FrameInput::default(), &physics);

        let outcome = p.handle_input(&jump(), &physics);
        assert_eq!(outcome.jump, Some(JumpKind::Air));
        assert!((p.vy - JUMP_FORCE * DOUBLE_JUMP_FACTOR).abs() < 1e-5);
        assert!(!p.can_double_jump);

        p.handle_input(&FrameInput::default(), &physics);
        p.vy = 3.0;
        let outcome = p.handle_input(&jump(), &physics);
        assert_eq!(outcome.jump, None);
        assert_eq!(p.vy, 3.0);
    }

    #[test]
    fn test_landing_restores_double_jump() {
        let mut p = player();
        p.can_double_jump = false;
        p.pos = Vec2::new(100.0, GROUND_Y - 10.0);
        p.vy = 4.0;
        p.hitbox.set_center(p.pos);
        assert!(p.check_platform_collision(&ground(), None));
        assert!(p.can_double_jump);
        assert_eq!(p.hitbox.bottom(), GROUND_Y);
        assert_eq!(p.vy, 0.0);
        assert_eq!(p.pos.y, GROUND_Y - 15.0);
    }

    #[test]
    fn test_rising_player_passes_through_platform() {
        let mut p = player();
        p.pos = Vec2::new(100.0, GROUND_Y + 5.0);
        p.hitbox.set_center(p.pos);
        p.vy = -5.0;
        assert!(!p.check_platform_collision(&ground(), None));
        assert_eq!(p.vy, -5.0);
        assert!(!p.grounded);
    }

    #[test]
    fn test_feet_below_platform_not_resolved() {
        let thin = Rect::new(0.0, 100.0, 200.0, 20.0);
        let mut p = player();
        // Hitbox bottom at 125, past the platform bottom at 120
        p.pos = Vec2::new(50.0, 110.0);
        p.hitbox.set_center(p.pos);
        p.vy = 2.0;
        assert!(!p.check_platform_collision(&thin, None));
    }

    #[test]
    fn test_moving_platform_carries_player() {
        let platform = Rect::new(600.0, 150.0, 50.0, 20.0);
        let mut p = player();
        p.pos = Vec2::new(625.0, 140.0);
        p.hitbox.set_center(p.pos);
        p.vy = 1.0;
        assert!(p.check_platform_collision(&platform, Some(-1.5)));
        assert_eq!(p.pos.x, 623.5);
        assert_eq!(p.hitbox.center(), p.pos);
    }

    #[test]
    fn test_dash_and_cooldown() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        let dash = FrameInput {
            dash: true,
            ..Default::default()
        };
        let x = p.pos.x;
        assert!(p.handle_input(&dash, &physics).dashed);
        assert_eq!(p.pos.x, x + DASH_SPEED);
        assert_eq!(p.dash_cooldown, DASH_COOLDOWN);

        p.update_cooldowns(0.1);
        let x = p.pos.x;
        assert!(!p.handle_input(&dash, &physics).dashed);
        assert_eq!(p.pos.x, x);
    }

    #[test]
    fn test_dash_follows_facing() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        p.pos.x = 200.0;
        p.handle_input(&FrameInput { left: true, dash: true, ..Default::default() }, &physics);
        assert_eq!(p.pos.x, 200.0 - SPEED - DASH_SPEED);
        assert!(p.facing_left);
    }

    #[test]
    fn test_cooldown_not_clamped() {
        let mut p = player();
        p.dash_cooldown = 0.05;
        p.update_cooldowns(1.0 / 60.0);
        p.update_cooldowns(1.0 / 60.0);
        p.update_cooldowns(1.0 / 60.0);
        assert!(p.dash_cooldown < 0.0);
        let after = p.dash_cooldown;
        p.update_cooldowns(1.0 / 60.0);
        assert_eq!(p.dash_cooldown, after);
    }

    #[test]
    fn test_both_directions_cancel_and_face_right() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        p.pos.x = 300.0;
        p.facing_left = true;
        p.handle_input(&FrameInput { left: true, right: true, ..Default::default() }, &physics);
        assert_eq!(p.pos.x, 300.0);
        assert!(!p.facing_left);
        assert!(p.moving);
    }

    #[test]
    fn test_horizontal_clamp() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        p.pos.x = -40.0;
        p.apply_physics(&physics, WIDTH);
        assert_eq!(p.sprite_rect().left(), 0.0);
        p.pos.x = WIDTH + 40.0;
        p.apply_physics(&physics, WIDTH);
        assert_eq!(p.sprite_rect().right(), WIDTH);
    }

    #[test]
    fn test_pose() {
        let physics = PhysicsTuning::default();
        let mut p = landed_player(&physics);
        assert_eq!(p.pose(), PlayerPose::Idle);
        p.handle_input(&FrameInput { down: true, ..Default::default() }, &physics);
        assert_eq!(p.pose(), PlayerPose::Crouch);
        p.handle_input(&FrameInput { right: true, ..Default::default() }, &physics);
        assert_eq!(p.pose(), PlayerPose::Run);
        p.grounded = false;
        assert_eq!(p.pose(), PlayerPose::Jump);
        assert_eq!(p.pose().sprite_name(), "player_jump0");
    }

    #[test]
    fn test_reset_idempotent() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        p.handle_input(&FrameInput { right: true, dash: true, jump: true, ..Default::default() }, &physics);
        p.apply_physics(&physics, WIDTH);
        p.kill();
        p.reset();
        let once = p.clone();
        p.reset();
        assert_eq!(p.pos, once.pos);
        assert_eq!(p.hitbox, once.hitbox);
        assert_eq!(p.pos, Vec2::new(50.0, 50.0));
        assert!(p.alive && p.can_double_jump && !p.grounded);
        assert_eq!(p.dash_cooldown, 0.0);
    }

    #[test]
    fn test_reset_keeps_held_jump() {
        let physics = PhysicsTuning::default();
        let mut p = player();
        p.handle_input(&jump(), &physics);
        assert!(p.jump_held);
        p.reset();
        assert!(p.jump_held);
        let outcome = p.handle_input(&jump(), &physics);
        assert_eq!(outcome.jump, None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn horizontal_position_stays_on_screen(
                moves in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..200)
            ) {
                let physics = PhysicsTuning::default();
                let mut p = player();
                for (left, right, dash) in moves {
                    let input = FrameInput { left, right, dash, ..Default::default() };
                    p.handle_input(&input, &physics);
                    p.update_cooldowns(SIM_DT);
                    p.apply_physics(&physics, WIDTH);
                    let sprite = p.sprite_rect();
                    prop_assert!(sprite.left() >= 0.0);
                    prop_assert!(sprite.right() <= WIDTH);
                }
            }
        }
    }
}
