//! Patrolling enemies
//!
//! One record for every enemy kind. The kind tag selects sprite frames and
//! body size; the optional patrol bounds make an entity move.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::EnemySpec;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Green slime patrolling a platform
    Slime,
    /// Flying bee
    Bee,
    /// Red slime patrolling the ground
    LavaSlime,
}

impl EnemyKind {
    /// Animation frame sprite names, in order
    pub fn frames(&self) -> &'static [&'static str] {
        match self {
            EnemyKind::Slime => &["slime1", "slime2"],
            EnemyKind::Bee => &["bee1", "bee2", "bee3", "bee4"],
            EnemyKind::LavaSlime => &["slime_red1", "slime_red2"],
        }
    }

    /// Unscaled body size
    pub fn base_size(&self) -> Vec2 {
        match self {
            EnemyKind::Slime | EnemyKind::LavaSlime => Vec2::new(40.0, 28.0),
            EnemyKind::Bee => Vec2::new(36.0, 32.0),
        }
    }
}

/// Sprite frame cycle. Cosmetic only, never touches physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frame_index: usize,
    pub frame_timer: f32,
    /// Seconds per frame
    pub frame_time: f32,
    frame_count: usize,
}

impl Animation {
    pub fn new(frame_count: usize, frame_time: f32) -> Self {
        Self {
            frame_index: 0,
            frame_timer: 0.0,
            frame_time,
            frame_count: frame_count.max(1),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.frame_timer += dt;
        if self.frame_timer >= self.frame_time {
            self.frame_timer = 0.0;
            self.frame_index = (self.frame_index + 1) % self.frame_count;
        }
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.frame_timer = 0.0;
    }
}

/// Inclusive horizontal range for the entity center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolBounds {
    pub limit_left: f32,
    pub limit_right: f32,
}

/// An enemy: animated sprite, optionally bouncing between two x bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolEntity {
    pub kind: EnemyKind,
    /// Center position
    pub pos: Vec2,
    /// Horizontal velocity (per frame)
    pub vx: f32,
    pub patrol: Option<PatrolBounds>,
    pub scale: f32,
    pub facing_left: bool,
    pub animation: Animation,
    initial_pos: Vec2,
    initial_vx: f32,
}

impl PatrolEntity {
    pub fn new(kind: EnemyKind, pos: Vec2, vx: f32, frame_time: f32) -> Self {
        Self {
            kind,
            pos,
            vx,
            patrol: None,
            scale: 1.0,
            facing_left: false,
            animation: Animation::new(kind.frames().len(), frame_time),
            initial_pos: pos,
            initial_vx: vx,
        }
    }

    pub fn with_patrol(mut self, limit_left: f32, limit_right: f32) -> Self {
        self.patrol = Some(PatrolBounds {
            limit_left,
            limit_right,
        });
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn from_spec(spec: &EnemySpec) -> Self {
        Self::new(spec.kind, spec.pos, spec.vx, spec.frame_time)
            .with_patrol(spec.limit_left, spec.limit_right)
            .with_scale(spec.scale)
    }

    /// Advance animation and patrol one frame. Returns true on a bound bounce.
    pub fn update(&mut self, dt: f32) -> bool {
        self.animation.advance(dt);

        let Some(bounds) = self.patrol else {
            return false;
        };

        self.pos.x += self.vx;
        let bounced = if self.pos.x > bounds.limit_right {
            self.pos.x = bounds.limit_right;
            self.vx = -self.vx;
            true
        } else if self.pos.x < bounds.limit_left {
            self.pos.x = bounds.limit_left;
            self.vx = -self.vx;
            true
        } else {
            false
        };

        // Zero velocity keeps the last facing
        if self.vx > 0.0 {
            self.facing_left = false;
        } else if self.vx < 0.0 {
            self.facing_left = true;
        }

        bounced
    }

    /// Current body rectangle (scaled, centered on `pos`)
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.kind.base_size() * self.scale)
    }

    /// True when the player's hitbox touches this enemy
    pub fn check_collision(&self, player_hitbox: &Rect) -> bool {
        player_hitbox.intersects(&self.rect())
    }

    /// Sprite name for the current animation frame
    pub fn sprite_name(&self) -> &'static str {
        let frames = self.kind.frames();
        frames[self.animation.frame_index % frames.len()]
    }

    /// Back to the spawn point, moving right at its starting speed
    pub fn reset(&mut self) {
        self.animation.reset();
        self.pos = self.initial_pos;
        self.vx = self.initial_vx.abs();
        self.facing_left = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slime() -> PatrolEntity {
        PatrolEntity::new(EnemyKind::Slime, Vec2::new(400.0, 130.0), 1.0, 0.25).with_patrol(360.0, 440.0)
    }

    #[test]
    fn test_animation_wraps() {
        let mut anim = Animation::new(2, 0.25);
        anim.advance(0.25);
        assert_eq!(anim.frame_index, 1);
        assert_eq!(anim.frame_timer, 0.0);
        anim.advance(0.1);
        anim.advance(0.2);
        assert_eq!(anim.frame_index, 0);
    }

    #[test]
    fn test_bounce_at_right_bound() {
        let mut e = slime();
        e.pos.x = 439.5;
        assert!(e.update(0.0));
        assert_eq!(e.pos.x, 440.0);
        assert_eq!(e.vx, -1.0);
        assert!(e.facing_left);
        assert!(!e.update(0.0));
        assert_eq!(e.pos.x, 439.0);
    }

    #[test]
    fn test_bounce_at_left_bound() {
        let mut e = slime();
        e.pos.x = 360.5;
        e.vx = -1.0;
        assert!(e.update(0.0));
        assert_eq!(e.pos.x, 360.0);
        assert_eq!(e.vx, 1.0);
        assert!(!e.facing_left);
    }

    #[test]
    fn test_stationary_entity_only_animates() {
        let mut e = PatrolEntity::new(EnemyKind::Bee, Vec2::new(10.0, 10.0), 3.0, 0.1);
        e.update(0.1);
        assert_eq!(e.pos, Vec2::new(10.0, 10.0));
        assert_eq!(e.animation.frame_index, 1);
        assert_eq!(e.sprite_name(), "bee2");
    }

    #[test]
    fn test_scaled_rect() {
        let e = PatrolEntity::new(EnemyKind::Bee, Vec2::new(100.0, 100.0), 0.0, 0.1).with_scale(1.5);
        let r = e.rect();
        assert_eq!(r.size(), Vec2::new(54.0, 48.0));
        assert_eq!(r.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_collision_with_player_hitbox() {
        let e = slime();
        let touching = Rect::from_center(Vec2::new(400.0, 120.0), Vec2::splat(30.0));
        let clear = Rect::from_center(Vec2::new(100.0, 120.0), Vec2::splat(30.0));
        assert!(e.check_collision(&touching));
        assert!(!e.check_collision(&clear));
    }

    #[test]
    fn test_reset_restores_outward_velocity() {
        let mut e = slime();
        for _ in 0..100 {
            e.update(1.0 / 60.0);
        }
        e.vx = -1.0;
        e.reset();
        assert_eq!(e.pos, Vec2::new(400.0, 130.0));
        assert_eq!(e.vx, 1.0);
        assert_eq!(e.animation.frame_index, 0);
        let once = e.clone();
        e.reset();
        assert_eq!(e.pos, once.pos);
        assert_eq!(e.vx, once.vx);
        assert_eq!(e.animation, once.animation);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn patrol_stays_within_bounds(
                start in 360.0f32..=440.0,
                speed in 0.1f32..10.0,
                frames in 1usize..500,
            ) {
                let mut e = PatrolEntity::new(EnemyKind::Slime, Vec2::new(start, 0.0), speed, 0.25)
                    .with_patrol(360.0, 440.0);
                for _ in 0..frames {
                    let before = e.vx;
                    let bounced = e.update(1.0 / 60.0);
                    prop_assert!(e.pos.x >= 360.0 && e.pos.x <= 440.0);
                    if bounced {
                        prop_assert_eq!(e.vx, -before);
                    } else {
                        prop_assert_eq!(e.vx, before);
                    }
                }
            }
        }
    }
}
