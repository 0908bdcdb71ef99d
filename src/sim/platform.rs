//! Static and moving platforms
//!
//! A single record covers both: a moving platform is a platform that carries
//! a `Motion`. Platforms are one-way, solid only from above.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::{MovingPlatformSpec, PlatformSpec};

/// How a platform is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformStyle {
    /// Flat filled rectangle
    #[default]
    Solid,
    /// Repeated tile sprite
    Tiled,
}

/// Bounded back-and-forth horizontal translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motion {
    /// Signed horizontal velocity (per frame)
    pub vx: f32,
    pub limit_left: f32,
    pub limit_right: f32,
    initial_x: f32,
    initial_vx: f32,
}

/// A platform, optionally moving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub style: PlatformStyle,
    pub motion: Option<Motion>,
}

impl Platform {
    pub fn fixed(rect: Rect, style: PlatformStyle) -> Self {
        Self {
            rect,
            style,
            motion: None,
        }
    }

    pub fn moving(rect: Rect, style: PlatformStyle, vx: f32, limit_left: f32, limit_right: f32) -> Self {
        Self {
            rect,
            style,
            motion: Some(Motion {
                vx,
                limit_left,
                limit_right,
                initial_x: rect.x,
                initial_vx: vx,
            }),
        }
    }

    pub fn from_spec(spec: &PlatformSpec) -> Self {
        Self::fixed(spec.rect, spec.style)
    }

    pub fn from_moving_spec(spec: &MovingPlatformSpec) -> Self {
        Self::moving(spec.rect, spec.style, spec.vx, spec.limit_left, spec.limit_right)
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Current horizontal velocity, used to carry a player standing on it
    #[inline]
    pub fn vx(&self) -> f32 {
        self.motion.as_ref().map_or(0.0, |m| m.vx)
    }

    /// Advance one frame. Overshooting a bound clamps the edge to it and
    /// reverses direction. Returns true when a bounce happened.
    pub fn update(&mut self) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };

        self.rect.x += motion.vx;
        if self.rect.left() < motion.limit_left {
            self.rect.set_left(motion.limit_left);
            motion.vx = -motion.vx;
            true
        } else if self.rect.right() > motion.limit_right {
            self.rect.set_right(motion.limit_right);
            motion.vx = -motion.vx;
            true
        } else {
            false
        }
    }

    /// Restore the initial pose and velocity
    pub fn reset(&mut self) {
        if let Some(motion) = self.motion.as_mut() {
            self.rect.x = motion.initial_x;
            motion.vx = motion.initial_vx;
        }
    }

    /// Tile rectangles covering the platform (the last tile may overhang)
    pub fn tiles(&self, tile_size: f32) -> impl Iterator<Item = Rect> + '_ {
        let count = (self.rect.w / tile_size).ceil().max(1.0) as usize;
        (0..count).map(move |i| {
            Rect::new(
                self.rect.x + i as f32 * tile_size,
                self.rect.y,
                tile_size,
                tile_size,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuttle() -> Platform {
        Platform::moving(Rect::new(600.0, 150.0, 50.0, 20.0), PlatformStyle::Tiled, 1.5, 550.0, 750.0)
    }

    #[test]
    fn test_static_platform_never_moves() {
        let mut p = Platform::fixed(Rect::new(0.0, 0.0, 10.0, 10.0), PlatformStyle::Solid);
        assert!(!p.update());
        assert_eq!(p.rect.x, 0.0);
        assert_eq!(p.vx(), 0.0);
    }

    #[test]
    fn test_moving_platform_clamps_and_flips_at_right_bound() {
        let mut p = shuttle();
        p.rect.x = 699.0;
        assert!(p.update());
        assert_eq!(p.rect.right(), 750.0);
        assert_eq!(p.vx(), -1.5);
        // Next frame moves away without another flip
        assert!(!p.update());
        assert_eq!(p.vx(), -1.5);
        assert!((p.rect.right() - 748.5).abs() < 1e-4);
    }

    #[test]
    fn test_moving_platform_clamps_and_flips_at_left_bound() {
        let mut p = shuttle();
        p.rect.x = 551.0;
        p.motion.as_mut().unwrap().vx = -1.5;
        assert!(p.update());
        assert_eq!(p.rect.left(), 550.0);
        assert_eq!(p.vx(), 1.5);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut p = shuttle();
        for _ in 0..200 {
            p.update();
        }
        p.reset();
        let once = p.clone();
        p.reset();
        assert_eq!(p.rect, once.rect);
        assert_eq!(p.rect.x, 600.0);
        assert_eq!(p.vx(), 1.5);
    }

    #[test]
    fn test_tiles_cover_width() {
        let p = Platform::fixed(Rect::new(420.0, 250.0, 120.0, 20.0), PlatformStyle::Tiled);
        let tiles: Vec<_> = p.tiles(50.0).collect();
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[2].x, 520.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn moving_platform_stays_within_bounds(
                start in 550.0f32..700.0,
                speed in 0.1f32..20.0,
                frames in 1usize..600,
            ) {
                let mut p = Platform::moving(
                    Rect::new(start, 150.0, 50.0, 20.0),
                    PlatformStyle::Solid,
                    speed,
                    550.0,
                    750.0,
                );
                for _ in 0..frames {
                    let before = p.vx();
                    let bounced = p.update();
                    prop_assert!(p.rect.left() >= 550.0);
                    prop_assert!(p.rect.right() <= 750.0);
                    // Exactly one sign flip per bounce, none otherwise
                    if bounced {
                        prop_assert_eq!(p.vx(), -before);
                    } else {
                        prop_assert_eq!(p.vx(), before);
                    }
                }
            }
        }
    }
}
