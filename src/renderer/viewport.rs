//! World <-> screen coordinate mapping
//!
//! Scale factors are derived from the viewport on every call, so callers just
//! pass the current surface size and a resize needs no bookkeeping here.

use glam::Vec2;

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};

/// Current render surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Map a world position to whole screen pixels (rounded up)
    pub fn to_screen_position(&self, world: Vec2) -> Vec2 {
        Vec2::new(self.to_screen_width(world.x), self.to_screen_height(world.y))
    }

    /// Map a screen position (e.g. a pointer) back into world space
    pub fn to_world_position(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x / self.width) * WORLD_WIDTH,
            (screen.y / self.height) * WORLD_HEIGHT,
        )
    }

    pub fn to_screen_width(&self, world_width: f32) -> f32 {
        ((world_width / WORLD_WIDTH) * self.width).ceil()
    }

    pub fn to_screen_height(&self, world_height: f32) -> f32 {
        ((world_height / WORLD_HEIGHT) * self.height).ceil()
    }
}

impl From<(u32, u32)> for Viewport {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f32, height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_screen_width_boundaries() {
        let viewport = Viewport::new(1280.0, 720.0);
        assert_eq!(viewport.to_screen_width(0.0), 0.0);
        assert_eq!(viewport.to_screen_width(WORLD_WIDTH), 1280.0);
        assert_eq!(viewport.to_screen_height(0.0), 0.0);
        assert_eq!(viewport.to_screen_height(WORLD_HEIGHT), 720.0);
    }

    #[test]
    fn test_screen_position_rounds_up() {
        // 3 px per world unit horizontally, 2 px vertically
        let viewport = Viewport::new(1200.0, 600.0);
        let screen = viewport.to_screen_position(Vec2::new(10.1, 20.2));
        assert_eq!(screen, Vec2::new(31.0, 41.0));
    }

    #[test]
    fn test_world_position_is_unrounded() {
        let viewport = Viewport::new(800.0, 600.0);
        let world = viewport.to_world_position(Vec2::new(401.0, 301.0));
        assert!((world.x - 200.5).abs() < 1e-4);
        assert!((world.y - 150.5).abs() < 1e-4);
    }

    #[test]
    fn test_resize_changes_mapping() {
        let small = Viewport::new(400.0, 300.0);
        let large = Viewport::from((800, 600));
        let p = Vec2::new(100.0, 100.0);
        assert_eq!(small.to_screen_position(p), Vec2::new(100.0, 100.0));
        assert_eq!(large.to_screen_position(p), Vec2::new(200.0, 200.0));
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_one_pixel(
            width in 100u32..4000,
            height in 100u32..3000,
            sx in 0.0f32..1.0,
            sy in 0.0f32..1.0,
        ) {
            let viewport = Viewport::from((width, height));
            let screen = Vec2::new(sx * width as f32, sy * height as f32);

            let world = viewport.to_world_position(screen);
            let again = viewport.to_world_position(viewport.to_screen_position(world));

            // ceil can move at most one pixel, plus float slack
            let tol_x = WORLD_WIDTH / width as f32 * 1.01;
            let tol_y = WORLD_HEIGHT / height as f32 * 1.01;
            prop_assert!((again.x - world.x).abs() <= tol_x);
            prop_assert!((again.y - world.y).abs() <= tol_y);
        }
    }
}
