//! Retained sprite stage
//!
//! The stage owns every display object on screen. It is created once from a
//! loaded atlas and then updated in place each frame from a `WorldState`
//! snapshot. The GPU backend only reads it through `display_list`.

use glam::Vec2;

use super::atlas::{AssetError, Frame, SpriteAtlas, load_atlas};
use super::viewport::Viewport;
use crate::consts::{BACKGROUND_PARALLAX, BIRD_ASPECT};
use crate::sim::WorldState;

/// Atlas frame names used by the stage
pub mod frames {
    pub const BACKGROUND: &str = "background.png";
    pub const GROUND: &str = "ground.png";
    pub const BIRD: [&str; 3] = ["birdUp.png", "birdMiddle.png", "birdDown.png"];
    pub const PIPE: &str = "pipeDown.png";
}

/// A surface that repeats one frame and can scroll its contents
#[derive(Debug, Clone)]
pub struct TilingSprite {
    pub frame: Frame,
    /// Top-left in screen pixels
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    /// Offset of the repeating texture inside the surface, in pixels
    pub tile_position: Vec2,
}

impl TilingSprite {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            position: Vec2::ZERO,
            width: frame.width,
            height: frame.height,
            tile_position: Vec2::ZERO,
        }
    }
}

/// A textured quad, optionally cycling through several frames
#[derive(Debug, Clone)]
pub struct Sprite {
    frames: Vec<Frame>,
    /// Where the pivot lands on screen
    pub position: Vec2,
    /// Displayed size in pixels (always positive, see `facing`)
    pub width: f32,
    pub height: f32,
    /// Rotation/flip origin in texels of the current frame
    pub pivot: Vec2,
    /// Rotation in degrees
    pub angle: f32,
    /// Frames advanced per tick
    pub animation_speed: f32,
    pub looping: bool,
    playing: bool,
    facing: f32,
    current_frame: f32,
}

impl Sprite {
    pub fn new(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            position: Vec2::ZERO,
            width: frame.width,
            height: frame.height,
            pivot: Vec2::ZERO,
            angle: 0.0,
            animation_speed: 1.0,
            looping: true,
            playing: false,
            facing: 1.0,
            current_frame: 0.0,
        }
    }

    /// Append animation frames after the initial one
    pub fn with_frames(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.frames.extend(frames);
        self
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Horizontal orientation: 1.0 as authored, -1.0 mirrored
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn flip_x(&mut self) {
        self.facing = -self.facing;
    }

    pub fn frame_index(&self) -> usize {
        self.current_frame.max(0.0) as usize % self.frames.len()
    }

    pub fn current_frame(&self) -> Frame {
        self.frames[self.frame_index()]
    }

    /// Advance the animation clock by `delta` ticks
    pub fn update(&mut self, delta: f32) {
        if !self.playing || self.frames.len() < 2 {
            return;
        }
        let count = self.frames.len() as f32;
        let next = self.current_frame + self.animation_speed * delta;
        if self.looping {
            self.current_frame = next.rem_euclid(count);
        } else if next >= count - 1.0 {
            self.current_frame = count - 1.0;
            self.playing = false;
        } else {
            self.current_frame = next.max(0.0);
        }
    }
}

/// Borrowed view of one entry in the display list
#[derive(Debug, Clone, Copy)]
pub enum DisplayObject<'a> {
    Tiling(&'a TilingSprite),
    Sprite(&'a Sprite),
}

/// Slots in the display list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Ground,
    Player(usize),
    Bird,
}

/// All persistent display objects plus their draw order
pub struct Stage {
    pub background: TilingSprite,
    pub ground: TilingSprite,
    pub bird: Sprite,
    pub players: [Sprite; 2],
    /// Back-to-front
    order: Vec<Layer>,
}

/// Load the sprite atlas and build the stage for the given viewport
pub async fn create_renderer(
    manifest_path: &str,
    viewport: Viewport,
) -> Result<(SpriteAtlas, Stage), AssetError> {
    let atlas = load_atlas(manifest_path).await?;
    let stage = Stage::new(&atlas, viewport)?;
    Ok((atlas, stage))
}

impl Stage {
    /// Build every display object from atlas frames
    pub fn new(atlas: &SpriteAtlas, viewport: Viewport) -> Result<Self, AssetError> {
        let background = TilingSprite::new(atlas.frame(frames::BACKGROUND)?);
        let ground = TilingSprite::new(atlas.frame(frames::GROUND)?);

        let [up, middle, down] = frames::BIRD;
        let mut bird =
            Sprite::new(atlas.frame(up)?).with_frames([atlas.frame(middle)?, atlas.frame(down)?]);
        bird.animation_speed = 0.5;
        bird.looping = true;
        bird.play();

        let pipe = atlas.frame(frames::PIPE)?;
        let players = [Sprite::new(pipe), Sprite::new(pipe)];

        let mut order = Vec::with_capacity(5);
        order.push(Layer::Background);
        order.push(Layer::Ground);
        order.extend((0..players.len()).map(Layer::Player));
        order.push(Layer::Bird);

        let mut stage = Self {
            background,
            ground,
            bird,
            players,
            order,
        };
        stage.resize(viewport);
        Ok(stage)
    }

    /// Stretch the scrolling layers across the viewport and sit them on its bottom edge
    pub fn resize(&mut self, viewport: Viewport) {
        self.ground.width = viewport.width;
        self.ground.height = self.ground.frame.height;
        self.ground.position.y = viewport.height - self.ground.height;

        self.background.width = viewport.width;
        self.background.height = self.background.frame.height;
        self.background.position.y = viewport.height - self.background.height - self.ground.height;
    }

    /// Display objects in draw order (back to front)
    pub fn display_list(&self) -> impl Iterator<Item = DisplayObject<'_>> + '_ {
        self.order.iter().map(move |layer| match *layer {
            Layer::Background => DisplayObject::Tiling(&self.background),
            Layer::Ground => DisplayObject::Tiling(&self.ground),
            Layer::Player(i) => DisplayObject::Sprite(&self.players[i]),
            Layer::Bird => DisplayObject::Sprite(&self.bird),
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.order
    }

    /// Apply one world snapshot to the stage
    ///
    /// `tick` is the frame delta in 60 Hz ticks; it drives the parallax scroll
    /// and the bird's wing animation.
    pub fn render(&mut self, tick: f32, state: &WorldState, viewport: Viewport) {
        self.ground.tile_position.x -= tick;
        self.background.tile_position.x -= tick * BACKGROUND_PARALLAX;

        let ball = &state.ball;
        let ball_position = viewport.to_screen_position(ball.pos);
        let radius = viewport.to_screen_width(ball.radius);

        let bird = &mut self.bird;
        bird.height = radius * 2.0;
        bird.width = bird.height * BIRD_ASPECT;
        bird.animation_speed = ball.vel.x.abs() + ball.vel.y.abs();
        bird.position = ball_position + Vec2::splat(radius);

        // Zero vx keeps the current facing
        if ball.vel.x != 0.0 && bird.facing() != ball.vel.x.signum() {
            bird.flip_x();
        }

        let frame = bird.current_frame();
        bird.pivot = Vec2::new(frame.width / 2.0, frame.height / 2.0);
        bird.angle = heading_degrees(ball.vel);
        bird.update(tick);

        for (sprite, player) in self.players.iter_mut().zip(&state.players) {
            sprite.position = viewport.to_screen_position(player.pos);
            sprite.width = viewport.to_screen_width(player.width);
            sprite.height = viewport.to_screen_height(player.height);
        }
    }
}

/// Bird tilt: `atan(vy / vx)` in degrees
///
/// A vertical heading (`vx == 0`) tilts a full 90 degrees toward `vy`, and a
/// stationary ball stays level.
pub fn heading_degrees(vel: Vec2) -> f32 {
    if vel.x == 0.0 {
        if vel.y == 0.0 {
            0.0
        } else {
            90.0 * vel.y.signum()
        }
    } else {
        (vel.y / vel.x).atan().to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::atlas::tests::{GAME_MANIFEST, game_atlas, png_bytes};
    use crate::sim::Ball;

    fn stage(viewport: Viewport) -> Stage {
        Stage::new(&game_atlas(), viewport).unwrap()
    }

    #[test]
    fn test_display_list_order() {
        let stage = stage(Viewport::new(800.0, 600.0));
        assert_eq!(
            stage.layers(),
            &[
                Layer::Background,
                Layer::Ground,
                Layer::Player(0),
                Layer::Player(1),
                Layer::Bird
            ]
        );
        let kinds: Vec<bool> = stage
            .display_list()
            .map(|obj| matches!(obj, DisplayObject::Tiling(_)))
            .collect();
        assert_eq!(kinds, vec![true, true, false, false, false]);
    }

    #[test]
    fn test_create_renderer_with_shipped_assets() {
        let viewport = Viewport::new(800.0, 600.0);
        let (atlas, stage) =
            pollster::block_on(create_renderer("./assets/sprites/spritesData.json", viewport))
                .unwrap();
        assert_eq!(atlas.size(), (256, 256));

        // ground frame is 128x32, background 128x160
        assert_eq!(stage.ground.width, 800.0);
        assert_eq!(stage.ground.position.y, 568.0);
        assert_eq!(stage.background.position.y, 408.0);
        for name in frames::BIRD {
            assert!(atlas.frame(name).is_ok());
        }
    }

    #[test]
    fn test_create_renderer_missing_manifest() {
        let result = pollster::block_on(create_renderer(
            "./assets/sprites/missing.json",
            Viewport::new(800.0, 600.0),
        ));
        assert!(matches!(result, Err(AssetError::Fetch { .. })));
    }

    #[test]
    fn test_missing_frame_fails_creation() {
        let manifest = GAME_MANIFEST.replace("pipeDown.png", "pipeUp.png");
        let atlas = SpriteAtlas::from_bytes(manifest.as_bytes(), &png_bytes(64, 64)).unwrap();
        match Stage::new(&atlas, Viewport::new(800.0, 600.0)) {
            Err(AssetError::MissingFrame(name)) => assert_eq!(name, "pipeDown.png"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("stage built without a pipe frame"),
        }
    }

    #[test]
    fn test_scrolling_layers_sit_on_bottom_edge() {
        let mut stage = stage(Viewport::new(800.0, 600.0));
        // ground frame is 32x10, background 32x40
        assert_eq!(stage.ground.width, 800.0);
        assert_eq!(stage.ground.height, 10.0);
        assert_eq!(stage.ground.position.y, 590.0);
        assert_eq!(stage.background.width, 800.0);
        assert_eq!(stage.background.position.y, 550.0);

        stage.resize(Viewport::new(1024.0, 768.0));
        assert_eq!(stage.ground.width, 1024.0);
        assert_eq!(stage.ground.position.y, 758.0);
        assert_eq!(stage.background.position.y, 718.0);
    }

    #[test]
    fn test_parallax_scroll_accumulates() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut stage = stage(viewport);
        let state = WorldState::new(1);

        let mut last_ground = 0.0;
        for tick in [1.0, 1.0, 0.5, 2.0] {
            stage.render(tick, &state, viewport);
            let ground = -stage.ground.tile_position.x;
            let background = -stage.background.tile_position.x;
            assert!(ground > last_ground);
            assert!((background - 1.5 * ground).abs() < 1e-4);
            last_ground = ground;
        }
        assert!((last_ground - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_bird_follows_ball() {
        // 2 px per world unit on both axes
        let viewport = Viewport::new(800.0, 600.0);
        let mut stage = stage(viewport);
        let mut state = WorldState::new(1);
        state.ball = Ball::new(Vec2::new(100.0, 50.0), Vec2::new(2.0, -1.0));

        stage.render(1.0, &state, viewport);

        let bird = &stage.bird;
        let radius = 16.0; // 8 world units
        assert_eq!(bird.height, 2.0 * radius);
        assert!((bird.width - 2.0 * radius * BIRD_ASPECT).abs() < 1e-4);
        assert_eq!(bird.position, Vec2::new(200.0 + radius, 100.0 + radius));
        assert_eq!(bird.animation_speed, 3.0);
        assert_eq!(bird.pivot, Vec2::new(8.5, 6.0));
        assert!((bird.angle - (-0.5f32).atan().to_degrees()).abs() < 1e-4);
    }

    #[test]
    fn test_bird_flips_with_horizontal_direction() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut stage = stage(viewport);
        let mut state = WorldState::new(1);

        state.ball.vel = Vec2::new(3.0, 0.0);
        stage.render(1.0, &state, viewport);
        assert_eq!(stage.bird.facing(), 1.0);

        state.ball.vel = Vec2::new(-3.0, 0.0);
        stage.render(1.0, &state, viewport);
        assert_eq!(stage.bird.facing(), -1.0);

        // Same direction again: no flip back
        stage.render(1.0, &state, viewport);
        assert_eq!(stage.bird.facing(), -1.0);

        // Zero vx keeps the last facing
        state.ball.vel = Vec2::new(0.0, 2.0);
        stage.render(1.0, &state, viewport);
        assert_eq!(stage.bird.facing(), -1.0);
        assert_eq!(stage.bird.angle, 90.0);
    }

    #[test]
    fn test_heading_degrees() {
        assert!((heading_degrees(Vec2::new(1.0, 1.0)) - 45.0).abs() < 1e-4);
        assert!((heading_degrees(Vec2::new(-1.0, 1.0)) + 45.0).abs() < 1e-4);
        assert_eq!(heading_degrees(Vec2::new(0.0, -3.0)), -90.0);
        assert_eq!(heading_degrees(Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_players_follow_paddles() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut stage = stage(viewport);
        let state = WorldState::new(1);
        stage.render(1.0, &state, viewport);

        for (sprite, player) in stage.players.iter().zip(&state.players) {
            assert_eq!(sprite.position, viewport.to_screen_position(player.pos));
            assert_eq!(sprite.width, player.width * 2.0);
            assert_eq!(sprite.height, viewport.to_screen_height(player.height));
        }
    }

    #[test]
    fn test_bird_animation_loops() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut stage = stage(viewport);
        let mut state = WorldState::new(1);
        state.ball.vel = Vec2::new(0.5, 0.5);

        assert_eq!(stage.bird.frame_index(), 0);
        stage.render(1.0, &state, viewport);
        assert_eq!(stage.bird.frame_index(), 1);
        stage.render(1.0, &state, viewport);
        assert_eq!(stage.bird.frame_index(), 2);
        stage.render(1.0, &state, viewport);
        assert_eq!(stage.bird.frame_index(), 0);
    }

    #[test]
    fn test_non_looping_animation_stops_on_last_frame() {
        let atlas = game_atlas();
        let [up, middle, down] = frames::BIRD.map(|n| atlas.frame(n).unwrap());
        let mut sprite = Sprite::new(up).with_frames([middle, down]);
        sprite.looping = false;
        sprite.animation_speed = 1.0;
        sprite.play();

        sprite.update(5.0);
        assert_eq!(sprite.frame_index(), 2);
        assert!(!sprite.is_playing());
    }
}
