//! Flappy Pong - a side-scrolling Pong where the ball is a bird
//!
//! Core modules:
//! - `sim`: World state and the fixed-step physics that advances it
//! - `ai`: Trajectory predictor driving the right-hand paddle
//! - `renderer`: World-to-screen mapping, sprite stage and WebGPU backend
//! - `settings`: Persisted player preferences

pub mod ai;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical world size (physics units, independent of the screen)
    pub const WORLD_WIDTH: f32 = 400.0;
    pub const WORLD_HEIGHT: f32 = 300.0;

    /// Ticks per second the tick delta is normalized against (delta 1.0 = one 60 Hz frame)
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Largest tick delta fed to the simulation in a single frame
    pub const MAX_TICK_DELTA: f32 = 4.0;

    /// Ball defaults (units per tick)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SERVE_SPEED: f32 = 3.0;
    pub const BALL_MAX_SPEED: f32 = 7.0;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.05;
    /// Max vertical velocity added from an off-center paddle hit
    pub const PADDLE_ENGLISH: f32 = 2.0;

    /// Paddle (pipe) defaults
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 80.0;
    /// Gap between a paddle and its side of the world
    pub const PADDLE_MARGIN: f32 = 10.0;

    /// The AI closes 1/AI_DAMPING of the gap to the predicted intercept per event
    pub const AI_DAMPING: f32 = 20.0;

    /// Bird sprite width relative to its height (texture aspect)
    pub const BIRD_ASPECT: f32 = 1.41666;
    /// Background scrolls this much faster than the ground
    pub const BACKGROUND_PARALLAX: f32 = 1.5;
}
