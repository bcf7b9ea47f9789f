//! World state and core simulation types
//!
//! A `WorldState` is the snapshot the predictor and the renderer read each
//! frame. Only the physics step in `tick` mutates it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Synthetic or real input instruction fed into the physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    /// Pointer moved to a world-space position
    MouseMove { x: f32, y: f32 },
}

/// The bird/ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left of the bounding box
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
        }
    }

    /// Center of the ball in world space
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A paddle (drawn as a pipe)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.pos
    }

    pub fn max(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height)
    }

    pub fn center_y(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }
}

/// Index of the human paddle (left side)
pub const HUMAN: usize = 0;
/// Index of the AI paddle (right side)
pub const OPPONENT: usize = 1;

/// Complete world snapshot (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub ball: Ball,
    /// Left paddle first, right paddle second
    pub players: [Player; 2],
    /// Points scored by each side
    pub scores: [u32; 2],
    /// Run seed for reproducible serves
    pub seed: u64,
    /// Number of serves so far
    pub serves: u32,
    /// Ball speed on every serve
    pub serve_speed: f32,
    /// Physics substeps simulated (each at most one tick long)
    pub time_ticks: u64,
}

impl WorldState {
    /// Create a new world with the given seed and serve the first ball
    pub fn new(seed: u64) -> Self {
        Self::with_serve_speed(seed, BALL_SERVE_SPEED)
    }

    pub fn with_serve_speed(seed: u64, serve_speed: f32) -> Self {
        let paddle_y = (WORLD_HEIGHT - PADDLE_HEIGHT) / 2.0;
        let mut state = Self {
            ball: Ball::new(Vec2::ZERO, Vec2::ZERO),
            players: [
                Player::new(PADDLE_MARGIN, paddle_y),
                Player::new(WORLD_WIDTH - PADDLE_MARGIN - PADDLE_WIDTH, paddle_y),
            ],
            scores: [0, 0],
            seed,
            serves: 0,
            serve_speed,
            time_ticks: 0,
        };
        let toward_right = state.serve_rng().random_bool(0.5);
        state.serve(toward_right);
        state
    }

    /// Per-serve RNG derived from the run seed so every serve is reproducible
    fn serve_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ u64::from(self.serves).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Put the ball back in the middle of the world and launch it horizontally
    /// toward one side with a random vertical component
    pub fn serve(&mut self, toward_right: bool) {
        let speed = self.serve_speed;
        let mut rng = self.serve_rng();
        let vy = rng.random_range(-0.5..0.5) * speed;
        let vx = if toward_right { speed } else { -speed };

        let radius = self.ball.radius;
        let pos = Vec2::new(WORLD_WIDTH / 2.0 - radius, WORLD_HEIGHT / 2.0 - radius);
        self.ball = Ball {
            pos,
            vel: Vec2::new(vx, vy),
            radius,
        };
        self.serves += 1;
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(0)
    }
}
