//! Simulation module
//!
//! World state plus the fixed-step physics that advances it:
//! - Tick delta is normalized to 60 Hz frames
//! - Seeded RNG only (serves are reproducible from the run seed)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_rect_collision, reflect_velocity};
pub use state::{Ball, Event, HUMAN, OPPONENT, Player, WorldState};
pub use tick::{apply_event, tick};
