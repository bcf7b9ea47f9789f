//! Physics step
//!
//! Advances the world by a tick delta (1.0 = one 60 Hz frame) and applies
//! input events to the paddles.

use super::collision::{ball_rect_collision, reflect_velocity};
use super::state::{Event, HUMAN, OPPONENT, WorldState};
use crate::consts::*;

/// Apply an input event to one paddle
///
/// Paddles only move vertically, so the event's x coordinate is ignored.
pub fn apply_event(state: &mut WorldState, player: usize, event: &Event) {
    let Some(paddle) = state.players.get_mut(player) else {
        log::warn!("Event for unknown player {}", player);
        return;
    };
    match *event {
        Event::MouseMove { y, .. } => {
            if y.is_finite() {
                paddle.pos.y = y.clamp(0.0, WORLD_HEIGHT - paddle.height);
            }
        }
    }
}

/// Advance the world by `dt` ticks
///
/// Large deltas are split into unit substeps so a fast ball can't tunnel
/// through a paddle. Returns the index of the player who scored, if any.
pub fn tick(state: &mut WorldState, dt: f32) -> Option<usize> {
    let dt = dt.clamp(0.0, MAX_TICK_DELTA);
    if dt == 0.0 {
        return None;
    }

    let substeps = dt.ceil() as u32;
    let step = dt / substeps as f32;

    for _ in 0..substeps {
        state.time_ticks += 1;
        if let Some(scorer) = step_ball(state, step) {
            return Some(scorer);
        }
    }
    None
}

fn step_ball(state: &mut WorldState, dt: f32) -> Option<usize> {
    let ball = &mut state.ball;
    ball.pos += ball.vel * dt;

    // Top edge and ground
    let diameter = ball.radius * 2.0;
    if ball.pos.y < 0.0 {
        ball.pos.y = -ball.pos.y;
        ball.vel.y = ball.vel.y.abs();
    } else if ball.pos.y + diameter > WORLD_HEIGHT {
        let floor = WORLD_HEIGHT - diameter;
        ball.pos.y = floor - (ball.pos.y - floor);
        ball.vel.y = -ball.vel.y.abs();
    }

    for paddle in &state.players {
        let result = ball_rect_collision(ball.center(), ball.radius, paddle.min(), paddle.max());
        if !result.hit || ball.vel.dot(result.normal) >= 0.0 {
            continue;
        }

        ball.pos += result.normal * result.penetration;
        ball.vel = reflect_velocity(ball.vel, result.normal);

        // Face hits speed the ball up and add english from the hit offset
        if result.normal.x != 0.0 {
            let offset = ((ball.center().y - paddle.center_y()) / (paddle.height / 2.0))
                .clamp(-1.0, 1.0);
            ball.vel.y += offset * PADDLE_ENGLISH;
            ball.vel *= PADDLE_BOOST;
            ball.vel = ball.vel.clamp_length_max(BALL_MAX_SPEED);
        }
    }

    if ball.pos.x + diameter < 0.0 {
        state.scores[OPPONENT] += 1;
        log::info!("Right side scores ({}-{})", state.scores[HUMAN], state.scores[OPPONENT]);
        state.serve(false);
        return Some(OPPONENT);
    }
    if ball.pos.x > WORLD_WIDTH {
        state.scores[HUMAN] += 1;
        log::info!("Left side scores ({}-{})", state.scores[HUMAN], state.scores[OPPONENT]);
        state.serve(true);
        return Some(HUMAN);
    }

    None
}
