//! Trajectory predictor for the AI paddle
//!
//! Extends the ball's current heading as a straight line to the far edge of
//! the world and nudges the right-hand paddle a fraction of the way toward
//! that intercept. Walls and paddle bounces are ignored, which is what keeps
//! the opponent beatable.

use crate::consts::{AI_DAMPING, WORLD_WIDTH};
use crate::sim::{Ball, Event, OPPONENT, WorldState};

/// Y coordinate where the ball's current line of flight crosses `x = WORLD_WIDTH`
///
/// Returns `None` when the ball has no horizontal motion or the intercept is
/// not a finite number.
pub fn intercept_y(ball: &Ball) -> Option<f32> {
    if ball.vel.x == 0.0 {
        return None;
    }
    let slope = ball.vel.y / ball.vel.x;
    let y = ball.pos.y - slope * (ball.pos.x - WORLD_WIDTH);
    y.is_finite().then_some(y)
}

/// Compute the AI paddle's input for this tick
///
/// Emits at most one pointer move. Nothing is emitted while the ball is
/// receding (`vx < 0`) or stationary horizontally.
pub fn predict(state: &WorldState) -> Vec<Event> {
    if state.ball.vel.x <= 0.0 {
        return Vec::new();
    }
    let Some(predicted_y) = intercept_y(&state.ball) else {
        return Vec::new();
    };

    let current_y = state.players[OPPONENT].pos.y;
    let distance = predicted_y - current_y;

    vec![Event::MouseMove {
        x: 0.0,
        y: current_y + distance / AI_DAMPING,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn state_with(ball_pos: Vec2, ball_vel: Vec2, opponent_y: f32) -> WorldState {
        let mut state = WorldState::new(0);
        state.ball = Ball::new(ball_pos, ball_vel);
        state.players[OPPONENT].pos.y = opponent_y;
        state
    }

    #[test]
    fn test_predict_worked_example() {
        let state = state_with(Vec2::new(100.0, 50.0), Vec2::new(10.0, 5.0), 80.0);
        assert_eq!(intercept_y(&state.ball), Some(200.0));

        let events = predict(&state);
        assert_eq!(events, vec![Event::MouseMove { x: 0.0, y: 86.0 }]);
    }

    #[test]
    fn test_predict_ignores_receding_ball() {
        let state = state_with(Vec2::new(100.0, 50.0), Vec2::new(-10.0, 5.0), 80.0);
        assert!(predict(&state).is_empty());
    }

    #[test]
    fn test_predict_zero_horizontal_velocity() {
        let state = state_with(Vec2::new(100.0, 50.0), Vec2::new(0.0, 5.0), 80.0);
        assert!(predict(&state).is_empty());

        let state = state_with(Vec2::new(100.0, 50.0), Vec2::ZERO, 80.0);
        assert!(predict(&state).is_empty());
    }

    #[test]
    fn test_predict_non_finite_intercept() {
        let state = state_with(Vec2::new(100.0, 50.0), Vec2::new(f32::MIN_POSITIVE, f32::MAX), 80.0);
        assert!(predict(&state).is_empty());
    }

    #[test]
    fn test_predict_moves_toward_intercept() {
        // Flat trajectory at y=200 with the paddle above it: paddle moves down
        let state = state_with(Vec2::new(100.0, 200.0), Vec2::new(3.0, 0.0), 20.0);
        match predict(&state).as_slice() {
            [Event::MouseMove { y, .. }] => assert!(*y > 20.0 && *y < 200.0),
            other => panic!("unexpected events: {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_approaching_ball_yields_damped_move(
            x in 0.0f32..400.0,
            y in 0.0f32..300.0,
            vx in 0.1f32..10.0,
            vy in -10.0f32..10.0,
            current_y in 0.0f32..220.0,
        ) {
            let state = state_with(Vec2::new(x, y), Vec2::new(vx, vy), current_y);
            let predicted_y = y - (vy / vx) * (x - WORLD_WIDTH);
            let expected = current_y + (predicted_y - current_y) / 20.0;

            let events = predict(&state);
            prop_assert_eq!(events.len(), 1);
            let Event::MouseMove { y: got, .. } = events[0];
            prop_assert!((got - expected).abs() <= 1e-3 * expected.abs().max(1.0));
        }

        #[test]
        fn prop_receding_ball_yields_nothing(
            x in 0.0f32..400.0,
            y in 0.0f32..300.0,
            vx in -10.0f32..-0.001,
            vy in -10.0f32..10.0,
        ) {
            let state = state_with(Vec2::new(x, y), Vec2::new(vx, vy), 100.0);
            prop_assert!(predict(&state).is_empty());
        }
    }
}
