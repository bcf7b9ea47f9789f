//! Collision detection and response between the ball and paddles

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle to the ball center
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball (by center) and an axis-aligned rectangle
pub fn ball_rect_collision(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> CollisionResult {
    let closest = center.clamp(min, max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Center is inside the rectangle: push out through the nearest face
    let to_left = center.x - min.x;
    let to_right = max.x - center.x;
    let to_top = center.y - min.y;
    let to_bottom = max.y - center.y;
    let nearest = to_left.min(to_right).min(to_top).min(to_bottom);

    let normal = if nearest == to_left {
        Vec2::NEG_X
    } else if nearest == to_right {
        Vec2::X
    } else if nearest == to_top {
        Vec2::NEG_Y
    } else {
        Vec2::Y
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: nearest + radius,
    }
}

/// Reflect velocity around a surface normal
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
