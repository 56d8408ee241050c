//! Collision detection and response
//!
//! Every contact in the sieve is one of two cases: a ball against an
//! axis-aligned rectangle (barrier) or a ball against another ball. Both
//! report a surface normal pointing toward the first ball's center plus a
//! penetration depth for position correction.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone, Copy)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the other body's surface (if hit)
    pub point: Vec2,
    /// Surface normal at the contact (pointing toward the ball center)
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

/// Check a ball against an axis-aligned rectangle.
///
/// The normal points from the rectangle surface toward the ball center.
/// When the center is inside the rectangle (tunneling case) the exit is
/// taken along the axis of least overlap.
pub fn ball_rect_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    rect_pos: Vec2,
    rect_half: Vec2,
) -> CollisionResult {
    let delta = ball_pos - rect_pos;
    let clamped = delta.clamp(-rect_half, rect_half);
    let offset = delta - clamped;
    let dist_sq = offset.length_squared();

    if dist_sq > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-6 {
        // Center outside the rectangle
        let dist = dist_sq.sqrt();
        CollisionResult {
            hit: true,
            point: rect_pos + clamped,
            normal: offset / dist,
            penetration: ball_radius - dist,
        }
    } else {
        // Center inside - exit along the shallower axis
        let overlap = rect_half - delta.abs();
        let (normal, depth) = if overlap.x < overlap.y {
            (Vec2::new(axis_sign(delta.x), 0.0), overlap.x)
        } else {
            (Vec2::new(0.0, axis_sign(delta.y)), overlap.y)
        };
        CollisionResult {
            hit: true,
            point: ball_pos + normal * depth,
            normal,
            penetration: ball_radius + depth,
        }
    }
}

/// Check two balls against each other.
///
/// The normal points from `a` toward `b`. Coincident centers resolve
/// along a fixed axis so the response stays deterministic.
pub fn ball_ball_collision(
    a_pos: Vec2,
    a_radius: f32,
    b_pos: Vec2,
    b_radius: f32,
) -> CollisionResult {
    let delta = b_pos - a_pos;
    let min_dist = a_radius + b_radius;
    let dist_sq = delta.length_squared();

    if dist_sq >= min_dist * min_dist {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-6 {
        let dist = dist_sq.sqrt();
        let normal = delta / dist;
        CollisionResult {
            hit: true,
            point: a_pos + normal * a_radius,
            normal,
            penetration: min_dist - dist,
        }
    } else {
        CollisionResult {
            hit: true,
            point: a_pos,
            normal: Vec2::X,
            penetration: min_dist,
        }
    }
}

/// Bounce a velocity off a surface.
///
/// The normal component reflects scaled by restitution, the tangential
/// component is damped by friction. With restitution 1 and friction 0
/// this is the standard mirror reflection v' = v - 2(v·n)n.
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32, friction: f32) -> Vec2 {
    let v_normal = normal * velocity.dot(normal);
    let v_tangent = velocity - v_normal;
    v_tangent * (1.0 - friction).max(0.0) - v_normal * restitution
}

/// signum that treats 0 as positive, keeping degenerate contacts stable
#[inline]
fn axis_sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
