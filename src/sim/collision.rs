//! Collision detection and response
//!
//! Pure functions: they read positions/velocities and return what the
//! contact should do, leaving it to the caller to write results back.

use glam::Vec2;

use super::platform::Platform;

/// Depth of the band above the beam surface that counts as "on the beam"
const CONTACT_BAND: f32 = 42.0;
/// Bodies rising faster than this pass through the band untouched
const MAX_RISE_SPEED: f32 = 300.0;
/// How strongly spin is pulled toward rolling speed on contact
const SPIN_BLEND: f32 = 0.36;
/// Spin transfer per unit of ball-ball impulse
const IMPULSE_SPIN: f32 = 0.03;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Midpoint of the overlap (if hit)
    pub point: Vec2,
    /// Unit normal from the first shape toward the second
    pub normal: Vec2,
    /// Overlap depth (for position correction)
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

/// Circle-circle overlap test. Coincident centers separate along +x.
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b - a;
    let min_dist = a_radius + b_radius;
    let dist_sq = delta.length_squared();

    if dist_sq >= min_dist * min_dist {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0 { delta / dist } else { Vec2::X };
    CollisionResult {
        hit: true,
        point: a + normal * (a_radius - (min_dist - dist) * 0.5),
        normal,
        penetration: min_dist - dist,
    }
}

/// A body resting on (or landing on) the beam
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformContact {
    /// Position snapped onto the beam surface
    pub pos: Vec2,
    /// Velocity after removing the inward normal component
    pub vel: Vec2,
    /// Spin velocity after blending toward rolling speed
    pub spin_vel: f32,
    /// Normal speed at contact (for landing feedback)
    pub impact: f32,
}

/// Check a ball against the top surface of the beam.
///
/// Returns `None` when the ball is off the beam, too far below its surface,
/// or rising fast enough to pass through the contact band.
pub fn platform_contact(
    platform: &Platform,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    spin_vel: f32,
    restitution: f32,
) -> Option<PlatformContact> {
    let mut local = platform.to_local(pos);
    let top = platform.surface_y(radius);

    let on_beam = local.x.abs() < platform.half_length() + radius;
    let in_band = local.y > top && local.y < top + CONTACT_BAND;
    if !on_beam || !in_band || vel.y < -MAX_RISE_SPEED {
        return None;
    }

    local.y = top;

    let tangent = platform.tangent();
    let normal = platform.normal();
    let along = vel.dot(tangent);
    let into = vel.dot(normal);

    let target_spin = along / radius.max(14.0);

    Some(PlatformContact {
        pos: platform.to_world(local),
        vel: tangent * along - normal * into.min(0.0) * restitution,
        spin_vel: spin_vel + (target_spin - spin_vel) * SPIN_BLEND,
        impact: into.abs(),
    })
}

/// Minimal body view for pair resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub spin_vel: f32,
}

/// Push two overlapping balls apart and bounce them off each other.
///
/// Returns the impulse applied (0 when the balls overlap but are already
/// separating), or `None` when they do not touch.
pub fn resolve_ball_pair(a: &mut BallBody, b: &mut BallBody, restitution: f32) -> Option<f32> {
    let contact = circles_overlap(a.pos, a.radius, b.pos, b.radius);
    if !contact.hit {
        return None;
    }

    let n = contact.normal;
    let push = n * contact.penetration * 0.5;
    a.pos -= push;
    b.pos += push;

    let closing = (b.vel - a.vel).dot(n);
    if closing >= 0.0 {
        return Some(0.0);
    }

    let impulse = -closing * restitution;
    a.vel -= n * impulse;
    b.vel += n * impulse;
    a.spin_vel -= impulse * IMPULSE_SPIN;
    b.spin_vel += impulse * IMPULSE_SPIN;

    Some(impulse)
}
