//! The seesaw beam
//!
//! A single rigid beam rotating about a fixed pivot. Bodies resting on it
//! push it around; a spring pulls it back to level. All ball/beam contact
//! math happens in the beam's local frame (x along the beam, y across it,
//! +y pointing down like the world).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::{ModifierClock, ModifierFlag};
use crate::consts::*;
use crate::rotate;

/// The rotating platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Fixed pivot (world space)
    pub pivot: Vec2,
    /// Length before length modifiers
    pub base_length: f32,
    /// Current length (after modifiers, clamped)
    pub length: f32,
    pub thickness: f32,
    /// Tilt (radians, positive = clockwise on screen)
    pub angle: f32,
    pub angular_vel: f32,
}

impl Platform {
    pub fn new(pivot: Vec2, base_length: f32) -> Self {
        Self {
            pivot,
            base_length,
            length: base_length.clamp(PLATFORM_MIN_LENGTH, PLATFORM_MAX_LENGTH),
            thickness: PLATFORM_THICKNESS,
            angle: 0.0,
            angular_vel: 0.0,
        }
    }

    #[inline]
    pub fn half_length(&self) -> f32 {
        self.length * 0.5
    }

    /// World point to beam-local coordinates
    #[inline]
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        rotate(world - self.pivot, -self.angle)
    }

    /// Beam-local point to world coordinates
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.pivot + rotate(local, self.angle)
    }

    /// Unit vector along the beam
    #[inline]
    pub fn tangent(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Unit vector across the beam, pointing into it from above
    #[inline]
    pub fn normal(&self) -> Vec2 {
        Vec2::new(-self.angle.sin(), self.angle.cos())
    }

    /// Direction a jump pushes off the beam
    #[inline]
    pub fn up(&self) -> Vec2 {
        -self.normal()
    }

    /// Local y of a ball's center when resting on the top surface
    #[inline]
    pub fn surface_y(&self, radius: f32) -> f32 {
        -(self.thickness * 0.5 + radius)
    }

    /// Recompute current length from the active length modifiers
    pub fn sync_length(&mut self, clock: &ModifierClock) {
        let mut factor = 1.0;
        if clock.is_active(ModifierFlag::PlatformTiny) {
            factor *= 0.42;
        }
        if clock.is_active(ModifierFlag::PlatformShort) {
            factor *= 0.5;
        }
        if clock.is_active(ModifierFlag::PlatformLong) {
            factor *= 1.6;
        }
        self.length = (self.base_length * factor).clamp(PLATFORM_MIN_LENGTH, PLATFORM_MAX_LENGTH);
    }

    /// Whether a body at `world` is close enough to the beam to load it
    pub fn is_loaded_by(&self, world: Vec2) -> bool {
        let local = self.to_local(world);
        local.x.abs() < self.length * 0.52 && local.y < PLATFORM_LOAD_DEPTH
    }

    /// Integrate tilt from the bodies resting on the beam
    pub fn update(&mut self, dt: f32, bodies: &[Vec2]) {
        let dt = dt.max(0.0);

        let torque: f32 = bodies
            .iter()
            .filter(|&&pos| self.is_loaded_by(pos))
            .map(|&pos| self.to_local(pos).x * PLATFORM_TORQUE_GAIN)
            .sum();

        self.angular_vel += torque * dt * PLATFORM_TORQUE_SCALE;
        self.angular_vel += -self.angle * PLATFORM_SPRING * dt;
        self.angular_vel *= PLATFORM_DAMPING.powf(dt * REFERENCE_HZ);
        self.angular_vel = self
            .angular_vel
            .clamp(-PLATFORM_MAX_ANGULAR_VEL, PLATFORM_MAX_ANGULAR_VEL);

        self.angle += self.angular_vel * dt;
        self.angle = self.angle.clamp(-PLATFORM_MAX_ANGLE, PLATFORM_MAX_ANGLE);
    }
}
