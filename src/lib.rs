//! Seesaw Brawl - two balls, one tilting beam, a lot of chaos
//!
//! Core modules:
//! - `sim`: Simulation core (platform, players, hazards, chaos events, rounds)
//! - `tuning`: Data-driven match balance
//! - `audio`: Sound cues emitted by the simulation for an audio collaborator

pub mod audio;
pub mod sim;
pub mod tuning;

pub use audio::{SoundCue, Tone, Waveform};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the runner (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Reference tick rate that per-tick damping factors are tuned for
    pub const REFERENCE_HZ: f32 = 120.0;

    /// Number of competitors
    pub const PLAYER_COUNT: usize = 2;

    /// Platform geometry
    pub const PLATFORM_THICKNESS: f32 = 24.0;
    pub const PLATFORM_MIN_LENGTH: f32 = 180.0;
    pub const PLATFORM_MAX_LENGTH: f32 = 980.0;
    pub const PLATFORM_MAX_BASE_LENGTH: f32 = 860.0;
    pub const PLATFORM_MAX_ANGLE: f32 = 0.43;
    pub const PLATFORM_MAX_ANGULAR_VEL: f32 = 1.05;

    /// Platform dynamics
    pub const PLATFORM_TORQUE_GAIN: f32 = 0.000_12;
    pub const PLATFORM_TORQUE_SCALE: f32 = 38.0;
    pub const PLATFORM_SPRING: f32 = 1.65;
    pub const PLATFORM_DAMPING: f32 = 0.972;
    /// Bodies deeper than this below the beam (local y) do not load it
    pub const PLATFORM_LOAD_DEPTH: f32 = 150.0;

    /// Player body defaults
    pub const PLAYER_BASE_RADIUS: f32 = 26.0;
    pub const PLAYER_MIN_RADIUS: f32 = 10.0;
    pub const SIZE_SWAP_SMALL_RADIUS: f32 = 20.0;
    pub const SIZE_SWAP_BIG_RADIUS: f32 = 32.0;
    pub const SHRINK_SCALE: f32 = 0.55;
    pub const GROW_SCALE: f32 = 1.45;

    /// Player movement
    pub const MOVE_FORCE: f32 = 700.0;
    pub const TURBO_MULTIPLIER: f32 = 1.2;
    pub const COMEBACK_MULTIPLIER: f32 = 1.12;
    pub const COMEBACK_DEFICIT: u32 = 2;
    pub const JUMP_IMPULSE: f32 = 430.0;
    pub const AIR_JUMP_SCALE: f32 = 0.92;
    pub const JUMP_COOLDOWN: f32 = 0.22;
    pub const JUMP_BUFFER: f32 = 0.12;
    pub const COYOTE_TIME: f32 = 0.09;
    pub const AIR_JUMPS: u8 = 1;
    pub const TRIPLE_AIR_JUMPS: u8 = 3;

    /// Forces
    pub const GRAVITY: f32 = 980.0;
    pub const HAZARD_GRAVITY: f32 = 890.0;
    pub const LOW_GRAVITY_SCALE: f32 = 0.58;
    pub const GROUND_FRICTION: f32 = 0.988;
    pub const GROUND_FRICTION_STICKY: f32 = 0.973;
    pub const AIR_FRICTION: f32 = 0.996;
    pub const AIR_FRICTION_STICKY: f32 = 0.992;
    pub const AIR_SPIN_DECAY: f32 = 0.995;
    pub const WALL_BOUNCE: f32 = -0.52;

    /// Contacts
    pub const PLATFORM_RESTITUTION: f32 = 0.06;
    pub const PLATFORM_RESTITUTION_DISCO: f32 = 0.18;
    pub const BALL_RESTITUTION: f32 = 0.96;
    pub const BALL_RESTITUTION_DISCO: f32 = 1.16;
    pub const BIG_IMPACT_IMPULSE: f32 = 140.0;
    pub const LANDING_IMPACT: f32 = 145.0;
    pub const LANDING_SOUND_COOLDOWN: f32 = 0.18;
    pub const STUN_TIME: f32 = 0.3;

    /// Trail history length per body
    pub const TRAIL_LENGTH: usize = 7;
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Unit vector pointing from `from` toward `to`, falling back to +x when the
/// points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let len = delta.length();
    if len > 0.0 { delta / len } else { Vec2::X }
}

/// Clamp a caller-provided timestep into `[0, max_dt]`; NaN becomes 0
#[inline]
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() { 0.0 } else { dt.clamp(0.0, max_dt) }
}
