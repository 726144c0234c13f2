//! Data-driven match balance
//!
//! Everything a designer might want to tweak without touching physics code.
//! Loaded from JSON; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure loading a tuning file
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Match-level tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Match flow ===
    /// Rounds needed to take the match
    pub win_score: u32,
    /// Pre-round countdown (seconds)
    pub countdown_secs: f32,
    /// Pause between a round ending and the next countdown
    pub round_reset_delay: f32,
    /// Pause between a match win and the full reset
    pub match_reset_delay: f32,
    /// Largest step a single tick may advance
    pub max_dt: f32,

    // === Chaos ===
    pub first_chaos_delay: f32,
    pub chaos_interval_min: f32,
    pub chaos_interval_max: f32,
    pub warning_lead_min: f32,
    pub warning_lead_max: f32,
    /// Sim-time scale while slow-motion is active
    pub slow_motion_scale: f32,

    // === Hazards ===
    pub hazard_lifetime: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 1280.0,
            arena_height: 720.0,

            win_score: 5,
            countdown_secs: 3.05,
            round_reset_delay: 0.9,
            match_reset_delay: 4.0,
            max_dt: 0.02,

            first_chaos_delay: 3.1,
            chaos_interval_min: 2.4,
            chaos_interval_max: 4.5,
            warning_lead_min: 2.0,
            warning_lead_max: 2.8,
            slow_motion_scale: 0.35,

            hazard_lifetime: 16.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Clamp every field into a range the simulation can cope with.
    pub fn sanitized(mut self) -> Self {
        clamp_field("arena_width", &mut self.arena_width, 320.0, 4096.0);
        clamp_field("arena_height", &mut self.arena_height, 240.0, 4096.0);
        if self.win_score == 0 {
            log::warn!("tuning: win_score 0 is not playable, using 1");
            self.win_score = 1;
        }
        clamp_field("countdown_secs", &mut self.countdown_secs, 0.0, 30.0);
        clamp_field("round_reset_delay", &mut self.round_reset_delay, 0.0, 30.0);
        clamp_field("match_reset_delay", &mut self.match_reset_delay, 0.0, 60.0);
        // Anything coarser than 20ms lets bodies tunnel through the beam
        clamp_field("max_dt", &mut self.max_dt, 0.001, 0.02);
        clamp_field("first_chaos_delay", &mut self.first_chaos_delay, 0.1, 60.0);
        clamp_field("chaos_interval_min", &mut self.chaos_interval_min, 0.1, 60.0);
        let min = self.chaos_interval_min;
        clamp_field("chaos_interval_max", &mut self.chaos_interval_max, min, 60.0);
        clamp_field("warning_lead_min", &mut self.warning_lead_min, 0.0, 10.0);
        let min = self.warning_lead_min;
        clamp_field("warning_lead_max", &mut self.warning_lead_max, min, 10.0);
        clamp_field("slow_motion_scale", &mut self.slow_motion_scale, 0.05, 1.0);
        clamp_field("hazard_lifetime", &mut self.hazard_lifetime, 0.5, 120.0);
        self
    }
}

fn clamp_field(name: &str, value: &mut f32, min: f32, max: f32) {
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != *value {
        log::warn!("tuning: {} = {} out of range, using {}", name, value, clamped);
        *value = clamped;
    }
}
