//! Sound cues emitted by the simulation
//!
//! The core never talks to an audio device. It emits [`SoundCue`]s as events,
//! and each cue knows the short procedural [`Tone`] that voices it, so a
//! collaborator can synthesize everything without sample files.

use serde::{Deserialize, Serialize};

use crate::sim::HazardKind;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single blip: start frequency decays toward 82% over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub freq: f32,
    pub duration: f32,
    pub waveform: Waveform,
    pub volume: f32,
}

impl Tone {
    const fn new(freq: f32, duration: f32, waveform: Waveform, volume: f32) -> Self {
        Self {
            freq,
            duration,
            waveform,
            volume,
        }
    }

    /// Frequency the tone ramps down to (never below 45 Hz)
    pub fn end_freq(&self) -> f32 {
        (self.freq * 0.82).max(45.0)
    }
}

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum SoundCue {
    /// Ground or coyote jump
    Jump,
    /// Mid-air jump
    AirJump,
    /// Hard landing on the beam
    Landing { impact: f32 },
    /// A hazard struck a player
    HazardHit { kind: HazardKind },
    /// Players collided hard
    BigImpact { impulse: f32 },
    /// Landed while in danger of falling
    NearMiss,
    /// Round taken
    RoundWin { winner: usize },
    /// Round winner is on a streak
    Streak,
    /// Round winner met the round challenge
    ChallengeComplete,
    /// Match taken
    MatchWin,
    /// Countdown digit changed (3, 2, 1)
    CountdownTick { n: u32 },
    /// Countdown finished
    CountdownGo,
    /// Incoming-chaos seconds changed
    WarningTick { n: u32 },
    /// A chaos event fired
    ChaosFired { id: u8 },
    /// Chaos launched both players upward
    Launch,
    /// Chaos moved a player instantly
    Teleport,
    /// Delayed rocket burst went off
    Rocket,
}

impl SoundCue {
    /// The tone that voices this cue
    pub fn tone(&self) -> Tone {
        use Waveform::*;
        match *self {
            SoundCue::Jump => Tone::new(470.0, 0.07, Square, 0.03),
            SoundCue::AirJump => Tone::new(680.0, 0.06, Triangle, 0.028),
            SoundCue::Landing { impact } => Tone::new(180.0 + impact * 0.18, 0.07, Sawtooth, 0.028),
            SoundCue::HazardHit { kind } => {
                let freq = match kind {
                    HazardKind::Meteor => 80.0,
                    HazardKind::Spike => 320.0,
                    HazardKind::Bomb => 140.0,
                    HazardKind::Spring => 460.0,
                    _ => 210.0,
                };
                Tone::new(freq, 0.12, Sawtooth, 0.04)
            }
            SoundCue::BigImpact { impulse } => {
                Tone::new(220.0 + (impulse * 0.3).min(250.0), 0.07, Square, 0.03)
            }
            SoundCue::NearMiss => Tone::new(690.0, 0.06, Triangle, 0.04),
            SoundCue::RoundWin { winner } => {
                Tone::new(300.0 + winner as f32 * 90.0, 0.14, Triangle, 0.05)
            }
            SoundCue::Streak => Tone::new(540.0, 0.06, Square, 0.04),
            SoundCue::ChallengeComplete => Tone::new(760.0, 0.07, Triangle, 0.045),
            SoundCue::MatchWin => Tone::new(880.0, 0.3, Triangle, 0.05),
            SoundCue::CountdownTick { n } => Tone::new(320.0 + n as f32 * 90.0, 0.06, Square, 0.035),
            SoundCue::CountdownGo => Tone::new(760.0, 0.07, Triangle, 0.042),
            SoundCue::WarningTick { n } => Tone::new(420.0 + n as f32 * 35.0, 0.045, Sawtooth, 0.03),
            SoundCue::ChaosFired { id } => {
                Tone::new(260.0 + (id % 8) as f32 * 45.0, 0.045, Square, 0.024)
            }
            SoundCue::Launch => Tone::new(520.0, 0.1, Sine, 0.04),
            SoundCue::Teleport => Tone::new(800.0, 0.08, Square, 0.03),
            SoundCue::Rocket => Tone::new(600.0, 0.1, Sine, 0.05),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_pitch_rises_with_impact() {
        let soft = SoundCue::Landing { impact: 150.0 }.tone();
        let hard = SoundCue::Landing { impact: 600.0 }.tone();
        assert!(hard.freq > soft.freq);
    }

    #[test]
    fn test_big_impact_pitch_is_capped() {
        let tone = SoundCue::BigImpact { impulse: 10_000.0 }.tone();
        assert_eq!(tone.freq, 470.0);
    }

    #[test]
    fn test_end_freq_floor() {
        let tone = SoundCue::HazardHit { kind: HazardKind::Meteor }.tone();
        assert!((tone.end_freq() - 65.6).abs() < 0.001);
        let low = Tone::new(50.0, 0.1, Waveform::Sine, 0.1);
        assert_eq!(low.end_freq(), 45.0);
    }
}
