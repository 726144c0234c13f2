//! Outbound side-channel events and the HUD snapshot
//!
//! The simulation never renders, plays audio or touches UI. Everything a
//! collaborator needs to react to is queued as a [`GameEvent`] during a tick
//! and drained afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::challenge::ChallengeKind;
use crate::audio::SoundCue;
use crate::consts::PLAYER_COUNT;

pub const WHITE: [u8; 3] = [255, 255, 255];

/// Something a render/audio/UI collaborator should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Play a sound
    Sound(SoundCue),
    /// Particle burst request
    Particles {
        pos: Vec2,
        color: [u8; 3],
        count: u32,
        force: f32,
    },
    /// Camera shake request
    Shake { power: f32 },
    /// Full-screen flash request
    Flash { color: [u8; 3], duration: f32 },
    /// Flavor text
    Message { text: String, duration: f32 },
    ScoreChanged { scores: [u32; PLAYER_COUNT] },
    ChallengeStarted { kind: ChallengeKind, text: String },
    ChallengeCompleted { player: usize, text: String },
    /// Incoming chaos; re-sent whenever the whole-second countdown changes
    ChaosWarning { id: u8, label: String, secs: u32 },
    ChaosFired { id: u8, label: String },
    /// Countdown finished, physics running
    RoundStarted { round: u32 },
    RoundEnded {
        winner: usize,
        loser: usize,
        scores: [u32; PLAYER_COUNT],
    },
    MatchWon { winner: usize },
    MatchReset,
}

/// Per-tick event queue
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.push(GameEvent::Sound(cue));
    }

    pub fn particles(&mut self, pos: Vec2, color: [u8; 3], count: u32, force: f32) {
        self.push(GameEvent::Particles {
            pos,
            color,
            count,
            force,
        });
    }

    pub fn shake(&mut self, power: f32) {
        self.push(GameEvent::Shake { power });
    }

    pub fn flash(&mut self, color: [u8; 3], duration: f32) {
        self.push(GameEvent::Flash { color, duration });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Flavor text currently on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorMessage {
    pub text: String,
    /// Seconds left on screen
    pub remaining: f32,
}

/// Everything a score/HUD widget needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub scores: [u32; PLAYER_COUNT],
    pub win_score: u32,
    pub round: u32,
    pub streaks: [u32; PLAYER_COUNT],
    /// Active challenge banner
    pub challenge: String,
    /// Incoming chaos label and whole seconds left
    pub warning: Option<(String, u32)>,
    /// Countdown digit while waiting to start
    pub countdown: Option<u32>,
    pub message: Option<FlavorMessage>,
    pub winner: Option<usize>,
}
