//! World state
//!
//! One aggregate owns everything the simulation mutates. Round and match
//! resets, deferred-effect application and the HUD snapshot live here; the
//! per-tick orchestration is in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::challenge::ChallengeTracker;
use super::chaos::{self, ChaosDirector};
use super::clock::ModifierClock;
use super::events::{EventQueue, FlavorMessage, GameEvent, Hud};
use super::hazard::HazardManager;
use super::platform::Platform;
use super::player::Player;
use super::round::MatchState;
use super::scheduler::{DeferredEffect, Scheduler};
use crate::consts::*;
use crate::tuning::Tuning;

/// Players spawn this fraction of the beam length either side of the pivot
const SPAWN_OFFSET: f32 = 0.27;
/// Random tilt (either way) at the start of later rounds
const ROUND_START_TILT: f32 = 0.06;
/// Delay before the first ambient hazard of a round
const FIRST_HAZARD_DELAY: f32 = 0.9;
/// A body this far below the arena has fallen off
const FALL_MARGIN: f32 = 90.0;

const CONFETTI_COLORS: [[u8; 3]; 6] = [
    [0xff, 0x6e, 0x7d],
    [0x6e, 0xa0, 0xff],
    [0xff, 0xdc, 0x5e],
    [0x7f, 0xff, 0xb6],
    [0xff, 0x9f, 0x58],
    [0xc8, 0x79, 0xff],
];

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub tuning: Tuning,
    /// Arena size (world bounds)
    pub arena: Vec2,
    pub clock: ModifierClock,
    pub scheduler: Scheduler,
    pub platform: Platform,
    pub players: [Player; PLAYER_COUNT],
    pub hazards: HazardManager,
    pub chaos: ChaosDirector,
    pub challenge: ChallengeTracker,
    pub round: MatchState,
    pub rng: Pcg32,
    /// Side-channel output of the current tick
    pub events: EventQueue,
    /// Flavor text on screen
    pub message: Option<FlavorMessage>,
    /// Throttle for hazard-hit commentary
    pub hit_comment_cd: f32,
    pub(crate) last_countdown_digit: u32,
    pub(crate) last_warning_secs: u32,
}

impl World {
    /// Create a new match with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let arena = Vec2::new(tuning.arena_width, tuning.arena_height);
        let pivot = Vec2::new(arena.x * 0.5, arena.y * 0.64);
        let base_length = (arena.x * 0.68).min(PLATFORM_MAX_BASE_LENGTH);

        let mut world = Self {
            seed,
            arena,
            clock: ModifierClock::new(),
            scheduler: Scheduler::new(),
            platform: Platform::new(pivot, base_length),
            players: [Player::new(0), Player::new(1)],
            hazards: HazardManager::new(),
            chaos: ChaosDirector::new(&tuning),
            challenge: ChallengeTracker::default(),
            round: MatchState::new(tuning.win_score),
            rng: Pcg32::seed_from_u64(seed),
            events: EventQueue::default(),
            message: None,
            hit_comment_cd: 0.0,
            last_countdown_digit: 0,
            last_warning_secs: 0,
            tuning,
        };
        world.reset_match();
        world
    }

    /// Below this y a player has fallen off
    pub fn fall_line(&self) -> f32 {
        self.arena.y + FALL_MARGIN
    }

    /// Put up flavor text and tell the UI
    pub fn show_message(&mut self, text: String, duration: f32) {
        self.events.push(GameEvent::Message {
            text: text.clone(),
            duration,
        });
        self.message = Some(FlavorMessage {
            text,
            remaining: duration,
        });
    }

    /// Everything queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Fresh round: cancel pending effects, respawn on the beam, new challenge.
    ///
    /// Scores, streaks and match-scoped modifiers survive.
    pub fn reset_round(&mut self) {
        // Cancel first so no stale step can re-extend a flag we clear below
        self.scheduler.invalidate_all();

        let match_start = self.round.scores == [0, 0] && self.clock.now() == 0.0;
        self.platform.angle = if match_start {
            0.0
        } else {
            (self.rng.random::<f32>() - 0.5) * ROUND_START_TILT * 2.0
        };
        self.platform.angular_vel = 0.0;

        self.clock.clear_round_flags();
        self.platform.sync_length(&self.clock);

        let offset = self.platform.length * SPAWN_OFFSET;
        for (player, side) in self.players.iter_mut().zip([-1.0, 1.0]) {
            player.sync_modifiers(&self.clock);
            player.spawn(&self.platform, side * offset);
        }

        self.hazards.reset(FIRST_HAZARD_DELAY);
        self.round.begin_countdown(self.tuning.countdown_secs);
        self.chaos.clear_warning();
        self.hit_comment_cd = 0.0;
        self.last_countdown_digit = 0;
        self.last_warning_secs = 0;

        self.challenge.start_round(&mut self.rng);
        log::info!(
            "round {} ready: {}",
            self.round.round + 1,
            self.challenge.kind.description()
        );
        self.events.push(GameEvent::ChallengeStarted {
            kind: self.challenge.kind,
            text: self.challenge.kind.description().to_string(),
        });
    }

    /// Back to 0-0 with every modifier cleared
    pub fn reset_match(&mut self) {
        self.scheduler.invalidate_all();

        self.round.reset();
        self.clock.reset();
        self.chaos.reset(&self.tuning, &mut self.rng);
        self.message = None;

        log::info!("match reset (first to {})", self.round.win_score);
        self.events.push(GameEvent::MatchReset);
        self.events.push(GameEvent::ScoreChanged {
            scores: self.round.scores,
        });

        self.reset_round();
    }

    /// Run a deferred effect whose delay has elapsed
    pub fn apply_deferred(&mut self, effect: DeferredEffect) {
        log::debug!("deferred effect: {:?}", effect);
        match effect {
            DeferredEffect::ResetRound => self.reset_round(),
            DeferredEffect::ResetMatch => self.reset_match(),
            DeferredEffect::Confetti => {
                let pos = Vec2::new(
                    self.arena.x * (0.2 + self.rng.random::<f32>() * 0.6),
                    self.arena.y * 0.4,
                );
                let color = CONFETTI_COLORS[self.rng.random_range(0..CONFETTI_COLORS.len())];
                self.events.particles(pos, color, 20, 320.0);
            }
            other => chaos::apply_step(self, other),
        }
    }

    /// Snapshot for score/HUD widgets
    pub fn hud(&self) -> Hud {
        let warning = self.chaos.warning().map(|(id, secs)| {
            (
                chaos::event(id).label.to_string(),
                warning_secs(secs),
            )
        });
        Hud {
            scores: self.round.scores,
            win_score: self.round.win_score,
            round: self.round.round,
            streaks: self.round.streaks,
            challenge: self.challenge.kind.description().to_string(),
            warning,
            countdown: self.round.countdown_digit(),
            message: self.message.clone(),
            winner: self.round.winner,
        }
    }
}

/// Whole seconds shown on the incoming warning (never 0 while it is up)
pub(crate) fn warning_secs(time: f32) -> u32 {
    time.ceil().max(1.0) as u32
}
