//! Round and match bookkeeping
//!
//! Countdown -> Active -> RoundOver -> (Countdown | MatchOver). Physics only
//! runs while Active; the delayed transitions out of RoundOver and MatchOver
//! are driven by the deferred scheduler.

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_COUNT;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Pre-round countdown, physics frozen
    Countdown,
    /// Physics and chaos running
    Active,
    /// Someone fell; waiting for the next countdown
    RoundOver,
    /// Someone reached the win score; waiting for the full reset
    MatchOver,
}

/// What a finished round did to the scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub winner: usize,
    pub loser: usize,
    /// Scores before this round was awarded
    pub scores_before: [u32; PLAYER_COUNT],
    pub match_won: bool,
}

impl RoundOutcome {
    /// Winner was down by two or more before taking this round
    pub fn is_comeback(&self) -> bool {
        self.scores_before[self.loser] >= self.scores_before[self.winner] + 2
    }
}

/// Headline for a finished round, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCallout {
    MatchWon,
    ChallengeDone,
    Comeback,
    Streak(u32),
    MatchPoint,
    Tied,
    Taunt,
}

/// Scores, streaks and the phase machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: Phase,
    pub scores: [u32; PLAYER_COUNT],
    pub win_score: u32,
    pub streaks: [u32; PLAYER_COUNT],
    /// Rounds played this match
    pub round: u32,
    pub winner: Option<usize>,
    /// Seconds left on the pre-round countdown
    pub countdown: f32,
}

impl MatchState {
    pub fn new(win_score: u32) -> Self {
        Self {
            phase: Phase::Countdown,
            scores: [0; PLAYER_COUNT],
            win_score: win_score.max(1),
            streaks: [0; PLAYER_COUNT],
            round: 0,
            winner: None,
            countdown: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Fresh match, same win score
    pub fn reset(&mut self) {
        *self = Self::new(self.win_score);
    }

    /// Enter the pre-round countdown
    pub fn begin_countdown(&mut self, secs: f32) {
        self.phase = Phase::Countdown;
        self.countdown = secs;
    }

    /// Run the countdown; returns true on the tick play starts
    pub fn advance_countdown(&mut self, dt: f32) -> bool {
        if self.phase != Phase::Countdown {
            return false;
        }
        self.countdown -= dt;
        if self.countdown <= 0.0 && self.winner.is_none() {
            self.countdown = 0.0;
            self.phase = Phase::Active;
            return true;
        }
        false
    }

    /// Whole-second countdown digit (3, 2, 1) while counting down
    pub fn countdown_digit(&self) -> Option<u32> {
        (self.phase == Phase::Countdown && self.countdown > 0.0)
            .then(|| self.countdown.ceil().clamp(1.0, 3.0) as u32)
    }

    /// Award the round to whoever did not fall
    pub fn finish_round(&mut self, loser: usize) -> RoundOutcome {
        assert!(loser < PLAYER_COUNT, "invalid player id {loser}");
        let winner = 1 - loser;
        let scores_before = self.scores;

        self.round += 1;
        self.streaks[winner] += 1;
        self.streaks[loser] = 0;
        self.scores[winner] += 1;

        let match_won = self.scores[winner] >= self.win_score;
        if match_won {
            self.winner = Some(winner);
            self.phase = Phase::MatchOver;
        } else {
            self.phase = Phase::RoundOver;
        }

        RoundOutcome {
            winner,
            loser,
            scores_before,
            match_won,
        }
    }

    /// Pick the headline for a round that was just finished
    pub fn callout(&self, outcome: &RoundOutcome, challenge_done: bool) -> RoundCallout {
        let streak = self.streaks[outcome.winner];
        if outcome.match_won {
            RoundCallout::MatchWon
        } else if challenge_done {
            RoundCallout::ChallengeDone
        } else if outcome.is_comeback() {
            RoundCallout::Comeback
        } else if streak >= 2 {
            RoundCallout::Streak(streak)
        } else if self.scores[outcome.winner] + 1 == self.win_score {
            RoundCallout::MatchPoint
        } else if self.scores[0] == self.scores[1] {
            RoundCallout::Tied
        } else {
            RoundCallout::Taunt
        }
    }
}
