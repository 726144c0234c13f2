//! Per-round challenges
//!
//! Each round picks one goal at random. Player stats accumulate through the
//! round and are checked for the round winner only.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_COUNT;

const AIRTIME_GOAL: f32 = 2.2;
const IMPACT_GOAL: f32 = 320.0;
const HAZARD_HIT_GOAL: u32 = 3;

/// Round challenge kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Win without jumping
    NoJump,
    /// Spend enough time airborne
    Airtime,
    /// Trade heavy body blows
    BigImpacts,
    /// Win despite taking hazard hits
    HazardPressure,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 4] = [
        ChallengeKind::NoJump,
        ChallengeKind::Airtime,
        ChallengeKind::BigImpacts,
        ChallengeKind::HazardPressure,
    ];

    /// Challenge for a numeric id; ids past the table wrap around
    pub fn from_id(id: usize) -> Self {
        Self::ALL[id % Self::ALL.len()]
    }

    /// Banner shown while the round runs
    pub fn description(self) -> &'static str {
        match self {
            ChallengeKind::NoJump => "Challenge: No-jump round",
            ChallengeKind::Airtime => "Challenge: Airtime control",
            ChallengeKind::BigImpacts => "Challenge: Big impacts",
            ChallengeKind::HazardPressure => "Challenge: Hazard pressure",
        }
    }

    /// Shown when the round winner met the goal
    pub fn completion(self) -> &'static str {
        match self {
            ChallengeKind::NoJump => "No-jump cleared",
            ChallengeKind::Airtime => "Airtime master",
            ChallengeKind::BigImpacts => "Impact goal cleared",
            ChallengeKind::HazardPressure => "Survived hazard goal",
        }
    }
}

/// One player's round accumulators
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeStats {
    pub jumps: u32,
    /// Seconds spent off the beam
    pub airtime: f32,
    /// Sum of big-impact impulses
    pub impact_power: f32,
    pub hazard_hits: u32,
}

/// Active challenge plus both players' stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeTracker {
    pub kind: ChallengeKind,
    pub stats: [ChallengeStats; PLAYER_COUNT],
}

impl Default for ChallengeTracker {
    fn default() -> Self {
        Self::new(ChallengeKind::NoJump)
    }
}

impl ChallengeTracker {
    pub fn new(kind: ChallengeKind) -> Self {
        Self {
            kind,
            stats: [ChallengeStats::default(); PLAYER_COUNT],
        }
    }

    /// Pick this round's challenge and zero the stats
    pub fn start_round(&mut self, rng: &mut impl Rng) {
        let id = rng.random_range(0..ChallengeKind::ALL.len());
        self.start(ChallengeKind::from_id(id));
    }

    pub fn start(&mut self, kind: ChallengeKind) {
        *self = Self::new(kind);
    }

    pub fn record_jump(&mut self, player: usize) {
        self.stats[player].jumps += 1;
    }

    pub fn record_airtime(&mut self, player: usize, dt: f32) {
        self.stats[player].airtime += dt;
    }

    /// Big impacts count toward both players
    pub fn record_impact(&mut self, impulse: f32) {
        for stats in &mut self.stats {
            stats.impact_power += impulse;
        }
    }

    pub fn record_hazard_hit(&mut self, player: usize) {
        self.stats[player].hazard_hits += 1;
    }

    /// Whether `player` met the current goal
    pub fn achieved(&self, player: usize) -> bool {
        assert!(player < PLAYER_COUNT, "invalid player id {player}");
        let stats = &self.stats[player];
        match self.kind {
            ChallengeKind::NoJump => stats.jumps == 0,
            ChallengeKind::Airtime => stats.airtime >= AIRTIME_GOAL,
            ChallengeKind::BigImpacts => stats.impact_power >= IMPACT_GOAL,
            ChallengeKind::HazardPressure => stats.hazard_hits >= HAZARD_HIT_GOAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_no_jump_fails_after_a_jump() {
        let mut tracker = ChallengeTracker::new(ChallengeKind::NoJump);
        assert!(tracker.achieved(0));
        tracker.record_jump(0);
        assert!(!tracker.achieved(0));
        assert!(tracker.achieved(1));
    }

    #[test]
    fn test_airtime_threshold() {
        let mut tracker = ChallengeTracker::new(ChallengeKind::Airtime);
        tracker.record_airtime(1, 2.0);
        assert!(!tracker.achieved(1));
        tracker.record_airtime(1, 0.25);
        assert!(tracker.achieved(1));
    }

    #[test]
    fn test_impacts_count_for_both() {
        let mut tracker = ChallengeTracker::new(ChallengeKind::BigImpacts);
        tracker.record_impact(200.0);
        tracker.record_impact(150.0);
        assert!(tracker.achieved(0));
        assert!(tracker.achieved(1));
    }

    #[test]
    fn test_hazard_pressure() {
        let mut tracker = ChallengeTracker::new(ChallengeKind::HazardPressure);
        for _ in 0..2 {
            tracker.record_hazard_hit(0);
        }
        assert!(!tracker.achieved(0));
        tracker.record_hazard_hit(0);
        assert!(tracker.achieved(0));
    }

    #[test]
    fn test_start_round_resets_stats() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut tracker = ChallengeTracker::default();
        tracker.record_jump(0);
        tracker.record_hazard_hit(1);
        tracker.start_round(&mut rng);
        assert_eq!(tracker.stats, [ChallengeStats::default(); PLAYER_COUNT]);
    }

    #[test]
    #[should_panic(expected = "invalid player id")]
    fn test_achieved_rejects_bad_player() {
        ChallengeTracker::default().achieved(3);
    }
}
