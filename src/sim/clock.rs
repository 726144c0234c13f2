//! Modifier clock
//!
//! Simulation time plus a fixed set of "active until" timestamps. A flag is on
//! while `now < until`; flags are only ever extended, never switched off, so
//! overlapping triggers of the same effect simply keep the later expiry.

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_COUNT;

/// Named global (and per-player) modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierFlag {
    ReverseControls,
    LowGravity,
    Sticky,
    Turbo,
    Disco,
    SizeSwap,
    HazardShower,
    SlowMotion,
    Shrink,
    Grow,
    TripleJump,
    ControlFlipP1,
    ControlFlipP2,
    PlatformShort,
    PlatformLong,
    PlatformTiny,
}

impl ModifierFlag {
    pub const COUNT: usize = 16;

    pub const ALL: [ModifierFlag; Self::COUNT] = [
        ModifierFlag::ReverseControls,
        ModifierFlag::LowGravity,
        ModifierFlag::Sticky,
        ModifierFlag::Turbo,
        ModifierFlag::Disco,
        ModifierFlag::SizeSwap,
        ModifierFlag::HazardShower,
        ModifierFlag::SlowMotion,
        ModifierFlag::Shrink,
        ModifierFlag::Grow,
        ModifierFlag::TripleJump,
        ModifierFlag::ControlFlipP1,
        ModifierFlag::ControlFlipP2,
        ModifierFlag::PlatformShort,
        ModifierFlag::PlatformLong,
        ModifierFlag::PlatformTiny,
    ];

    /// Flags that only live for the round they were triggered in
    pub const ROUND_SCOPED: [ModifierFlag; 8] = [
        ModifierFlag::Shrink,
        ModifierFlag::Grow,
        ModifierFlag::TripleJump,
        ModifierFlag::ControlFlipP1,
        ModifierFlag::ControlFlipP2,
        ModifierFlag::PlatformShort,
        ModifierFlag::PlatformLong,
        ModifierFlag::PlatformTiny,
    ];

    /// Per-player control flip flag
    pub fn control_flip(player: usize) -> Self {
        assert!(player < PLAYER_COUNT, "invalid player id {player}");
        if player == 0 {
            ModifierFlag::ControlFlipP1
        } else {
            ModifierFlag::ControlFlipP2
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Elapsed simulation time and modifier expiries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierClock {
    now: f32,
    until: [f32; ModifierFlag::COUNT],
}

impl ModifierClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time (seconds)
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Advance simulation time
    pub fn advance(&mut self, dt: f32) {
        self.now += dt.max(0.0);
    }

    pub fn is_active(&self, flag: ModifierFlag) -> bool {
        self.now < self.until[flag.index()]
    }

    /// Expiry timestamp of a flag (0 if never set)
    pub fn until(&self, flag: ModifierFlag) -> f32 {
        self.until[flag.index()]
    }

    /// Push a flag's expiry out to `until` (never pulls it in)
    pub fn extend(&mut self, flag: ModifierFlag, until: f32) {
        let slot = &mut self.until[flag.index()];
        *slot = slot.max(until);
    }

    /// Keep a flag on for at least `duration` seconds from now
    pub fn extend_for(&mut self, flag: ModifierFlag, duration: f32) {
        self.extend(flag, self.now + duration);
    }

    /// Pick `on` while the flag is active, `off` otherwise
    #[inline]
    pub fn pick<T>(&self, flag: ModifierFlag, on: T, off: T) -> T {
        if self.is_active(flag) { on } else { off }
    }

    /// Drop round-scoped modifiers (round reset)
    pub fn clear_round_flags(&mut self) {
        for flag in ModifierFlag::ROUND_SCOPED {
            self.until[flag.index()] = 0.0;
        }
    }

    /// Back to time zero with every flag off (match reset)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unset_flag_is_inactive() {
        let clock = ModifierClock::new();
        for flag in ModifierFlag::ALL {
            assert!(!clock.is_active(flag));
        }
    }

    #[test]
    fn test_flag_expires() {
        let mut clock = ModifierClock::new();
        clock.extend_for(ModifierFlag::Turbo, 1.0);
        assert!(clock.is_active(ModifierFlag::Turbo));
        clock.advance(0.99);
        assert!(clock.is_active(ModifierFlag::Turbo));
        clock.advance(0.02);
        assert!(!clock.is_active(ModifierFlag::Turbo));
    }

    #[test]
    fn test_clear_round_flags_keeps_match_flags() {
        let mut clock = ModifierClock::new();
        clock.extend_for(ModifierFlag::Disco, 5.0);
        clock.extend_for(ModifierFlag::PlatformTiny, 5.0);
        clock.extend_for(ModifierFlag::ControlFlipP2, 5.0);
        clock.clear_round_flags();
        assert!(clock.is_active(ModifierFlag::Disco));
        assert!(!clock.is_active(ModifierFlag::PlatformTiny));
        assert!(!clock.is_active(ModifierFlag::ControlFlipP2));
    }

    #[test]
    fn test_control_flip_maps_players() {
        assert_eq!(ModifierFlag::control_flip(0), ModifierFlag::ControlFlipP1);
        assert_eq!(ModifierFlag::control_flip(1), ModifierFlag::ControlFlipP2);
    }

    #[test]
    #[should_panic(expected = "invalid player id")]
    fn test_control_flip_rejects_third_player() {
        let _ = ModifierFlag::control_flip(2);
    }

    #[test]
    fn test_flag_indices_match_table() {
        for (i, flag) in ModifierFlag::ALL.iter().enumerate() {
            assert_eq!(flag.index(), i);
        }
    }

    proptest! {
        #[test]
        fn extension_is_order_independent(t1 in 0.0f32..100.0, t2 in 0.0f32..100.0) {
            let (lo, hi) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

            let mut forward = ModifierClock::new();
            forward.extend(ModifierFlag::Sticky, lo);
            forward.extend(ModifierFlag::Sticky, hi);

            let mut backward = ModifierClock::new();
            backward.extend(ModifierFlag::Sticky, hi);
            backward.extend(ModifierFlag::Sticky, lo);

            prop_assert_eq!(forward.until(ModifierFlag::Sticky), hi);
            prop_assert_eq!(backward.until(ModifierFlag::Sticky), hi);
        }
    }
}
