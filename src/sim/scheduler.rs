//! Deferred task scheduler
//!
//! Chained chaos steps, confetti bursts and round/match resets are queued as
//! tagged [`DeferredEffect`]s with a fire time. Every task remembers the
//! generation it was scheduled in; bumping the generation turns all pending
//! tasks into no-ops at once. Stale entries are pruned lazily on the next pop.
//!
//! The scheduler runs on frame time, not simulation time: slow-motion does not
//! stretch delays, and it keeps running while physics is frozen between rounds.

use serde::{Deserialize, Serialize};

use super::hazard::HazardKind;

/// What a deferred task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DeferredEffect {
    /// Fling frozen players (second half of "Freeze Release")
    ReleaseFreeze,
    /// Shoot both players off in random directions
    RocketBurst,
    /// Kill the platform's angular velocity
    StopPlatformSpin,
    /// Undo a platform flip
    FlipPlatformBack,
    /// Drop one hazard of a fixed kind
    DropHazard { kind: HazardKind },
    /// Drop one column of a hazard curtain
    CurtainDrop { column: u8, columns: u8 },
    /// Kick both players upward with some sideways noise
    Shockwave,
    /// Teleport both players somewhere in the upper arena
    Blink,
    /// Pull the players toward each other
    MagnetPull,
    /// Celebration particle burst
    Confetti,
    /// Start the next round's countdown
    ResetRound,
    /// Full match reset
    ResetMatch,
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    fire_at: f64,
    seq: u64,
    generation: u64,
    effect: DeferredEffect,
}

/// Generation-tagged delay queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    generation: u64,
    next_seq: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `effect` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, effect: DeferredEffect) {
        let task = ScheduledTask {
            fire_at: self.now + f64::from(delay.max(0.0)),
            seq: self.next_seq,
            generation: self.generation,
            effect,
        };
        self.next_seq += 1;
        self.tasks.push(task);
    }

    /// Cancel everything scheduled so far
    pub fn invalidate_all(&mut self) {
        self.generation += 1;
    }

    /// Advance the scheduler's clock
    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt.max(0.0));
    }

    /// Next due task of the live generation, earliest first (ties in
    /// scheduling order). Re-checks the generation on every call so an effect
    /// that resets the world cancels the rest of the batch.
    pub fn pop_due(&mut self) -> Option<DeferredEffect> {
        let generation = self.generation;
        self.tasks.retain(|t| t.generation == generation);

        let now = self.now;
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fire_at <= now)
            .min_by(|(_, a), (_, b)| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;

        Some(self.tasks.remove(idx).effect)
    }

    /// Number of tasks that can still fire
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.generation == self.generation)
            .count()
    }

    /// Whether any live task carries this effect
    pub fn has_pending(&self, effect: DeferredEffect) -> bool {
        self.tasks
            .iter()
            .any(|t| t.generation == self.generation && t.effect == effect)
    }
}
