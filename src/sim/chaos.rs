//! Chaos director
//!
//! A single countdown drives everything: once it drops inside the warning
//! lead an event is pre-selected and announced, and when it runs out that
//! event fires. Events are plain table entries ([`ChaosEvent`]) composed of
//! modifier extensions, one instant action, an optional hazard cadence change
//! and an optional train of deferred steps.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::ModifierFlag;
use super::clock::ModifierFlag as F;
use super::events::{GameEvent, WHITE};
use super::hazard::HazardKind;
use super::scheduler::DeferredEffect;
use super::scheduler::DeferredEffect as D;
use super::state::World;
use crate::audio::SoundCue;
use crate::tuning::Tuning;
use self::Action as A;

/// Number of distinct table entries
pub const CHAOS_EVENT_COUNT: usize = 49;

/// Time the freeze event adds before the next chaos cycle
const FREEZE_EXTRA_DELAY: f32 = 2.0;

/// Immediate part of a chaos event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    /// Shove everyone sideways in the same direction
    Gust,
    /// Fling everyone straight up
    Launch,
    /// Set the beam spinning either way
    SpinPlatform(f32),
    /// Move everyone somewhere in the upper arena
    Teleport,
    /// Turn downward speed upward
    FlickUp,
    /// Multiply current velocity
    SpeedSurge,
    /// Stop dead and push the next chaos cycle back
    Freeze,
    /// Random heading at high speed
    RandomDirection,
    /// Cosmetic burst for the size rays
    RayPulse,
    SwapPositions,
    /// Mirror one random player's controls
    FlipVictim,
    SpinPlayers,
    /// Pull toward the arena center
    BlackHole,
    AntiGravitySpin,
    /// Stop dead (the rocket fires later)
    Halt,
    /// Name a lucky player, nothing else
    LuckyPlayer,
    /// Blast toward the pivot
    Supernova,
    FlipPlatform,
    CenterSlam,
    FalseAlarm,
    TripleDrop,
}

/// What each deferred step does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Effect(DeferredEffect),
    /// Spring or star, decided when scheduled
    SpringOrStar,
    /// Successive columns of a hazard curtain
    Curtain,
}

/// A train of deferred steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub count: u8,
    /// Delay before the first step
    pub delay: f32,
    /// Gap between steps
    pub interval: f32,
    pub step: Step,
}

/// One row of the chaos table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaosEvent {
    /// Short name shown in the incoming warning
    pub label: &'static str,
    /// Flavor text; `{player}` is replaced by the chosen player's label
    pub message: &'static str,
    pub message_secs: f32,
    /// Modifier flags to extend, with durations
    pub flags: &'static [(ModifierFlag, f32)],
    pub action: Action,
    /// Override for the next ambient hazard spawn
    pub cadence: Option<f32>,
    pub steps: Option<StepPlan>,
}

impl ChaosEvent {
    const fn new(label: &'static str, message: &'static str, message_secs: f32) -> Self {
        Self {
            label,
            message,
            message_secs,
            flags: &[],
            action: Action::None,
            cadence: None,
            steps: None,
        }
    }

    const fn flags(mut self, flags: &'static [(ModifierFlag, f32)]) -> Self {
        self.flags = flags;
        self
    }

    const fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    const fn cadence(mut self, next_spawn: f32) -> Self {
        self.cadence = Some(next_spawn);
        self
    }

    const fn after(mut self, delay: f32, effect: DeferredEffect) -> Self {
        self.steps = Some(StepPlan {
            count: 1,
            delay,
            interval: 0.0,
            step: Step::Effect(effect),
        });
        self
    }

    const fn repeat(mut self, count: u8, interval: f32, step: Step) -> Self {
        self.steps = Some(StepPlan {
            count,
            delay: 0.0,
            interval,
            step,
        });
        self
    }
}


const fn hazard_step(kind: HazardKind) -> Step {
    Step::Effect(D::DropHazard { kind })
}

/// The chaos table, indexed by event id
pub static CHAOS_EVENTS: [ChaosEvent; CHAOS_EVENT_COUNT] = [
    ChaosEvent::new("Controls Reversed", "Controls reversed. Left is right now.", 3.1)
        .flags(&[(F::ReverseControls, 4.4)]),
    ChaosEvent::new("Moon Gravity", "Moon gravity. Float responsibly.", 2.8)
        .flags(&[(F::LowGravity, 5.5)]),
    ChaosEvent::new("Wind Blast", "A wind cannon sneezed on everyone.", 1.7).action(A::Gust),
    ChaosEvent::new("Size Swap", "Size swap. Big vs tiny.", 3.2).flags(&[(F::SizeSwap, 6.2)]),
    ChaosEvent::new("Sticky Platform", "Sticky platform. Good luck moving.", 3.0)
        .flags(&[(F::Sticky, 5.0)]),
    ChaosEvent::new("Turbo Ankles", "TURBO ANKLES.", 2.3).flags(&[(F::Turbo, 5.0)]),
    ChaosEvent::new("Meteor Shower", "Meteor shower! Look up.", 2.3)
        .flags(&[(F::HazardShower, 3.6)]),
    ChaosEvent::new("Disco Physics", "DISCO PHYSICS. Everything bounces wrong.", 2.3)
        .flags(&[(F::Disco, 5.4)]),
    ChaosEvent::new("Bounce Launch", "BOING! Everybody up.", 2.0).action(A::Launch),
    ChaosEvent::new("Platform Spin", "The platform is spinning out.", 2.2)
        .action(A::SpinPlatform(2.5)),
    ChaosEvent::new("Random Teleport", "Teleported. Where even are you?", 1.8)
        .action(A::Teleport),
    ChaosEvent::new("Anti Gravity Flick", "Gravity said no.", 1.9).action(A::FlickUp),
    ChaosEvent::new("Speed Surge", "SPEED SURGE!", 2.0).action(A::SpeedSurge),
    ChaosEvent::new("Freeze Release", "FREEZE! ...and release.", 2.1)
        .action(A::Freeze)
        .after(0.8, D::ReleaseFreeze),
    ChaosEvent::new("Random Direction", "Random direction. Enjoy the ride.", 1.8)
        .action(A::RandomDirection),
    ChaosEvent::new("Oil Spill", "Oil spill! Mind the floor.", 2.2).flags(&[(F::Sticky, 4.5)]),
    ChaosEvent::new("Hazard Storm", "HAZARD STORM!", 2.4)
        .flags(&[(F::HazardShower, 4.0)])
        .cadence(0.15),
    ChaosEvent::new("Shrink Ray", "Shrink ray! Pew pew.", 2.0)
        .flags(&[(F::Shrink, 3.5)])
        .action(A::RayPulse),
    ChaosEvent::new("Grow Ray", "Grow ray! Big doesn't mean better.", 2.0)
        .flags(&[(F::Grow, 3.5)])
        .action(A::RayPulse),
    ChaosEvent::new("Position Swap", "Swap! Sudden identity crisis.", 2.1)
        .action(A::SwapPositions),
    ChaosEvent::new("Control Flip", "{player}'s controls are flipped.", 2.2)
        .action(A::FlipVictim),
    ChaosEvent::new("Spin Frenzy", "SPIN SPIN SPIN", 2.0).action(A::SpinPlayers),
    ChaosEvent::new("Black Hole Pull", "The black hole wants you. NOW.", 2.1)
        .action(A::BlackHole),
    ChaosEvent::new("Slow Motion", "Time slows down...", 2.0).flags(&[(F::SlowMotion, 3.2)]),
    ChaosEvent::new("Tracking Bombs", "TRACKING BOMBS!", 2.3)
        .flags(&[(F::HazardShower, 4.5)])
        .repeat(8, 0.3, hazard_step(HazardKind::Bomb)),
    ChaosEvent::new("Anti Gravity Spin", "Anti-gravity spin.", 2.1).action(A::AntiGravitySpin),
    ChaosEvent::new("Rocket Boost", "ROCKET BOOST! Brace yourselves.", 2.0)
        .action(A::Halt)
        .after(0.6, D::RocketBurst),
    ChaosEvent::new("Lucky Bounce", "{player} has lucky bounce vibes. Or not.", 2.0)
        .action(A::LuckyPlayer),
    ChaosEvent::new("Wild Platform", "The platform is having a breakdown.", 2.2)
        .action(A::SpinPlatform(4.0))
        .after(2.5, D::StopPlatformSpin),
    ChaosEvent::new("Gravity Well", "Gravity well + hazards.", 2.4)
        .flags(&[(F::LowGravity, 4.0), (F::HazardShower, 4.0)])
        .cadence(0.2),
    ChaosEvent::new("Triple Jump", "Triple jump! Basically flying.", 2.1)
        .flags(&[(F::TripleJump, 5.0)]),
    ChaosEvent::new("Rainbow Madness", "RAINBOW MADNESS!", 2.2).flags(&[(F::Disco, 6.0)]),
    ChaosEvent::new("Platform Shrink", "Platform shrinking!", 2.1)
        .flags(&[(F::PlatformShort, 4.0)]),
    ChaosEvent::new("Platform Expand", "Platform expanding. More runway.", 2.1)
        .flags(&[(F::PlatformLong, 4.0)]),
    ChaosEvent::new("Sticky Slow Mo", "Sticky slow-mo.", 2.2)
        .flags(&[(F::Sticky, 3.5), (F::SlowMotion, 3.5)]),
    ChaosEvent::new("Meteor Attack", "METEOR ATTACK!", 2.4)
        .repeat(12, 0.15, hazard_step(HazardKind::Meteor)),
    ChaosEvent::new("Supernova Wind", "SUPERNOVA WIND!", 2.1).action(A::Supernova),
    ChaosEvent::new("Platform Flip", "Platform flipped!", 2.0)
        .action(A::FlipPlatform)
        .after(3.5, D::FlipPlatformBack),
    ChaosEvent::new("Bounce Storm", "BOUNCE STORM!", 2.2).repeat(10, 0.12, Step::SpringOrStar),
    ChaosEvent::new("Crate Rain", "CRATE DROP!", 2.1).repeat(8, 0.15, hazard_step(HazardKind::Crate)),
    ChaosEvent::new("Shockwave Pulses", "Triple shockwave!", 2.3)
        .repeat(3, 0.36, Step::Effect(D::Shockwave)),
    ChaosEvent::new("Skyfall Overload", "SKYFALL OVERLOAD!", 2.2)
        .flags(&[(F::HazardShower, 5.2)])
        .cadence(0.12),
    ChaosEvent::new("Center Slam", "CENTER SLAM!", 2.1).action(A::CenterSlam),
    ChaosEvent::new("Mirror Drift", "Mirror drift. Opposite day for both.", 2.2)
        .flags(&[(F::ControlFlipP1, 3.2), (F::ControlFlipP2, 3.2)]),
    ChaosEvent::new("Hazard Curtain", "HAZARD CURTAIN!", 2.3).repeat(12, 0.07, Step::Curtain),
    ChaosEvent::new("Tiny Turbo Beam", "TINY TURBO BEAM.", 2.3)
        .flags(&[(F::PlatformTiny, 3.6), (F::Turbo, 4.6)]),
    ChaosEvent::new("Blink Storm", "BLINK STORM!", 2.2).repeat(4, 0.24, Step::Effect(D::Blink)),
    ChaosEvent::new("Magnet Duel", "MAGNET DUEL!", 2.3)
        .repeat(6, 0.18, Step::Effect(D::MagnetPull)),
    ChaosEvent::new("False Alarm", "False alarm. You panicked for nothing.", 1.7)
        .action(A::FalseAlarm),
];

/// Used for any id past the table
pub static FALLBACK_EVENT: ChaosEvent =
    ChaosEvent::new("Chaos Spike", "Triple hazard drop! Classic.", 1.8).action(A::TripleDrop);

/// Table row for `id`, falling back for unknown ids
pub fn event(id: u8) -> &'static ChaosEvent {
    CHAOS_EVENTS.get(usize::from(id)).unwrap_or(&FALLBACK_EVENT)
}

/// Timer, warning and pending selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaosDirector {
    /// Seconds until the next event fires
    pub timer: f32,
    /// How early the next event is announced
    pub warning_lead: f32,
    /// Pre-selected event id
    pub pending: Option<u8>,
    /// Seconds shown on the incoming warning
    pub warning_time: f32,
}

impl ChaosDirector {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            timer: tuning.first_chaos_delay,
            warning_lead: tuning.warning_lead_min,
            pending: None,
            warning_time: 0.0,
        }
    }

    /// Start of match: first event after the initial delay
    pub fn reset(&mut self, tuning: &Tuning, rng: &mut impl Rng) {
        self.timer = tuning.first_chaos_delay;
        self.warning_lead = random_between(rng, tuning.warning_lead_min, tuning.warning_lead_max);
        self.clear_warning();
    }

    /// Drop any announced event
    pub fn clear_warning(&mut self) {
        self.pending = None;
        self.warning_time = 0.0;
    }

    /// Run the timer. Returns the id of an event announced this tick.
    pub fn advance(&mut self, dt: f32, rng: &mut impl Rng) -> Option<u8> {
        self.timer -= dt;

        let mut announced = None;
        if self.pending.is_none() && self.timer > 0.0 && self.timer <= self.warning_lead {
            let id = rng.random_range(0..CHAOS_EVENT_COUNT) as u8;
            self.pending = Some(id);
            announced = Some(id);
        }
        if self.pending.is_some() {
            self.warning_time = self.timer.max(0.0);
        }
        announced
    }

    /// If the timer ran out: the event to fire now. Re-arms the timer.
    pub fn take_due(&mut self, tuning: &Tuning, rng: &mut impl Rng) -> Option<u8> {
        if self.timer > 0.0 {
            return None;
        }
        let id = match self.pending.take() {
            Some(id) => id,
            None => rng.random_range(0..CHAOS_EVENT_COUNT) as u8,
        };
        self.rearm(tuning, rng);
        Some(id)
    }

    /// Fresh interval and warning lead, dropping any announced event
    pub fn rearm(&mut self, tuning: &Tuning, rng: &mut impl Rng) {
        self.clear_warning();
        self.timer = random_between(rng, tuning.chaos_interval_min, tuning.chaos_interval_max);
        self.warning_lead = random_between(rng, tuning.warning_lead_min, tuning.warning_lead_max);
    }

    /// Announced event and seconds left, while the warning is up
    pub fn warning(&self) -> Option<(u8, f32)> {
        match self.pending {
            Some(id) if self.warning_time > 0.0 => Some((id, self.warning_time)),
            _ => None,
        }
    }
}

fn random_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min).max(0.0)
}

fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) { -1.0 } else { 1.0 }
}

/// Fire chaos event `id` (unknown ids use the fallback)
pub fn trigger(world: &mut World, id: u8) {
    let entry = event(id);
    log::debug!("chaos event {} fired: {}", id, entry.label);

    world.events.sound(SoundCue::ChaosFired { id });
    world.events.push(GameEvent::ChaosFired {
        id,
        label: entry.label.to_string(),
    });

    for &(flag, duration) in entry.flags {
        world.clock.extend_for(flag, duration);
    }
    world.platform.sync_length(&world.clock);

    let chosen = apply_action(world, entry.action);

    if let Some(next_spawn) = entry.cadence {
        world.hazards.set_cadence(next_spawn);
    }

    if let Some(plan) = entry.steps {
        schedule_steps(world, &plan);
    }

    let text = match chosen {
        Some(player) => entry.message.replace("{player}", &world.players[player].label),
        None => entry.message.to_string(),
    };
    world.show_message(text, entry.message_secs);
}

fn schedule_steps(world: &mut World, plan: &StepPlan) {
    for i in 0..plan.count {
        let effect = match plan.step {
            Step::Effect(effect) => effect,
            Step::SpringOrStar => {
                let kind = if world.rng.random_bool(0.5) {
                    HazardKind::Spring
                } else {
                    HazardKind::Star
                };
                D::DropHazard { kind }
            }
            Step::Curtain => D::CurtainDrop {
                column: i,
                columns: plan.count,
            },
        };
        world
            .scheduler
            .schedule(plan.delay + f32::from(i) * plan.interval, effect);
    }
}

/// Instant part of an event. Returns the player it singled out, if any.
fn apply_action(world: &mut World, action: Action) -> Option<usize> {
    let arena = world.arena;
    let pivot = world.platform.pivot;

    match action {
        A::None => {}
        A::Gust => {
            let gust = random_sign(&mut world.rng) * (260.0 + world.rng.random::<f32>() * 240.0);
            for p in &mut world.players {
                p.vel.x += gust;
            }
        }
        A::Launch => {
            for p in &mut world.players {
                p.vel.y = -650.0;
                world.events.particles(p.pos, p.color, 15, 350.0);
                world.events.sound(SoundCue::Launch);
            }
        }
        A::SpinPlatform(speed) => {
            world.platform.angular_vel = random_sign(&mut world.rng) * speed;
        }
        A::Teleport => {
            for p in &mut world.players {
                p.pos = Vec2::new(
                    world.rng.random::<f32>() * arena.x,
                    world.rng.random::<f32>() * arena.y * 0.4,
                );
                world.events.particles(p.pos, p.color, 20, 400.0);
                world.events.sound(SoundCue::Teleport);
            }
        }
        A::FlickUp => {
            for p in &mut world.players {
                p.vel.y = -p.vel.y.abs() * 0.8;
            }
        }
        A::SpeedSurge => {
            for p in &mut world.players {
                p.vel *= Vec2::new(1.8, 1.5);
            }
        }
        A::Freeze => {
            world.chaos.timer += FREEZE_EXTRA_DELAY;
            for p in &mut world.players {
                p.vel = Vec2::ZERO;
            }
        }
        A::RandomDirection => {
            for p in &mut world.players {
                let heading = world.rng.random::<f32>() * TAU;
                let speed = 350.0 + world.rng.random::<f32>() * 250.0;
                p.vel = Vec2::from_angle(heading) * speed;
                world.events.particles(p.pos, p.color, 12, 280.0);
            }
        }
        A::RayPulse => {
            for p in &world.players {
                world.events.particles(p.pos, WHITE, 10, 200.0);
            }
        }
        A::SwapPositions => {
            let [a, b] = &mut world.players;
            std::mem::swap(&mut a.pos, &mut b.pos);
            for p in &world.players {
                world.events.particles(p.pos, p.color, 15, 300.0);
            }
        }
        A::FlipVictim => {
            let victim = usize::from(world.rng.random_bool(0.5));
            world.clock.extend_for(ModifierFlag::control_flip(victim), 4.0);
            return Some(victim);
        }
        A::SpinPlayers => {
            for p in &mut world.players {
                p.spin_vel = random_sign(&mut world.rng) * 8.0;
            }
        }
        A::BlackHole => {
            let center = arena * 0.5;
            for p in &mut world.players {
                let delta = center - p.pos;
                let dist = delta.length() + 1.0;
                p.vel += delta / dist * 600.0;
            }
        }
        A::AntiGravitySpin => {
            for p in &mut world.players {
                p.vel.y = -p.vel.y.abs() * 1.2;
                p.spin_vel = random_sign(&mut world.rng) * 6.0;
            }
        }
        A::Halt => {
            for p in &mut world.players {
                p.vel = Vec2::ZERO;
            }
        }
        A::LuckyPlayer => {
            return Some(usize::from(world.rng.random_bool(0.5)));
        }
        A::Supernova => {
            for p in &mut world.players {
                let heading = (pivot - p.pos).to_angle();
                p.vel += Vec2::new(heading.cos() * 800.0, heading.sin() * 600.0);
                world.events.particles(p.pos, p.color, 25, 450.0);
            }
        }
        A::FlipPlatform => {
            world.platform.angle = -world.platform.angle;
        }
        A::CenterSlam => {
            for p in &mut world.players {
                let dir = crate::direction_to(p.pos, pivot);
                p.vel += dir * Vec2::new(900.0, 800.0);
            }
            world.events.shake(7.0);
        }
        A::FalseAlarm => {
            world.events.shake(2.5);
            for p in &world.players {
                world.events.particles(p.pos, WHITE, 9, 140.0);
            }
        }
        A::TripleDrop => {
            for _ in 0..3 {
                world
                    .hazards
                    .spawn_random(&mut world.rng, arena.x, world.tuning.hazard_lifetime);
            }
        }
    }
    None
}

/// Run one deferred chaos step
pub(crate) fn apply_step(world: &mut World, effect: DeferredEffect) {
    let arena = world.arena;

    match effect {
        D::ReleaseFreeze => {
            for p in &mut world.players {
                p.vel.x += (world.rng.random::<f32>() - 0.5) * 600.0;
                p.vel.y -= 400.0;
            }
        }
        D::RocketBurst => {
            for p in &mut world.players {
                let heading = world.rng.random::<f32>() * TAU;
                p.vel = Vec2::from_angle(heading) * 700.0;
                world.events.particles(p.pos, p.color, 20, 400.0);
                world.events.sound(SoundCue::Rocket);
            }
        }
        D::StopPlatformSpin => world.platform.angular_vel = 0.0,
        D::FlipPlatformBack => world.platform.angle = -world.platform.angle,
        D::DropHazard { kind } => {
            world
                .hazards
                .spawn(kind, &mut world.rng, arena.x, world.tuning.hazard_lifetime);
        }
        D::CurtainDrop { column, columns } => {
            world.hazards.spawn_curtain(column, columns, arena.x);
        }
        D::Shockwave => {
            for p in &mut world.players {
                p.vel.y -= 320.0;
                p.vel.x += (world.rng.random::<f32>() - 0.5) * 380.0;
            }
            world.events.shake(5.0);
        }
        D::Blink => {
            for p in &mut world.players {
                p.pos = Vec2::new(
                    arena.x * (0.18 + world.rng.random::<f32>() * 0.64),
                    arena.y * (0.12 + world.rng.random::<f32>() * 0.34),
                );
                p.vel *= 0.4;
                world.events.particles(p.pos, p.color, 14, 300.0);
            }
            world.events.shake(4.0);
        }
        D::MagnetPull => {
            let delta = world.players[1].pos - world.players[0].pos;
            let dist = delta.length();
            let dir = if dist > 0.0 { delta / dist } else { delta };
            let pull = dir * Vec2::new(320.0, 320.0 * 0.8);
            world.players[0].vel += pull;
            world.players[1].vel -= pull;
        }
        D::Confetti | D::ResetRound | D::ResetMatch => {
            log::warn!("{:?} is not a chaos step", effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_table_labels_are_unique() {
        let mut labels: Vec<_> = CHAOS_EVENTS.iter().map(|e| e.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), CHAOS_EVENT_COUNT);
    }

    #[test]
    fn test_unknown_id_falls_back() {
        assert_eq!(event(49).action, Action::TripleDrop);
        assert_eq!(event(255).label, "Chaos Spike");
        assert_eq!(event(19).action, Action::SwapPositions);
    }

    #[test]
    fn test_step_trains_stay_within_twelve() {
        for e in CHAOS_EVENTS.iter() {
            if let Some(plan) = e.steps {
                assert!((1..=12).contains(&plan.count), "{}", e.label);
            }
        }
    }

    #[test]
    fn test_warning_then_fire() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut chaos = ChaosDirector::new(&tuning);
        chaos.timer = 3.0;
        chaos.warning_lead = 2.5;

        assert_eq!(chaos.advance(0.4, &mut rng), None);
        assert!(chaos.warning().is_none());

        let announced = chaos.advance(0.2, &mut rng).expect("inside warning lead");
        assert!(usize::from(announced) < CHAOS_EVENT_COUNT);
        let (id, secs) = chaos.warning().expect("warning is up");
        assert_eq!(id, announced);
        assert!((secs - 2.4).abs() < 1e-4);

        // no re-selection while pending
        assert_eq!(chaos.advance(1.0, &mut rng), None);
        assert_eq!(chaos.take_due(&tuning, &mut rng), None);

        chaos.advance(1.5, &mut rng);
        assert_eq!(chaos.take_due(&tuning, &mut rng), Some(announced));
        assert!(chaos.pending.is_none());
        assert!(chaos.timer >= tuning.chaos_interval_min && chaos.timer <= tuning.chaos_interval_max);
        assert!(chaos.warning_lead >= tuning.warning_lead_min);
    }

    #[test]
    fn test_big_step_skips_warning_but_still_fires() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut chaos = ChaosDirector::new(&tuning);
        chaos.timer = 0.01;
        assert_eq!(chaos.advance(0.02, &mut rng), None);
        let id = chaos.take_due(&tuning, &mut rng).expect("timer expired");
        assert!(usize::from(id) < CHAOS_EVENT_COUNT);
    }
}
