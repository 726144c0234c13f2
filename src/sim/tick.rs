//! Per-frame simulation step
//!
//! Order within a tick:
//! 1. Clamp dt, handle rematch, fire due deferred effects (frame time)
//! 2. Countdown / warning cues, flavor timers
//! 3. If the round is active (sim time, slowed by slow-motion):
//!    platform, players, hazards, round-end check, chaos dispatch

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chaos;
use super::collision::{platform_contact, resolve_ball_pair};
use super::clock::ModifierFlag;
use super::events::{GameEvent, WHITE};
use super::flavor;
use super::hazard::{HazardHit, HazardKind};
use super::player::{ControlIntent, JumpKind};
use super::round::RoundCallout;
use super::scheduler::DeferredEffect;
use super::state::{World, warning_secs};
use crate::audio::SoundCue;
use crate::consts::*;
use crate::sanitize_dt;

/// Falling faster than this below the danger line arms a clutch-save window
const DANGER_FALL_SPEED: f32 = 90.0;
const DANGER_DEPTH: f32 = 120.0;
const DANGER_WINDOW: f32 = 0.85;
const CLUTCH_MIN_DANGER: f32 = 0.16;
const CLUTCH_COOLDOWN: f32 = 2.1;
const HIT_COMMENT_CHANCE: f64 = 0.22;
const HIT_COMMENT_COOLDOWN: f32 = 1.1;
const CONFETTI_BURSTS: u8 = 6;
const CONFETTI_INTERVAL: f32 = 0.18;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Held controls, by player id
    pub players: [ControlIntent; PLAYER_COUNT],
    /// Start a new match right away once a winner is shown
    pub rematch: bool,
}

/// Advance the world by `dt` seconds of frame time
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    let dt = sanitize_dt(dt, world.tuning.max_dt);

    if input.rematch && world.round.winner.is_some() {
        log::info!("rematch requested");
        world.reset_match();
    }

    world.scheduler.advance(dt);
    while let Some(effect) = world.scheduler.pop_due() {
        world.apply_deferred(effect);
    }

    update_timers(world, dt);

    if world.round.advance_countdown(dt) {
        log::info!("round {} started", world.round.round + 1);
        world.events.push(GameEvent::RoundStarted {
            round: world.round.round + 1,
        });
    }
    countdown_cues(world);

    if !world.round.is_active() {
        return;
    }

    let dt = dt * world
        .clock
        .pick(ModifierFlag::SlowMotion, world.tuning.slow_motion_scale, 1.0);

    world.clock.advance(dt);
    world.platform.sync_length(&world.clock);

    if let Some(id) = world.chaos.advance(dt, &mut world.rng) {
        log::debug!("chaos warning: {} ({})", id, chaos::event(id).label);
    }
    warning_cues(world);

    let bodies = [world.players[0].pos, world.players[1].pos];
    world.platform.update(dt, &bodies);

    step_players(world, input, dt);
    step_hazards(world, dt);
    check_round_end(world);

    // A round that just ended takes no more chaos
    if world.round.is_active() {
        if let Some(id) = world.chaos.take_due(&world.tuning, &mut world.rng) {
            world.last_warning_secs = 0;
            chaos::trigger(world, id);
        }
    }
}

fn update_timers(world: &mut World, dt: f32) {
    world.hit_comment_cd = (world.hit_comment_cd - dt).max(0.0);
    if let Some(message) = &mut world.message {
        message.remaining -= dt;
        if message.remaining <= 0.0 {
            world.message = None;
        }
    }
}

fn countdown_cues(world: &mut World) {
    match world.round.countdown_digit() {
        Some(digit) => {
            if digit != world.last_countdown_digit {
                world.last_countdown_digit = digit;
                world.events.sound(SoundCue::CountdownTick { n: digit });
            }
        }
        None => {
            if world.last_countdown_digit != 0 {
                world.last_countdown_digit = 0;
                world.events.sound(SoundCue::CountdownGo);
            }
        }
    }
}

fn warning_cues(world: &mut World) {
    match world.chaos.warning() {
        Some((id, time)) => {
            let secs = warning_secs(time);
            if secs != world.last_warning_secs {
                world.last_warning_secs = secs;
                world.events.sound(SoundCue::WarningTick { n: secs });
                world.events.push(GameEvent::ChaosWarning {
                    id,
                    label: chaos::event(id).label.to_string(),
                    secs,
                });
            }
        }
        None => world.last_warning_secs = 0,
    }
}

/// Controls, integration, beam contact and the ball-ball bump
fn step_players(world: &mut World, input: &TickInput, dt: f32) {
    for player in &mut world.players {
        player.sync_modifiers(&world.clock);
    }

    let jump_dir = world.platform.up();
    let turbo = world.clock.pick(ModifierFlag::Turbo, TURBO_MULTIPLIER, 1.0);
    let restitution = world.clock.pick(
        ModifierFlag::Disco,
        PLATFORM_RESTITUTION_DISCO,
        PLATFORM_RESTITUTION,
    );
    let danger_line = world.platform.pivot.y + DANGER_DEPTH;

    for id in 0..PLAYER_COUNT {
        let trailing = world.round.scores[1 - id] >= world.round.scores[id] + COMEBACK_DEFICIT;
        let boost = turbo * if trailing { COMEBACK_MULTIPLIER } else { 1.0 };

        let player = &mut world.players[id];
        player.timers.advance(dt);

        let jumped = player.apply_control_intent(dt, input.players[id], &world.clock, boost, jump_dir);
        if let Some(kind) = jumped {
            world.challenge.record_jump(id);
            world.events.sound(match kind {
                JumpKind::Ground => SoundCue::Jump,
                JumpKind::Air => SoundCue::AirJump,
            });
            world.events.shake(1.4);
            world.events.particles(
                player.pos + Vec2::new(0.0, player.radius * 0.8),
                WHITE,
                8,
                160.0,
            );
        }

        player.integrate(dt, &world.clock);

        if !player.grounded {
            world.challenge.record_airtime(id, dt);
        }
        if player.pos.y > danger_line && player.vel.y > DANGER_FALL_SPEED {
            player.timers.danger = player.timers.danger.max(DANGER_WINDOW);
        }

        let contact = platform_contact(
            &world.platform,
            player.pos,
            player.vel,
            player.radius,
            player.spin_vel,
            restitution,
        );
        player.settle(contact);
        if let Some(contact) = contact {
            if player.take_landing_sound(contact.impact) {
                world.events.sound(SoundCue::Landing {
                    impact: contact.impact,
                });
            }
        }

        let mut clutch = false;
        if player.grounded {
            if player.timers.danger > CLUTCH_MIN_DANGER && player.timers.near_miss <= 0.0 {
                player.timers.near_miss = CLUTCH_COOLDOWN;
                clutch = true;
            }
            player.timers.danger = 0.0;
        }

        player.advance_spin(dt);
        player.bounce_off_walls(world.arena.x);
        player.record_trail();

        if clutch {
            clutch_save(world, id);
        }
    }

    bump_players(world);
}

fn clutch_save(world: &mut World, id: usize) {
    let player = &world.players[id];
    let burst_at = player.pos + Vec2::new(0.0, player.radius * 0.4);
    let text = flavor::line(&mut world.rng, flavor::CLUTCH_SAVE, &player.label, "", "");

    world.events.sound(SoundCue::NearMiss);
    world.events.shake(3.2);
    world.events.particles(burst_at, WHITE, 10, 180.0);
    world.events.flash(WHITE, 0.07);
    world.show_message(text, 1.05);
}

fn bump_players(world: &mut World) {
    let restitution = world
        .clock
        .pick(ModifierFlag::Disco, BALL_RESTITUTION_DISCO, BALL_RESTITUTION);

    let mut a = world.players[0].body();
    let mut b = world.players[1].body();
    let Some(impulse) = resolve_ball_pair(&mut a, &mut b, restitution) else {
        return;
    };
    world.players[0].set_body(a);
    world.players[1].set_body(b);

    if impulse > BIG_IMPACT_IMPULSE {
        world.challenge.record_impact(impulse);
        world.events.shake((impulse * 0.015).min(7.0));
        world
            .events
            .particles((a.pos + b.pos) * 0.5, [0xd8, 0xf4, 0xff], 14, 230.0);
        world.events.sound(SoundCue::BigImpact { impulse });
        world.events.flash([220, 244, 255], 0.06);
    }
}

fn step_hazards(world: &mut World, dt: f32) {
    let bodies = [
        (world.players[0].pos, world.players[0].radius),
        (world.players[1].pos, world.players[1].radius),
    ];
    let hits = world.hazards.update(
        dt,
        &world.clock,
        &mut world.rng,
        world.arena,
        world.tuning.hazard_lifetime,
        &bodies,
    );

    for hit in hits {
        hazard_hit(world, &hit);
    }
}

fn hazard_hit(world: &mut World, hit: &HazardHit) {
    world.players[hit.player].take_hazard_hit(hit, &mut world.rng);
    world.challenge.record_hazard_hit(hit.player);

    let (shake, flash) = match hit.kind {
        HazardKind::Bomb => (7.0, [255, 210, 120]),
        HazardKind::Meteor => (8.0, [255, 128, 64]),
        HazardKind::Crate => (7.2, WHITE),
        HazardKind::Spike => (4.5, [234, 70, 255]),
        HazardKind::Ice => (4.5, [120, 225, 255]),
        _ => (4.5, WHITE),
    };
    let force = match hit.kind {
        HazardKind::Bomb => 420.0,
        HazardKind::Meteor => 500.0,
        _ => 280.0,
    };
    world.events.shake(shake);
    world.events.flash(flash, 0.08);
    world.events.particles(hit.pos, hit.kind.debris_color(), 18, force);
    world.events.sound(SoundCue::HazardHit { kind: hit.kind });

    if world.hit_comment_cd <= 0.0 && world.rng.random_bool(HIT_COMMENT_CHANCE) {
        let label = world.players[hit.player].label.clone();
        let text = flavor::line(&mut world.rng, flavor::HAZARD_HIT, &label, "", "");
        world.show_message(text, 0.95);
        world.hit_comment_cd = HIT_COMMENT_COOLDOWN;
    }
}

/// Active -> RoundOver/MatchOver once someone falls below the arena
fn check_round_end(world: &mut World) {
    let fall_line = world.fall_line();
    let loser = (0..PLAYER_COUNT)
        .rev()
        .find(|&id| world.players[id].pos.y > fall_line);
    let Some(loser) = loser else {
        return;
    };

    // An event due this tick is dropped with the round; the next one gets a
    // full warning
    if world.chaos.timer <= 0.0 {
        world.chaos.rearm(&world.tuning, &mut world.rng);
    } else {
        world.chaos.clear_warning();
    }
    world.last_warning_secs = 0;

    let outcome = world.round.finish_round(loser);
    let winner = outcome.winner;
    let challenge_done = world.challenge.achieved(winner);
    let callout = world.round.callout(&outcome, challenge_done);

    let winner_label = world.players[winner].label.clone();
    let loser_label = world.players[loser].label.clone();

    log::info!(
        "round {} to {} ({}-{})",
        world.round.round,
        winner_label,
        world.round.scores[0],
        world.round.scores[1]
    );
    world.events.push(GameEvent::ScoreChanged {
        scores: world.round.scores,
    });
    world.events.push(GameEvent::RoundEnded {
        winner,
        loser,
        scores: world.round.scores,
    });
    world.events.sound(SoundCue::RoundWin { winner });

    if callout == RoundCallout::MatchWon {
        log::info!("{} wins the match", winner_label);
        world.events.push(GameEvent::MatchWon { winner });
        world.events.sound(SoundCue::MatchWin);
        let text = flavor::line(
            &mut world.rng,
            flavor::MATCH_FINISHER,
            &winner_label,
            &winner_label,
            &loser_label,
        );
        world.show_message(text, 3.5);
        world.events.flash([255, 235, 140], 0.18);
        for i in 0..CONFETTI_BURSTS {
            world
                .scheduler
                .schedule(f32::from(i) * CONFETTI_INTERVAL, DeferredEffect::Confetti);
        }
        world
            .scheduler
            .schedule(world.tuning.match_reset_delay, DeferredEffect::ResetMatch);
        return;
    }

    let text = match callout {
        RoundCallout::ChallengeDone => {
            let done = world.challenge.kind.completion();
            world.events.push(GameEvent::ChallengeCompleted {
                player: winner,
                text: done.to_string(),
            });
            let pos = world.players[winner].pos;
            world.events.particles(pos, [0xff, 0xf2, 0xa6], 22, 260.0);
            world.events.sound(SoundCue::ChallengeComplete);
            world.events.flash([255, 245, 190], 0.1);
            format!("{}: {}", winner_label, done)
        }
        RoundCallout::Comeback => format!("{} starts the comeback arc.", winner_label),
        RoundCallout::Streak(n) => {
            world.events.sound(SoundCue::Streak);
            format!("{} is ON FIRE x{}!", winner_label, n)
        }
        RoundCallout::MatchPoint => {
            format!("{} on MATCH POINT.", winner_label)
        }
        RoundCallout::Tied => format!(
            "All tied {}-{}. Getting spicy.",
            world.round.scores[0], world.round.scores[1]
        ),
        RoundCallout::Taunt | RoundCallout::MatchWon => flavor::line(
            &mut world.rng,
            flavor::ROUND_TAUNT,
            &winner_label,
            &winner_label,
            &loser_label,
        ),
    };
    world.show_message(text, 1.65);
    world.events.flash(WHITE, 0.07);
    world
        .scheduler
        .schedule(world.tuning.round_reset_delay, DeferredEffect::ResetRound);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::challenge::ChallengeKind;
    use crate::sim::hazard::Hazard;
    use crate::sim::round::Phase;
    use crate::tuning::Tuning;

    fn world() -> World {
        World::new(12345, Tuning::default())
    }

    /// Tick with no input until play starts
    fn run_countdown(world: &mut World) {
        let input = TickInput::default();
        for _ in 0..1000 {
            if world.round.is_active() {
                return;
            }
            tick(world, &input, SIM_DT);
        }
        panic!("countdown never finished");
    }

    fn run(world: &mut World, input: &TickInput, secs: f32) {
        let steps = (secs / SIM_DT).round() as usize;
        for _ in 0..steps {
            tick(world, input, SIM_DT);
        }
    }

    #[test]
    fn test_countdown_freezes_physics() {
        let mut w = world();
        let start = w.players[0].pos;
        run(&mut w, &TickInput::default(), 1.0);
        assert_eq!(w.round.phase, Phase::Countdown);
        assert_eq!(w.players[0].pos, start);
        assert_eq!(w.clock.now(), 0.0);

        let events = w.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::CountdownTick { n: 3 })));
        assert!(events.contains(&GameEvent::Sound(SoundCue::CountdownTick { n: 2 })));
    }

    #[test]
    fn test_symmetric_spawn_stays_grounded() {
        let mut w = world();
        run_countdown(&mut w);
        assert!(w.drain_events().contains(&GameEvent::Sound(SoundCue::CountdownGo)));

        run(&mut w, &TickInput::default(), 0.5);

        assert_eq!(w.round.phase, Phase::Active);
        assert!(w.players.iter().all(|p| p.grounded));
        assert!(w.platform.angle.abs() < 1e-3);
        assert_eq!(w.round.scores, [0, 0]);
    }

    #[test]
    fn test_position_swap_keeps_identity() {
        let mut w = world();
        w.players[0].pos = Vec2::new(100.0, 200.0);
        w.players[1].pos = Vec2::new(300.0, 150.0);
        let colors = [w.players[0].color, w.players[1].color];

        chaos::trigger(&mut w, 19);

        assert_eq!(w.players[0].pos, Vec2::new(300.0, 150.0));
        assert_eq!(w.players[1].pos, Vec2::new(100.0, 200.0));
        assert_eq!([w.players[0].color, w.players[1].color], colors);
        assert_eq!([w.players[0].id, w.players[1].id], [0, 1]);
    }

    #[test]
    fn test_no_jump_challenge() {
        let mut w = world();
        w.challenge.start(ChallengeKind::NoJump);
        run_countdown(&mut w);
        run(&mut w, &TickInput::default(), 0.3);

        assert!(w.challenge.achieved(0));

        let jump = TickInput {
            players: [
                ControlIntent {
                    jump: true,
                    ..Default::default()
                },
                ControlIntent::default(),
            ],
            rematch: false,
        };
        tick(&mut w, &jump, SIM_DT);

        assert_eq!(w.challenge.stats[0].jumps, 1);
        assert!(!w.challenge.achieved(0));
        assert!(w.challenge.achieved(1));
    }

    #[test]
    fn test_fall_ends_round_for_survivor() {
        let mut w = world();
        run_countdown(&mut w);
        w.round.streaks = [3, 0];
        w.players[0].pos = Vec2::new(640.0, w.fall_line() + 50.0);

        tick(&mut w, &TickInput::default(), SIM_DT);

        assert_eq!(w.round.phase, Phase::RoundOver);
        assert_eq!(w.round.scores, [0, 1]);
        assert_eq!(w.round.streaks, [0, 1]);
        assert!(w.chaos.pending.is_none());
        assert!(w.scheduler.has_pending(DeferredEffect::ResetRound));

        // next countdown after the round reset delay
        run(&mut w, &TickInput::default(), 1.0);
        assert_eq!(w.round.phase, Phase::Countdown);
        assert_eq!(w.round.scores, [0, 1]);
    }

    #[test]
    fn test_match_win_schedules_single_reset() {
        let mut w = world();
        run_countdown(&mut w);
        w.round.scores = [4, 2];
        w.players[1].pos = Vec2::new(640.0, w.fall_line() + 50.0);

        tick(&mut w, &TickInput::default(), SIM_DT);

        assert_eq!(w.round.winner, Some(0));
        assert_eq!(w.round.phase, Phase::MatchOver);
        assert_eq!(w.round.scores, [5, 2]);
        let resets = w.scheduler.pending() - usize::from(CONFETTI_BURSTS);
        assert_eq!(resets, 1);
        assert!(w.scheduler.has_pending(DeferredEffect::ResetMatch));

        // frozen until the reset: nobody scores again
        w.players[0].pos = Vec2::new(640.0, w.fall_line() + 50.0);
        run(&mut w, &TickInput::default(), 3.5);
        assert_eq!(w.round.scores, [5, 2]);
        assert_eq!(w.round.winner, Some(0));

        run(&mut w, &TickInput::default(), 1.0);
        assert_eq!(w.round.scores, [0, 0]);
        assert_eq!(w.round.winner, None);
        assert_eq!(w.round.phase, Phase::Countdown);
    }

    #[test]
    fn test_rematch_skips_the_wait() {
        let mut w = world();
        run_countdown(&mut w);
        w.round.scores = [2, 4];
        w.players[0].pos = Vec2::new(640.0, w.fall_line() + 50.0);
        tick(&mut w, &TickInput::default(), SIM_DT);
        assert_eq!(w.round.winner, Some(1));

        let rematch = TickInput {
            rematch: true,
            ..Default::default()
        };
        tick(&mut w, &rematch, SIM_DT);
        assert_eq!(w.round.winner, None);
        assert_eq!(w.round.scores, [0, 0]);
        assert!(!w.scheduler.has_pending(DeferredEffect::ResetMatch));
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let mut w = world();
        run_countdown(&mut w);
        let before = w.clock.now();
        tick(&mut w, &TickInput::default(), 5.0);
        assert!(w.clock.now() - before <= w.tuning.max_dt + 1e-6);

        let now = w.clock.now();
        tick(&mut w, &TickInput::default(), -1.0);
        tick(&mut w, &TickInput::default(), f32::NAN);
        assert_eq!(w.clock.now(), now);
    }

    #[test]
    fn test_chaos_warning_then_fire() {
        let mut w = world();
        run_countdown(&mut w);
        w.chaos.timer = 2.0;
        w.chaos.warning_lead = 2.5;

        tick(&mut w, &TickInput::default(), SIM_DT);
        let pending = w.chaos.pending.expect("warning selected");
        let events = w.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ChaosWarning { id, secs: 2, .. } if *id == pending)));

        w.chaos.timer = 0.001;
        tick(&mut w, &TickInput::default(), SIM_DT);
        let events = w.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ChaosFired { id, .. } if *id == pending)));
        assert!(w.chaos.pending.is_none());
        assert!(w.chaos.timer > 0.0);
    }

    #[test]
    fn test_curtain_steps_cancelled_by_round_reset() {
        let mut w = world();
        run_countdown(&mut w);
        w.chaos.timer = 10.0;
        chaos::trigger(&mut w, 44);
        assert_eq!(w.scheduler.pending(), 12);

        w.reset_round();
        run(&mut w, &TickInput::default(), 1.0);
        assert!(w.hazards.hazards.is_empty());
    }

    #[test]
    fn test_freeze_pushes_next_chaos_back() {
        let mut w = world();
        run_countdown(&mut w);
        w.players[0].vel = Vec2::new(200.0, -100.0);
        let timer = w.chaos.timer;

        chaos::trigger(&mut w, 13);

        assert_eq!(w.players[0].vel, Vec2::ZERO);
        assert!((w.chaos.timer - timer - 2.0).abs() < 1e-4);
        assert!(w.scheduler.has_pending(DeferredEffect::ReleaseFreeze));
    }

    #[test]
    fn test_mirrored_drop_settles_level() {
        let mut w = world();
        run_countdown(&mut w);
        w.chaos.timer = 100.0;
        w.hazards.spawn_timer = 100.0;
        w.players[0].pos = w.platform.to_world(Vec2::new(-150.0, -250.0));
        w.players[1].pos = w.platform.to_world(Vec2::new(150.0, -250.0));

        run(&mut w, &TickInput::default(), 1.5);

        assert_eq!(w.round.phase, Phase::Active);
        assert!(w.players.iter().all(|p| p.grounded && p.vel.y.abs() < 20.0));
        assert!(w.platform.angle.abs() < 1e-3);
    }

    /// Active round with chaos and ambient hazards parked
    fn quiet_world() -> World {
        let mut w = world();
        run_countdown(&mut w);
        w.chaos.timer = 100.0;
        w.hazards.spawn_timer = 100.0;
        w.drain_events();
        w
    }

    fn count_sounds(events: &[GameEvent], cue: SoundCue) -> usize {
        events.iter().filter(|e| **e == GameEvent::Sound(cue)).count()
    }

    #[test]
    fn test_chaos_due_when_round_ends_is_rearmed() {
        let mut w = world();
        run_countdown(&mut w);
        w.chaos.pending = Some(5);
        w.chaos.timer = 0.001;
        w.players[0].pos = Vec2::new(640.0, w.fall_line() + 50.0);

        tick(&mut w, &TickInput::default(), SIM_DT);

        assert_eq!(w.round.phase, Phase::RoundOver);
        assert!(w.chaos.pending.is_none());
        assert!(w.chaos.timer >= w.tuning.chaos_interval_min);
        assert!(!w.drain_events().iter().any(|e| matches!(e, GameEvent::ChaosFired { .. })));

        // into the next round: the first event must be announced before it fires
        run(&mut w, &TickInput::default(), 1.0);
        assert_eq!(w.round.phase, Phase::Countdown);

        // level the beam so nobody rolls off before the event is due
        let xs = [0, 1].map(|id| w.platform.to_local(w.players[id].pos).x);
        w.platform.angle = 0.0;
        for (player, x) in w.players.iter_mut().zip(xs) {
            player.spawn(&w.platform, x);
        }
        run_countdown(&mut w);
        w.hazards.spawn_timer = 100.0;

        let mut warned = Vec::new();
        let mut fired = None;
        for _ in 0..720 {
            tick(&mut w, &TickInput::default(), SIM_DT);
            for event in w.drain_events() {
                match event {
                    GameEvent::ChaosWarning { id, .. } => warned.push(id),
                    GameEvent::ChaosFired { id, .. } if fired.is_none() => fired = Some(id),
                    _ => {}
                }
            }
            if fired.is_some() {
                break;
            }
        }
        let fired = fired.expect("chaos fired during the round");
        assert!(warned.contains(&fired));
    }

    #[test]
    fn test_slow_motion_scales_sim_time_not_deferred_steps() {
        let mut w = quiet_world();
        w.clock.extend_for(ModifierFlag::SlowMotion, 5.0);
        w.scheduler.schedule(0.05, DeferredEffect::StopPlatformSpin);
        let start = w.clock.now();

        run(&mut w, &TickInput::default(), 5.0 * SIM_DT);
        assert!(w.scheduler.has_pending(DeferredEffect::StopPlatformSpin));

        run(&mut w, &TickInput::default(), 2.0 * SIM_DT);
        assert!(!w.scheduler.has_pending(DeferredEffect::StopPlatformSpin));

        let expected = 7.0 * SIM_DT * w.tuning.slow_motion_scale;
        assert!((w.clock.now() - start - expected).abs() < 1e-4);
    }

    /// Drop player 0 past the danger line, then put it just above the beam
    fn fall_and_land(w: &mut World) {
        let r = w.players[0].radius;
        w.players[0].pos = w.platform.pivot + Vec2::new(-150.0, DANGER_DEPTH + 10.0);
        w.players[0].vel = Vec2::new(0.0, 200.0);
        tick(w, &TickInput::default(), SIM_DT);
        assert!(w.players[0].timers.danger > CLUTCH_MIN_DANGER);

        w.players[0].pos = w
            .platform
            .to_world(Vec2::new(-150.0, w.platform.surface_y(r) - 0.5));
        w.players[0].vel = Vec2::new(0.0, 100.0);
        tick(w, &TickInput::default(), SIM_DT);
        assert!(w.players[0].grounded);
    }

    #[test]
    fn test_clutch_save_once_per_cooldown() {
        let mut w = quiet_world();

        fall_and_land(&mut w);
        let events = w.drain_events();
        assert_eq!(count_sounds(&events, SoundCue::NearMiss), 1);
        assert!(w.message.is_some());
        assert_eq!(w.players[0].timers.danger, 0.0);
        assert!(w.players[0].timers.near_miss > 2.0);

        fall_and_land(&mut w);
        assert_eq!(count_sounds(&w.drain_events(), SoundCue::NearMiss), 0);
    }

    #[test]
    fn test_hazard_hit_through_tick() {
        let mut w = quiet_world();
        let target = w.players[0].pos;
        w.hazards.hazards.push(Hazard {
            kind: HazardKind::Rock,
            pos: target + Vec2::new(0.0, -10.0),
            vel: Vec2::new(0.0, 100.0),
            radius: HazardKind::Rock.radius(),
            life: 5.0,
            spin: 0.0,
        });

        tick(&mut w, &TickInput::default(), SIM_DT);

        assert!(w.hazards.hazards.is_empty());
        assert!(w.players[0].is_stunned());
        assert_eq!(w.challenge.stats[0].hazard_hits, 1);
        assert_eq!(w.challenge.stats[1].hazard_hits, 0);
        let events = w.drain_events();
        assert_eq!(
            count_sounds(&events, SoundCue::HazardHit { kind: HazardKind::Rock }),
            1
        );
    }

    #[test]
    fn test_hit_commentary_is_throttled() {
        let mut w = quiet_world();
        let home = w.players[0].pos;
        let mut comments = Vec::new();

        for step in 0..600 {
            w.players[0].pos = home;
            w.players[0].vel = Vec2::ZERO;
            if step % 12 == 0 {
                w.hazards.hazards.push(Hazard {
                    kind: HazardKind::Rock,
                    pos: home + Vec2::new(0.0, -10.0),
                    vel: Vec2::new(0.0, 100.0),
                    radius: HazardKind::Rock.radius(),
                    life: 5.0,
                    spin: 0.0,
                });
            }
            tick(&mut w, &TickInput::default(), SIM_DT);
            for event in w.drain_events() {
                if matches!(event, GameEvent::Message { duration, .. } if duration == 0.95) {
                    comments.push(step);
                }
            }
        }

        assert_eq!(w.challenge.stats[0].hazard_hits, 50);
        assert!(!comments.is_empty());
        assert!(comments.windows(2).all(|pair| pair[1] - pair[0] >= 132));
    }
}
