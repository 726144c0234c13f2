//! Player bodies
//!
//! Each competitor is a ball with a handful of short countdowns driving jump
//! feel (cooldown, input buffer, coyote time) and status (stun, landing sound
//! throttle, near-miss detection).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::{ModifierClock, ModifierFlag};
use super::collision::{BallBody, PlatformContact};
use super::hazard::{HazardHit, HazardKind};
use super::platform::Platform;
use crate::consts::*;

/// Extra clearance above the beam when spawning
const SPAWN_CLEARANCE: f32 = 2.0;

/// Logical controls held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Per-body countdowns, all ticking down together
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    pub jump_cooldown: f32,
    pub landing_sound: f32,
    pub stun: f32,
    pub jump_buffer: f32,
    pub coyote: f32,
    pub near_miss: f32,
    /// Armed while falling below the beam; landing before it runs out is a
    /// clutch save
    pub danger: f32,
}

impl Timers {
    /// Tick every countdown down by `dt`, stopping at zero
    pub fn advance(&mut self, dt: f32) {
        for timer in [
            &mut self.jump_cooldown,
            &mut self.landing_sound,
            &mut self.stun,
            &mut self.jump_buffer,
            &mut self.coyote,
            &mut self.near_miss,
            &mut self.danger,
        ] {
            *timer = (*timer - dt).max(0.0);
        }
    }
}

/// Which kind of jump fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Air,
}

/// A competitor's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    pub label: String,
    /// Body colour (RGB)
    pub color: [u8; 3],
    pub pos: Vec2,
    pub vel: Vec2,
    pub base_radius: f32,
    pub radius: f32,
    pub grounded: bool,
    /// Visual roll angle
    pub spin: f32,
    pub spin_vel: f32,
    pub timers: Timers,
    pub air_jumps: u8,
    pub max_air_jumps: u8,
    /// Recent positions for render trails (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Player {
    pub fn new(id: usize) -> Self {
        assert!(id < PLAYER_COUNT, "invalid player id {id}");
        let (label, color) = match id {
            0 => ("P1", [0xe8, 0x28, 0x3a]),
            _ => ("P2", [0x18, 0x55, 0xe8]),
        };
        Self {
            id,
            label: label.to_string(),
            color,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            base_radius: PLAYER_BASE_RADIUS,
            radius: PLAYER_BASE_RADIUS,
            grounded: false,
            spin: 0.0,
            spin_vel: 0.0,
            timers: Timers::default(),
            air_jumps: AIR_JUMPS,
            max_air_jumps: AIR_JUMPS,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.timers.stun > 0.0
    }

    /// Recompute radius and air-jump budget from the size/jump modifiers
    pub fn sync_modifiers(&mut self, clock: &ModifierClock) {
        let base = if clock.is_active(ModifierFlag::SizeSwap) {
            if self.id == 0 {
                SIZE_SWAP_SMALL_RADIUS
            } else {
                SIZE_SWAP_BIG_RADIUS
            }
        } else {
            self.base_radius
        };
        let shrink = clock.pick(ModifierFlag::Shrink, SHRINK_SCALE, 1.0);
        let grow = clock.pick(ModifierFlag::Grow, GROW_SCALE, 1.0);
        self.radius = (base * shrink * grow).max(PLAYER_MIN_RADIUS);
        self.max_air_jumps = clock.pick(ModifierFlag::TripleJump, TRIPLE_AIR_JUMPS, AIR_JUMPS);
    }

    /// Place the ball at rest just above the beam at `local_x`
    pub fn spawn(&mut self, platform: &Platform, local_x: f32) {
        let local = Vec2::new(local_x, platform.surface_y(self.radius) - SPAWN_CLEARANCE);
        self.pos = platform.to_world(local);
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.spin = 0.0;
        self.spin_vel = 0.0;
        self.timers = Timers::default();
        self.air_jumps = self.max_air_jumps;
        self.trail.clear();
    }

    /// Apply held controls: horizontal push and buffered jumps.
    ///
    /// `boost` folds turbo and comeback multipliers together; `jump_dir` is
    /// the beam's up-normal.
    pub fn apply_control_intent(
        &mut self,
        dt: f32,
        intent: ControlIntent,
        clock: &ModifierClock,
        boost: f32,
        jump_dir: Vec2,
    ) -> Option<JumpKind> {
        if self.is_stunned() {
            return None;
        }

        let flipped = clock.is_active(ModifierFlag::control_flip(self.id));
        let (left, right) = if flipped {
            (intent.right, intent.left)
        } else {
            (intent.left, intent.right)
        };

        let mut dir = 0.0;
        if left {
            dir -= 1.0;
        }
        if right {
            dir += 1.0;
        }
        dir *= clock.pick(ModifierFlag::ReverseControls, -1.0, 1.0);

        self.vel.x += dir * MOVE_FORCE * boost * dt;

        if intent.jump {
            self.timers.jump_buffer = self.timers.jump_buffer.max(JUMP_BUFFER);
        }

        let can_ground_jump = self.grounded || self.timers.coyote > 0.0;
        let can_air_jump = !can_ground_jump && self.air_jumps > 0;

        if self.timers.jump_buffer <= 0.0
            || self.timers.jump_cooldown > 0.0
            || !(can_ground_jump || can_air_jump)
        {
            return None;
        }

        let scale = if can_air_jump { AIR_JUMP_SCALE } else { 1.0 };
        self.vel += jump_dir * JUMP_IMPULSE * scale;
        self.timers.jump_cooldown = JUMP_COOLDOWN;
        self.timers.jump_buffer = 0.0;
        self.timers.coyote = 0.0;
        self.grounded = false;

        if can_air_jump {
            self.air_jumps -= 1;
            Some(JumpKind::Air)
        } else {
            Some(JumpKind::Ground)
        }
    }

    /// Gravity, horizontal friction and position integration
    pub fn integrate(&mut self, dt: f32, clock: &ModifierClock) {
        let gravity = GRAVITY * clock.pick(ModifierFlag::LowGravity, LOW_GRAVITY_SCALE, 1.0);
        let sticky = clock.is_active(ModifierFlag::Sticky);
        let friction = match (self.grounded, sticky) {
            (true, true) => GROUND_FRICTION_STICKY,
            (true, false) => GROUND_FRICTION,
            (false, true) => AIR_FRICTION_STICKY,
            (false, false) => AIR_FRICTION,
        };

        self.vel.y += gravity * dt;
        self.vel.x *= friction;
        self.pos += self.vel * dt;
    }

    /// Take (or clear) the result of this tick's beam contact test
    pub fn settle(&mut self, contact: Option<PlatformContact>) {
        match contact {
            Some(contact) => {
                self.pos = contact.pos;
                self.vel = contact.vel;
                self.spin_vel = contact.spin_vel;
                self.grounded = true;
                self.timers.coyote = COYOTE_TIME;
                self.air_jumps = self.max_air_jumps;
            }
            None => self.grounded = false,
        }
    }

    /// Whether a landing this hard should make noise (and arm the throttle)
    pub fn take_landing_sound(&mut self, impact: f32) -> bool {
        if impact > LANDING_IMPACT && self.timers.landing_sound <= 0.0 {
            self.timers.landing_sound = LANDING_SOUND_COOLDOWN;
            true
        } else {
            false
        }
    }

    /// Spin integration (airborne spin slowly bleeds off)
    pub fn advance_spin(&mut self, dt: f32) {
        if !self.grounded {
            self.spin_vel *= AIR_SPIN_DECAY;
        }
        self.spin += self.spin_vel * dt;
    }

    /// Keep the ball inside the side walls
    pub fn bounce_off_walls(&mut self, arena_width: f32) {
        if self.pos.x < self.radius {
            self.pos.x = self.radius;
            self.vel.x *= WALL_BOUNCE;
        }
        if self.pos.x > arena_width - self.radius {
            self.pos.x = arena_width - self.radius;
            self.vel.x *= WALL_BOUNCE;
        }
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Knockback, stun and per-kind extras from a hazard strike
    pub fn take_hazard_hit(&mut self, hit: &HazardHit, rng: &mut impl Rng) {
        self.vel += hit.normal * hit.kind.kick() + Vec2::new(hit.vel.x * 0.22, hit.vel.y * 0.2);
        self.timers.stun = STUN_TIME;

        match hit.kind {
            HazardKind::Banana => self.vel.x += (rng.random::<f32>() - 0.5) * 440.0,
            HazardKind::Ice => self.vel.x += (rng.random::<f32>() - 0.5) * 500.0,
            HazardKind::Spring => {
                self.vel.y -= 520.0;
                self.vel.x += (rng.random::<f32>() - 0.5) * 160.0;
            }
            HazardKind::Star => {
                self.vel.x *= 1.15;
                self.vel.y -= 120.0;
            }
            _ => {}
        }
    }

    pub fn body(&self) -> BallBody {
        BallBody {
            pos: self.pos,
            vel: self.vel,
            radius: self.radius,
            spin_vel: self.spin_vel,
        }
    }

    pub fn set_body(&mut self, body: BallBody) {
        self.pos = body.pos;
        self.vel = body.vel;
        self.spin_vel = body.spin_vel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const UP: Vec2 = Vec2::new(0.0, -1.0);
    const DT: f32 = 1.0 / 120.0;

    fn grounded_player() -> Player {
        let mut p = Player::new(0);
        p.grounded = true;
        p
    }

    fn jump() -> ControlIntent {
        ControlIntent {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    #[should_panic(expected = "invalid player id")]
    fn test_third_player_rejected() {
        let _ = Player::new(2);
    }

    #[test]
    fn test_timers_advance_together_and_floor_at_zero() {
        let mut timers = Timers {
            jump_cooldown: 0.22,
            landing_sound: 0.18,
            stun: 0.3,
            jump_buffer: 0.12,
            coyote: 0.09,
            near_miss: 2.1,
            danger: 0.85,
        };
        timers.advance(0.1);
        assert!((timers.stun - 0.2).abs() < 1e-6);
        assert_eq!(timers.coyote, 0.0);
        timers.advance(5.0);
        assert_eq!(timers, Timers::default());
    }

    #[test]
    fn test_ground_jump_uses_full_impulse() {
        let clock = ModifierClock::new();
        let mut p = grounded_player();
        let kind = p.apply_control_intent(DT, jump(), &clock, 1.0, UP);
        assert_eq!(kind, Some(JumpKind::Ground));
        assert_eq!(p.vel.y, -JUMP_IMPULSE);
        assert_eq!(p.timers.jump_cooldown, JUMP_COOLDOWN);
        assert!(!p.grounded);
        assert_eq!(p.air_jumps, AIR_JUMPS);
    }

    #[test]
    fn test_air_jump_spends_budget() {
        let clock = ModifierClock::new();
        let mut p = Player::new(1);
        let kind = p.apply_control_intent(DT, jump(), &clock, 1.0, UP);
        assert_eq!(kind, Some(JumpKind::Air));
        assert!((p.vel.y + JUMP_IMPULSE * AIR_JUMP_SCALE).abs() < 1e-3);
        assert_eq!(p.air_jumps, 0);

        p.timers.advance(1.0);
        assert_eq!(p.apply_control_intent(DT, jump(), &clock, 1.0, UP), None);
    }

    #[test]
    fn test_coyote_time_allows_ground_jump() {
        let clock = ModifierClock::new();
        let mut p = Player::new(0);
        p.timers.coyote = 0.05;
        assert_eq!(
            p.apply_control_intent(DT, jump(), &clock, 1.0, UP),
            Some(JumpKind::Ground)
        );
        assert_eq!(p.air_jumps, AIR_JUMPS);
    }

    #[test]
    fn test_buffered_jump_fires_when_cooldown_ends() {
        let clock = ModifierClock::new();
        let mut p = grounded_player();
        p.timers.jump_cooldown = 0.05;
        assert_eq!(p.apply_control_intent(DT, jump(), &clock, 1.0, UP), None);

        p.timers.advance(0.06);
        let kind = p.apply_control_intent(DT, ControlIntent::default(), &clock, 1.0, UP);
        assert_eq!(kind, Some(JumpKind::Ground));
    }

    #[test]
    fn test_stunned_player_ignores_input() {
        let clock = ModifierClock::new();
        let mut p = grounded_player();
        p.timers.stun = 0.3;
        let intent = ControlIntent {
            right: true,
            jump: true,
            ..Default::default()
        };
        assert_eq!(p.apply_control_intent(DT, intent, &clock, 1.0, UP), None);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.timers.jump_buffer, 0.0);
    }

    #[test]
    fn test_reverse_and_flip_cancel_out() {
        let mut clock = ModifierClock::new();
        clock.extend_for(ModifierFlag::ReverseControls, 5.0);
        let right = ControlIntent {
            right: true,
            ..Default::default()
        };

        let mut p = grounded_player();
        p.apply_control_intent(DT, right, &clock, 1.0, UP);
        assert!(p.vel.x < 0.0);

        clock.extend_for(ModifierFlag::ControlFlipP1, 5.0);
        let mut p = grounded_player();
        p.apply_control_intent(DT, right, &clock, 1.0, UP);
        assert!(p.vel.x > 0.0);

        // P2 is unaffected by P1's flip
        let mut p2 = Player::new(1);
        p2.apply_control_intent(DT, right, &clock, 1.0, UP);
        assert!(p2.vel.x < 0.0);
    }

    #[test]
    fn test_size_modifiers() {
        let mut clock = ModifierClock::new();
        let mut p1 = Player::new(0);
        let mut p2 = Player::new(1);

        clock.extend_for(ModifierFlag::SizeSwap, 5.0);
        p1.sync_modifiers(&clock);
        p2.sync_modifiers(&clock);
        assert_eq!(p1.radius, SIZE_SWAP_SMALL_RADIUS);
        assert_eq!(p2.radius, SIZE_SWAP_BIG_RADIUS);

        clock.extend_for(ModifierFlag::Shrink, 5.0);
        p1.sync_modifiers(&clock);
        assert_eq!(p1.radius, PLAYER_MIN_RADIUS.max(20.0 * SHRINK_SCALE));
        assert!(p1.radius >= PLAYER_MIN_RADIUS);

        clock.extend_for(ModifierFlag::TripleJump, 5.0);
        p1.sync_modifiers(&clock);
        assert_eq!(p1.max_air_jumps, TRIPLE_AIR_JUMPS);
    }

    #[test]
    fn test_wall_bounce() {
        let mut p = Player::new(0);
        p.pos = Vec2::new(5.0, 100.0);
        p.vel = Vec2::new(-100.0, 0.0);
        p.bounce_off_walls(1280.0);
        assert_eq!(p.pos.x, p.radius);
        assert!((p.vel.x - 52.0).abs() < 1e-3);
    }

    #[test]
    fn test_trail_is_bounded_newest_first() {
        let mut p = Player::new(0);
        for i in 0..10 {
            p.pos = Vec2::new(i as f32, 0.0);
            p.record_trail();
        }
        assert_eq!(p.trail.len(), TRAIL_LENGTH);
        assert_eq!(p.trail[0].x, 9.0);
    }

    #[test]
    fn test_landing_sound_is_throttled() {
        let mut p = Player::new(0);
        assert!(p.take_landing_sound(200.0));
        assert!(!p.take_landing_sound(200.0));
        p.timers.advance(LANDING_SOUND_COOLDOWN);
        assert!(!p.take_landing_sound(100.0));
        assert!(p.take_landing_sound(300.0));
    }

    #[test]
    fn test_spring_hit_launches_upward() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut p = Player::new(0);
        let hit = HazardHit {
            player: 0,
            kind: HazardKind::Spring,
            pos: Vec2::ZERO,
            normal: Vec2::new(0.0, 1.0),
            vel: Vec2::ZERO,
        };
        p.take_hazard_hit(&hit, &mut rng);
        assert!((p.vel.y - (260.0 - 520.0)).abs() < 1e-3);
        assert!(p.is_stunned());
    }
}
