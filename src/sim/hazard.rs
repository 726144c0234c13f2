//! Falling hazards
//!
//! Eleven kinds of junk rain from above the arena, bounce off the side walls
//! and knock players around. The manager owns spawning, integration, expiry
//! and hazard-vs-player detection; the hit response itself is applied by the
//! caller so it can also feed stats and feedback.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::{ModifierClock, ModifierFlag};
use super::collision::circles_overlap;
use crate::consts::*;

/// Spawn height above the arena
const SPAWN_Y: f32 = -40.0;
/// Hazards falling this far below the arena are culled
const CULL_MARGIN: f32 = 120.0;
/// Side wall bounce factor
const WALL_BOUNCE_HAZARD: f32 = -0.83;
/// Lifetime of curtain hazards
const CURTAIN_LIFETIME: f32 = 12.0;

/// Hazard kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Anvil,
    Tomato,
    Banana,
    Bomb,
    Rock,
    Spike,
    Ice,
    Meteor,
    Crate,
    Spring,
    Star,
}

impl HazardKind {
    pub const ALL: [HazardKind; 11] = [
        HazardKind::Anvil,
        HazardKind::Tomato,
        HazardKind::Banana,
        HazardKind::Bomb,
        HazardKind::Rock,
        HazardKind::Spike,
        HazardKind::Ice,
        HazardKind::Meteor,
        HazardKind::Crate,
        HazardKind::Spring,
        HazardKind::Star,
    ];

    pub fn radius(self) -> f32 {
        match self {
            HazardKind::Anvil => 20.0,
            HazardKind::Tomato => 14.0,
            HazardKind::Banana => 18.0,
            HazardKind::Bomb => 16.0,
            HazardKind::Rock => 17.0,
            HazardKind::Spike => 15.0,
            HazardKind::Ice => 16.0,
            HazardKind::Meteor => 22.0,
            HazardKind::Crate => 19.0,
            HazardKind::Spring => 15.0,
            HazardKind::Star => 13.0,
        }
    }

    /// Body colour (RGB)
    pub fn color(self) -> [u8; 3] {
        match self {
            HazardKind::Anvil => [0x4b, 0x4b, 0x52],
            HazardKind::Tomato => [0xe2, 0x30, 0x51],
            HazardKind::Banana => [0xf7, 0xd6, 0x37],
            HazardKind::Bomb => [0x22, 0x22, 0x22],
            HazardKind::Rock => [0x8b, 0x73, 0x55],
            HazardKind::Spike => [0xd9, 0x46, 0xef],
            HazardKind::Ice => [0x00, 0xd9, 0xff],
            HazardKind::Meteor => [0xff, 0x6b, 0x35],
            HazardKind::Crate => [0x9a, 0x6a, 0x3f],
            HazardKind::Spring => [0x2f, 0xcf, 0x79],
            HazardKind::Star => [0x8f, 0xf3, 0xff],
        }
    }

    /// Debris colour when this kind hits someone
    pub fn debris_color(self) -> [u8; 3] {
        match self {
            HazardKind::Banana => [0xf8, 0xdc, 0x5f],
            HazardKind::Tomato => [0xf0, 0x50, 0x6e],
            HazardKind::Anvil | HazardKind::Bomb => [0xd9, 0xe0, 0xe8],
            other => other.color(),
        }
    }

    /// Impulse magnitude along the contact normal
    pub fn kick(self) -> f32 {
        match self {
            HazardKind::Anvil => 420.0,
            HazardKind::Banana => 340.0,
            HazardKind::Bomb => 560.0,
            HazardKind::Rock => 380.0,
            HazardKind::Spike => 500.0,
            HazardKind::Ice => 300.0,
            HazardKind::Meteor => 650.0,
            HazardKind::Crate => 520.0,
            HazardKind::Spring => 260.0,
            HazardKind::Star => 220.0,
            HazardKind::Tomato => 270.0,
        }
    }

    /// Relative spawn weight (weights sum to 1)
    pub fn spawn_weight(self) -> f32 {
        match self {
            HazardKind::Anvil => 0.20,
            HazardKind::Tomato => 0.13,
            HazardKind::Banana => 0.13,
            HazardKind::Bomb => 0.12,
            HazardKind::Rock => 0.09,
            HazardKind::Spike => 0.08,
            HazardKind::Ice => 0.07,
            HazardKind::Meteor => 0.07,
            HazardKind::Crate => 0.06,
            HazardKind::Spring => 0.03,
            HazardKind::Star => 0.02,
        }
    }

    /// Per-kind tweak on top of the random launch velocity
    fn bias_velocity(self, vel: Vec2) -> Vec2 {
        match self {
            HazardKind::Anvil => vel + Vec2::new(0.0, 140.0),
            HazardKind::Tomato => vel,
            HazardKind::Banana => Vec2::new(vel.x * 1.35, vel.y),
            HazardKind::Bomb => vel + Vec2::new(0.0, 90.0),
            HazardKind::Rock => vel + Vec2::new(0.0, 120.0),
            HazardKind::Spike => vel + Vec2::new(0.0, 160.0),
            HazardKind::Ice => Vec2::new(vel.x * 1.6, vel.y),
            HazardKind::Meteor => vel + Vec2::new(0.0, 200.0),
            HazardKind::Crate => vel + Vec2::new(0.0, 170.0),
            HazardKind::Spring => Vec2::new(vel.x * 1.3, vel.y + 110.0),
            HazardKind::Star => Vec2::new(vel.x * 1.9, vel.y + 70.0),
        }
    }

    /// Weighted random kind
    pub fn roll(rng: &mut impl Rng) -> Self {
        let mut roll: f32 = rng.random();
        for kind in Self::ALL {
            roll -= kind.spawn_weight();
            if roll < 0.0 {
                return kind;
            }
        }
        HazardKind::Star
    }
}

/// A falling hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds until it despawns
    pub life: f32,
    /// Visual rotation
    pub spin: f32,
}

impl Hazard {
    /// A hazard of `kind` dropped at a random spot along the top edge
    pub fn random_drop(kind: HazardKind, rng: &mut impl Rng, arena_width: f32, lifetime: f32) -> Self {
        let x = rng.random::<f32>() * arena_width;
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 150.0,
            rng.random::<f32>() * 70.0,
        );
        Self {
            kind,
            pos: Vec2::new(x, SPAWN_Y),
            vel: kind.bias_velocity(vel),
            radius: kind.radius(),
            life: lifetime,
            spin: rng.random::<f32>() * PI,
        }
    }

    /// One column of a hazard curtain: straight down, evenly spaced
    pub fn curtain(column: u8, columns: u8, arena_width: f32) -> Self {
        let columns = columns.max(1);
        let x = (f32::from(column) + 0.5) * (arena_width / f32::from(columns));
        let (kind, radius, vy) = if column % 3 == 0 {
            (HazardKind::Meteor, 20.0, 250.0)
        } else if column % 2 == 0 {
            (HazardKind::Rock, 17.0, 190.0)
        } else {
            (HazardKind::Bomb, 16.0, 170.0)
        };
        Self {
            kind,
            pos: Vec2::new(x, SPAWN_Y),
            vel: Vec2::new(0.0, vy),
            radius,
            life: CURTAIN_LIFETIME,
            spin: 0.0,
        }
    }
}

/// A hazard struck a player this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardHit {
    pub player: usize,
    pub kind: HazardKind,
    /// Where the hazard was when it hit
    pub pos: Vec2,
    /// Unit vector from hazard to player
    pub normal: Vec2,
    /// Hazard velocity at impact
    pub vel: Vec2,
}

/// Owns every live hazard and the spawn cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardManager {
    /// Live hazards, in spawn order
    pub hazards: Vec<Hazard>,
    /// Seconds until the next ambient spawn
    pub spawn_timer: f32,
}

impl Default for HazardManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HazardManager {
    pub fn new() -> Self {
        Self {
            hazards: Vec::new(),
            spawn_timer: 0.9,
        }
    }

    /// Drop every hazard and restart the spawn timer
    pub fn reset(&mut self, spawn_delay: f32) {
        self.hazards.clear();
        self.spawn_timer = spawn_delay;
    }

    /// Bring the next ambient spawn forward (chaos storms)
    pub fn set_cadence(&mut self, next_spawn: f32) {
        self.spawn_timer = next_spawn;
    }

    pub fn spawn(&mut self, kind: HazardKind, rng: &mut impl Rng, arena_width: f32, lifetime: f32) {
        self.hazards
            .push(Hazard::random_drop(kind, rng, arena_width, lifetime));
    }

    pub fn spawn_random(&mut self, rng: &mut impl Rng, arena_width: f32, lifetime: f32) {
        let kind = HazardKind::roll(rng);
        self.spawn(kind, rng, arena_width, lifetime);
    }

    pub fn spawn_curtain(&mut self, column: u8, columns: u8, arena_width: f32) {
        self.hazards.push(Hazard::curtain(column, columns, arena_width));
    }

    /// Advance spawning and every live hazard by `dt`.
    ///
    /// `bodies` are the players' (position, radius) in id order. Each hazard
    /// hits at most one player per tick (lowest id wins) and is consumed by
    /// the hit.
    pub fn update(
        &mut self,
        dt: f32,
        clock: &ModifierClock,
        rng: &mut impl Rng,
        arena: Vec2,
        lifetime: f32,
        bodies: &[(Vec2, f32)],
    ) -> Vec<HazardHit> {
        let shower = clock.is_active(ModifierFlag::HazardShower);

        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            if shower && rng.random_bool(0.5) {
                self.spawn(HazardKind::Bomb, rng, arena.x, lifetime);
            } else {
                self.spawn_random(rng, arena.x, lifetime);
            }
            self.spawn_timer = if shower {
                0.2 + rng.random::<f32>() * 0.24
            } else {
                0.45 + rng.random::<f32>() * 0.45
            };
        }

        let gravity = HAZARD_GRAVITY * clock.pick(ModifierFlag::LowGravity, LOW_GRAVITY_SCALE, 1.0);
        let mut hits = Vec::new();

        self.hazards.retain_mut(|h| {
            h.life -= dt;
            h.spin += dt * (2.0 + h.vel.x.abs() * 0.02);
            h.vel.y += gravity * dt;
            h.pos += h.vel * dt;

            if h.pos.x < h.radius || h.pos.x > arena.x - h.radius {
                h.vel.x *= WALL_BOUNCE_HAZARD;
                h.pos.x = h.pos.x.clamp(h.radius, (arena.x - h.radius).max(h.radius));
            }

            let hit = bodies
                .iter()
                .enumerate()
                .find_map(|(player, &(pos, radius))| {
                    let contact = circles_overlap(h.pos, h.radius, pos, radius);
                    contact.hit.then_some(HazardHit {
                        player,
                        kind: h.kind,
                        pos: h.pos,
                        normal: contact.normal,
                        vel: h.vel,
                    })
                });

            if let Some(hit) = hit {
                hits.push(hit);
                return false;
            }

            h.life > 0.0 && h.pos.y <= arena.y + CULL_MARGIN
        });

        hits
    }
}
