//! Seesaw Brawl headless runner
//!
//! Plays a seeded match with two autopilot players and logs what happens.
//! Presentation (rendering, audio, input devices) lives in other frontends;
//! this binary only drives the simulation.
//!
//! Usage: seesaw-brawl [--seed N] [--seconds S] [--tuning FILE] [--json]

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Parser};
use seesaw_brawl::Tuning;
use seesaw_brawl::consts::*;
use seesaw_brawl::sim::{ControlIntent, GameEvent, Phase, TickInput, World, tick};

/// Frame time the runner pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;

/// Autopilot tries to stay within this distance of the pivot
const HOME_RANGE: f32 = 60.0;

struct Game {
    world: World,
    accumulator: f32,
    input: TickInput,
    json: bool,
}

impl Game {
    fn new(seed: u64, tuning: Tuning, json: bool) -> Self {
        Self {
            world: World::new(seed, tuning),
            accumulator: 0.0,
            input: TickInput::default(),
            json,
        }
    }

    /// One rendered frame: fixed-step substeps, then drain events
    fn frame(&mut self, dt: f32) -> Result<()> {
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.steer();
            tick(&mut self.world, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.world.drain_events() {
            self.report(&event)?;
        }
        Ok(())
    }

    /// Walk back toward the pivot, hop when a hazard is close overhead
    fn steer(&mut self) {
        let pivot = self.world.platform.pivot;
        for (id, player) in self.world.players.iter().enumerate() {
            let offset = player.pos.x - pivot.x;
            let threatened = self.world.hazards.hazards.iter().any(|h| {
                (h.pos.x - player.pos.x).abs() < player.radius * 2.0
                    && h.pos.y < player.pos.y
                    && player.pos.y - h.pos.y < 140.0
            });
            self.input.players[id] = ControlIntent {
                left: offset > HOME_RANGE,
                right: offset < -HOME_RANGE,
                jump: threatened,
            };
        }
    }

    fn report(&self, event: &GameEvent) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }
        match event {
            GameEvent::ChaosFired { label, .. } => log::info!("chaos: {}", label),
            GameEvent::Message { text, .. } => log::info!("\"{}\"", text),
            GameEvent::RoundEnded { winner, scores, .. } => {
                log::info!("round to P{} ({}-{})", winner + 1, scores[0], scores[1]);
            }
            GameEvent::MatchWon { winner } => log::info!("P{} wins the match", winner + 1),
            _ => log::trace!("{:?}", event),
        }
        Ok(())
    }
}

/// Headless Seesaw Brawl match with two autopilot players
#[derive(Parser, Debug)]
#[command(name = "seesaw-brawl", version, about)]
struct Opts {
    /// Match seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Seconds of frame time to simulate
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Tuning JSON (defaults are used if it cannot be read)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print every event as a JSON line
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn load_tuning(path: Option<&Path>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => {
            log::info!("loaded tuning from {}", path.display());
            tuning
        }
        Err(e) => {
            log::warn!("{}, using defaults", e);
            Tuning::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    let (seed, seconds, json) = (opts.seed, opts.seconds, opts.json);
    let tuning = load_tuning(opts.tuning.as_deref());

    log::info!("Seesaw Brawl (headless) seed {} for {}s", seed, seconds);

    let mut game = Game::new(seed, tuning, json);
    let frames = (seconds.max(0.0) / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        game.frame(FRAME_DT)?;
    }

    let hud = game.world.hud();
    log::info!(
        "finished after {} rounds: {}-{} ({:?})",
        hud.round,
        hud.scores[0],
        hud.scores[1],
        game.world.round.phase
    );
    if game.world.round.phase == Phase::MatchOver {
        if let Some(winner) = hud.winner {
            log::info!("champion: P{}", winner + 1);
        }
    }
    Ok(())
}
