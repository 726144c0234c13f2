//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one stream per match)
//! - Stable iteration order (by player ID)
//! - No rendering, audio or input-device dependencies
//!
//! Presentation collaborators read `World` between ticks and consume the
//! `GameEvent` queue.

pub mod challenge;
pub mod chaos;
pub mod clock;
pub mod collision;
pub mod events;
pub mod flavor;
pub mod hazard;
pub mod platform;
pub mod player;
pub mod round;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use challenge::{ChallengeKind, ChallengeTracker};
pub use chaos::{CHAOS_EVENTS, ChaosDirector, ChaosEvent};
pub use clock::{ModifierClock, ModifierFlag};
pub use collision::CollisionResult;
pub use events::{EventQueue, FlavorMessage, GameEvent, Hud};
pub use hazard::{Hazard, HazardKind, HazardManager};
pub use platform::Platform;
pub use player::{ControlIntent, Player};
pub use round::{MatchState, Phase};
pub use scheduler::{DeferredEffect, Scheduler};
pub use state::World;
pub use tick::{TickInput, tick};
