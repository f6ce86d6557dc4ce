//! Climb simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (platforms by id)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod player;
pub mod state;
pub mod tick;
pub mod world;

pub use autopilot::autopilot;
pub use collision::lands_on;
pub use player::{Player, TrailPoint};
pub use state::{
    ColorTag, GameEvent, GamePhase, GameState, Platform, PlatformArena, PlatformId, PlatformRef,
    PlatformState, Rect,
};
pub use tick::{TickInput, TickReport, tick};
pub use world::World;
