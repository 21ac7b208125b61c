//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (owned by [`GameWorld`])
//! - Stable iteration order (spawn order)
//! - Rendering only through the asset gateway handed in by the caller

pub mod collision;
pub mod entity;
pub mod level;
pub mod movement;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{CollisionReport, Resolver, resolve_collisions};
pub use entity::{
    Alien, EntityHeader, EntityId, EntityKind, Explosion, Faction, Laser, Mothership, Player,
    Shield,
};
pub use level::{Level, LevelManager, LevelParams};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameWorld, WorldSnapshot};
pub use tick::{TickInput, autopilot, tick};
