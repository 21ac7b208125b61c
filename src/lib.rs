//! Space Invaders - simulation core
//!
//! Core modules:
//! - `sim`: Entity model, movement, weapons, collisions, levels and game phases
//! - `renderer`: Render/asset gateway seam (drawing itself lives outside the crate)
//! - `platform`: Input polling and clock abstraction
//! - `settings`: Data-driven tuning knobs

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AssetError, SettingsError};
pub use settings::{FireTiming, Settings};

use glam::Vec3;

/// Reference tuning values (defaults for [`Settings`])
pub mod consts {
    /// Fixed simulation timestep for the fixed-step driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Horizontal playfield boundaries
    pub const LEFT_BOUNDARY: f32 = -50.0;
    pub const RIGHT_BOUNDARY: f32 = 50.0;
    /// Lasers beyond these are deactivated
    pub const LASER_MAX_ABS_Y: f32 = 35.0;
    pub const LASER_MAX_ABS_X: f32 = 55.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 20.0;
    pub const PLAYER_HEALTH: u32 = 3;
    pub const SHOT_COOLDOWN: f64 = 0.5;
    pub const INVINCIBILITY_DURATION: f64 = 5.0;
    pub const BLINK_INTERVAL: f64 = 0.2;

    /// Laser defaults
    pub const LASER_SPEED: f32 = 10.0;
    pub const LASER_SPAWN_OFFSET: f32 = 2.0;

    /// Alien swarm defaults (speed and drop are per tick)
    pub const ALIEN_SPACING: f32 = 5.0;
    pub const ALIEN_DROP_DISTANCE: f32 = 0.5;
    pub const ALIEN_FIRE_THRESHOLD: u32 = 50;
    pub const ALIEN_FIRE_MODULUS: u32 = 150_000;

    /// Mothership defaults
    pub const MOTHERSHIP_SPEED: f32 = 0.05;
    pub const MOTHERSHIP_HEALTH: u32 = 10;
    pub const MOTHERSHIP_FIRE_THRESHOLD: u32 = 1;
    pub const MOTHERSHIP_FIRE_MODULUS: u32 = 300;

    /// Collision radii (center distance)
    pub const ALIEN_HIT_RADIUS: f32 = 2.0;
    pub const MOTHERSHIP_HIT_RADIUS: f32 = 2.0;
    pub const PLAYER_HIT_RADIUS: f32 = 2.0;
    pub const SHIELD_HIT_RADIUS: f32 = 6.5;

    /// Scoring
    pub const ALIEN_KILL_SCORE: u64 = 50;
    pub const MOTHERSHIP_KILL_SCORE: u64 = 500;

    /// Explosions are cosmetic and expire after this long
    pub const EXPLOSION_LIFETIME: f64 = 0.5;
}

/// Euclidean distance between two entity centers is strictly below `threshold`
#[inline]
pub fn within(a: Vec3, b: Vec3, threshold: f32) -> bool {
    a.distance(b) < threshold
}

/// Unit vector from `from` toward `to`, or `fallback` when they coincide
#[inline]
pub fn aim(from: Vec3, to: Vec3, fallback: Vec3) -> Vec3 {
    (to - from).try_normalize().unwrap_or(fallback)
}
