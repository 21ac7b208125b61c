//! Entity records
//!
//! Passive data only. Every entity carries the same [`EntityHeader`]; the
//! per-kind structs add just the state their rules need.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::renderer::{ModelId, RenderHandle};

/// Process-unique entity identity (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Entity type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Alien,
    Mothership,
    Shield,
    Laser,
    Explosion,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Player => "Player",
            EntityKind::Alien => "Alien",
            EntityKind::Mothership => "MotherShip",
            EntityKind::Shield => "Shield",
            EntityKind::Laser => "Laser",
            EntityKind::Explosion => "Explosion",
        }
    }

    /// Uniform scale handed to the draw call
    pub fn draw_scale(&self) -> f32 {
        match self {
            EntityKind::Player | EntityKind::Mothership => 0.5,
            _ => 1.0,
        }
    }
}

/// Shared identity/position header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityHeader {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub model: ModelId,
    /// `None` when the model failed to load or was already released
    #[serde(skip)]
    pub render: Option<RenderHandle>,
}

impl EntityHeader {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec3, model: ModelId) -> Self {
        Self {
            id,
            kind,
            pos,
            model,
            render: None,
        }
    }
}

/// Which side fired a laser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Fired by the player
    Friendly,
    /// Fired by an alien or the mothership
    Enemy,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub header: EntityHeader,
    pub health: u32,
    pub invincible: bool,
    /// When the current invincibility window started
    pub hit_at: f64,
    /// Last blink toggle while invincible
    pub last_blink: f64,
    /// Render gate; toggles while invincible
    pub visible: bool,
}

impl Player {
    pub fn new(header: EntityHeader, health: u32) -> Self {
        Self {
            header,
            health,
            invincible: false,
            hit_at: 0.0,
            last_blink: 0.0,
            visible: true,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// True while an invincibility window that started at `hit_at` is still open
    pub fn is_invincible_at(&self, now: f64, duration: f64) -> bool {
        self.invincible && now - self.hit_at < duration
    }

    /// Open an invincibility window at `now`
    pub fn start_invincibility(&mut self, now: f64) {
        self.invincible = true;
        self.hit_at = now;
        self.last_blink = now;
        self.visible = false;
    }
}

/// One member of the alien swarm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub header: EntityHeader,
    /// Model palette index (`row % 3`)
    pub variant: u8,
    pub row: u32,
    pub col: u32,
}

/// The patrolling mothership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mothership {
    pub header: EntityHeader,
    pub health: u32,
    pub alive: bool,
    pub moving_right: bool,
}

/// A destructible shield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub header: EntityHeader,
    pub health: u32,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub header: EntityHeader,
    /// Unit direction of travel
    pub dir: Vec3,
    pub speed: f32,
    pub active: bool,
    faction: Faction,
}

impl Laser {
    pub fn new(header: EntityHeader, dir: Vec3, speed: f32, faction: Faction) -> Self {
        Self {
            header,
            dir,
            speed,
            active: true,
            faction,
        }
    }

    /// Fixed at creation
    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn is_friendly(&self) -> bool {
        self.faction == Faction::Friendly
    }
}

/// Cosmetic explosion left behind by a destroyed alien or mothership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub header: EntityHeader,
    pub spawned_at: f64,
    pub active: bool,
}
