//! Render/asset gateway
//!
//! The simulation never touches meshes, textures or GPU buffers. It asks an
//! [`AssetGateway`] for an opaque [`RenderHandle`] per entity, releases it once
//! when the entity goes away, and hands positioned handles to a
//! [`RenderGateway`] each frame.

pub mod headless;

pub use headless::HeadlessGateway;

use std::num::NonZeroU32;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::sim::{EntityHeader, GameWorld};

/// Opaque handle to a loaded, drawable model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub NonZeroU32);

/// Model identifiers the simulation can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    Player,
    /// Swarm palette entry (0..3)
    Alien(u8),
    Mothership,
    Shield,
    Laser,
    Explosion,
}

/// Alien models cycled by row
pub const ALIEN_PALETTE: [&str; 3] = ["obj/alien1.obj", "obj/alien2.obj", "obj/alien3.obj"];

impl ModelId {
    pub fn model_path(&self) -> &'static str {
        match self {
            ModelId::Player => "obj/player.obj",
            ModelId::Alien(variant) => ALIEN_PALETTE[*variant as usize % ALIEN_PALETTE.len()],
            ModelId::Mothership => "obj/mothership.obj",
            ModelId::Shield => "obj/shield.obj",
            ModelId::Laser => "obj/laser.obj",
            ModelId::Explosion => "obj/explosion.obj",
        }
    }

    /// Folder holding the .mtl file and textures
    pub fn material_path(&self) -> &'static str {
        "obj"
    }
}

/// Instantiates and frees renderable models
pub trait AssetGateway {
    /// Load a model; a failure leaves the entity undrawn but alive
    fn load_model(&mut self, model: ModelId) -> Result<RenderHandle, AssetError>;

    /// Free a handle previously returned by `load_model`
    fn release(&mut self, handle: RenderHandle);
}

/// Draws positioned models
pub trait RenderGateway {
    fn draw(&mut self, handle: RenderHandle, pos: Vec3, scale: f32);
}

/// Release an entity's render handle if it still holds one
///
/// The handle is taken out of the header, so repeated calls are no-ops.
pub fn release(header: &mut EntityHeader, assets: &mut dyn AssetGateway) {
    if let Some(handle) = header.render.take() {
        log::debug!("Releasing {} {:?}", header.kind.as_str(), header.id);
        assets.release(handle);
    }
}

fn draw_header(header: &EntityHeader, gateway: &mut dyn RenderGateway) {
    if let Some(handle) = header.render {
        gateway.draw(handle, header.pos, header.kind.draw_scale());
    }
}

/// Draw every live entity of the world
///
/// Null handles are skipped, as are a blinked-out player and a destroyed
/// mothership. Inactive lasers and explosions awaiting the sweep are not drawn.
pub fn draw_world(world: &GameWorld, gateway: &mut dyn RenderGateway) {
    if let Some(level) = world.levels.current() {
        if level.player.visible {
            draw_header(&level.player.header, gateway);
        }
        if level.mothership.alive {
            draw_header(&level.mothership.header, gateway);
        }
        for alien in &level.aliens {
            draw_header(&alien.header, gateway);
        }
        for shield in &level.shields {
            draw_header(&shield.header, gateway);
        }
    }
    for laser in world.lasers.iter().filter(|l| l.active) {
        draw_header(&laser.header, gateway);
    }
    for explosion in world.explosions.iter().filter(|e| e.active) {
        draw_header(&explosion.header, gateway);
    }
}
