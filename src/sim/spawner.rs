//! Entity creation
//!
//! The spawner owns the id counter, so identities stay unique for the whole
//! process even across level teardown and game restarts.

use glam::Vec3;

use super::entity::{
    Alien, EntityHeader, EntityId, EntityKind, Explosion, Faction, Laser, Mothership, Player,
    Shield,
};
use crate::renderer::{ALIEN_PALETTE, AssetGateway, ModelId};

#[derive(Debug, Default)]
pub struct Spawner {
    next_id: u64,
}

impl Spawner {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Allocate a new entity ID (strictly increasing from 0)
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Build a header and ask the gateway for its model
    ///
    /// A failed load is logged and leaves the handle null.
    fn header(
        &mut self,
        kind: EntityKind,
        pos: Vec3,
        model: ModelId,
        assets: &mut dyn AssetGateway,
    ) -> EntityHeader {
        let mut header = EntityHeader::new(self.next_id(), kind, pos, model);
        match assets.load_model(model) {
            Ok(handle) => header.render = Some(handle),
            Err(e) => log::warn!(
                "{} {:?} will not be drawn: {}",
                kind.as_str(),
                header.id,
                e
            ),
        }
        header
    }

    pub fn create_player(
        &mut self,
        pos: Vec3,
        health: u32,
        assets: &mut dyn AssetGateway,
    ) -> Player {
        let header = self.header(EntityKind::Player, pos, ModelId::Player, assets);
        log::debug!("Player created with ID {:?}", header.id);
        Player::new(header, health)
    }

    pub fn create_mothership(
        &mut self,
        pos: Vec3,
        health: u32,
        assets: &mut dyn AssetGateway,
    ) -> Mothership {
        let header = self.header(EntityKind::Mothership, pos, ModelId::Mothership, assets);
        log::debug!("Mothership created with ID {:?}", header.id);
        Mothership {
            header,
            health,
            alive: true,
            moving_right: true,
        }
    }

    /// Lay out a `rows` x `cols` swarm; cell (row, col) sits at
    /// `origin + (col * spacing, -row * spacing, 0)`
    pub fn create_aliens(
        &mut self,
        rows: u32,
        cols: u32,
        spacing: f32,
        origin: Vec3,
        assets: &mut dyn AssetGateway,
    ) -> Vec<Alien> {
        let mut aliens = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            let variant = (row as usize % ALIEN_PALETTE.len()) as u8;
            for col in 0..cols {
                let pos = origin + Vec3::new(col as f32 * spacing, -(row as f32) * spacing, 0.0);
                let header = self.header(EntityKind::Alien, pos, ModelId::Alien(variant), assets);
                aliens.push(Alien {
                    header,
                    variant,
                    row,
                    col,
                });
            }
        }
        log::debug!("Created {} aliens", aliens.len());
        aliens
    }

    pub fn create_shield(
        &mut self,
        pos: Vec3,
        health: u32,
        assets: &mut dyn AssetGateway,
    ) -> Shield {
        let header = self.header(EntityKind::Shield, pos, ModelId::Shield, assets);
        Shield { header, health }
    }

    pub fn create_laser(
        &mut self,
        pos: Vec3,
        dir: Vec3,
        speed: f32,
        faction: Faction,
        assets: &mut dyn AssetGateway,
    ) -> Laser {
        let header = self.header(EntityKind::Laser, pos, ModelId::Laser, assets);
        Laser::new(header, dir, speed, faction)
    }

    pub fn create_explosion(
        &mut self,
        pos: Vec3,
        now: f64,
        assets: &mut dyn AssetGateway,
    ) -> Explosion {
        let header = self.header(EntityKind::Explosion, pos, ModelId::Explosion, assets);
        Explosion {
            header,
            spawned_at: now,
            active: true,
        }
    }
}
