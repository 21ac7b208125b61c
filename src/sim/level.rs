//! Levels and difficulty progression

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Alien, Mothership, Player, Shield};
use super::spawner::Spawner;
use crate::consts::PLAYER_HEALTH;
use crate::renderer::{self, AssetGateway};
use crate::settings::Settings;

/// Difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub level: u32,
    pub rows: u32,
    pub cols: u32,
    pub shield_health: u32,
    pub player_health: u32,
    /// Horizontal swarm step per tick
    pub alien_speed: f32,
}

impl LevelParams {
    /// Scale difficulty for level `n` (1-based)
    pub fn for_level(n: u32) -> Self {
        Self {
            level: n,
            rows: 3 + n,
            cols: 3 + n,
            shield_health: 10 + 5 * n,
            player_health: PLAYER_HEALTH,
            alien_speed: 0.02 + 0.01 * n as f32,
        }
    }
}

/// Everything that lives and dies with one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub params: LevelParams,
    pub player: Player,
    pub mothership: Mothership,
    pub aliens: Vec<Alien>,
    pub shields: Vec<Shield>,
    /// Swarm direction (shared by every alien)
    pub aliens_moving_right: bool,
}

impl Level {
    /// Spawn the full bundle for `params`
    pub fn spawn(
        params: LevelParams,
        settings: &Settings,
        spawner: &mut Spawner,
        assets: &mut dyn AssetGateway,
    ) -> Self {
        let player = spawner.create_player(settings.player_start, params.player_health, assets);
        let mothership = spawner.create_mothership(
            settings.mothership_start,
            settings.mothership_health,
            assets,
        );

        // Center the grid horizontally
        let width = params.cols.saturating_sub(1) as f32 * settings.alien_spacing;
        let origin = Vec3::new(-width / 2.0, settings.alien_origin_y, 0.0);
        let aliens = spawner.create_aliens(
            params.rows,
            params.cols,
            settings.alien_spacing,
            origin,
            assets,
        );

        let shields = settings
            .shield_x_offsets
            .iter()
            .map(|&x| {
                spawner.create_shield(
                    Vec3::new(x, settings.shield_y, 0.0),
                    params.shield_health,
                    assets,
                )
            })
            .collect();

        Self {
            params,
            player,
            mothership,
            aliens,
            shields,
            aliens_moving_right: true,
        }
    }

    /// Release every render handle still held by the bundle
    pub fn teardown(&mut self, assets: &mut dyn AssetGateway) {
        renderer::release(&mut self.player.header, assets);
        renderer::release(&mut self.mothership.header, assets);
        for alien in &mut self.aliens {
            renderer::release(&mut alien.header, assets);
        }
        for shield in &mut self.shields {
            renderer::release(&mut shield.header, assets);
        }
        self.aliens.clear();
        self.shields.clear();
    }

    /// Win condition
    pub fn is_cleared(&self) -> bool {
        self.aliens.is_empty()
    }
}

/// Owns the active level and the level counter
#[derive(Debug, Default)]
pub struct LevelManager {
    level_number: u32,
    current: Option<Level>,
}

impl LevelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the active level (0 before the first level starts)
    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn current(&self) -> Option<&Level> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Level> {
        self.current.as_mut()
    }

    /// Tear down the active level and spawn the next, harder one
    pub fn start_next_level(
        &mut self,
        settings: &Settings,
        spawner: &mut Spawner,
        assets: &mut dyn AssetGateway,
    ) -> &mut Level {
        self.teardown(assets);
        self.level_number += 1;
        let params = LevelParams {
            player_health: settings.player_health,
            ..LevelParams::for_level(self.level_number)
        };
        log::info!(
            "Starting level {}: {}x{} aliens, shield health {}, alien speed {:.3}",
            params.level,
            params.rows,
            params.cols,
            params.shield_health,
            params.alien_speed
        );
        self.current.insert(Level::spawn(params, settings, spawner, assets))
    }

    /// Release the active level, if any
    pub fn teardown(&mut self, assets: &mut dyn AssetGateway) {
        if let Some(mut level) = self.current.take() {
            level.teardown(assets);
        }
    }
}
