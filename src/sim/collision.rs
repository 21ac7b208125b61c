//! Collision detection and damage
//!
//! Every check is a center-distance threshold. Each category makes a single
//! pass over the laser collection: inactive lasers are erased (and released)
//! as they are met, active ones are tested against the category's targets.
//! A laser deactivated by one category is swept by the next, so every laser is
//! visited exactly once per category.

use glam::Vec3;

use super::entity::{Alien, Explosion, Laser, Mothership, Player, Shield};
use super::spawner::Spawner;
use super::state::{GameEvent, GameWorld};
use crate::renderer::{self, AssetGateway};
use crate::settings::Settings;
use crate::within;

/// Shared bookkeeping for one resolver invocation
pub struct Resolver<'a> {
    pub settings: &'a Settings,
    pub spawner: &'a mut Spawner,
    pub explosions: &'a mut Vec<Explosion>,
    pub score: &'a mut u64,
    pub events: &'a mut Vec<GameEvent>,
    pub assets: &'a mut dyn AssetGateway,
    pub now: f64,
}

/// What a full resolver pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub aliens_destroyed: usize,
    pub mothership_destroyed: bool,
    pub shields_destroyed: usize,
    pub player_hit: bool,
    pub player_killed: bool,
}

impl Resolver<'_> {
    fn spawn_explosion(&mut self, pos: Vec3) {
        let explosion = self.spawner.create_explosion(pos, self.now, self.assets);
        self.explosions.push(explosion);
    }

    /// Friendly lasers destroy the first alien within range
    pub fn lasers_vs_aliens(&mut self, lasers: &mut Vec<Laser>, aliens: &mut Vec<Alien>) -> usize {
        let radius = self.settings.alien_hit_radius;
        let mut destroyed = 0;
        lasers.retain_mut(|laser| {
            if !laser.active {
                renderer::release(&mut laser.header, self.assets);
                return false;
            }
            if !laser.is_friendly() {
                return true;
            }
            let hit = aliens
                .iter()
                .position(|alien| within(laser.header.pos, alien.header.pos, radius));
            if let Some(index) = hit {
                let mut alien = aliens.remove(index);
                let pos = alien.header.pos;
                renderer::release(&mut alien.header, self.assets);
                laser.active = false;
                *self.score += self.settings.alien_kill_score;
                self.spawn_explosion(pos);
                self.events.push(GameEvent::AlienDestroyed {
                    id: alien.header.id,
                    pos,
                });
                log::debug!("Alien {:?} destroyed at {:?}", alien.header.id, pos);
                destroyed += 1;
            }
            true
        });
        destroyed
    }

    /// Friendly lasers chip the mothership while it is alive
    ///
    /// Returns true on the hit that destroys it.
    pub fn lasers_vs_mothership(&mut self, lasers: &mut Vec<Laser>, ship: &mut Mothership) -> bool {
        let radius = self.settings.mothership_hit_radius;
        let mut destroyed = false;
        lasers.retain_mut(|laser| {
            if !laser.active {
                renderer::release(&mut laser.header, self.assets);
                return false;
            }
            if !laser.is_friendly() || !ship.alive {
                return true;
            }
            if !within(laser.header.pos, ship.header.pos, radius) {
                return true;
            }

            laser.active = false;
            ship.health = ship.health.saturating_sub(1);
            self.events.push(GameEvent::MothershipHit {
                health: ship.health,
            });
            if ship.health == 0 {
                ship.alive = false;
                let pos = ship.header.pos;
                *self.score += self.settings.mothership_kill_score;
                self.spawn_explosion(pos);
                renderer::release(&mut ship.header, self.assets);
                self.events.push(GameEvent::MothershipDestroyed { pos });
                log::info!("Mothership destroyed!");
                destroyed = true;
            }
            true
        });
        destroyed
    }

    /// Shields stop every laser, but only enemy fire damages them
    pub fn lasers_vs_shields(&mut self, lasers: &mut Vec<Laser>, shields: &mut Vec<Shield>) -> usize {
        let radius = self.settings.shield_hit_radius;
        let mut destroyed = 0;
        lasers.retain_mut(|laser| {
            if !laser.active {
                renderer::release(&mut laser.header, self.assets);
                return false;
            }
            let hit = shields
                .iter()
                .position(|shield| within(laser.header.pos, shield.header.pos, radius));
            let Some(index) = hit else {
                return true;
            };

            laser.active = false;
            if laser.is_friendly() {
                return true;
            }

            let shield = &mut shields[index];
            shield.health = shield.health.saturating_sub(1);
            self.events.push(GameEvent::ShieldHit {
                id: shield.header.id,
                health: shield.health,
            });
            if shield.health == 0 {
                let mut shield = shields.remove(index);
                renderer::release(&mut shield.header, self.assets);
                self.events.push(GameEvent::ShieldDestroyed {
                    id: shield.header.id,
                });
                log::debug!("Shield {:?} destroyed", shield.header.id);
                destroyed += 1;
            }
            true
        });
        destroyed
    }

    /// Enemy lasers damage the player outside the invincibility window
    ///
    /// Returns `(hit, killed)`.
    pub fn lasers_vs_player(&mut self, lasers: &mut Vec<Laser>, player: &mut Player) -> (bool, bool) {
        let radius = self.settings.player_hit_radius;
        let duration = self.settings.invincibility_duration;
        let now = self.now;
        let mut hit = false;
        lasers.retain_mut(|laser| {
            if !laser.active {
                renderer::release(&mut laser.header, self.assets);
                return false;
            }
            if laser.is_friendly()
                || player.is_dead()
                || player.is_invincible_at(now, duration)
                || !within(laser.header.pos, player.header.pos, radius)
            {
                return true;
            }

            laser.active = false;
            player.health = player.health.saturating_sub(1);
            hit = true;
            self.events.push(GameEvent::PlayerHit {
                health: player.health,
            });
            if player.is_dead() {
                log::info!("Player destroyed");
            } else {
                player.start_invincibility(now);
                log::debug!("Player hit, {} health left", player.health);
            }
            true
        });
        (hit, player.is_dead())
    }

    /// Drop lasers deactivated by the last category and expired explosions
    pub fn sweep(&mut self, lasers: &mut Vec<Laser>) {
        lasers.retain_mut(|laser| {
            if laser.active {
                return true;
            }
            renderer::release(&mut laser.header, self.assets);
            false
        });
        self.explosions.retain_mut(|explosion| {
            if explosion.active {
                return true;
            }
            renderer::release(&mut explosion.header, self.assets);
            false
        });
    }
}

/// Run every collision category against the active level, then sweep
pub fn resolve_collisions(
    world: &mut GameWorld,
    now: f64,
    assets: &mut dyn AssetGateway,
) -> CollisionReport {
    let GameWorld {
        settings,
        spawner,
        levels,
        lasers,
        explosions,
        score,
        events,
        ..
    } = world;
    let mut report = CollisionReport::default();
    let mut resolver = Resolver {
        settings,
        spawner,
        explosions,
        score,
        events,
        assets,
        now,
    };

    if let Some(level) = levels.current_mut() {
        report.aliens_destroyed = resolver.lasers_vs_aliens(lasers, &mut level.aliens);
        report.mothership_destroyed = resolver.lasers_vs_mothership(lasers, &mut level.mothership);
        report.shields_destroyed = resolver.lasers_vs_shields(lasers, &mut level.shields);
        let (hit, killed) = resolver.lasers_vs_player(lasers, &mut level.player);
        report.player_hit = hit;
        report.player_killed = killed;
    }
    resolver.sweep(lasers);
    report
}
