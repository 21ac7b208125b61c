//! Game world and phase types
//!
//! Everything the simulation mutates lives in one [`GameWorld`] value that is
//! passed by `&mut` to each subsystem. Nothing is global.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Explosion, Faction, Laser};
use super::level::LevelManager;
use super::spawner::Spawner;
use crate::renderer::{self, AssetGateway};
use crate::settings::Settings;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player ran out of health
    GameOver,
    /// Swarm cleared, waiting for confirm
    NewLevel,
    /// Next level is being built (left again within the same tick)
    NewLevelStart,
}

/// Something that happened during a tick
///
/// Cleared at the start of every tick; hosts use these for HUD/audio hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    LevelStarted { level: u32 },
    LaserFired { id: EntityId, faction: Faction },
    AlienDestroyed { id: EntityId, pos: Vec3 },
    MothershipHit { health: u32 },
    MothershipDestroyed { pos: Vec3 },
    ShieldHit { id: EntityId, health: u32 },
    ShieldDestroyed { id: EntityId },
    PlayerHit { health: u32 },
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameWorld {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter (ticks spent in `Playing`)
    pub time_ticks: u64,
    pub spawner: Spawner,
    pub levels: LevelManager,
    /// Lasers in flight; inactive ones wait for the next sweep
    pub lasers: Vec<Laser>,
    pub explosions: Vec<Explosion>,
    /// Player gun cooldown timestamp
    pub last_shot: Option<f64>,
    /// Events recorded during the last tick
    pub events: Vec<GameEvent>,
}

impl GameWorld {
    /// Create a world on the start screen with level 1 already spawned
    pub fn new(settings: Settings, seed: u64, assets: &mut dyn AssetGateway) -> Self {
        let mut world = Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            score: 0,
            time_ticks: 0,
            spawner: Spawner::new(),
            levels: LevelManager::new(),
            lasers: Vec::new(),
            explosions: Vec::new(),
            last_shot: None,
            events: Vec::new(),
        };
        world.start_next_level(assets);
        world
    }

    /// Advance to the next level (tears down the current one)
    pub fn start_next_level(&mut self, assets: &mut dyn AssetGateway) {
        let level = self
            .levels
            .start_next_level(&self.settings, &mut self.spawner, assets);
        let number = level.params.level;
        self.events.push(GameEvent::LevelStarted { level: number });
    }

    /// Switch phase, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Drop every laser and explosion, releasing their handles
    pub fn clear_transient(&mut self, assets: &mut dyn AssetGateway) {
        for laser in &mut self.lasers {
            renderer::release(&mut laser.header, assets);
        }
        for explosion in &mut self.explosions {
            renderer::release(&mut explosion.header, assets);
        }
        self.lasers.clear();
        self.explosions.clear();
    }

    /// Back to a fresh level 1 on the start screen
    ///
    /// Score and level counter reset; entity ids keep counting.
    pub fn reset(&mut self, assets: &mut dyn AssetGateway) {
        self.clear_transient(assets);
        self.levels.teardown(assets);
        self.levels = LevelManager::new();
        self.score = 0;
        self.last_shot = None;
        self.start_next_level(assets);
        self.set_phase(GamePhase::Start);
    }

    /// Release everything the world still holds
    pub fn shutdown(&mut self, assets: &mut dyn AssetGateway) {
        self.clear_transient(assets);
        self.levels.teardown(assets);
        log::info!("Cleanup complete");
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let level = self.levels.current();
        WorldSnapshot {
            seed: self.seed,
            phase: self.phase,
            level: self.levels.level_number(),
            score: self.score,
            time_ticks: self.time_ticks,
            player_health: level.map_or(0, |l| l.player.health),
            player_invincible: level.is_some_and(|l| l.player.invincible),
            mothership_alive: level.is_some_and(|l| l.mothership.alive),
            mothership_health: level.map_or(0, |l| l.mothership.health),
            aliens: level.map_or(0, |l| l.aliens.len()),
            shields: level.map_or(0, |l| l.shields.len()),
            lasers: self.lasers.iter().filter(|l| l.active).count(),
            explosions: self.explosions.iter().filter(|e| e.active).count(),
        }
    }
}

/// Serializable summary of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub seed: u64,
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub time_ticks: u64,
    pub player_health: u32,
    pub player_invincible: bool,
    pub mothership_alive: bool,
    pub mothership_health: u32,
    pub aliens: usize,
    pub shields: usize,
    pub lasers: usize,
    pub explosions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessGateway;

    #[test]
    fn test_new_world_starts_on_level_one() {
        let mut assets = HeadlessGateway::new();
        let world = GameWorld::new(Settings::default(), 3, &mut assets);
        assert_eq!(world.phase, GamePhase::Start);
        assert_eq!(world.levels.level_number(), 1);
        assert_eq!(world.events, vec![GameEvent::LevelStarted { level: 1 }]);

        let snap = world.snapshot();
        assert_eq!(snap.aliens, 16);
        assert_eq!(snap.player_health, 3);
        assert_eq!(snap.mothership_health, 10);
    }

    #[test]
    fn test_reset_keeps_ids_unique() {
        let mut assets = HeadlessGateway::new();
        let mut world = GameWorld::new(Settings::default(), 3, &mut assets);
        let first_player = world.levels.current().unwrap().player.header.id;
        world.start_next_level(&mut assets);
        world.score = 900;

        world.reset(&mut assets);
        let level = world.levels.current().unwrap();
        assert_eq!(world.levels.level_number(), 1);
        assert_eq!(world.score, 0);
        assert!(level.player.header.id > first_player);
        assert_eq!(assets.bad_releases, 0);
    }

    #[test]
    fn test_shutdown_releases_all_handles() {
        let mut assets = HeadlessGateway::new();
        let mut world = GameWorld::new(Settings::default(), 3, &mut assets);
        crate::sim::weapons::fire_player(&mut world, true, 0.0, &mut assets);
        world.shutdown(&mut assets);
        assert_eq!(assets.live_handles(), 0);
        assert_eq!(assets.bad_releases, 0);
    }

    #[test]
    fn test_set_phase_records_transition_once() {
        let mut assets = HeadlessGateway::new();
        let mut world = GameWorld::new(Settings::default(), 3, &mut assets);
        world.events.clear();
        world.set_phase(GamePhase::Playing);
        world.set_phase(GamePhase::Playing);
        assert_eq!(
            world.events,
            vec![GameEvent::PhaseChanged {
                from: GamePhase::Start,
                to: GamePhase::Playing
            }]
        );
    }
}
