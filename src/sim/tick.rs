//! Per-frame simulation tick
//!
//! Routes input through the phase machine and, while playing, runs the
//! subsystems in a fixed order: movement, weapons, collisions, win check.

use super::collision::resolve_collisions;
use super::level::Level;
use super::movement::{
    advance_lasers, expire_explosions, move_mothership, move_player, move_swarm,
    update_invincibility,
};
use super::state::{GamePhase, GameWorld};
use super::weapons::{fire_aliens, fire_mothership, fire_player};
use crate::renderer::AssetGateway;

/// Input commands for a single tick
///
/// `left`, `right` and `fire` are held states; `pause`, `confirm` and
/// `restart` are press edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Fire held (the gun cooldown limits the rate)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start / next level
    pub confirm: bool,
    /// Back to the start screen after game over
    pub restart: bool,
    /// Demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Horizontal direction: -1, 0 or 1
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the world by one frame
///
/// `now` is the clock reading in seconds (cooldowns, invincibility, explosion
/// lifetime); `dt` is the frame delta used for player and laser motion.
pub fn tick(
    world: &mut GameWorld,
    input: &TickInput,
    now: f64,
    dt: f32,
    assets: &mut dyn AssetGateway,
) {
    world.events.clear();

    let input = if input.idle_mode {
        autopilot(world)
    } else {
        input.clone()
    };

    match world.phase {
        GamePhase::Start => {
            if input.confirm {
                world.set_phase(GamePhase::Playing);
            }
        }
        GamePhase::Paused => {
            if input.pause {
                world.set_phase(GamePhase::Playing);
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                world.reset(assets);
            }
        }
        GamePhase::NewLevel => {
            if input.confirm {
                world.set_phase(GamePhase::NewLevelStart);
                enter_next_level(world, assets);
            }
        }
        GamePhase::NewLevelStart => enter_next_level(world, assets),
        GamePhase::Playing => {
            if input.pause {
                world.set_phase(GamePhase::Paused);
                return;
            }
            step_playing(world, &input, now, dt, assets);
        }
    }
}

fn enter_next_level(world: &mut GameWorld, assets: &mut dyn AssetGateway) {
    world.start_next_level(assets);
    world.set_phase(GamePhase::Playing);
}

fn step_playing(
    world: &mut GameWorld,
    input: &TickInput,
    now: f64,
    dt: f32,
    assets: &mut dyn AssetGateway,
) {
    world.time_ticks += 1;

    // Movement
    if let Some(level) = world.levels.current_mut() {
        let settings = &world.settings;
        move_player(&mut level.player, input.horizontal(), dt, settings);
        move_swarm(
            &mut level.aliens,
            &mut level.aliens_moving_right,
            level.params.alien_speed,
            settings,
        );
        if level.mothership.alive {
            move_mothership(&mut level.mothership, settings);
        }
        update_invincibility(&mut level.player, now, settings);
    }
    advance_lasers(&mut world.lasers, dt, &world.settings);
    expire_explosions(&mut world.explosions, now, &world.settings);

    // Weapons
    fire_player(world, input.fire, now, assets);
    fire_aliens(world, dt, assets);
    fire_mothership(world, dt, assets);

    // Collisions
    let report = resolve_collisions(world, now, assets);
    if report.player_killed {
        log::info!("Game over with score {}", world.score);
        world.set_phase(GamePhase::GameOver);
        return;
    }

    // Win check
    if world.levels.current().is_some_and(Level::is_cleared) {
        log::info!("Level {} cleared", world.levels.level_number());
        world.clear_transient(assets);
        world.set_phase(GamePhase::NewLevel);
    }
}

/// Scripted input for demo mode
///
/// Confirms through menus, restarts after game over, and while playing tracks
/// the alien closest to the player horizontally with fire held.
pub fn autopilot(world: &GameWorld) -> TickInput {
    let mut input = TickInput::default();
    match world.phase {
        GamePhase::Start | GamePhase::NewLevel => input.confirm = true,
        GamePhase::GameOver => input.restart = true,
        GamePhase::Paused => input.pause = true,
        GamePhase::NewLevelStart => {}
        GamePhase::Playing => {
            let Some(level) = world.levels.current() else {
                return input;
            };
            let px = level.player.header.pos.x;
            let target = level
                .aliens
                .iter()
                .map(|a| a.header.pos.x)
                .min_by(|a, b| {
                    (a - px)
                        .abs()
                        .partial_cmp(&(b - px).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            if let Some(x) = target {
                // Small dead zone so the ship settles instead of jittering
                input.left = x < px - 0.5;
                input.right = x > px + 0.5;
            }
            input.fire = true;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::renderer::{self, HeadlessGateway};
    use crate::settings::Settings;
    use crate::sim::entity::Faction;
    use crate::sim::state::GameEvent;
    use glam::Vec3;

    /// Enemies never fire, so tests are not at the mercy of the dice
    fn quiet_settings() -> Settings {
        Settings {
            alien_fire_threshold: 0,
            mothership_fire_threshold: 0,
            ..Settings::default()
        }
    }

    fn playing_world(settings: Settings) -> (GameWorld, HeadlessGateway) {
        let mut assets = HeadlessGateway::new();
        let mut world = GameWorld::new(settings, 12345, &mut assets);
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut world, &confirm, 0.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::Playing);
        (world, assets)
    }

    #[test]
    fn test_tick_start_to_playing() {
        let mut assets = HeadlessGateway::new();
        let mut world = GameWorld::new(quiet_settings(), 12345, &mut assets);
        assert_eq!(world.phase, GamePhase::Start);

        // Tick without confirm - should stay on the start screen
        tick(&mut world, &TickInput::default(), 0.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::Start);
        assert_eq!(world.time_ticks, 0);

        let input = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_tick_pause() {
        let (mut world, mut assets) = playing_world(quiet_settings());
        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::Paused);

        // Nothing moves while paused
        let before = world.levels.current().unwrap().aliens[0].header.pos;
        let ticks = world.time_ticks;
        let held = TickInput {
            right: true,
            fire: true,
            ..Default::default()
        };
        for i in 0..10 {
            tick(&mut world, &held, i as f64 * 0.1, SIM_DT, &mut assets);
        }
        assert_eq!(world.levels.current().unwrap().aliens[0].header.pos, before);
        assert_eq!(world.time_ticks, ticks);
        assert!(world.lasers.is_empty());

        // Unpause
        tick(&mut world, &input, 1.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_player_moves_and_fires() {
        let (mut world, mut assets) = playing_world(quiet_settings());
        let start_x = world.levels.current().unwrap().player.header.pos.x;
        let input = TickInput {
            right: true,
            fire: true,
            ..Default::default()
        };
        // Far enough right that the shot clears the shields
        tick(&mut world, &input, 0.5, 0.5, &mut assets);

        let player_x = world.levels.current().unwrap().player.header.pos.x;
        assert!((player_x - (start_x + 10.0)).abs() < 1e-5);
        assert_eq!(world.lasers.len(), 1);
        assert!(world.events.iter().any(|e| matches!(
            e,
            GameEvent::LaserFired {
                faction: Faction::Friendly,
                ..
            }
        )));
    }

    #[test]
    fn test_single_alien_cleared_opens_new_level() {
        let (mut world, mut assets) = playing_world(quiet_settings());
        {
            let level = world.levels.current_mut().unwrap();
            for alien in &mut level.aliens {
                renderer::release(&mut alien.header, &mut assets);
            }
            level.aliens.truncate(1);
            level.aliens[0].header.pos = Vec3::new(30.0, -5.0, 0.0);
            level.params.alien_speed = 0.0;
            level.player.header.pos = Vec3::new(30.0, -22.0, 0.0);
        }

        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut frame = 0;
        while world.phase == GamePhase::Playing && frame < 300 {
            frame += 1;
            tick(&mut world, &input, frame as f64 * SIM_DT as f64, SIM_DT, &mut assets);
        }

        assert_eq!(world.phase, GamePhase::NewLevel);
        assert_eq!(world.score, 50);
        assert!(world.lasers.is_empty());
        assert!(world.explosions.is_empty());

        // Confirm builds level 2 and resumes play in the same tick
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut world, &confirm, 10.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.levels.level_number(), 2);
        assert_eq!(world.levels.current().unwrap().aliens.len(), 25);
        assert!(world.events.contains(&GameEvent::LevelStarted { level: 2 }));
        assert!(world.events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::NewLevelStart,
            to: GamePhase::Playing
        }));
        assert_eq!(world.score, 50);
    }

    #[test]
    fn test_player_death_and_restart() {
        let (mut world, mut assets) = playing_world(quiet_settings());
        world.score = 300;
        let player_pos = {
            let player = &mut world.levels.current_mut().unwrap().player;
            player.health = 1;
            player.header.pos
        };
        let laser = world.spawner.create_laser(
            player_pos + Vec3::new(0.0, 0.5, 0.0),
            Vec3::NEG_Y,
            10.0,
            Faction::Enemy,
            &mut assets,
        );
        world.lasers.push(laser);

        tick(&mut world, &TickInput::default(), 1.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::GameOver);

        // Game over ignores everything but restart
        tick(&mut world, &TickInput { confirm: true, ..Default::default() }, 2.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut world, &restart, 3.0, SIM_DT, &mut assets);
        assert_eq!(world.phase, GamePhase::Start);
        assert_eq!(world.score, 0);
        assert_eq!(world.levels.level_number(), 1);
        assert_eq!(world.levels.current().unwrap().player.health, 3);
        assert!(world.lasers.is_empty());
        assert_eq!(assets.bad_releases, 0);
    }

    #[test]
    fn test_autopilot_plays() {
        let mut assets = HeadlessGateway::new();
        let mut world = GameWorld::new(quiet_settings(), 7, &mut assets);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut fired = false;
        for frame in 0..600 {
            tick(&mut world, &input, frame as f64 * SIM_DT as f64, SIM_DT, &mut assets);
            fired |= world
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::LaserFired { .. }));
        }
        assert_ne!(world.phase, GamePhase::Start);
        assert!(fired);
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed should produce identical results
        let settings = Settings {
            alien_fire_threshold: 1,
            alien_fire_modulus: 200,
            mothership_fire_threshold: 1,
            mothership_fire_modulus: 20,
            ..Settings::default()
        };
        let mut assets1 = HeadlessGateway::new();
        let mut assets2 = HeadlessGateway::new();
        let mut world1 = GameWorld::new(settings.clone(), 99999, &mut assets1);
        let mut world2 = GameWorld::new(settings, 99999, &mut assets2);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for frame in 0..900 {
            let now = frame as f64 * SIM_DT as f64;
            tick(&mut world1, &input, now, SIM_DT, &mut assets1);
            tick(&mut world2, &input, now, SIM_DT, &mut assets2);
        }

        assert_eq!(world1.snapshot(), world2.snapshot());
        assert_eq!(world1.lasers.len(), world2.lasers.len());
        for (a, b) in world1.lasers.iter().zip(&world2.lasers) {
            assert_eq!(a.header.id, b.header.id);
            assert_eq!(a.header.pos, b.header.pos);
        }
    }
}
