//! Firing
//!
//! The player fires on a shared cooldown. Aliens and the mothership fire on
//! independent per-tick random trials instead of cooldowns.

use glam::Vec3;
use rand::Rng;

use super::entity::{Faction, Laser};
use super::spawner::Spawner;
use super::state::{GameEvent, GameWorld};
use crate::aim;
use crate::renderer::AssetGateway;
use crate::settings::{FireTiming, Settings};

/// One Bernoulli trial: `random(0..modulus) < threshold` under the configured timing
pub fn roll_fire<R: Rng + ?Sized>(
    rng: &mut R,
    threshold: u32,
    modulus: u32,
    dt: f32,
    timing: FireTiming,
) -> bool {
    if modulus == 0 {
        return false;
    }
    match timing {
        FireTiming::PerTick => rng.random_range(0..modulus) < threshold,
        FireTiming::TimeScaled { .. } => {
            let p = timing.probability(threshold, modulus, dt);
            rng.random::<f64>() < p
        }
    }
}

/// Cooldown check for the player's gun
pub fn cooldown_ready(last_shot: Option<f64>, now: f64, cooldown: f64) -> bool {
    last_shot.is_none_or(|t| now - t >= cooldown)
}

fn push_laser(lasers: &mut Vec<Laser>, events: &mut Vec<GameEvent>, laser: Laser) {
    events.push(GameEvent::LaserFired {
        id: laser.header.id,
        faction: laser.faction(),
    });
    lasers.push(laser);
}

/// Player fire: straight up from just above the ship, gated by the cooldown
///
/// Returns true when a laser was spawned.
pub fn fire_player(
    world: &mut GameWorld,
    fire_held: bool,
    now: f64,
    assets: &mut dyn AssetGateway,
) -> bool {
    let GameWorld {
        settings,
        spawner,
        levels,
        lasers,
        events,
        last_shot,
        ..
    } = world;
    let Some(level) = levels.current() else {
        return false;
    };
    if !fire_held || !cooldown_ready(*last_shot, now, settings.shot_cooldown) {
        return false;
    }

    let start = level.player.header.pos + Vec3::new(0.0, settings.laser_spawn_offset, 0.0);
    let laser = spawner.create_laser(start, Vec3::Y, settings.laser_speed, Faction::Friendly, assets);
    push_laser(lasers, events, laser);
    *last_shot = Some(now);
    true
}

/// Alien fire: every living alien rolls once, hits aim at the player
///
/// Returns the number of lasers spawned.
pub fn fire_aliens(world: &mut GameWorld, dt: f32, assets: &mut dyn AssetGateway) -> usize {
    let GameWorld {
        settings,
        spawner,
        levels,
        lasers,
        events,
        rng,
        ..
    } = world;
    let Some(level) = levels.current() else {
        return 0;
    };

    let target = level.player.header.pos;
    let mut fired = 0;
    for alien in &level.aliens {
        if !roll_fire(
            rng,
            settings.alien_fire_threshold,
            settings.alien_fire_modulus,
            dt,
            settings.fire_timing,
        ) {
            continue;
        }
        let from = alien.header.pos;
        let dir = aim(from, target, Vec3::NEG_Y);
        let laser = spawner.create_laser(from, dir, settings.laser_speed, Faction::Enemy, assets);
        push_laser(lasers, events, laser);
        fired += 1;
    }
    fired
}

/// Mothership fire: one roll per tick while alive
///
/// Shoots straight down unless `mothership_aims_at_player` is set.
pub fn fire_mothership(world: &mut GameWorld, dt: f32, assets: &mut dyn AssetGateway) -> bool {
    let GameWorld {
        settings,
        spawner,
        levels,
        lasers,
        events,
        rng,
        ..
    } = world;
    let Some(level) = levels.current() else {
        return false;
    };
    if !level.mothership.alive {
        return false;
    }
    if !roll_fire(
        rng,
        settings.mothership_fire_threshold,
        settings.mothership_fire_modulus,
        dt,
        settings.fire_timing,
    ) {
        return false;
    }

    let target = settings
        .mothership_aims_at_player
        .then_some(level.player.header.pos);
    let from = level.mothership.header.pos;
    let laser = mothership_laser(from, target, settings, spawner, assets);
    push_laser(lasers, events, laser);
    true
}

/// Build a mothership laser toward `target`, or straight down without one
pub fn mothership_laser(
    from: Vec3,
    target: Option<Vec3>,
    settings: &Settings,
    spawner: &mut Spawner,
    assets: &mut dyn AssetGateway,
) -> Laser {
    let dir = match target {
        Some(t) => aim(from, t, Vec3::NEG_Y),
        None => Vec3::NEG_Y,
    };
    spawner.create_laser(from, dir, settings.laser_speed, Faction::Enemy, assets)
}
