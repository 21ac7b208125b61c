//! Movement and boundary rules
//!
//! Player and lasers move by `speed * dt`. The swarm and the mothership step a
//! fixed distance per tick.

use super::entity::{Alien, Explosion, Laser, Mothership, Player};
use crate::settings::Settings;

/// Move the player along x (`dir` is -1, 0 or 1) and clamp to the playfield
pub fn move_player(player: &mut Player, dir: f32, dt: f32, settings: &Settings) {
    let pos = &mut player.header.pos;
    pos.x += dir * settings.player_speed * dt;
    pos.x = pos.x.clamp(settings.left_boundary, settings.right_boundary);
}

/// Advance the whole swarm one tick
///
/// If any alien is past the boundary it is heading for, the swarm flips
/// direction once and drops together; then every alien steps horizontally in
/// the (possibly new) direction. Returns true when the swarm flipped.
pub fn move_swarm(
    aliens: &mut [Alien],
    moving_right: &mut bool,
    speed: f32,
    settings: &Settings,
) -> bool {
    let hit_boundary = aliens.iter().any(|alien| {
        let x = alien.header.pos.x;
        if *moving_right {
            x > settings.right_boundary
        } else {
            x < settings.left_boundary
        }
    });

    if hit_boundary {
        *moving_right = !*moving_right;
        for alien in aliens.iter_mut() {
            alien.header.pos.y -= settings.alien_drop_distance;
        }
    }

    let step = if *moving_right { speed } else { -speed };
    for alien in aliens.iter_mut() {
        alien.header.pos.x += step;
    }

    hit_boundary
}

/// Patrol left and right
///
/// The boundary is checked before stepping, so the ship pokes one step past
/// the edge before turning around.
pub fn move_mothership(ship: &mut Mothership, settings: &Settings) {
    let x = ship.header.pos.x;
    if x < settings.left_boundary || x > settings.right_boundary {
        ship.moving_right = !ship.moving_right;
    }

    if ship.moving_right {
        ship.header.pos.x += settings.mothership_speed;
    } else {
        ship.header.pos.x -= settings.mothership_speed;
    }
}

/// Move active lasers and deactivate the ones that left the playfield
///
/// Deactivated lasers stay in the collection until the collision sweep.
pub fn advance_lasers(lasers: &mut [Laser], dt: f32, settings: &Settings) {
    for laser in lasers.iter_mut().filter(|l| l.active) {
        laser.header.pos += laser.dir * laser.speed * dt;
        let pos = laser.header.pos;
        if pos.y.abs() > settings.laser_max_abs_y || pos.x.abs() > settings.laser_max_abs_x {
            laser.active = false;
        }
    }
}

/// Deactivate explosions older than the configured lifetime
pub fn expire_explosions(explosions: &mut [Explosion], now: f64, settings: &Settings) {
    for explosion in explosions.iter_mut().filter(|e| e.active) {
        if now - explosion.spawned_at >= settings.explosion_lifetime {
            explosion.active = false;
        }
    }
}

/// Close the invincibility window when it runs out, blink while it is open
pub fn update_invincibility(player: &mut Player, now: f64, settings: &Settings) {
    if !player.invincible {
        return;
    }

    if !player.is_invincible_at(now, settings.invincibility_duration) {
        player.invincible = false;
        player.visible = true;
        return;
    }

    if now - player.last_blink >= settings.blink_interval {
        player.visible = !player.visible;
        player.last_blink = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessGateway;
    use crate::sim::entity::Faction;
    use crate::sim::spawner::Spawner;
    use glam::Vec3;
    use proptest::prelude::*;

    fn player_at(x: f32) -> Player {
        let mut spawner = Spawner::new();
        spawner.create_player(Vec3::new(x, -22.0, 0.0), 3, &mut HeadlessGateway::new())
    }

    fn swarm(positions: &[(f32, f32)]) -> Vec<Alien> {
        let mut spawner = Spawner::new();
        let mut assets = HeadlessGateway::new();
        positions
            .iter()
            .map(|&(x, y)| {
                let mut alien = spawner
                    .create_aliens(1, 1, 5.0, Vec3::ZERO, &mut assets)
                    .remove(0);
                alien.header.pos = Vec3::new(x, y, 0.0);
                alien
            })
            .collect()
    }

    #[test]
    fn test_player_moves_with_dt() {
        let settings = Settings::default();
        let mut player = player_at(0.0);
        move_player(&mut player, 1.0, 0.5, &settings);
        assert!((player.header.pos.x - 10.0).abs() < 1e-6);
        move_player(&mut player, -1.0, 0.25, &settings);
        assert!((player.header.pos.x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_player_clamped_to_boundary() {
        let settings = Settings::default();
        let mut player = player_at(49.9);
        move_player(&mut player, 1.0, 1.0, &settings);
        assert_eq!(player.header.pos.x, settings.right_boundary);

        let mut player = player_at(-49.9);
        move_player(&mut player, -1.0, 1.0, &settings);
        assert_eq!(player.header.pos.x, settings.left_boundary);
    }

    proptest! {
        #[test]
        fn prop_player_never_leaves_playfield(
            x in -200.0f32..200.0,
            dir in prop::sample::select(vec![-1.0f32, 0.0, 1.0]),
            dt in 0.0f32..0.5,
        ) {
            let settings = Settings::default();
            let mut player = player_at(x);
            move_player(&mut player, dir, dt, &settings);
            let px = player.header.pos.x;
            prop_assert!(px >= settings.left_boundary && px <= settings.right_boundary);
            if x > settings.right_boundary + settings.player_speed * dt + 1.0 {
                prop_assert_eq!(px, settings.right_boundary);
            }
            if x < settings.left_boundary - settings.player_speed * dt - 1.0 {
                prop_assert_eq!(px, settings.left_boundary);
            }
        }

        #[test]
        fn prop_swarm_keeps_formation(
            xs in prop::collection::vec(-60.0f32..60.0, 1..12),
            moving_right in any::<bool>(),
        ) {
            let settings = Settings::default();
            let positions: Vec<_> = xs.iter().enumerate().map(|(i, &x)| (x, i as f32)).collect();
            let mut aliens = swarm(&positions);
            let before: Vec<_> = aliens.iter().map(|a| a.header.pos).collect();
            let mut dir = moving_right;

            let flipped = move_swarm(&mut aliens, &mut dir, 0.03, &settings);
            prop_assert_eq!(flipped, dir != moving_right);

            // Every alien moves by the same offset
            let offset = aliens[0].header.pos - before[0];
            for (alien, old) in aliens.iter().zip(&before) {
                prop_assert!(((alien.header.pos - *old) - offset).length() < 1e-4);
            }
        }
    }

    #[test]
    fn test_swarm_bounces_and_drops_once() {
        let settings = Settings::default();
        let mut aliens = swarm(&[(50.5, 10.0), (45.5, 10.0), (40.5, 5.0)]);
        let mut moving_right = true;

        let flipped = move_swarm(&mut aliens, &mut moving_right, 0.03, &settings);

        assert!(flipped);
        assert!(!moving_right);
        assert!((aliens[0].header.pos.y - 9.5).abs() < 1e-6);
        assert!((aliens[2].header.pos.y - 4.5).abs() < 1e-6);
        // The horizontal step already uses the new direction
        assert!((aliens[0].header.pos.x - 50.47).abs() < 1e-4);
        assert!((aliens[1].header.pos.x - 45.47).abs() < 1e-4);
    }

    #[test]
    fn test_swarm_ignores_boundary_behind_it() {
        let settings = Settings::default();
        // Past the left edge but moving right: no flip
        let mut aliens = swarm(&[(-50.5, 10.0), (0.0, 10.0)]);
        let mut moving_right = true;

        let flipped = move_swarm(&mut aliens, &mut moving_right, 0.03, &settings);

        assert!(!flipped);
        assert!(moving_right);
        assert_eq!(aliens[1].header.pos.y, 10.0);
    }

    #[test]
    fn test_mothership_overshoots_then_turns() {
        let settings = Settings::default();
        let mut spawner = Spawner::new();
        let mut ship =
            spawner.create_mothership(Vec3::new(49.98, 25.0, 0.0), 10, &mut HeadlessGateway::new());

        move_mothership(&mut ship, &settings);
        assert!(ship.moving_right);
        assert!(ship.header.pos.x > settings.right_boundary);

        move_mothership(&mut ship, &settings);
        assert!(!ship.moving_right);
        assert!((ship.header.pos.x - 49.98).abs() < 1e-4);
    }

    #[test]
    fn test_laser_deactivates_only_past_ceiling() {
        let settings = Settings::default();
        let mut spawner = Spawner::new();
        let mut lasers = vec![spawner.create_laser(
            Vec3::ZERO,
            Vec3::Y,
            10.0,
            Faction::Friendly,
            &mut HeadlessGateway::new(),
        )];

        // 10 * 0.125 = 1.25 per tick; 28 ticks reach exactly y = 35
        for _ in 0..28 {
            advance_lasers(&mut lasers, 0.125, &settings);
            assert!(lasers[0].active);
        }
        assert_eq!(lasers[0].header.pos.y, 35.0);

        advance_lasers(&mut lasers, 0.125, &settings);
        assert!(!lasers[0].active);
        assert_eq!(lasers.len(), 1);

        // Inactive lasers no longer move
        advance_lasers(&mut lasers, 0.125, &settings);
        assert_eq!(lasers[0].header.pos.y, 36.25);
    }

    #[test]
    fn test_laser_deactivates_past_side_bound() {
        let settings = Settings::default();
        let mut spawner = Spawner::new();
        let mut lasers = vec![spawner.create_laser(
            Vec3::new(54.0, 0.0, 0.0),
            Vec3::X,
            10.0,
            Faction::Enemy,
            &mut HeadlessGateway::new(),
        )];
        advance_lasers(&mut lasers, 0.5, &settings);
        assert!(!lasers[0].active);
    }

    #[test]
    fn test_explosion_expires_after_lifetime() {
        let settings = Settings::default();
        let mut spawner = Spawner::new();
        let mut explosions =
            vec![spawner.create_explosion(Vec3::ZERO, 1.0, &mut HeadlessGateway::new())];

        expire_explosions(&mut explosions, 1.25, &settings);
        assert!(explosions[0].active);
        expire_explosions(&mut explosions, 1.5, &settings);
        assert!(!explosions[0].active);
    }

    #[test]
    fn test_invincibility_blinks_then_ends() {
        let settings = Settings::default();
        let mut player = player_at(0.0);
        player.start_invincibility(10.0);
        assert!(!player.visible);

        update_invincibility(&mut player, 10.1, &settings);
        assert!(!player.visible);
        update_invincibility(&mut player, 10.25, &settings);
        assert!(player.visible);
        update_invincibility(&mut player, 10.5, &settings);
        assert!(!player.visible);
        assert!(player.invincible);

        update_invincibility(&mut player, 15.0, &settings);
        assert!(!player.invincible);
        assert!(player.visible);
    }
}
