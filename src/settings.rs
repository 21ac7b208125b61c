//! Simulation tuning knobs
//!
//! Every threshold the simulation depends on lives here so a run can be
//! re-tuned from a JSON file without touching code. Missing fields fall back
//! to the reference values in [`crate::consts`].

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// How enemy fire trials relate to frame time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum FireTiming {
    /// One Bernoulli trial per tick regardless of dt (fire rate depends on frame rate)
    #[default]
    PerTick,
    /// Trial probability scaled so the expected rate matches `reference_dt` ticks
    TimeScaled { reference_dt: f32 },
}

impl FireTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            FireTiming::PerTick => "per-tick",
            FireTiming::TimeScaled { .. } => "time-scaled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "per-tick" | "tick" => Some(FireTiming::PerTick),
            "time-scaled" | "scaled" => Some(FireTiming::TimeScaled {
                reference_dt: SIM_DT,
            }),
            _ => None,
        }
    }

    /// Probability of firing this tick given the per-tick reference odds
    pub fn probability(&self, threshold: u32, modulus: u32, dt: f32) -> f64 {
        if modulus == 0 {
            return 0.0;
        }
        let p = (threshold.min(modulus) as f64) / modulus as f64;
        match *self {
            FireTiming::PerTick => p,
            FireTiming::TimeScaled { reference_dt } => {
                if reference_dt <= 0.0 {
                    return p;
                }
                let ticks = (dt / reference_dt) as f64;
                1.0 - (1.0 - p).powf(ticks)
            }
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub left_boundary: f32,
    pub right_boundary: f32,
    /// Lasers with |y| beyond this are deactivated
    pub laser_max_abs_y: f32,
    /// Lasers with |x| beyond this are deactivated
    pub laser_max_abs_x: f32,

    // === Player ===
    pub player_start: Vec3,
    pub player_speed: f32,
    pub player_health: u32,
    /// Seconds between player shots
    pub shot_cooldown: f64,
    pub invincibility_duration: f64,
    pub blink_interval: f64,

    // === Lasers ===
    pub laser_speed: f32,
    /// Vertical offset above the player where friendly lasers appear
    pub laser_spawn_offset: f32,

    // === Alien swarm ===
    pub alien_spacing: f32,
    /// Top row height of the swarm; x is centered on the playfield
    pub alien_origin_y: f32,
    pub alien_drop_distance: f32,
    pub alien_fire_threshold: u32,
    pub alien_fire_modulus: u32,

    // === Mothership ===
    pub mothership_start: Vec3,
    pub mothership_speed: f32,
    pub mothership_health: u32,
    pub mothership_fire_threshold: u32,
    pub mothership_fire_modulus: u32,
    /// Aim mothership shots at the player instead of straight down
    pub mothership_aims_at_player: bool,

    // === Shields ===
    pub shield_x_offsets: [f32; 3],
    pub shield_y: f32,

    // === Collision radii ===
    pub alien_hit_radius: f32,
    pub mothership_hit_radius: f32,
    pub player_hit_radius: f32,
    pub shield_hit_radius: f32,

    // === Scoring / effects ===
    pub alien_kill_score: u64,
    pub mothership_kill_score: u64,
    pub explosion_lifetime: f64,

    /// Enemy fire timing model
    pub fire_timing: FireTiming,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            left_boundary: LEFT_BOUNDARY,
            right_boundary: RIGHT_BOUNDARY,
            laser_max_abs_y: LASER_MAX_ABS_Y,
            laser_max_abs_x: LASER_MAX_ABS_X,

            player_start: Vec3::new(2.0, -22.0, 0.0),
            player_speed: PLAYER_SPEED,
            player_health: PLAYER_HEALTH,
            shot_cooldown: SHOT_COOLDOWN,
            invincibility_duration: INVINCIBILITY_DURATION,
            blink_interval: BLINK_INTERVAL,

            laser_speed: LASER_SPEED,
            laser_spawn_offset: LASER_SPAWN_OFFSET,

            alien_spacing: ALIEN_SPACING,
            alien_origin_y: 18.0,
            alien_drop_distance: ALIEN_DROP_DISTANCE,
            alien_fire_threshold: ALIEN_FIRE_THRESHOLD,
            alien_fire_modulus: ALIEN_FIRE_MODULUS,

            mothership_start: Vec3::new(1.0, 25.0, 0.0),
            mothership_speed: MOTHERSHIP_SPEED,
            mothership_health: MOTHERSHIP_HEALTH,
            mothership_fire_threshold: MOTHERSHIP_FIRE_THRESHOLD,
            mothership_fire_modulus: MOTHERSHIP_FIRE_MODULUS,
            mothership_aims_at_player: false,

            shield_x_offsets: [-20.0, 0.0, 20.0],
            shield_y: -15.0,

            alien_hit_radius: ALIEN_HIT_RADIUS,
            mothership_hit_radius: MOTHERSHIP_HIT_RADIUS,
            player_hit_radius: PLAYER_HIT_RADIUS,
            shield_hit_radius: SHIELD_HIT_RADIUS,

            alien_kill_score: ALIEN_KILL_SCORE,
            mothership_kill_score: MOTHERSHIP_KILL_SCORE,
            explosion_lifetime: EXPLOSION_LIFETIME,

            fire_timing: FireTiming::PerTick,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.left_boundary >= self.right_boundary {
            return Err(SettingsError::Invalid {
                field: "left_boundary",
                reason: format!(
                    "{} must be below right_boundary {}",
                    self.left_boundary, self.right_boundary
                ),
            });
        }
        if self.alien_fire_modulus == 0 {
            return Err(invalid("alien_fire_modulus", "must be non-zero"));
        }
        if self.mothership_fire_modulus == 0 {
            return Err(invalid("mothership_fire_modulus", "must be non-zero"));
        }
        if self.player_health == 0 {
            return Err(invalid("player_health", "must be at least 1"));
        }
        if self.mothership_health == 0 {
            return Err(invalid("mothership_health", "must be at least 1"));
        }
        if self.blink_interval <= 0.0 {
            return Err(invalid("blink_interval", "must be positive"));
        }
        if let FireTiming::TimeScaled { reference_dt } = self.fire_timing {
            if reference_dt <= 0.0 {
                return Err(invalid("fire_timing", "reference_dt must be positive"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "alien_fire_threshold": 7 }"#).unwrap();
        assert_eq!(settings.alien_fire_threshold, 7);
        assert_eq!(settings.alien_fire_modulus, ALIEN_FIRE_MODULUS);
        assert_eq!(settings.right_boundary, RIGHT_BOUNDARY);
    }

    #[test]
    fn test_rejects_inverted_boundaries() {
        let err = Settings::from_json(r#"{ "left_boundary": 10.0, "right_boundary": -10.0 }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "left_boundary", .. }));
    }

    #[test]
    fn test_rejects_zero_modulus() {
        let err = Settings::from_json(r#"{ "mothership_fire_modulus": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }

    #[test]
    fn test_fire_timing_probability() {
        let per_tick = FireTiming::PerTick;
        assert!((per_tick.probability(1, 300, 1.0) - 1.0 / 300.0).abs() < 1e-12);

        // One reference tick worth of dt gives the same odds
        let scaled = FireTiming::TimeScaled { reference_dt: 0.5 };
        assert!((scaled.probability(1, 4, 0.5) - 0.25).abs() < 1e-9);
        // Two ticks worth: 1 - 0.75^2
        assert!((scaled.probability(1, 4, 1.0) - 0.4375).abs() < 1e-6);
    }

    #[test]
    fn test_fire_timing_from_str() {
        assert_eq!(FireTiming::from_str("Per-Tick"), Some(FireTiming::PerTick));
        assert!(matches!(
            FireTiming::from_str("scaled"),
            Some(FireTiming::TimeScaled { .. })
        ));
        assert_eq!(FireTiming::from_str("sometimes"), None);
    }
}
