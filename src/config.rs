//! Runtime combat configuration loaded from `assets/combat.toml`.
//!
//! [`CombatConfig`] is a Bevy [`Resource`] that mirrors the runtime-tunable
//! subset of [`crate::constants`].  At startup, [`load_combat_config`] reads
//! `assets/combat.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! ## Usage outside Bevy
//!
//! The [`crate::battlefield::Battlefield`] takes a `CombatConfig` by value, so
//! tests and tools can build one with `CombatConfig::default()` or
//! [`CombatConfig::from_toml_str`] without an `App`.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `CombatConfig::default()`.

use crate::constants::*;
use crate::error::{require_non_negative, require_positive, require_unit_interval};
use crate::error::{SimError, SimResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Path the startup loader reads overrides from.
pub const COMBAT_CONFIG_PATH: &str = "assets/combat.toml";

/// Runtime-tunable combat configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // ── World Bounds ─────────────────────────────────────────────────────────
    pub map_size: f32,
    pub edge_buffer: f32,
    pub max_frame_dt: f32,

    // ── Player: Movement ──────────────────────────────────────────────────────
    pub player_speed: f32,
    pub sprint_multiplier: f32,
    pub backward_factor: f32,
    pub strafe_factor: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub player_friction: f32,

    // ── Player: Stamina ───────────────────────────────────────────────────────
    pub max_stamina: f32,
    pub stamina_drain_rate: f32,
    pub stamina_regen_rate: f32,

    // ── Player: Health & Aim ──────────────────────────────────────────────────
    pub player_max_health: f32,
    pub invulnerability_duration: f32,
    pub aim_smoothing: f32,

    // ── Vehicles ──────────────────────────────────────────────────────────────
    /// Per-kind health, speed and turn rate live in [`crate::vehicle::VehicleKind`].
    pub vehicle_friction: f32,
    pub turret_detection_range: f32,
    pub vehicle_interact_distance: f32,
    pub vehicle_destruction_damage: f32,

    // ── Enemy AI ──────────────────────────────────────────────────────────────
    /// When false, enemies see through walls and never sidestep.
    pub line_of_sight: bool,
    pub sidestep_speed_factor: f32,
    pub los_jitter: f32,
    pub enemy_contact_damage: f32,

    // ── Projectiles ───────────────────────────────────────────────────────────
    pub projectile_hit_radius: f32,

    // ── Scoring & Spawning ────────────────────────────────────────────────────
    pub score_per_enemy: u32,
    pub score_per_vehicle: u32,
    pub min_enemy_spawn_distance: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            // World Bounds
            map_size: MAP_SIZE,
            edge_buffer: EDGE_BUFFER,
            max_frame_dt: MAX_FRAME_DT,
            // Player: Movement
            player_speed: PLAYER_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            backward_factor: BACKWARD_FACTOR,
            strafe_factor: STRAFE_FACTOR,
            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            player_friction: PLAYER_FRICTION,
            // Player: Stamina
            max_stamina: MAX_STAMINA,
            stamina_drain_rate: STAMINA_DRAIN_RATE,
            stamina_regen_rate: STAMINA_REGEN_RATE,
            // Player: Health & Aim
            player_max_health: PLAYER_MAX_HEALTH,
            invulnerability_duration: INVULNERABILITY_DURATION,
            aim_smoothing: AIM_SMOOTHING,
            // Vehicles
            vehicle_friction: VEHICLE_FRICTION,
            turret_detection_range: TURRET_DETECTION_RANGE,
            vehicle_interact_distance: VEHICLE_INTERACT_DISTANCE,
            vehicle_destruction_damage: VEHICLE_DESTRUCTION_DAMAGE,
            // Enemy AI
            line_of_sight: true,
            sidestep_speed_factor: SIDESTEP_SPEED_FACTOR,
            los_jitter: LOS_JITTER,
            enemy_contact_damage: ENEMY_CONTACT_DAMAGE,
            // Projectiles
            projectile_hit_radius: PROJECTILE_HIT_RADIUS,
            // Scoring & Spawning
            score_per_enemy: SCORE_PER_ENEMY,
            score_per_vehicle: SCORE_PER_VEHICLE,
            min_enemy_spawn_distance: MIN_ENEMY_SPAWN_DISTANCE,
        }
    }
}

impl CombatConfig {
    /// Parse and validate an inline TOML document.
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        Self::parse_document("<inline>", text)
    }

    fn parse_document(path: &str, text: &str) -> SimResult<Self> {
        let config: CombatConfig = toml::from_str(text).map_err(|e| SimError::ConfigParse {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    ///
    /// Sizes, speeds and timers must be finite and positive; per-tick decay
    /// factors must stay in `[0, 1]`; the edge buffer must leave a playable
    /// area.
    pub fn validate(&self) -> SimResult<()> {
        require_positive("map_size", self.map_size)?;
        require_non_negative("edge_buffer", self.edge_buffer)?;
        if self.edge_buffer * 2.0 >= self.map_size {
            return Err(SimError::UnsafeConstant {
                name: "edge_buffer",
                value: self.edge_buffer,
                safe_range: "[0.0, map_size / 2)",
            });
        }
        require_positive("max_frame_dt", self.max_frame_dt)?;

        require_positive("player_speed", self.player_speed)?;
        require_positive("sprint_multiplier", self.sprint_multiplier)?;
        require_positive("backward_factor", self.backward_factor)?;
        require_positive("strafe_factor", self.strafe_factor)?;
        require_non_negative("jump_force", self.jump_force)?;
        require_positive("gravity", self.gravity)?;
        require_unit_interval("player_friction", self.player_friction)?;

        require_positive("max_stamina", self.max_stamina)?;
        require_non_negative("stamina_drain_rate", self.stamina_drain_rate)?;
        require_non_negative("stamina_regen_rate", self.stamina_regen_rate)?;

        require_positive("player_max_health", self.player_max_health)?;
        require_non_negative("invulnerability_duration", self.invulnerability_duration)?;
        require_unit_interval("aim_smoothing", self.aim_smoothing)?;

        require_unit_interval("vehicle_friction", self.vehicle_friction)?;
        require_non_negative("turret_detection_range", self.turret_detection_range)?;
        require_non_negative("vehicle_interact_distance", self.vehicle_interact_distance)?;
        require_non_negative(
            "vehicle_destruction_damage",
            self.vehicle_destruction_damage,
        )?;

        require_positive("sidestep_speed_factor", self.sidestep_speed_factor)?;
        require_non_negative("los_jitter", self.los_jitter)?;
        require_non_negative("enemy_contact_damage", self.enemy_contact_damage)?;

        require_positive("projectile_hit_radius", self.projectile_hit_radius)?;
        require_non_negative("min_enemy_spawn_distance", self.min_enemy_spawn_distance)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/combat.toml` and overwrite the
/// `CombatConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the simulation.  A missing file is not an
/// error (defaults are already in place from `init_resource`).
pub fn load_combat_config(mut config: ResMut<CombatConfig>) {
    let path = COMBAT_CONFIG_PATH;
    match std::fs::read_to_string(path) {
        Ok(contents) => match CombatConfig::parse_document(path, &contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded combat config from {path}");
            }
            Err(e) => {
                warn!("{e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CombatConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config =
            CombatConfig::from_toml_str("player_speed = 12.5\nline_of_sight = false\n").unwrap();
        assert_eq!(config.player_speed, 12.5);
        assert!(!config.line_of_sight);
        assert_eq!(config.gravity, GRAVITY);
        assert_eq!(config.score_per_vehicle, SCORE_PER_VEHICLE);
    }

    #[test]
    fn malformed_document_reports_parse_error() {
        let err = CombatConfig::from_toml_str("player_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse { .. }));
    }

    #[test]
    fn out_of_range_friction_is_rejected() {
        let err = CombatConfig::from_toml_str("vehicle_friction = 1.5").unwrap_err();
        assert_eq!(
            err,
            SimError::UnsafeConstant {
                name: "vehicle_friction",
                value: 1.5,
                safe_range: "[0.0, 1.0]",
            }
        );
    }

    #[test]
    fn edge_buffer_must_leave_playable_area() {
        let err = CombatConfig::from_toml_str("map_size = 10.0\nedge_buffer = 5.0").unwrap_err();
        assert!(matches!(
            err,
            SimError::UnsafeConstant {
                name: "edge_buffer",
                ..
            }
        ));
    }
}
