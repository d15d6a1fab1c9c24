//! Player-operable vehicles: occupancy, driving, turret tracking, firing.
//!
//! A vehicle is either `Empty` or `Occupied` by exactly one player.  The
//! binding is a pair of non-owning ids (`Vehicle::occupant` and
//! `Player::vehicle`); the battlefield sets and clears both sides in the same
//! call so neither can dangle.
//!
//! While occupied the vehicle consumes the movement intents the player would
//! otherwise use, and the player's position is slaved to the seat.
//!
//! | Kind | Health | Speed (u/s) | Turn (rad/s) |
//! |------|--------|-------------|--------------|
//! | `Jeep` | 100 | 18 | 3.0 |
//! | `Tank` | 300 | 9 | 1.5 |

use crate::agent::{DamageOutcome, Health, PlayerId, VehicleId};
use crate::config::CombatConfig;
use crate::constants::{
    TURRET_BARREL_LENGTH, TURRET_HEIGHT, VEHICLE_CREEP_FACTOR, VEHICLE_SEAT_HEIGHT,
};
use crate::geometry::{flat_direction_to, forward_from_yaw, wrap_angle, yaw_of};
use crate::motion::{apply_friction, integrate, Body, WorldBounds};
use crate::player::{MoveDirection, MovementIntent};
use crate::projectile::{Projectile, Shooter};
use crate::weapons::WeaponId;
use bevy::math::{Vec2, Vec3};

/// Horizontal speed below which a turning vehicle creeps forward.
const CREEP_THRESHOLD: f32 = 0.1;

/// Stick deflection below which analog throttle/steer is ignored.
const STICK_DEADZONE: f32 = 0.1;

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    /// Light and quick, lightly armoured.
    Jeep,
    /// Slow and heavily armoured.
    Tank,
}

/// Fixed per-kind hull stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleStats {
    pub health: f32,
    /// Forward drive speed (u/s).
    pub speed: f32,
    /// Hull yaw rate (rad/s) while a turn command is held.
    pub turn_rate: f32,
    pub half_extents: [f32; 3],
}

const JEEP: VehicleStats = VehicleStats {
    health: 100.0,
    speed: 18.0,
    turn_rate: 3.0,
    half_extents: [1.25, 1.0, 1.8],
};

const TANK: VehicleStats = VehicleStats {
    health: 300.0,
    speed: 9.0,
    turn_rate: 1.5,
    half_extents: [1.75, 1.25, 2.5],
};

impl VehicleKind {
    pub const ALL: [VehicleKind; 2] = [VehicleKind::Jeep, VehicleKind::Tank];

    pub fn stats(self) -> &'static VehicleStats {
        match self {
            VehicleKind::Jeep => &JEEP,
            VehicleKind::Tank => &TANK,
        }
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub body: Body,
    pub health: Health,
    /// Player currently driving.  Non-owning.
    pub occupant: Option<PlayerId>,
    /// Turret yaw relative to the hull.
    pub turret_yaw: f32,
    /// Seconds until the cannon may fire again.
    pub fire_cooldown: f32,
    intent: MovementIntent,
}

impl Vehicle {
    pub fn new(id: VehicleId, kind: VehicleKind, position: Vec3) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            body: Body::new(position, Vec3::from_array(stats.half_extents)),
            health: Health::new(stats.health),
            occupant: None,
            turret_yaw: 0.0,
            fire_cooldown: 0.0,
            intent: MovementIntent::Stop,
        }
    }

    pub fn stats(&self) -> &'static VehicleStats {
        self.kind.stats()
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    // ── Occupancy ────────────────────────────────────────────────────────────

    /// Bind `player` as the driver.  No-op (returns `false`) when already
    /// occupied or destroyed.
    pub fn board(&mut self, player: PlayerId) -> bool {
        if self.occupant.is_some() || !self.is_alive() {
            return false;
        }
        self.occupant = Some(player);
        self.intent = MovementIntent::Stop;
        true
    }

    /// Unbind the driver, returning who it was.
    pub fn vacate(&mut self) -> Option<PlayerId> {
        self.intent = MovementIntent::Stop;
        self.occupant.take()
    }

    /// Where the occupant sits.
    pub fn seat_position(&self) -> Vec3 {
        self.body.position + Vec3::Y * VEHICLE_SEAT_HEIGHT
    }

    // ── Driving ──────────────────────────────────────────────────────────────

    /// Held drive command; ignored while empty.
    pub fn set_drive_intent(&mut self, intent: MovementIntent) {
        if self.is_occupied() {
            self.intent = intent;
        }
    }

    /// Advance the hull by `dt`.
    pub fn update(&mut self, dt: f32, config: &CombatConfig, bounds: &WorldBounds) {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        let driven = self.is_alive() && self.is_occupied() && self.drive(dt, config);
        if !driven {
            apply_friction(&mut self.body, config.vehicle_friction);
        }
        integrate(&mut self.body, dt, bounds);
    }

    /// Apply the held intent.  Returns `true` if it produced motion.
    fn drive(&mut self, dt: f32, config: &CombatConfig) -> bool {
        let (throttle, steer) = match self.intent {
            MovementIntent::Stop => return false,
            MovementIntent::Step(MoveDirection::Forward) => (1.0, 0.0),
            MovementIntent::Step(MoveDirection::Backward) => (-1.0, 0.0),
            MovementIntent::Step(MoveDirection::Left) => (0.0, -1.0),
            MovementIntent::Step(MoveDirection::Right) => (0.0, 1.0),
            MovementIntent::Analog(stick) => {
                if !stick.is_finite() {
                    return false;
                }
                let stick = stick.clamp_length_max(1.0);
                let axis = |v: f32| if v.abs() < STICK_DEADZONE { 0.0 } else { v };
                (axis(stick.y), axis(stick.x))
            }
        };
        if throttle == 0.0 && steer == 0.0 {
            return false;
        }

        let stats = self.stats();
        if steer != 0.0 {
            self.body.facing = wrap_angle(self.body.facing + steer * stats.turn_rate * dt);
        }
        let forward = forward_from_yaw(self.body.facing);
        let speed = if throttle > 0.0 {
            throttle * stats.speed
        } else if throttle < 0.0 {
            throttle * stats.speed * config.backward_factor
        } else {
            // Turning only: keep rolling along the new heading, or creep when
            // nearly stopped.
            let flat = Vec2::new(self.body.velocity.x, self.body.velocity.z);
            let rolling = flat.dot(Vec2::new(forward.x, forward.z));
            if flat.length() < CREEP_THRESHOLD {
                stats.speed * VEHICLE_CREEP_FACTOR
            } else {
                rolling.signum() * flat.length()
            }
        };
        self.body.velocity.x = forward.x * speed;
        self.body.velocity.z = forward.z * speed;
        true
    }

    // ── Turret ───────────────────────────────────────────────────────────────

    /// World yaw of the turret (hull yaw plus local turret yaw).
    pub fn turret_world_yaw(&self) -> f32 {
        wrap_angle(self.body.facing + self.turret_yaw)
    }

    /// Rotate the turret toward `point` on the horizontal plane only.
    pub fn aim_turret(&mut self, point: Vec3) {
        if let Some(dir) = flat_direction_to(self.body.position, point) {
            self.turret_yaw = wrap_angle(yaw_of(dir) - self.body.facing);
        }
    }

    pub fn muzzle_position(&self) -> Vec3 {
        self.body.position
            + Vec3::Y * TURRET_HEIGHT
            + forward_from_yaw(self.turret_world_yaw()) * TURRET_BARREL_LENGTH
    }

    /// Fire the cannon along the turret facing.  No-op while empty,
    /// destroyed, or cooling down.
    pub fn fire(&mut self) -> Option<Projectile> {
        if !self.is_alive() || !self.is_occupied() || self.fire_cooldown > 0.0 {
            return None;
        }
        let weapon = WeaponId::VehicleCannon;
        let stats = weapon.stats();
        let shot = Projectile::spawn(
            self.muzzle_position(),
            forward_from_yaw(self.turret_world_yaw()),
            Shooter::Vehicle(self.id),
            weapon,
            stats,
        )?;
        self.fire_cooldown = stats.fire_interval;
        Some(shot)
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health.apply_damage(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn vehicle() -> (Vehicle, CombatConfig, WorldBounds) {
        let config = CombatConfig::default();
        let bounds = WorldBounds::new(config.map_size, config.edge_buffer);
        (Vehicle::new(VehicleId(0), VehicleKind::Jeep, Vec3::ZERO), config, bounds)
    }

    #[test]
    fn kinds_trade_speed_for_armour() {
        let jeep = Vehicle::new(VehicleId(0), VehicleKind::Jeep, Vec3::ZERO);
        let tank = Vehicle::new(VehicleId(1), VehicleKind::Tank, Vec3::ZERO);
        assert_eq!(jeep.health.max(), 100.0);
        assert_eq!(tank.health.max(), 300.0);
        assert!(jeep.stats().speed > tank.stats().speed);
        assert_eq!(tank.body.half_extents, Vec3::new(1.75, 1.25, 2.5));
    }

    #[test]
    fn boarding_is_mutually_exclusive() {
        let (mut v, _, _) = vehicle();
        assert!(v.board(PlayerId(0)));
        assert!(!v.board(PlayerId(1)));
        assert_eq!(v.occupant, Some(PlayerId(0)));
        assert_eq!(v.vacate(), Some(PlayerId(0)));
        assert!(!v.is_occupied());
    }

    #[test]
    fn empty_vehicle_ignores_drive_and_fire() {
        let (mut v, config, bounds) = vehicle();
        v.set_drive_intent(MovementIntent::Step(MoveDirection::Forward));
        v.update(0.1, &config, &bounds);
        assert_eq!(v.position(), Vec3::ZERO);
        assert!(v.fire().is_none());
    }

    #[test]
    fn drives_forward_and_coasts_with_friction() {
        let (mut v, config, bounds) = vehicle();
        v.board(PlayerId(0));
        v.set_drive_intent(MovementIntent::Step(MoveDirection::Forward));
        v.update(0.1, &config, &bounds);
        assert!((v.position().z - 1.8).abs() < 1e-5);
        v.set_drive_intent(MovementIntent::Stop);
        v.update(0.1, &config, &bounds);
        assert!((v.body.velocity.z - 18.0 * 0.93).abs() < 1e-4);
    }

    #[test]
    fn turning_from_rest_creeps() {
        let (mut v, config, bounds) = vehicle();
        v.board(PlayerId(0));
        v.set_drive_intent(MovementIntent::Step(MoveDirection::Right));
        v.update(0.1, &config, &bounds);
        assert!((v.body.facing - 0.3).abs() < 1e-5);
        let speed = v.body.velocity.length();
        assert!((speed - 3.6).abs() < 1e-4);
    }

    #[test]
    fn turret_yaw_is_local_to_hull() {
        let (mut v, _, _) = vehicle();
        v.body.facing = FRAC_PI_2;
        v.aim_turret(Vec3::new(0.0, 5.0, 10.0));
        assert!((v.turret_yaw + FRAC_PI_2).abs() < 1e-5);
        assert!(v.turret_world_yaw().abs() < 1e-5);
    }

    #[test]
    fn cannon_fires_along_turret_from_barrel_tip() {
        let (mut v, _, _) = vehicle();
        v.board(PlayerId(0));
        v.aim_turret(Vec3::new(10.0, 0.0, 0.0));
        let shot = v.fire().unwrap();
        assert!((shot.direction - Vec3::X).length() < 1e-5);
        assert_eq!(shot.direction.y, 0.0);
        assert!((shot.origin - Vec3::new(2.6, 3.0, 0.0)).length() < 1e-4);
        assert!(v.fire().is_none());
    }
}
