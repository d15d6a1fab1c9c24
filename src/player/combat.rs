//! Player firing, damage intake, weapon switching and pickups.

use super::state::Player;
use crate::agent::DamageOutcome;
use crate::config::CombatConfig;
use crate::constants::{BALLISTIC_LOFT, MUZZLE_FORWARD, MUZZLE_HEIGHT};
use crate::projectile::{Projectile, Shooter};
use crate::weapons::WeaponId;
use bevy::log::debug;
use bevy::math::Vec3;

impl Player {
    /// World position hand-held shots leave from.
    pub fn muzzle_position(&self) -> Vec3 {
        self.body.position + Vec3::Y * MUZZLE_HEIGHT + self.aim_direction * MUZZLE_FORWARD
    }

    /// Fire the selected weapon along `aim_direction`.
    ///
    /// Silently does nothing while dead, driving, cooling down or out of ammo.
    /// Firing from a vehicle is handled by the vehicle's own weapon.
    pub fn fire(&mut self) -> Option<Projectile> {
        if !self.is_alive() || self.in_vehicle() || self.fire_cooldown > 0.0 {
            return None;
        }
        if !self.arsenal.current_has_ammo() {
            debug!("fire ignored: {:?} is empty", self.arsenal.current());
            return None;
        }
        let weapon = self.arsenal.current();
        let stats = weapon.stats();
        let mut direction = self.aim_direction;
        if stats.ballistic {
            direction.y += BALLISTIC_LOFT;
        }
        let shot = Projectile::spawn(
            self.muzzle_position(),
            direction,
            Shooter::Player(self.id),
            weapon,
            stats,
        )?;
        if !self.arsenal.consume_round() {
            return None;
        }
        self.fire_cooldown = stats.fire_interval;
        Some(shot)
    }

    /// Apply incoming damage unless the invulnerability window is open.
    ///
    /// Any accepted hit (re)opens the window, so repeated hits inside it
    /// change health at most once.
    pub fn take_damage(&mut self, amount: f32, config: &CombatConfig) -> DamageOutcome {
        if self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        let outcome = self.health.apply_damage(amount);
        if outcome != DamageOutcome::Ignored {
            self.inv_timer = config.invulnerability_duration;
        }
        outcome
    }

    /// Switch to the next usable weapon; `None` if nothing else is usable.
    pub fn cycle_weapon(&mut self) -> Option<WeaponId> {
        if !self.is_alive() {
            return None;
        }
        self.arsenal.cycle()
    }

    /// Take a weapon pickup's rounds into the arsenal.
    pub fn collect_weapon(&mut self, weapon: WeaponId, rounds: u32) {
        self.arsenal.grant(weapon, rounds);
    }
}
