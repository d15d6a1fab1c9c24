//! Weapon pickups lying on the ground.

use crate::weapons::WeaponId;
use bevy::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponPickup {
    pub weapon: WeaponId,
    pub position: Vec3,
    /// Rounds granted on collection.
    pub rounds: u32,
    /// Seconds left before the pickup disappears.
    pub lifespan: f32,
}

impl WeaponPickup {
    pub fn new(weapon: WeaponId, position: Vec3) -> Self {
        Self {
            weapon,
            position,
            rounds: weapon.stats().ammo.unwrap_or(0),
            lifespan: weapon.pickup_lifespan(),
        }
    }

    /// Count down the lifespan; returns `true` once it has run out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.lifespan -= dt;
        self.lifespan <= 0.0
    }
}
