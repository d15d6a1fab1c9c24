//! Weapon catalog and the player's arsenal.
//!
//! Stats are immutable data keyed by [`WeaponId`]; behaviour never branches
//! on the weapon beyond reading its record.

/// Every weapon known to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponId {
    Pistol,
    SemiAuto,
    FullAuto,
    GrenadeLauncher,
    Rifle,
    RocketLauncher,
    Laser,
    VehicleCannon,
    EnemyRifle,
    EnemyCannon,
    EnemyMachineGun,
}

/// Immutable stat record of one weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub name: &'static str,
    pub damage: f32,
    /// Minimum seconds between two shots.
    pub fire_interval: f32,
    /// Projectile speed (u/s).
    pub projectile_speed: f32,
    /// Distance after which the projectile expires.
    pub range: f32,
    /// Seconds after which the projectile expires.
    pub lifetime: f32,
    /// Explosive weapons carry a splash radius.
    pub splash_radius: Option<f32>,
    /// Rounds a fresh weapon (or pickup) carries; `None` is unlimited.
    pub ammo: Option<u32>,
    /// Lobbed along an arc instead of flying straight.
    pub ballistic: bool,
}

impl WeaponStats {
    pub fn is_explosive(&self) -> bool {
        self.splash_radius.is_some()
    }
}

const PISTOL: WeaponStats = WeaponStats {
    name: "Pistol",
    damage: 10.0,
    fire_interval: 0.5,
    projectile_speed: 40.0,
    range: 60.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: None,
    ballistic: false,
};

const SEMI_AUTO: WeaponStats = WeaponStats {
    name: "Semi-Auto",
    damage: 15.0,
    fire_interval: 0.25,
    projectile_speed: 40.0,
    range: 70.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: None,
    ballistic: false,
};

const FULL_AUTO: WeaponStats = WeaponStats {
    name: "Full-Auto",
    damage: 8.0,
    fire_interval: 0.1,
    projectile_speed: 40.0,
    range: 60.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: None,
    ballistic: false,
};

const GRENADE_LAUNCHER: WeaponStats = WeaponStats {
    name: "Grenade Launcher",
    damage: 40.0,
    fire_interval: 1.0,
    projectile_speed: 20.0,
    range: 40.0,
    lifetime: 3.0,
    splash_radius: Some(5.0),
    ammo: Some(10),
    ballistic: true,
};

const RIFLE: WeaponStats = WeaponStats {
    name: "Rifle",
    damage: 20.0,
    fire_interval: 0.2,
    projectile_speed: 50.0,
    range: 75.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: Some(30),
    ballistic: false,
};

const ROCKET_LAUNCHER: WeaponStats = WeaponStats {
    name: "Rocket Launcher",
    damage: 50.0,
    fire_interval: 1.0,
    projectile_speed: 30.0,
    range: 100.0,
    lifetime: 4.0,
    splash_radius: Some(5.0),
    ammo: Some(5),
    ballistic: false,
};

const LASER: WeaponStats = WeaponStats {
    name: "Laser",
    damage: 30.0,
    fire_interval: 0.1,
    projectile_speed: 60.0,
    range: 100.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: Some(50),
    ballistic: false,
};

const VEHICLE_CANNON: WeaponStats = WeaponStats {
    name: "Vehicle Cannon",
    damage: 15.0,
    fire_interval: 0.15,
    projectile_speed: 50.0,
    range: 80.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: None,
    ballistic: false,
};

// Enemy weapons: damage and range are overridden per shooter (tier scaling,
// attack range), the rest is read from here.

const ENEMY_RIFLE: WeaponStats = WeaponStats {
    name: "Enemy Rifle",
    damage: 10.0,
    fire_interval: 1.0,
    projectile_speed: 30.0,
    range: 30.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: None,
    ballistic: false,
};

const ENEMY_CANNON: WeaponStats = WeaponStats {
    name: "Enemy Cannon",
    damage: 30.0,
    fire_interval: 2.0,
    projectile_speed: 25.0,
    range: 37.5,
    lifetime: 2.5,
    splash_radius: Some(3.0),
    ammo: None,
    ballistic: false,
};

const ENEMY_MACHINE_GUN: WeaponStats = WeaponStats {
    name: "Enemy Machine Gun",
    damage: 15.0,
    fire_interval: 1.2,
    projectile_speed: 35.0,
    range: 30.0,
    lifetime: 2.0,
    splash_radius: None,
    ammo: None,
    ballistic: false,
};

impl WeaponId {
    /// Player-selectable weapons in cycle order.
    pub const PLAYER_CYCLE: [WeaponId; 7] = [
        WeaponId::Pistol,
        WeaponId::SemiAuto,
        WeaponId::FullAuto,
        WeaponId::GrenadeLauncher,
        WeaponId::Rifle,
        WeaponId::RocketLauncher,
        WeaponId::Laser,
    ];

    pub fn stats(self) -> &'static WeaponStats {
        match self {
            WeaponId::Pistol => &PISTOL,
            WeaponId::SemiAuto => &SEMI_AUTO,
            WeaponId::FullAuto => &FULL_AUTO,
            WeaponId::GrenadeLauncher => &GRENADE_LAUNCHER,
            WeaponId::Rifle => &RIFLE,
            WeaponId::RocketLauncher => &ROCKET_LAUNCHER,
            WeaponId::Laser => &LASER,
            WeaponId::VehicleCannon => &VEHICLE_CANNON,
            WeaponId::EnemyRifle => &ENEMY_RIFLE,
            WeaponId::EnemyCannon => &ENEMY_CANNON,
            WeaponId::EnemyMachineGun => &ENEMY_MACHINE_GUN,
        }
    }

    /// Seconds a dropped pickup of this weapon stays on the ground.
    pub fn pickup_lifespan(self) -> f32 {
        match self {
            WeaponId::RocketLauncher => 45.0,
            WeaponId::Laser => 40.0,
            _ => 30.0,
        }
    }

    fn cycle_index(self) -> Option<usize> {
        Self::PLAYER_CYCLE.iter().position(|&w| w == self)
    }
}

// ── Arsenal ──────────────────────────────────────────────────────────────────

const STARTING_WEAPONS: [WeaponId; 4] = [
    WeaponId::Pistol,
    WeaponId::SemiAuto,
    WeaponId::FullAuto,
    WeaponId::GrenadeLauncher,
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    owned: bool,
    /// Remaining rounds; `None` is unlimited.
    ammo: Option<u32>,
}

impl Slot {
    fn usable(&self) -> bool {
        self.owned && self.ammo.is_none_or(|n| n > 0)
    }
}

/// Weapons the player owns, their ammo, and the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Arsenal {
    slots: [Slot; WeaponId::PLAYER_CYCLE.len()],
    current: usize,
}

impl Default for Arsenal {
    /// Starting kit with the pistol selected.
    fn default() -> Self {
        let slots = WeaponId::PLAYER_CYCLE.map(|w| {
            let owned = STARTING_WEAPONS.contains(&w);
            let magazine = w.stats().ammo;
            Slot {
                owned,
                ammo: if owned { magazine } else { magazine.map(|_| 0) },
            }
        });
        Self { slots, current: 0 }
    }
}

impl Arsenal {
    pub fn current(&self) -> WeaponId {
        WeaponId::PLAYER_CYCLE[self.current]
    }

    pub fn owns(&self, weapon: WeaponId) -> bool {
        weapon
            .cycle_index()
            .is_some_and(|i| self.slots[i].owned)
    }

    /// Remaining rounds of `weapon`; `None` for unlimited or not a player weapon.
    pub fn ammo(&self, weapon: WeaponId) -> Option<u32> {
        weapon.cycle_index().and_then(|i| self.slots[i].ammo)
    }

    /// True if the selected weapon can fire a round right now.
    pub fn current_has_ammo(&self) -> bool {
        self.slots[self.current].usable()
    }

    /// Advance to the next owned slot that still has ammo.
    ///
    /// Returns the new weapon, or `None` if no other slot is usable.
    pub fn cycle(&mut self) -> Option<WeaponId> {
        let len = self.slots.len();
        (1..len)
            .map(|step| (self.current + step) % len)
            .find(|&i| self.slots[i].usable())
            .map(|i| {
                self.current = i;
                self.current()
            })
    }

    /// Spend one round of the selected weapon.  Returns `false` when empty.
    pub fn consume_round(&mut self) -> bool {
        let slot = &mut self.slots[self.current];
        match slot.ammo {
            None => slot.owned,
            Some(0) => false,
            Some(n) => {
                slot.ammo = Some(n - 1);
                slot.owned
            }
        }
    }

    /// Take ownership of `weapon` and add `rounds` to its magazine.
    pub fn grant(&mut self, weapon: WeaponId, rounds: u32) {
        if let Some(i) = weapon.cycle_index() {
            let slot = &mut self.slots[i];
            slot.owned = true;
            slot.ammo = slot.ammo.map(|n| n.saturating_add(rounds));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_four_weapons_on_pistol() {
        let arsenal = Arsenal::default();
        assert_eq!(arsenal.current(), WeaponId::Pistol);
        assert!(arsenal.owns(WeaponId::GrenadeLauncher));
        assert!(!arsenal.owns(WeaponId::Rifle));
        assert_eq!(arsenal.ammo(WeaponId::GrenadeLauncher), Some(10));
    }

    #[test]
    fn cycle_skips_unowned_and_wraps() {
        let mut arsenal = Arsenal::default();
        let seen: Vec<_> = (0..5).filter_map(|_| arsenal.cycle()).collect();
        assert_eq!(
            seen,
            vec![
                WeaponId::SemiAuto,
                WeaponId::FullAuto,
                WeaponId::GrenadeLauncher,
                WeaponId::Pistol,
                WeaponId::SemiAuto,
            ]
        );
    }

    #[test]
    fn cycle_skips_empty_slots() {
        let mut arsenal = Arsenal::default();
        arsenal.cycle();
        arsenal.cycle();
        arsenal.cycle();
        assert_eq!(arsenal.current(), WeaponId::GrenadeLauncher);
        for _ in 0..10 {
            assert!(arsenal.consume_round());
        }
        assert!(!arsenal.consume_round());
        assert!(!arsenal.current_has_ammo());
        assert_eq!(arsenal.cycle(), Some(WeaponId::Pistol));
        arsenal.cycle();
        arsenal.cycle();
        assert_eq!(arsenal.current(), WeaponId::FullAuto);
        assert_eq!(arsenal.cycle(), Some(WeaponId::Pistol));
    }

    #[test]
    fn grant_adds_ownership_and_rounds() {
        let mut arsenal = Arsenal::default();
        arsenal.grant(WeaponId::Rifle, 30);
        assert!(arsenal.owns(WeaponId::Rifle));
        assert_eq!(arsenal.ammo(WeaponId::Rifle), Some(30));
        arsenal.grant(WeaponId::Pistol, 30);
        assert_eq!(arsenal.ammo(WeaponId::Pistol), None);
    }

    #[test]
    fn explosive_weapons_have_splash() {
        assert!(WeaponId::GrenadeLauncher.stats().is_explosive());
        assert!(WeaponId::GrenadeLauncher.stats().ballistic);
        assert!(WeaponId::EnemyCannon.stats().is_explosive());
        assert!(!WeaponId::Laser.stats().is_explosive());
    }
}
