//! Projectile lifecycle: spawn, advance, expire, detonate.
//!
//! A projectile's direction is fixed at spawn and is the only value used to
//! move it afterwards.  Ballistic shots are the single exception: their
//! `direction.y` sinks a little every tick, giving a lobbed arc.
//!
//! Hit detection against agents lives in the battlefield's collision pass;
//! this module only answers "does the shot touch this box" and "how much
//! splash does an agent at distance `d` take".

use crate::agent::{AgentRef, EnemyId, PlayerId, VehicleId};
use crate::constants::BALLISTIC_DROP;
use crate::geometry::{direction_to, sphere_touches_aabb, Aabb};
use crate::weapons::{WeaponId, WeaponStats};
use bevy::math::Vec3;

/// Side a shot was fired for; projectiles never damage their own side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

/// Who pulled the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shooter {
    Player(PlayerId),
    Enemy(EnemyId),
    Vehicle(VehicleId),
}

impl Shooter {
    /// Vehicles are only ever driven by the player.
    pub fn faction(&self) -> Faction {
        match self {
            Shooter::Player(_) | Shooter::Vehicle(_) => Faction::Player,
            Shooter::Enemy(_) => Faction::Enemy,
        }
    }

    /// True if `target` is the agent that fired this shot.
    pub fn is(&self, target: AgentRef) -> bool {
        match (*self, target) {
            (Shooter::Player(a), AgentRef::Player(b)) => a == b,
            (Shooter::Enemy(a), AgentRef::Enemy(b)) => a == b,
            (Shooter::Vehicle(a), AgentRef::Vehicle(b)) => a == b,
            _ => false,
        }
    }
}

/// Why a projectile stopped flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    LifetimeElapsed,
    RangeExhausted,
    HitTarget(AgentRef),
    HitObstacle,
    /// Left the map or dropped below the ground plane.
    LeftWorld,
}

/// A single fired shot.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub origin: Vec3,
    pub position: Vec3,
    /// Unit at spawn.
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub max_range: f32,
    pub distance_traveled: f32,
    /// Seconds since spawn.
    pub age: f32,
    pub lifetime: f32,
    pub shooter: Shooter,
    pub weapon: WeaponId,
    pub splash_radius: Option<f32>,
    pub ballistic: bool,
    /// Set once; a spent projectile is removed at the end of the phase.
    pub spent: Option<Expiry>,
}

impl Projectile {
    /// Create a shot from `origin` along `direction` using `stats`.
    ///
    /// Returns `None` for a zero-length direction; there is nowhere to fire.
    pub fn spawn(
        origin: Vec3,
        direction: Vec3,
        shooter: Shooter,
        weapon: WeaponId,
        stats: &WeaponStats,
    ) -> Option<Self> {
        let direction = direction_to(Vec3::ZERO, direction)?;
        Some(Self {
            origin,
            position: origin,
            direction,
            speed: stats.projectile_speed,
            damage: stats.damage,
            max_range: stats.range,
            distance_traveled: 0.0,
            age: 0.0,
            lifetime: stats.lifetime,
            shooter,
            weapon,
            splash_radius: stats.splash_radius,
            ballistic: stats.ballistic,
            spent: None,
        })
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.max_range = range;
        self
    }

    pub fn faction(&self) -> Faction {
        self.shooter.faction()
    }

    pub fn is_explosive(&self) -> bool {
        self.splash_radius.is_some()
    }

    pub fn is_spent(&self) -> bool {
        self.spent.is_some()
    }

    /// Mark the projectile spent; the first reason sticks.
    pub fn expire(&mut self, reason: Expiry) {
        if self.spent.is_none() {
            self.spent = Some(reason);
        }
    }

    /// Advance one tick and report the expiry it caused, if any.
    ///
    /// Expiry checks run in a fixed order: lifetime, range, then leaving the
    /// world (`world_half_size` on X/Z, or below `y = 0`).
    pub fn tick(&mut self, dt: f32, world_half_size: f32) -> Option<Expiry> {
        if self.spent.is_some() {
            return None;
        }
        let step = self.speed * dt;
        self.position += self.direction * step;
        self.distance_traveled += step;
        self.age += dt;
        if self.ballistic {
            self.direction.y -= BALLISTIC_DROP * dt;
        }

        let reason = if self.age >= self.lifetime {
            Some(Expiry::LifetimeElapsed)
        } else if self.distance_traveled >= self.max_range {
            Some(Expiry::RangeExhausted)
        } else if self.position.x.abs() > world_half_size
            || self.position.z.abs() > world_half_size
            || self.position.y < 0.0
        {
            Some(Expiry::LeftWorld)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.expire(reason);
        }
        reason
    }

    /// Proximity test against an agent or obstacle collider.
    pub fn touches(&self, collider: &Aabb, hit_radius: f32) -> bool {
        sphere_touches_aabb(self.position, hit_radius, collider)
    }

    /// The blast this projectile produces when it expires, if explosive.
    pub fn detonation(&self) -> Option<Blast> {
        self.splash_radius.map(|radius| Blast {
            position: self.position,
            radius,
            damage: self.damage,
            faction: self.faction(),
        })
    }
}

// ── Splash ───────────────────────────────────────────────────────────────────

/// Area-of-effect explosion produced by an expiring explosive shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blast {
    pub position: Vec3,
    pub radius: f32,
    pub damage: f32,
    /// The side that fired it; only the opposing side is damaged.
    pub faction: Faction,
}

impl Blast {
    /// Damage dealt to something whose collider centre is at `point`.
    pub fn damage_at(&self, point: Vec3) -> f32 {
        self.damage * splash_falloff(self.position.distance(point), self.radius)
    }
}

/// Linear falloff: 1 at the centre, 0 at (and beyond) the radius.
pub fn splash_falloff(distance: f32, radius: f32) -> f32 {
    if !(radius > 0.0) || !distance.is_finite() {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pistol_shot(direction: Vec3) -> Projectile {
        Projectile::spawn(
            Vec3::new(0.0, 1.0, 0.0),
            direction,
            Shooter::Player(PlayerId(0)),
            WeaponId::Pistol,
            WeaponId::Pistol.stats(),
        )
        .unwrap()
    }

    #[test]
    fn zero_direction_does_not_spawn() {
        let shot = Projectile::spawn(
            Vec3::ZERO,
            Vec3::ZERO,
            Shooter::Enemy(EnemyId(1)),
            WeaponId::EnemyRifle,
            WeaponId::EnemyRifle.stats(),
        );
        assert!(shot.is_none());
    }

    #[test]
    fn direction_is_normalised_and_never_changes() {
        let mut shot = pistol_shot(Vec3::new(3.0, 0.0, 4.0));
        let initial = shot.direction;
        assert!((initial.length() - 1.0).abs() < 1e-6);
        for _ in 0..20 {
            shot.tick(1.0 / 60.0, 250.0);
        }
        assert_eq!(shot.direction, initial);
    }

    #[test]
    fn ballistic_shots_sink() {
        let stats = WeaponId::GrenadeLauncher.stats();
        let mut shot = Projectile::spawn(
            Vec3::new(0.0, 1.2, 0.0),
            Vec3::new(0.0, 0.35, 1.0),
            Shooter::Player(PlayerId(0)),
            WeaponId::GrenadeLauncher,
            stats,
        )
        .unwrap();
        let before = shot.direction.y;
        shot.tick(0.1, 250.0);
        assert!(shot.direction.y < before);
    }

    #[test]
    fn range_expires_exactly_when_reached() {
        let mut shot = pistol_shot(Vec3::Z).with_range(50.0);
        shot.speed = 40.0;
        let mut ticks = 0;
        while shot.tick(0.25, 250.0).is_none() {
            ticks += 1;
            assert!(ticks < 10);
        }
        assert_eq!(shot.spent, Some(Expiry::RangeExhausted));
        assert_eq!(ticks + 1, 5);
        assert!((shot.distance_traveled - 50.0).abs() < 1e-4);
    }

    #[test]
    fn lifetime_is_checked_before_range() {
        let mut shot = pistol_shot(Vec3::Z).with_range(10.0);
        shot.lifetime = 0.25;
        assert_eq!(shot.tick(0.25, 250.0), Some(Expiry::LifetimeElapsed));
    }

    #[test]
    fn dropping_below_ground_leaves_world() {
        let mut shot = pistol_shot(Vec3::new(0.0, -1.0, 1.0));
        assert_eq!(shot.tick(0.1, 250.0), Some(Expiry::LeftWorld));
    }

    #[test]
    fn first_expiry_reason_sticks() {
        let mut shot = pistol_shot(Vec3::Z);
        shot.expire(Expiry::HitObstacle);
        shot.expire(Expiry::RangeExhausted);
        assert_eq!(shot.spent, Some(Expiry::HitObstacle));
        assert_eq!(shot.tick(0.1, 250.0), None);
    }

    #[test]
    fn splash_falls_off_linearly_and_monotonically() {
        assert!((splash_falloff(2.5, 5.0) - 0.5).abs() < 1e-6);
        assert_eq!(splash_falloff(5.0, 5.0), 0.0);
        assert_eq!(splash_falloff(7.0, 5.0), 0.0);
        let mut last = f32::INFINITY;
        for step in 0..=10 {
            let f = splash_falloff(step as f32 * 0.5, 5.0);
            assert!(f <= last);
            last = f;
        }
    }

    #[test]
    fn shooter_recognises_itself() {
        let shooter = Shooter::Vehicle(VehicleId(3));
        assert!(shooter.is(AgentRef::Vehicle(VehicleId(3))));
        assert!(!shooter.is(AgentRef::Vehicle(VehicleId(4))));
        assert_eq!(shooter.faction(), Faction::Player);
    }
}
