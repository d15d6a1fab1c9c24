//! Enemy agents and their AI state machine.
//!
//! All archetypes share one update algorithm; only the stat table differs.
//!
//! ## State machine
//!
//! | From | To | When |
//! |------|----|------|
//! | `Idle` | `Pursuing` | target within detection range, not exempt, enemy aggressive, in sight |
//! | `Pursuing` | `Attacking` | target within attack range and in sight |
//! | `Attacking` | `Pursuing` | target beyond attack range or out of sight |
//! | any | `Idle` | target gone, exempt, or beyond detection range |
//!
//! At most one transition happens per tick; the enemy then acts according to
//! its new state.  Line of sight and obstacle avoidance are one capability,
//! switched by [`CombatConfig::line_of_sight`]: when off, walls never block
//! sight and enemies walk straight at the target.

use crate::agent::{EnemyId, Health};
use crate::config::CombatConfig;
use crate::constants::{
    AVOIDANCE_LOOKAHEAD, ENEMY_TIER_CAP, MUZZLE_HEIGHT, TIER_DAMAGE_STEP, TIER_HEALTH_STEP,
};
use crate::geometry::{flat_direction_to, flat_distance, right_from_yaw, yaw_of};
use crate::motion::{blocked_at, integrate, line_blocked, resolve_against_obstacles};
use crate::motion::{Body, Obstacle, WorldBounds};
use crate::projectile::{Projectile, Shooter};
use crate::weapons::WeaponId;
use bevy::log::debug;
use bevy::math::Vec3;
use rand::Rng;

// ── Archetypes ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Soldier,
    Tank,
    Jeep,
}

/// Fixed per-archetype stats at tier 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeStats {
    pub health: f32,
    /// Walk speed (u/s).
    pub speed: f32,
    pub damage: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
    pub weapon: WeaponId,
    /// Shots per attack.
    pub burst: u32,
    /// Seconds between consecutive shots of one burst.
    pub burst_spacing: f32,
    pub half_extents: [f32; 3],
}

const SOLDIER: ArchetypeStats = ArchetypeStats {
    health: 50.0,
    speed: 5.0,
    damage: 10.0,
    detection_range: 50.0,
    attack_range: 20.0,
    attack_cooldown: 1.0,
    weapon: WeaponId::EnemyRifle,
    burst: 1,
    burst_spacing: 0.0,
    half_extents: [0.5, 1.0, 0.5],
};

const TANK: ArchetypeStats = ArchetypeStats {
    health: 200.0,
    speed: 3.0,
    damage: 30.0,
    detection_range: 60.0,
    attack_range: 25.0,
    attack_cooldown: 2.0,
    weapon: WeaponId::EnemyCannon,
    burst: 2,
    burst_spacing: 0.5,
    half_extents: [1.5, 1.0, 2.0],
};

const JEEP: ArchetypeStats = ArchetypeStats {
    health: 100.0,
    speed: 8.0,
    damage: 15.0,
    detection_range: 50.0,
    attack_range: 20.0,
    attack_cooldown: 1.2,
    weapon: WeaponId::EnemyMachineGun,
    burst: 2,
    burst_spacing: 0.15,
    half_extents: [1.0, 0.9, 1.6],
};

impl Archetype {
    pub fn stats(self) -> &'static ArchetypeStats {
        match self {
            Archetype::Soldier => &SOLDIER,
            Archetype::Tank => &TANK,
            Archetype::Jeep => &JEEP,
        }
    }
}

// ── AI state ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiState {
    #[default]
    Idle,
    Pursuing,
    Attacking,
}

/// What an enemy is hunting this tick: the player on foot, or the vehicle
/// they are driving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiTarget {
    /// Foot position, used for distances and steering.
    pub position: Vec3,
    /// Collider centre, used as the aim point.
    pub aim_point: Vec3,
    /// Invulnerable or otherwise not to be engaged.
    pub exempt: bool,
}

/// Everything an enemy reads from the world during its update.
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    pub target: Option<AiTarget>,
    pub obstacles: &'a [Obstacle],
    pub bounds: &'a WorldBounds,
    pub config: &'a CombatConfig,
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub archetype: Archetype,
    /// 1-based difficulty tier.
    pub tier: u32,
    pub body: Body,
    pub health: Health,
    /// Tier-scaled damage per shot.
    pub damage: f32,
    pub state: AiState,
    /// Passive enemies never start pursuing.
    pub aggressive: bool,
    /// Seconds until the next attack is allowed.
    pub attack_timer: f32,
    /// Countdowns of follow-up shots still owed by the current burst.
    pending_shots: Vec<f32>,
}

impl Enemy {
    pub fn new(id: EnemyId, archetype: Archetype, position: Vec3, tier: u32) -> Self {
        let stats = archetype.stats();
        let tier = tier.clamp(1, ENEMY_TIER_CAP);
        let steps = (tier - 1) as f32;
        Self {
            id,
            archetype,
            tier,
            body: Body::new(position, Vec3::from_array(stats.half_extents)),
            health: Health::new(stats.health * (1.0 + TIER_HEALTH_STEP * steps)),
            damage: stats.damage * (1.0 + TIER_DAMAGE_STEP * steps),
            state: AiState::Idle,
            aggressive: true,
            attack_timer: 0.0,
            pending_shots: Vec::new(),
        }
    }

    pub fn stats(&self) -> &'static ArchetypeStats {
        self.archetype.stats()
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    fn eye(&self) -> Vec3 {
        self.body.position + Vec3::Y * MUZZLE_HEIGHT
    }

    fn can_see(&self, target: &AiTarget, ctx: &AiContext) -> bool {
        !ctx.config.line_of_sight || !line_blocked(self.eye(), target.aim_point, ctx.obstacles)
    }

    /// Advance AI and motion by `dt`, returning any shots fired.
    pub fn update(&mut self, dt: f32, ctx: &AiContext, rng: &mut impl Rng) -> Vec<Projectile> {
        let mut fired = Vec::new();
        if !self.is_alive() {
            return fired;
        }
        self.attack_timer = (self.attack_timer - dt).max(0.0);

        let engaged = ctx
            .target
            .filter(|t| !t.exempt)
            .map(|t| (t, flat_distance(self.body.position, t.position), self.can_see(&t, ctx)));

        self.fire_pending_shots(dt, engaged.map(|(t, _, _)| t), &mut fired);

        let next = self.next_state(engaged.map(|(_, d, s)| (d, s)));
        if next != self.state {
            debug!("enemy {:?} {:?} -> {:?}", self.id, self.state, next);
            self.state = next;
        }

        match (self.state, engaged) {
            (AiState::Pursuing, Some((target, _, sees))) => {
                self.pursue(dt, &target, sees, ctx, rng);
            }
            (AiState::Attacking, Some((target, _, _))) => {
                self.halt();
                self.face(target.position);
                if self.attack_timer <= 0.0 {
                    self.start_attack(&target, &mut fired);
                }
            }
            _ => self.halt(),
        }

        integrate(&mut self.body, dt, ctx.bounds);
        resolve_against_obstacles(&mut self.body, ctx.obstacles);
        fired
    }

    /// One transition per tick.  `engaged` is `(distance, in_sight)` of a
    /// non-exempt target.
    fn next_state(&self, engaged: Option<(f32, bool)>) -> AiState {
        let stats = self.stats();
        let Some((distance, sees)) = engaged else {
            return AiState::Idle;
        };
        if distance > stats.detection_range {
            return AiState::Idle;
        }
        match self.state {
            AiState::Idle if self.aggressive && sees => AiState::Pursuing,
            AiState::Idle => AiState::Idle,
            AiState::Pursuing if distance <= stats.attack_range && sees => AiState::Attacking,
            AiState::Pursuing => AiState::Pursuing,
            AiState::Attacking if distance > stats.attack_range || !sees => AiState::Pursuing,
            AiState::Attacking => AiState::Attacking,
        }
    }

    fn halt(&mut self) {
        self.body.velocity.x = 0.0;
        self.body.velocity.z = 0.0;
    }

    fn face(&mut self, point: Vec3) {
        if let Some(dir) = flat_direction_to(self.body.position, point) {
            self.body.facing = yaw_of(dir);
        }
    }

    fn pursue(
        &mut self,
        dt: f32,
        target: &AiTarget,
        sees: bool,
        ctx: &AiContext,
        rng: &mut impl Rng,
    ) {
        let Some(toward) = flat_direction_to(self.body.position, target.position) else {
            self.halt();
            return;
        };
        self.body.facing = yaw_of(toward);
        let speed = self.stats().speed;
        let lateral = right_from_yaw(self.body.facing);

        // Out of sight: wander forward with a random lateral component.
        let mut heading = toward;
        if !sees {
            let jitter = ctx.config.los_jitter;
            let wander = toward + lateral * rng.gen_range(-jitter..=jitter);
            heading = wander.normalize_or(toward);
        }

        if ctx.config.line_of_sight {
            let lookahead = (speed * dt).max(AVOIDANCE_LOOKAHEAD);
            let ahead = self.body.position + heading * lookahead;
            if blocked_at(&self.body, ahead, ctx.obstacles) {
                let sidestep = [lateral, -lateral].into_iter().find(|side| {
                    !blocked_at(&self.body, self.body.position + *side * lookahead, ctx.obstacles)
                });
                match sidestep {
                    Some(side) => {
                        let v = side * speed * ctx.config.sidestep_speed_factor;
                        self.body.velocity.x = v.x;
                        self.body.velocity.z = v.z;
                    }
                    None => self.halt(),
                }
                return;
            }
        }

        self.body.velocity.x = heading.x * speed;
        self.body.velocity.z = heading.z * speed;
    }

    fn shot_at(&self, target: &AiTarget) -> Option<Projectile> {
        let stats = self.stats();
        let muzzle = self.eye();
        Projectile::spawn(
            muzzle,
            target.aim_point - muzzle,
            Shooter::Enemy(self.id),
            stats.weapon,
            stats.weapon.stats(),
        )
        .map(|p| {
            p.with_damage(self.damage)
                .with_range(stats.attack_range * 1.5)
        })
    }

    fn start_attack(&mut self, target: &AiTarget, fired: &mut Vec<Projectile>) {
        let stats = self.stats();
        fired.extend(self.shot_at(target));
        self.pending_shots = (1..stats.burst)
            .map(|i| i as f32 * stats.burst_spacing)
            .collect();
        self.attack_timer = stats.attack_cooldown;
    }

    /// Fire follow-up shots whose countdown elapsed.  Dropped if the target
    /// is gone.
    fn fire_pending_shots(
        &mut self,
        dt: f32,
        target: Option<AiTarget>,
        fired: &mut Vec<Projectile>,
    ) {
        if self.pending_shots.is_empty() {
            return;
        }
        let Some(target) = target else {
            self.pending_shots.clear();
            return;
        };
        for countdown in self.pending_shots.iter_mut() {
            *countdown -= dt;
        }
        let due = self.pending_shots.iter().filter(|c| **c <= 0.0).count();
        self.pending_shots.retain(|c| *c > 0.0);
        for _ in 0..due {
            fired.extend(self.shot_at(&target));
        }
    }

    /// Follow-up shots still owed by the current burst.
    pub fn pending_burst(&self) -> usize {
        self.pending_shots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn target_at(x: f32, z: f32) -> AiTarget {
        AiTarget {
            position: Vec3::new(x, 0.0, z),
            aim_point: Vec3::new(x, 1.0, z),
            exempt: false,
        }
    }

    fn run(enemy: &mut Enemy, target: Option<AiTarget>, obstacles: &[Obstacle]) -> Vec<Projectile> {
        let config = CombatConfig::default();
        let bounds = WorldBounds::new(config.map_size, config.edge_buffer);
        let ctx = AiContext {
            target,
            obstacles,
            bounds: &bounds,
            config: &config,
        };
        let mut rng = StdRng::seed_from_u64(7);
        enemy.update(DT, &ctx, &mut rng)
    }

    #[test]
    fn tiers_scale_health_and_damage() {
        let e = Enemy::new(EnemyId(0), Archetype::Soldier, Vec3::ZERO, 3);
        assert!((e.health.max() - 75.0).abs() < 1e-4);
        assert!((e.damage - 13.0).abs() < 1e-4);
        let capped = Enemy::new(EnemyId(1), Archetype::Soldier, Vec3::ZERO, 99);
        assert_eq!(capped.tier, ENEMY_TIER_CAP);
    }

    #[test]
    fn out_of_detection_range_stays_idle() {
        let mut e = Enemy::new(EnemyId(0), Archetype::Soldier, Vec3::ZERO, 1);
        run(&mut e, Some(target_at(0.0, 80.0)), &[]);
        assert_eq!(e.state, AiState::Idle);
        assert_eq!(e.position(), Vec3::ZERO);
    }

    #[test]
    fn pursues_then_attacks() {
        let mut e = Enemy::new(EnemyId(0), Archetype::Soldier, Vec3::ZERO, 1);
        let shots = run(&mut e, Some(target_at(0.0, 30.0)), &[]);
        assert_eq!(e.state, AiState::Pursuing);
        assert!(shots.is_empty());
        assert!(e.position().z > 0.0);

        e.body.place(Vec3::new(0.0, 0.0, 15.0));
        let shots = run(&mut e, Some(target_at(0.0, 30.0)), &[]);
        assert_eq!(e.state, AiState::Attacking);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].damage, 10.0);
        assert!((shots[0].max_range - 30.0).abs() < 1e-4);
    }

    #[test]
    fn exempt_target_drops_to_idle() {
        let mut e = Enemy::new(EnemyId(0), Archetype::Soldier, Vec3::ZERO, 1);
        e.state = AiState::Attacking;
        let mut target = target_at(0.0, 10.0);
        target.exempt = true;
        run(&mut e, Some(target), &[]);
        assert_eq!(e.state, AiState::Idle);
    }

    #[test]
    fn passive_enemy_never_pursues() {
        let mut e = Enemy::new(EnemyId(0), Archetype::Soldier, Vec3::ZERO, 1);
        e.aggressive = false;
        run(&mut e, Some(target_at(0.0, 10.0)), &[]);
        assert_eq!(e.state, AiState::Idle);
    }

    #[test]
    fn wall_blocks_detection() {
        let mut e = Enemy::new(EnemyId(0), Archetype::Soldier, Vec3::ZERO, 1);
        let wall = Obstacle::solid(Aabb::new(
            Vec3::new(-10.0, 0.0, 5.0),
            Vec3::new(10.0, 4.0, 6.0),
        ));
        run(&mut e, Some(target_at(0.0, 15.0)), &[wall]);
        assert_eq!(e.state, AiState::Idle);
    }

    #[test]
    fn tank_burst_fires_follow_up_shot() {
        let mut e = Enemy::new(EnemyId(0), Archetype::Tank, Vec3::ZERO, 1);
        e.state = AiState::Attacking;
        let first = run(&mut e, Some(target_at(0.0, 10.0)), &[]);
        assert_eq!(first.len(), 1);
        assert!(first[0].is_explosive());
        assert_eq!(e.pending_burst(), 1);

        let mut follow_ups = 0;
        for _ in 0..40 {
            follow_ups += run(&mut e, Some(target_at(0.0, 10.0)), &[]).len();
        }
        assert_eq!(follow_ups, 1);
        assert_eq!(e.pending_burst(), 0);
    }

    #[test]
    fn blocked_path_sidesteps() {
        let mut e = Enemy::new(EnemyId(0), Archetype::Soldier, Vec3::ZERO, 1);
        e.state = AiState::Pursuing;
        // Low crate: blocks the walk but not the line of sight at muzzle height.
        let crate_box = Obstacle::solid(Aabb::new(
            Vec3::new(-1.0, 0.0, 0.8),
            Vec3::new(1.0, 0.5, 2.0),
        ));
        run(&mut e, Some(target_at(0.0, 30.0)), &[crate_box]);
        assert_eq!(e.state, AiState::Pursuing);
        assert!(e.position().x.abs() > 0.0);
        assert!(e.body.velocity.z.abs() < 1e-6);
    }
}
