//! The world tick orchestrator.
//!
//! [`Battlefield`] owns every simulated collection (player, enemies,
//! vehicles, projectiles, pickups) plus the static obstacles handed in by the
//! environment.  Agents refer to each other only through ids.
//!
//! ## Tick order
//!
//! 1. Player motion and physics.
//! 2. Enemy AI and motion (shots fired here join the projectile list).
//! 3. Projectile flight and range/lifetime expiry.
//! 4. Vehicle driving and turret tracking.
//! 5. Collision pass: projectile hits, obstacle and vehicle pushes, occupant
//!    sync, entry proximity, pickups, contact damage.
//!
//! Removals are deferred to the end of the tick: spent projectiles detonate
//! (explosives) and are dropped, destroyed vehicles eject their occupant,
//! dead enemies are scored and removed.  No collection is shrunk while it is
//! being scanned.

use crate::agent::{AgentRef, DamageOutcome, EnemyId, PlayerId, VehicleId};
use crate::config::CombatConfig;
use crate::constants::{
    AIM_PLANE_HEIGHT, PICKUP_RADIUS, VEHICLE_SPAWN_RING, VEHICLE_WRECK_BLAST_RADIUS,
};
use crate::enemy::{AiContext, AiTarget, Archetype, Enemy};
use crate::error::{SimError, SimResult};
use crate::events::SimEvent;
use crate::geometry::{flat_distance, forward_from_yaw, ray_plane_intersection, right_from_yaw};
use crate::motion::{resolve_against_obstacles, resolve_overlap, Body, Obstacle, WorldBounds};
use crate::pickup::WeaponPickup;
use crate::player::{MovementIntent, Player};
use crate::projectile::{Expiry, Faction, Projectile};
use crate::vehicle::{Vehicle, VehicleKind};
use crate::weapons::WeaponId;
use bevy::log::{debug, info};
use bevy::math::Vec3;
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Gap (u) at which an enemy counts as touching the player.
const CONTACT_REACH: f32 = 0.1;

/// Clearance (u) left between an exiting player and the vehicle's collider.
const EXIT_CLEARANCE: f32 = 0.5;

/// Decoded input command from the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    /// Replace the held movement intent (drives the vehicle while seated).
    Move { intent: MovementIntent, sprint: bool },
    /// Aim at a world point.
    AimAt(Vec3),
    /// Aim along a camera ray; intersected with the aim plane.
    AimRay { origin: Vec3, direction: Vec3 },
    Fire,
    Jump,
    CycleWeapon,
    /// Enter the nearby vehicle, or leave the current one.
    Interact,
}

#[derive(Resource, Debug)]
pub struct Battlefield {
    config: CombatConfig,
    bounds: WorldBounds,
    obstacles: Vec<Obstacle>,
    player: Player,
    enemies: Vec<Enemy>,
    vehicles: Vec<Vehicle>,
    projectiles: Vec<Projectile>,
    pickups: Vec<WeaponPickup>,
    events: Vec<SimEvent>,
    rng: StdRng,
    next_enemy_id: u32,
    next_vehicle_id: u32,
    /// Vehicles destroyed by player-side damage this tick.
    vehicle_kills: Vec<VehicleId>,
    score: u32,
    elapsed: f32,
    game_over: bool,
}

impl Battlefield {
    /// New battlefield with the player standing at the origin.
    ///
    /// `seed` drives every random choice (AI wander), so two battlefields
    /// built with the same seed and fed the same commands evolve identically.
    pub fn new(config: CombatConfig, obstacles: Vec<Obstacle>, seed: u64) -> Self {
        let bounds = WorldBounds::new(config.map_size, config.edge_buffer);
        let player = Player::new(PlayerId(0), Vec3::ZERO, &config);
        Self {
            config,
            bounds,
            obstacles,
            player,
            enemies: Vec::new(),
            vehicles: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            events: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            next_enemy_id: 0,
            next_vehicle_id: 0,
            vehicle_kills: Vec::new(),
            score: 0,
            elapsed: 0.0,
            game_over: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn pickups(&self) -> &[WeaponPickup] {
        &self.pickups
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Simulated seconds since creation.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Hand out every event emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    fn check_placement(&self, kind: &'static str, body: &Body) -> SimResult<()> {
        if !body.position.is_finite() || !self.bounds.contains(body.position) {
            return Err(SimError::SpawnRejected {
                kind,
                reason: "outside the playable area",
            });
        }
        let collider = body.collider();
        if self
            .obstacles
            .iter()
            .any(|o| o.solid && collider.intersects(&o.collider))
        {
            return Err(SimError::SpawnRejected {
                kind,
                reason: "overlaps a solid obstacle",
            });
        }
        Ok(())
    }

    /// Place a new enemy at `position` with difficulty `tier` (1-based).
    pub fn spawn_enemy(
        &mut self,
        archetype: Archetype,
        position: Vec3,
        tier: u32,
    ) -> SimResult<EnemyId> {
        let id = EnemyId(self.next_enemy_id);
        let enemy = Enemy::new(id, archetype, position, tier);
        self.check_placement("enemy", &enemy.body)?;
        if flat_distance(position, self.player.position()) < self.config.min_enemy_spawn_distance {
            return Err(SimError::SpawnRejected {
                kind: "enemy",
                reason: "too close to the player",
            });
        }
        self.next_enemy_id += 1;
        info!(
            "Spawned {:?} tier {} as {:?} at {:?}",
            archetype, enemy.tier, id, position
        );
        self.enemies.push(enemy);
        Ok(id)
    }

    pub fn spawn_vehicle(&mut self, kind: VehicleKind, position: Vec3) -> SimResult<VehicleId> {
        let id = VehicleId(self.next_vehicle_id);
        let vehicle = Vehicle::new(id, kind, position);
        self.check_placement("vehicle", &vehicle.body)?;
        self.next_vehicle_id += 1;
        info!("Spawned {:?} as {:?} at {:?}", kind, id, position);
        self.vehicles.push(vehicle);
        Ok(id)
    }

    /// Drop a vehicle of random kind on a ring around the player.
    pub fn spawn_random_vehicle(&mut self) -> SimResult<VehicleId> {
        let kind = VehicleKind::ALL[self.rng.gen_range(0..VehicleKind::ALL.len())];
        let (near, far) = VEHICLE_SPAWN_RING;
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = self.rng.gen_range(near..far);
        let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * distance;
        let mut position = self.bounds.clamp(self.player.position() + offset);
        position.y = 0.0;
        self.spawn_vehicle(kind, position)
    }

    pub fn spawn_pickup(&mut self, weapon: WeaponId, position: Vec3) -> SimResult<()> {
        if !WeaponId::PLAYER_CYCLE.contains(&weapon) {
            return Err(SimError::SpawnRejected {
                kind: "pickup",
                reason: "not a player weapon",
            });
        }
        if !position.is_finite() || !self.bounds.contains(position) {
            return Err(SimError::SpawnRejected {
                kind: "pickup",
                reason: "outside the playable area",
            });
        }
        self.pickups.push(WeaponPickup::new(weapon, position));
        Ok(())
    }

    /// Inject an already-built projectile (scripted effects, tests).
    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.events.push(SimEvent::ProjectileFired {
            shooter: projectile.shooter,
            weapon: projectile.weapon,
        });
        self.projectiles.push(projectile);
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Apply one input command.  Illegal requests are silently ignored.
    pub fn apply_command(&mut self, command: PlayerCommand) {
        if self.game_over || !self.player.is_alive() {
            debug!("command {:?} ignored: player is dead", command);
            return;
        }
        match command {
            PlayerCommand::Move { intent, sprint } => match self.player.vehicle {
                Some(vid) => {
                    if let Some(vehicle) = self.vehicle_mut(vid) {
                        vehicle.set_drive_intent(intent);
                    }
                }
                None => self.player.set_movement_intent(intent, sprint),
            },
            PlayerCommand::AimAt(point) => self.player.aim_at(point, &self.config),
            PlayerCommand::AimRay { origin, direction } => {
                match ray_plane_intersection(origin, direction, AIM_PLANE_HEIGHT) {
                    Some(point) => self.player.aim_at(point, &self.config),
                    None => debug!("aim ray misses the aim plane"),
                }
            }
            PlayerCommand::Fire => self.fire(),
            PlayerCommand::Jump => self.player.jump(&self.config),
            PlayerCommand::CycleWeapon => {
                if let Some(weapon) = self.player.cycle_weapon() {
                    self.events.push(SimEvent::WeaponChanged { weapon });
                }
            }
            PlayerCommand::Interact => match (self.player.vehicle, self.player.can_enter_vehicle) {
                (Some(_), _) => self.exit_vehicle(),
                (None, Some(vid)) => self.enter_vehicle(vid),
                (None, None) => debug!("interact ignored: no vehicle in reach"),
            },
        }
    }

    fn fire(&mut self) {
        let shot = match self.player.vehicle {
            Some(vid) => self.vehicle_mut(vid).and_then(|v| v.fire()),
            None => self.player.fire(),
        };
        if let Some(shot) = shot {
            self.add_projectile(shot);
        }
    }

    /// Climb into `vid` if it is alive, empty and within reach.
    pub fn enter_vehicle(&mut self, vid: VehicleId) {
        if self.player.in_vehicle() || !self.player.is_alive() {
            return;
        }
        let reach = self.config.vehicle_interact_distance;
        let player_box = self.player.body.collider();
        let Some(vehicle) = self.vehicles.iter_mut().find(|v| v.id == vid) else {
            return;
        };
        if vehicle.body.collider().distance_to(&player_box) > reach {
            debug!("enter {:?} ignored: out of reach", vid);
            return;
        }
        if !vehicle.board(self.player.id) {
            debug!("enter {:?} ignored: occupied or destroyed", vid);
            return;
        }
        let seat = vehicle.seat_position();
        let facing = vehicle.body.facing;

        let player = &mut self.player;
        player.vehicle = Some(vid);
        player.can_enter_vehicle = None;
        player.aim_target = None;
        player.set_movement_intent(MovementIntent::Stop, false);
        player.sprinting = false;
        player.jumping = false;
        player.body.velocity = Vec3::ZERO;
        player.body.facing = facing;
        player.body.place(seat);

        info!("Player entered vehicle {:?}", vid);
        self.events.push(SimEvent::VehicleStateChanged {
            vehicle: vid,
            occupied: true,
        });
    }

    /// Leave the current vehicle, landing beside it.
    pub fn exit_vehicle(&mut self) {
        let Some(vid) = self.player.vehicle.take() else {
            return;
        };
        let vacated = self.vehicle_mut(vid).map(|v| v.vacate()).is_some();
        let exit = if vacated { self.exit_position(vid) } else { None };
        self.player.body.velocity = Vec3::ZERO;
        self.player.set_movement_intent(MovementIntent::Stop, false);
        if let Some(position) = exit {
            self.player.body.place(position);
        } else {
            let mut grounded = self.player.position();
            grounded.y = 0.0;
            self.player.body.place(grounded);
        }
        info!("Player left vehicle {:?}", vid);
        self.events.push(SimEvent::VehicleStateChanged {
            vehicle: vid,
            occupied: false,
        });
    }

    /// First free spot beside the vehicle: right, left, behind, in front.
    fn exit_position(&self, vid: VehicleId) -> Option<Vec3> {
        let vehicle = self.vehicle(vid)?;
        let hull = vehicle.body.collider();
        let half = vehicle.body.half_extents;
        let reach = half.x.max(half.z) + self.player.body.half_extents.x + EXIT_CLEARANCE;
        let right = right_from_yaw(vehicle.body.facing);
        let forward = forward_from_yaw(vehicle.body.facing);
        let mut base = vehicle.position();
        base.y = 0.0;

        let candidates = [right, -right, -forward, forward]
            .map(|offset| self.bounds.clamp(base + offset * reach));
        candidates
            .iter()
            .copied()
            .find(|&spot| {
                let probe = self.player.body.collider_at(spot);
                !probe.intersects(&hull)
                    && !self
                        .obstacles
                        .iter()
                        .any(|o| o.solid && probe.intersects(&o.collider))
                    && !self
                        .vehicles
                        .iter()
                        .any(|v| v.id != vid && probe.intersects(&v.body.collider()))
            })
            .or(Some(candidates[0]))
    }

    // ── Damage ───────────────────────────────────────────────────────────────

    /// Apply damage from outside the simulation (environment hazards,
    /// scripted events).  Follows the same rules as combat damage.
    pub fn damage(&mut self, target: AgentRef, amount: f32) -> DamageOutcome {
        self.damage_agent(target, amount, None)
    }

    fn damage_agent(&mut self, target: AgentRef, amount: f32, source: Option<Faction>) -> DamageOutcome {
        let (outcome, remaining) = match target {
            AgentRef::Player(_) => {
                let outcome = self.player.take_damage(amount, &self.config);
                (outcome, self.player.health.current())
            }
            AgentRef::Enemy(id) => match self.enemy_mut(id) {
                Some(enemy) => (enemy.health.apply_damage(amount), enemy.health.current()),
                None => return DamageOutcome::Ignored,
            },
            AgentRef::Vehicle(id) => match self.vehicle_mut(id) {
                Some(vehicle) => (vehicle.take_damage(amount), vehicle.health.current()),
                None => return DamageOutcome::Ignored,
            },
        };
        if outcome != DamageOutcome::Ignored {
            self.events.push(SimEvent::Damaged {
                target,
                amount: outcome.dealt(),
                remaining,
            });
        }
        if let (AgentRef::Vehicle(id), true, Some(Faction::Player)) =
            (target, outcome.is_kill(), source)
        {
            self.vehicle_kills.push(id);
        }
        outcome
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Advance the whole world by `dt` seconds (clamped to the configured
    /// maximum; non-finite deltas are skipped).
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() {
            return;
        }
        let dt = dt.clamp(0.0, self.config.max_frame_dt);
        self.elapsed += dt;

        // 1. Player
        self.player.update(dt, &self.config, &self.bounds);

        // 2. Enemies
        let ctx = AiContext {
            target: self.ai_target(),
            obstacles: &self.obstacles,
            bounds: &self.bounds,
            config: &self.config,
        };
        let mut fired = Vec::new();
        for enemy in self.enemies.iter_mut() {
            fired.extend(enemy.update(dt, &ctx, &mut self.rng));
        }
        for shot in fired {
            self.add_projectile(shot);
        }

        // 3. Projectiles
        let world_half = self.config.map_size * 0.5;
        for projectile in self.projectiles.iter_mut() {
            projectile.tick(dt, world_half);
        }

        // 4. Vehicles
        for vehicle in self.vehicles.iter_mut() {
            vehicle.update(dt, &self.config, &self.bounds);
        }
        self.aim_turrets();

        // 5. Collision pass
        self.resolve_projectile_hits();
        self.resolve_bodies();
        self.sync_occupant();
        self.refresh_vehicle_proximity();
        self.collect_pickups(dt);
        self.apply_contact_damage();

        // Deferred removals
        self.detonate_spent_projectiles();
        self.remove_destroyed_vehicles();
        self.remove_dead_enemies();
        self.check_player_death();
    }

    fn ai_target(&self) -> Option<AiTarget> {
        if !self.player.is_alive() {
            return None;
        }
        if let Some(vehicle) = self.player.vehicle.and_then(|vid| self.vehicle(vid)) {
            return Some(AiTarget {
                position: vehicle.position(),
                aim_point: vehicle.body.center(),
                exempt: false,
            });
        }
        Some(AiTarget {
            position: self.player.position(),
            aim_point: self.player.body.center(),
            exempt: self.player.is_invulnerable(),
        })
    }

    /// Point the driven vehicle's turret at the player's aim target, or at
    /// the nearest living enemy within detection range.
    fn aim_turrets(&mut self) {
        let Some(vid) = self.player.vehicle else {
            return;
        };
        let Some(hull) = self.vehicle(vid).map(|v| v.position()) else {
            return;
        };
        let range = self.config.turret_detection_range;
        let target = self.player.aim_target.or_else(|| {
            self.enemies
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| (flat_distance(hull, e.position()), e.position()))
                .filter(|(d, _)| *d <= range)
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, p)| p)
        });
        if let (Some(point), Some(vehicle)) = (target, self.vehicle_mut(vid)) {
            vehicle.aim_turret(point);
        }
    }

    /// First thing projectile `p` touches this tick, if any.
    fn find_hit(&self, p: &Projectile) -> Option<Expiry> {
        if p.is_spent() {
            return None;
        }
        let radius = self.config.projectile_hit_radius;
        let target = match p.faction() {
            Faction::Player => self
                .enemies
                .iter()
                .filter(|e| e.is_alive() && p.touches(&e.body.collider(), radius))
                .map(|e| AgentRef::Enemy(e.id))
                .next()
                .or_else(|| {
                    self.vehicles
                        .iter()
                        .filter(|v| v.is_alive() && !v.is_occupied())
                        .filter(|v| !p.shooter.is(AgentRef::Vehicle(v.id)))
                        .find(|v| p.touches(&v.body.collider(), radius))
                        .map(|v| AgentRef::Vehicle(v.id))
                }),
            Faction::Enemy => {
                let player = &self.player;
                if player.is_alive()
                    && !player.in_vehicle()
                    && p.touches(&player.body.collider(), radius)
                {
                    Some(AgentRef::Player(player.id))
                } else {
                    self.vehicles
                        .iter()
                        .filter(|v| v.is_alive() && v.is_occupied())
                        .find(|v| p.touches(&v.body.collider(), radius))
                        .map(|v| AgentRef::Vehicle(v.id))
                }
            }
        };
        if let Some(target) = target {
            return Some(Expiry::HitTarget(target));
        }
        self.obstacles
            .iter()
            .any(|o| o.solid && p.touches(&o.collider, radius))
            .then_some(Expiry::HitObstacle)
    }

    fn resolve_projectile_hits(&mut self) {
        for i in 0..self.projectiles.len() {
            let Some(hit) = self.find_hit(&self.projectiles[i]) else {
                continue;
            };
            let projectile = &mut self.projectiles[i];
            projectile.expire(hit);
            let (damage, faction) = (projectile.damage, projectile.faction());
            // A struck target takes full damage; an explosive's blast then
            // skips it.
            if let Expiry::HitTarget(target) = hit {
                self.damage_agent(target, damage, Some(faction));
            }
        }
    }

    /// Push vehicles out of obstacles, walkers out of vehicles, and the
    /// player out of obstacles.
    fn resolve_bodies(&mut self) {
        for vehicle in self.vehicles.iter_mut() {
            resolve_against_obstacles(&mut vehicle.body, &self.obstacles);
        }
        let hulls: Vec<_> = self
            .vehicles
            .iter()
            .filter(|v| v.is_alive())
            .map(|v| v.body.collider())
            .collect();
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            for hull in &hulls {
                resolve_overlap(&mut enemy.body, hull);
            }
        }
        if !self.player.in_vehicle() && self.player.is_alive() {
            for hull in &hulls {
                resolve_overlap(&mut self.player.body, hull);
            }
            resolve_against_obstacles(&mut self.player.body, &self.obstacles);
        }
    }

    /// Slave the seated player to the vehicle seat.
    fn sync_occupant(&mut self) {
        let Some(vid) = self.player.vehicle else {
            return;
        };
        let Some((seat, facing)) = self
            .vehicle(vid)
            .map(|v| (v.seat_position(), v.body.facing))
        else {
            return;
        };
        self.player.body.velocity = Vec3::ZERO;
        self.player.body.facing = facing;
        self.player.body.place(seat);
    }

    fn refresh_vehicle_proximity(&mut self) {
        if self.player.in_vehicle() || !self.player.is_alive() {
            self.player.can_enter_vehicle = None;
            return;
        }
        let reach = self.config.vehicle_interact_distance;
        let player_box = self.player.body.collider();
        self.player.can_enter_vehicle = self
            .vehicles
            .iter()
            .filter(|v| v.is_alive() && !v.is_occupied())
            .map(|v| (v.body.collider().distance_to(&player_box), v.id))
            .filter(|(gap, _)| *gap <= reach)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id);
    }

    fn collect_pickups(&mut self, dt: f32) {
        let collector = (!self.player.in_vehicle() && self.player.is_alive())
            .then(|| self.player.position());
        let mut collected = Vec::new();
        self.pickups.retain_mut(|pickup| {
            if collector.is_some_and(|at| flat_distance(at, pickup.position) <= PICKUP_RADIUS) {
                collected.push((pickup.weapon, pickup.rounds));
                return false;
            }
            !pickup.tick(dt)
        });
        for (weapon, rounds) in collected {
            self.player.collect_weapon(weapon, rounds);
            info!("Player picked up {:?} ({} rounds)", weapon, rounds);
            self.events.push(SimEvent::PickupCollected { weapon, rounds });
        }
    }

    fn apply_contact_damage(&mut self) {
        if self.player.in_vehicle() || !self.player.is_alive() {
            return;
        }
        let player_box = self.player.body.collider();
        let touching = self
            .enemies
            .iter()
            .any(|e| e.is_alive() && e.body.collider().distance_to(&player_box) <= CONTACT_REACH);
        if touching {
            let amount = self.config.enemy_contact_damage;
            self.damage_agent(AgentRef::Player(self.player.id), amount, Some(Faction::Enemy));
        }
    }

    // ── Deferred removals ────────────────────────────────────────────────────

    fn detonate_spent_projectiles(&mut self) {
        let blasts: Vec<_> = self
            .projectiles
            .iter()
            .filter(|p| p.is_spent())
            .filter_map(|p| {
                let struck = match p.spent {
                    Some(Expiry::HitTarget(target)) => Some(target),
                    _ => None,
                };
                p.detonation().map(|blast| (blast, struck))
            })
            .collect();
        self.projectiles.retain(|p| !p.is_spent());

        for (blast, struck) in blasts {
            self.events.push(SimEvent::Explosion {
                position: blast.position,
                radius: blast.radius,
                damaging: true,
            });
            let mut victims = Vec::new();
            match blast.faction {
                Faction::Player => {
                    victims.extend(
                        self.enemies
                            .iter()
                            .filter(|e| e.is_alive())
                            .map(|e| (AgentRef::Enemy(e.id), e.body.center())),
                    );
                    victims.extend(
                        self.vehicles
                            .iter()
                            .filter(|v| v.is_alive() && !v.is_occupied())
                            .map(|v| (AgentRef::Vehicle(v.id), v.body.center())),
                    );
                }
                Faction::Enemy => {
                    if self.player.is_alive() && !self.player.in_vehicle() {
                        victims.push((AgentRef::Player(self.player.id), self.player.body.center()));
                    }
                    victims.extend(
                        self.vehicles
                            .iter()
                            .filter(|v| v.is_alive() && v.is_occupied())
                            .map(|v| (AgentRef::Vehicle(v.id), v.body.center())),
                    );
                }
            }
            victims.retain(|(target, _)| Some(*target) != struck);
            for (target, center) in victims {
                let amount = blast.damage_at(center);
                if amount > 0.0 {
                    self.damage_agent(target, amount, Some(blast.faction));
                }
            }
        }
    }

    fn remove_destroyed_vehicles(&mut self) {
        let wrecks: Vec<_> = self
            .vehicles
            .iter()
            .filter(|v| !v.is_alive())
            .map(|v| (v.id, v.occupant, v.position()))
            .collect();
        let kills = std::mem::take(&mut self.vehicle_kills);

        for (vid, occupant, position) in wrecks {
            if occupant.is_some() && self.player.vehicle == Some(vid) {
                self.exit_vehicle();
                let amount = self.config.vehicle_destruction_damage;
                self.damage_agent(AgentRef::Player(self.player.id), amount, None);
            }
            self.events.push(SimEvent::Explosion {
                position,
                radius: VEHICLE_WRECK_BLAST_RADIUS,
                damaging: false,
            });
            self.events.push(SimEvent::Death {
                target: AgentRef::Vehicle(vid),
            });
            if kills.contains(&vid) {
                self.score += self.config.score_per_vehicle;
            }
            info!("Vehicle {:?} destroyed", vid);
        }
        self.vehicles.retain(|v| v.is_alive());
    }

    fn remove_dead_enemies(&mut self) {
        for enemy in self.enemies.iter().filter(|e| !e.is_alive()) {
            self.events.push(SimEvent::Death {
                target: AgentRef::Enemy(enemy.id),
            });
            self.score += self.config.score_per_enemy;
            info!("Enemy {:?} ({:?}) killed", enemy.id, enemy.archetype);
        }
        self.enemies.retain(|e| e.is_alive());
    }

    fn check_player_death(&mut self) {
        if self.game_over || self.player.is_alive() {
            return;
        }
        self.game_over = true;
        self.player.set_movement_intent(MovementIntent::Stop, false);
        self.events.push(SimEvent::Death {
            target: AgentRef::Player(self.player.id),
        });
        info!(
            "Player killed after {:.1}s with score {}",
            self.elapsed, self.score
        );
    }
}
