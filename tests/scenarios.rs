//! End-to-end combat scenarios driven through the public battlefield API.
//!
//! No Bevy app is involved: each test builds a [`Battlefield`] directly and
//! ticks it at fixed rates, so results are deterministic.
//!
//! Covered scenarios:
//! 1. Invulnerability swallows a second hit inside the window.
//! 2. A projectile expires on the tick its range is used up.
//! 3. Splash damage falls off linearly with distance.
//! 4. Sprinting drains stamina and stops at zero.
//! 5. An enemy pursues, then attacks and fires.
//! 6. Walls block sight and shots.
//! 7. Vehicles shield their driver and can be destroyed.
//! 8. Explosives deal full damage to what they strike, then splash.
//! 9. Turrets track the nearest enemy; enemies burst and touch.
//! 10. Aiming along a camera ray.

use bevy::math::Vec3;
use skirmish::agent::{AgentRef, DamageOutcome, EnemyId, PlayerId};
use skirmish::battlefield::{Battlefield, PlayerCommand};
use skirmish::config::CombatConfig;
use skirmish::enemy::{AiState, Archetype};
use skirmish::events::SimEvent;
use skirmish::geometry::Aabb;
use skirmish::motion::Obstacle;
use skirmish::player::{MoveDirection, MovementIntent};
use skirmish::projectile::{Expiry, Projectile, Shooter};
use skirmish::vehicle::VehicleKind;
use skirmish::weapons::WeaponId;
use std::f32::consts::FRAC_PI_2;

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f32 = 1.0 / 60.0;
const PLAYER: AgentRef = AgentRef::Player(PlayerId(0));

fn battlefield() -> Battlefield {
    Battlefield::new(CombatConfig::default(), Vec::new(), 7)
}

fn run(bf: &mut Battlefield, ticks: usize, dt: f32) {
    for _ in 0..ticks {
        bf.tick(dt);
    }
}

// ── 1. Invulnerability ────────────────────────────────────────────────────────

#[test]
fn second_hit_inside_window_is_ignored() {
    let mut bf = battlefield();

    assert!(matches!(bf.damage(PLAYER, 30.0), DamageOutcome::Wounded { .. }));
    assert_eq!(bf.player().health.current(), 70.0);

    run(&mut bf, 3, 0.1);
    assert_eq!(bf.damage(PLAYER, 30.0), DamageOutcome::Ignored);
    assert_eq!(bf.player().health.current(), 70.0);

    run(&mut bf, 8, 0.1);
    assert!(!bf.player().is_invulnerable());
    bf.damage(PLAYER, 30.0);
    assert_eq!(bf.player().health.current(), 40.0);
}

// ── 2. Range exhaustion ───────────────────────────────────────────────────────

#[test]
fn projectile_expires_when_range_is_used_up() {
    let stats = WeaponId::Pistol.stats();
    let mut shot = Projectile::spawn(
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::X,
        Shooter::Player(PlayerId(0)),
        WeaponId::Pistol,
        stats,
    )
    .unwrap()
    .with_range(50.0);

    for _ in 0..4 {
        assert_eq!(shot.tick(0.25, 250.0), None);
    }
    assert!((shot.distance_traveled - 40.0).abs() < 1e-4);
    assert_eq!(shot.tick(0.25, 250.0), Some(Expiry::RangeExhausted));
}

#[test]
fn battlefield_drops_projectile_after_range() {
    let mut bf = battlefield();
    let shot = Projectile::spawn(
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::X,
        Shooter::Player(PlayerId(0)),
        WeaponId::Pistol,
        WeaponId::Pistol.stats(),
    )
    .unwrap()
    .with_range(50.0);
    bf.add_projectile(shot);

    // 4 u per 0.1 s tick: alive after 12 ticks (48 u), gone on the 13th.
    run(&mut bf, 12, 0.1);
    assert_eq!(bf.projectiles().len(), 1);
    bf.tick(0.1);
    assert!(bf.projectiles().is_empty());
}

// ── 3. Splash falloff ─────────────────────────────────────────────────────────

#[test]
fn grenade_blast_deals_half_damage_at_half_radius() {
    let mut bf = battlefield();
    let id = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(0.0, 0.0, 20.0), 1)
        .unwrap();
    let edge = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(7.5, 0.0, 20.0), 1)
        .unwrap();
    bf.enemy_mut(id).unwrap().aggressive = false;
    bf.enemy_mut(edge).unwrap().aggressive = false;

    // Enemy collider centres sit at y = 1.
    let mut grenade = Projectile::spawn(
        Vec3::new(2.5, 1.0, 20.0),
        Vec3::X,
        Shooter::Player(PlayerId(0)),
        WeaponId::GrenadeLauncher,
        WeaponId::GrenadeLauncher.stats(),
    )
    .unwrap();
    grenade.expire(Expiry::HitObstacle);
    bf.add_projectile(grenade);
    bf.tick(DT);

    let health = bf.enemy(id).unwrap().health.current();
    assert!((health - 30.0).abs() < 1e-3, "health was {health}");
    assert_eq!(bf.enemy(edge).unwrap().health.current(), 50.0);
    let events = bf.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::Explosion {
            damaging: true,
            radius,
            ..
        } if *radius == 5.0
    )));
    // Player-side blasts never hurt the player.
    assert_eq!(bf.player().health.current(), 100.0);
}

// ── 4. Stamina ────────────────────────────────────────────────────────────────

#[test]
fn sprint_drains_stamina_to_zero_then_stops() {
    let mut bf = battlefield();
    bf.player_mut().stamina = 10.0;
    bf.apply_command(PlayerCommand::Move {
        intent: MovementIntent::Step(MoveDirection::Forward),
        sprint: true,
    });

    bf.tick(0.1);
    assert!(bf.player().sprinting);
    run(&mut bf, 4, 0.1);
    assert!(bf.player().stamina.abs() < 1e-4);
    assert!(!bf.player().sprinting);

    // Still walking at base speed.
    let speed = bf.player().body.velocity.length();
    assert!((speed - bf.config().player_speed).abs() < 1e-3);
}

// ── 5. Pursue then attack ─────────────────────────────────────────────────────

#[test]
fn soldier_pursues_then_attacks() {
    let mut bf = battlefield();
    let id = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(0.0, 0.0, 15.0), 1)
        .unwrap();

    bf.tick(DT);
    assert_eq!(bf.enemy(id).unwrap().state, AiState::Pursuing);

    bf.tick(DT);
    assert_eq!(bf.enemy(id).unwrap().state, AiState::Attacking);
    assert_eq!(bf.projectiles().len(), 1);
    let shot = &bf.projectiles()[0];
    assert_eq!(shot.shooter, Shooter::Enemy(id));
    assert!(shot.direction.z < 0.0);

    // 15 u at 30 u/s lands well within a second.
    run(&mut bf, 60, DT);
    assert_eq!(bf.player().health.current(), 90.0);
}

#[test]
fn invulnerable_player_is_not_engaged() {
    let mut bf = battlefield();
    let id = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(0.0, 0.0, 15.0), 1)
        .unwrap();
    bf.damage(PLAYER, 1.0);
    run(&mut bf, 5, DT);
    assert_eq!(bf.enemy(id).unwrap().state, AiState::Idle);
    assert!(bf.projectiles().is_empty());
}

// ── 6. Line of sight ──────────────────────────────────────────────────────────

fn walled(line_of_sight: bool) -> Battlefield {
    let wall = Obstacle::solid(Aabb::new(
        Vec3::new(-3.0, 0.0, 9.0),
        Vec3::new(3.0, 4.0, 10.0),
    ));
    let config = CombatConfig {
        line_of_sight,
        ..CombatConfig::default()
    };
    Battlefield::new(config, vec![wall], 3)
}

#[test]
fn wall_hides_player_from_enemy() {
    let mut bf = walled(true);
    let id = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(0.0, 0.0, 18.0), 1)
        .unwrap();
    run(&mut bf, 10, DT);
    assert_eq!(bf.enemy(id).unwrap().state, AiState::Idle);
}

#[test]
fn without_line_of_sight_walls_are_ignored() {
    let mut bf = walled(false);
    let id = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(0.0, 0.0, 18.0), 1)
        .unwrap();
    run(&mut bf, 2, DT);
    assert_eq!(bf.enemy(id).unwrap().state, AiState::Attacking);
}

#[test]
fn enemy_shot_stops_at_wall() {
    let mut bf = walled(true);
    let shot = Projectile::spawn(
        Vec3::new(0.0, 1.0, 15.0),
        -Vec3::Z,
        Shooter::Enemy(EnemyId(99)),
        WeaponId::EnemyRifle,
        WeaponId::EnemyRifle.stats(),
    )
    .unwrap();
    bf.add_projectile(shot);
    run(&mut bf, 60, DT);
    assert!(bf.projectiles().is_empty());
    assert_eq!(bf.player().health.current(), 100.0);
}

// ── 7. Vehicles ───────────────────────────────────────────────────────────────

#[test]
fn boarded_vehicle_shields_and_drives() {
    let mut bf = battlefield();
    let vid = bf.spawn_vehicle(VehicleKind::Jeep, Vec3::new(2.5, 0.0, 0.0)).unwrap();
    bf.tick(DT);
    bf.apply_command(PlayerCommand::Interact);
    assert_eq!(bf.player().vehicle, Some(vid));

    // Enemy fire now lands on the hull, not the driver.
    let shot = Projectile::spawn(
        Vec3::new(2.5, 1.0, 10.0),
        -Vec3::Z,
        Shooter::Enemy(EnemyId(5)),
        WeaponId::EnemyRifle,
        WeaponId::EnemyRifle.stats(),
    )
    .unwrap();
    bf.add_projectile(shot);
    run(&mut bf, 30, DT);
    assert_eq!(bf.player().health.current(), 100.0);
    assert_eq!(bf.vehicle(vid).unwrap().health.current(), 90.0);

    // Cannon fires from the turret, not the player's arsenal.
    bf.apply_command(PlayerCommand::Fire);
    let fired = bf.projectiles().last().unwrap();
    assert_eq!(fired.shooter, Shooter::Vehicle(vid));
    assert_eq!(fired.weapon, WeaponId::VehicleCannon);
}

#[test]
fn driving_ignored_while_on_foot_after_exit() {
    let mut bf = battlefield();
    let vid = bf.spawn_vehicle(VehicleKind::Jeep, Vec3::new(2.5, 0.0, 0.0)).unwrap();
    bf.tick(DT);
    bf.apply_command(PlayerCommand::Interact);
    bf.apply_command(PlayerCommand::Interact);
    bf.apply_command(PlayerCommand::Move {
        intent: MovementIntent::Step(MoveDirection::Forward),
        sprint: false,
    });
    run(&mut bf, 10, DT);
    assert_eq!(bf.vehicle(vid).unwrap().position(), Vec3::new(2.5, 0.0, 0.0));
    assert!(bf.player().position().z > 0.0);
}

#[test]
fn shooting_an_empty_vehicle_scores_on_destruction() {
    let mut bf = battlefield();
    let vid = bf.spawn_vehicle(VehicleKind::Jeep, Vec3::new(0.0, 0.0, 12.0)).unwrap();
    bf.vehicle_mut(vid).unwrap().health.apply_damage(95.0);
    bf.apply_command(PlayerCommand::Fire);
    run(&mut bf, 30, DT);

    assert!(bf.vehicle(vid).is_none());
    assert_eq!(bf.score(), 250);
    let events = bf.drain_events();
    assert!(events.contains(&SimEvent::Death {
        target: AgentRef::Vehicle(vid)
    }));
}

// ── 8. Explosive hits ─────────────────────────────────────────────────────────

fn select(bf: &mut Battlefield, weapon: WeaponId) {
    for _ in 0..WeaponId::PLAYER_CYCLE.len() {
        if bf.player().arsenal.current() == weapon {
            return;
        }
        bf.apply_command(PlayerCommand::CycleWeapon);
    }
    panic!("{weapon:?} is not selectable");
}

#[test]
fn direct_rocket_hit_kills_soldier_and_splashes_neighbour() {
    let mut bf = battlefield();
    let struck = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(0.0, 0.0, 20.0), 1)
        .unwrap();
    let beside = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(3.0, 0.0, 20.0), 1)
        .unwrap();
    bf.enemy_mut(struck).unwrap().aggressive = false;
    bf.enemy_mut(beside).unwrap().aggressive = false;

    bf.player_mut().collect_weapon(WeaponId::RocketLauncher, 5);
    select(&mut bf, WeaponId::RocketLauncher);
    bf.apply_command(PlayerCommand::Fire);
    run(&mut bf, 60, DT);

    // 50 damage on contact, not the blast's falloff at the collider centre.
    assert!(bf.enemy(struck).is_none());
    assert_eq!(bf.score(), 100);
    let health = bf.enemy(beside).unwrap().health.current();
    assert!(health > 25.0 && health < 40.0, "health was {health}");

    let hits_on_struck = bf
        .drain_events()
        .into_iter()
        .filter(|e| {
            matches!(e, SimEvent::Damaged { target, .. } if *target == AgentRef::Enemy(struck))
        })
        .count();
    assert_eq!(hits_on_struck, 1);
}

#[test]
fn enemy_shell_splash_wounds_player_on_foot() {
    let mut bf = battlefield();
    // Burst two units to the player's side; the player's centre is at y = 1.
    let mut shell = Projectile::spawn(
        Vec3::new(2.0, 1.0, 0.0),
        -Vec3::Z,
        Shooter::Enemy(EnemyId(9)),
        WeaponId::EnemyCannon,
        WeaponId::EnemyCannon.stats(),
    )
    .unwrap();
    shell.expire(Expiry::HitObstacle);
    bf.add_projectile(shell);
    bf.tick(DT);

    // 30 * (1 - 2 / 3)
    let health = bf.player().health.current();
    assert!((health - 90.0).abs() < 1e-3, "health was {health}");
    assert!(bf.player().is_invulnerable());
}

// ── 9. Turrets and enemy attacks ──────────────────────────────────────────────

#[test]
fn turret_tracks_nearest_enemy_in_range() {
    let mut bf = battlefield();
    let vid = bf.spawn_vehicle(VehicleKind::Jeep, Vec3::new(2.5, 0.0, 0.0)).unwrap();
    bf.tick(DT);
    bf.apply_command(PlayerCommand::Interact);
    assert_eq!(bf.player().vehicle, Some(vid));

    let far = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(2.5, 0.0, -60.0), 1)
        .unwrap();
    bf.enemy_mut(far).unwrap().aggressive = false;
    bf.tick(DT);
    assert!(bf.vehicle(vid).unwrap().turret_world_yaw().abs() < 1e-6);

    for position in [Vec3::new(40.0, 0.0, 0.0), Vec3::new(2.5, 0.0, 45.0)] {
        let id = bf.spawn_enemy(Archetype::Soldier, position, 1).unwrap();
        bf.enemy_mut(id).unwrap().aggressive = false;
    }
    bf.tick(DT);
    let yaw = bf.vehicle(vid).unwrap().turret_world_yaw();
    assert!((yaw - FRAC_PI_2).abs() < 1e-3, "yaw was {yaw}");

    bf.apply_command(PlayerCommand::Fire);
    let shot = bf.projectiles().last().unwrap();
    assert!((shot.direction - Vec3::X).length() < 1e-3);
}

#[test]
fn jeep_fires_two_round_burst() {
    let mut bf = battlefield();
    let id = bf
        .spawn_enemy(Archetype::Jeep, Vec3::new(0.0, 0.0, 15.0), 1)
        .unwrap();
    let fired = |bf: &mut Battlefield| {
        bf.drain_events()
            .into_iter()
            .filter(|e| {
                matches!(
                    e,
                    SimEvent::ProjectileFired {
                        shooter: Shooter::Enemy(_),
                        weapon: WeaponId::EnemyMachineGun,
                    }
                )
            })
            .count()
    };

    run(&mut bf, 2, DT);
    assert_eq!(bf.enemy(id).unwrap().state, AiState::Attacking);
    assert_eq!(fired(&mut bf), 1);

    // Follow-up round 0.15 s after the first.
    run(&mut bf, 8, DT);
    assert_eq!(fired(&mut bf), 0);
    run(&mut bf, 2, DT);
    assert_eq!(fired(&mut bf), 1);

    // Nothing more until the 1.2 s attack cooldown runs out.
    run(&mut bf, 40, DT);
    assert_eq!(fired(&mut bf), 0);
}

#[test]
fn touching_enemy_deals_contact_damage_once_per_window() {
    let mut bf = battlefield();
    let id = bf
        .spawn_enemy(Archetype::Soldier, Vec3::new(0.0, 0.0, 12.0), 1)
        .unwrap();
    let enemy = bf.enemy_mut(id).unwrap();
    enemy.aggressive = false;
    enemy.body.place(Vec3::new(0.0, 0.0, 1.0));

    bf.tick(DT);
    assert_eq!(bf.player().health.current(), 90.0);
    run(&mut bf, 10, DT);
    assert_eq!(bf.player().health.current(), 90.0);
}

// ── 10. Camera-ray aiming ─────────────────────────────────────────────────────

#[test]
fn aim_ray_lands_on_aim_plane() {
    let mut bf = battlefield();
    let origin = Vec3::new(0.0, 10.0, 0.0);
    bf.apply_command(PlayerCommand::AimRay {
        origin,
        direction: Vec3::new(5.0, 0.5, 5.0) - origin,
    });

    let target = bf.player().aim_target.unwrap();
    assert!((target - Vec3::new(5.0, 0.5, 5.0)).length() < 1e-4);
    let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
    assert!((bf.player().aim_direction - expected).length() < 1e-5);

    // A ray pointing at the sky changes nothing.
    bf.apply_command(PlayerCommand::AimRay {
        origin,
        direction: Vec3::Y,
    });
    assert_eq!(bf.player().aim_target, Some(target));
}
