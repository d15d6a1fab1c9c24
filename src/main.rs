use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::math::Vec3;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use skirmish::battlefield::{Battlefield, PlayerCommand};
use skirmish::enemy::Archetype;
use skirmish::events::SimEvent;
use skirmish::geometry::Aabb;
use skirmish::motion::Obstacle;
use skirmish::player::{MoveDirection, MovementIntent};
use skirmish::simulation::{CombatPlugin, Obstacles, PlayerCommands};
use skirmish::vehicle::VehicleKind;
use skirmish::weapons::WeaponId;
use std::env;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);
const MAX_FRAMES: u32 = 60 * 60;

/// Scripted headless runs, picked with `SKIRMISH_SCENARIO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    /// One soldier walking in from the north.
    Duel,
    /// Mixed squad closing from several sides.
    Ambush,
    /// Player drives a tank at a jeep and lets the turret track it.
    Convoy,
}

impl Scenario {
    fn from_env() -> Self {
        match env::var("SKIRMISH_SCENARIO").ok().as_deref() {
            Some("ambush") => Scenario::Ambush,
            Some("convoy") => Scenario::Convoy,
            Some("duel") | None => Scenario::Duel,
            Some(other) => {
                warn!("Unknown scenario '{}', running duel", other);
                Scenario::Duel
            }
        }
    }

    /// Static cover for the scenario.
    fn obstacles(self) -> Obstacles {
        match self {
            Scenario::Ambush => Obstacles(vec![Obstacle::solid(Aabb::new(
                Vec3::new(-4.0, 0.0, 8.0),
                Vec3::new(4.0, 3.0, 9.0),
            ))]),
            Scenario::Duel | Scenario::Convoy => Obstacles::default(),
        }
    }

    fn populate(self, battlefield: &mut Battlefield) {
        let spawns: &[(Archetype, Vec3)] = match self {
            Scenario::Duel => &[(Archetype::Soldier, Vec3::new(0.0, 0.0, 25.0))],
            Scenario::Ambush => &[
                (Archetype::Soldier, Vec3::new(18.0, 0.0, 18.0)),
                (Archetype::Soldier, Vec3::new(-20.0, 0.0, 12.0)),
                (Archetype::Jeep, Vec3::new(0.0, 0.0, -30.0)),
                (Archetype::Tank, Vec3::new(35.0, 0.0, -10.0)),
            ],
            Scenario::Convoy => &[(Archetype::Jeep, Vec3::new(0.0, 0.0, 45.0))],
        };
        for &(archetype, position) in spawns {
            if let Err(err) = battlefield.spawn_enemy(archetype, position, 1) {
                warn!("{}", err);
            }
        }
        if self == Scenario::Ambush {
            if let Err(err) = battlefield.spawn_random_vehicle() {
                warn!("{}", err);
            }
            for (weapon, position) in [
                (WeaponId::Rifle, Vec3::new(3.0, 0.0, 2.0)),
                (WeaponId::GrenadeLauncher, Vec3::new(-3.0, 0.0, 2.0)),
            ] {
                if let Err(err) = battlefield.spawn_pickup(weapon, position) {
                    warn!("{}", err);
                }
            }
        }
        if self == Scenario::Convoy {
            if let Err(err) = battlefield.spawn_vehicle(VehicleKind::Tank, Vec3::new(2.5, 0.0, 0.0)) {
                warn!("{}", err);
            }
        }
    }

    /// Input for `frame`, given the current world.
    fn script(self, frame: u32, battlefield: &Battlefield, out: &mut PlayerCommands) {
        let player = battlefield.player();
        match self {
            Scenario::Convoy if frame == 3 => out.push(PlayerCommand::Interact),
            Scenario::Convoy if frame == 4 => out.push(PlayerCommand::Move {
                intent: MovementIntent::Step(MoveDirection::Forward),
                sprint: false,
            }),
            Scenario::Convoy if frame == 90 => out.push(PlayerCommand::Move {
                intent: MovementIntent::Stop,
                sprint: false,
            }),
            _ => {}
        }
        if frame % 10 != 0 {
            return;
        }
        let nearest = battlefield
            .enemies()
            .iter()
            .map(|e| e.body.center())
            .min_by(|a, b| {
                a.distance(player.position())
                    .total_cmp(&b.distance(player.position()))
            });
        if let Some(target) = nearest {
            if !player.in_vehicle() {
                out.push(PlayerCommand::AimAt(target));
            }
            out.push(PlayerCommand::Fire);
        }
        if self == Scenario::Ambush && frame % 120 == 0 {
            out.push(PlayerCommand::CycleWeapon);
        }
    }
}

fn log_sim_events_system(mut events: MessageReader<SimEvent>) {
    for event in events.read() {
        match event {
            SimEvent::Death { target } => info!("death: {:?}", target),
            SimEvent::Explosion {
                position,
                radius,
                damaging,
            } => debug!("explosion at {:?} r={} damaging={}", position, radius, damaging),
            SimEvent::WeaponChanged { weapon } => info!("weapon: {:?}", weapon),
            SimEvent::VehicleStateChanged { vehicle, occupied } => {
                info!("vehicle {:?} occupied={}", vehicle, occupied)
            }
            _ => {}
        }
    }
}

fn main() {
    let scenario = Scenario::from_env();

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_once()),
        LogPlugin::default(),
    ))
    .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
    .insert_resource(scenario.obstacles())
    .add_plugins(CombatPlugin)
    .add_systems(PostUpdate, log_sim_events_system);

    // First frame runs Startup and builds the battlefield.
    app.update();
    match app.world_mut().get_resource_mut::<Battlefield>() {
        Some(mut battlefield) => scenario.populate(&mut battlefield),
        None => {
            error!("Battlefield was not created");
            return;
        }
    }
    info!("Running {:?}", scenario);

    for frame in 1..=MAX_FRAMES {
        let world = app.world_mut();
        let mut queued = PlayerCommands::default();
        if let Some(battlefield) = world.get_resource::<Battlefield>() {
            if battlefield.is_game_over() || battlefield.enemies().is_empty() {
                break;
            }
            scenario.script(frame, battlefield, &mut queued);
        }
        world.insert_resource(queued);
        app.update();
    }

    if let Some(battlefield) = app.world().get_resource::<Battlefield>() {
        info!(
            "{:?} finished after {:.1}s: score {}, health {:.0}%, enemies left {}, game over {}",
            scenario,
            battlefield.elapsed(),
            battlefield.score(),
            battlefield.player().health.fraction() * 100.0,
            battlefield.enemies().len(),
            battlefield.is_game_over()
        );
    }
}
