//! Bevy plugin wiring the battlefield into an app.
//!
//! | Schedule | System                          | Role                                   |
//! |----------|---------------------------------|----------------------------------------|
//! | Startup  | `load_combat_config`            | overlay `assets/combat.toml`           |
//! | Startup  | `setup_battlefield`             | build the [`Battlefield`] resource     |
//!
//! The environment hands its static geometry in through the [`Obstacles`]
//! resource; insert it before the first update.  Without one the field is
//! open ground.
//! | Update   | `apply_player_commands_system`  | drain queued [`PlayerCommand`]s        |
//! | Update   | `advance_battlefield_system`    | one world tick per frame               |
//! | Update   | `publish_sim_events_system`     | republish [`SimEvent`]s as messages    |
//!
//! The three update systems are chained, so input captured in one frame is
//! simulated and published in that same frame.

use crate::battlefield::{Battlefield, PlayerCommand};
use crate::config::{load_combat_config, CombatConfig};
use crate::events::SimEvent;
use crate::motion::Obstacle;
use bevy::prelude::*;

/// Seed used when the app does not insert a [`BattlefieldSeed`].
pub const DEFAULT_SEED: u64 = 0x5EED;

/// RNG seed for the battlefield built at startup.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattlefieldSeed(pub u64);

impl Default for BattlefieldSeed {
    fn default() -> Self {
        Self(DEFAULT_SEED)
    }
}

/// Static obstacles the startup battlefield is built with.
#[derive(Resource, Debug, Clone, Default)]
pub struct Obstacles(pub Vec<Obstacle>);

/// Commands queued by the input layer for the next frame.
#[derive(Resource, Debug, Default)]
pub struct PlayerCommands {
    queue: Vec<PlayerCommand>,
}

impl PlayerCommands {
    pub fn push(&mut self, command: PlayerCommand) {
        self.queue.push(command);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Respect a config the app inserted itself (tests, launchers).
        if !app.world().contains_resource::<CombatConfig>() {
            app.init_resource::<CombatConfig>();
        }
        app.init_resource::<BattlefieldSeed>()
            .init_resource::<Obstacles>()
            .init_resource::<PlayerCommands>()
            .add_message::<SimEvent>()
            .add_systems(
                Startup,
                (load_combat_config, setup_battlefield.after(load_combat_config)),
            )
            .add_systems(
                Update,
                (
                    apply_player_commands_system,
                    advance_battlefield_system,
                    publish_sim_events_system,
                )
                    .chain(),
            );
    }
}

/// Build the battlefield from the loaded config and the environment's
/// obstacles.  Skipped when the app already inserted one (scripted scenarios).
pub fn setup_battlefield(
    mut commands: Commands,
    config: Res<CombatConfig>,
    seed: Res<BattlefieldSeed>,
    obstacles: Res<Obstacles>,
    existing: Option<Res<Battlefield>>,
) {
    if existing.is_some() {
        return;
    }
    info!(
        "Battlefield ready (seed {:#x}, {} obstacles)",
        seed.0,
        obstacles.0.len()
    );
    commands.insert_resource(Battlefield::new(config.clone(), obstacles.0.clone(), seed.0));
}

pub fn apply_player_commands_system(
    mut queue: ResMut<PlayerCommands>,
    battlefield: Option<ResMut<Battlefield>>,
) {
    let Some(mut battlefield) = battlefield else {
        return;
    };
    for command in queue.queue.drain(..) {
        battlefield.apply_command(command);
    }
}

pub fn advance_battlefield_system(time: Res<Time>, battlefield: Option<ResMut<Battlefield>>) {
    if let Some(mut battlefield) = battlefield {
        battlefield.tick(time.delta_secs());
    }
}

pub fn publish_sim_events_system(
    battlefield: Option<ResMut<Battlefield>>,
    mut writer: MessageWriter<SimEvent>,
) {
    let Some(mut battlefield) = battlefield else {
        return;
    };
    let events = battlefield.drain_events();
    if !events.is_empty() {
        debug!("publishing {} sim events", events.len());
    }
    writer.write_batch(events);
}
