//! Notifications the simulation emits for the presentation layer.
//!
//! Nothing inside the simulation reads these back; they exist so renderers,
//! audio and HUD code can react.  The battlefield buffers them in emission
//! order and [`crate::simulation::CombatPlugin`] republishes them as Bevy
//! messages.

use crate::agent::{AgentRef, VehicleId};
use crate::projectile::Shooter;
use crate::weapons::WeaponId;
use bevy::prelude::Message;
use bevy::math::Vec3;

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Damaged {
        target: AgentRef,
        amount: f32,
        remaining: f32,
    },
    Death {
        target: AgentRef,
    },
    /// `damaging` is false for purely visual blasts (vehicle wrecks).
    Explosion {
        position: Vec3,
        radius: f32,
        damaging: bool,
    },
    WeaponChanged {
        weapon: WeaponId,
    },
    VehicleStateChanged {
        vehicle: VehicleId,
        occupied: bool,
    },
    ProjectileFired {
        shooter: Shooter,
        weapon: WeaponId,
    },
    PickupCollected {
        weapon: WeaponId,
        rounds: u32,
    },
}
