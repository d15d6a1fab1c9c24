//! Player state.
//!
//! The [`Player`] record is the single source of truth for the controllable
//! agent.  Behaviour lives in the sibling modules:
//! - [`super::control`]: movement, sprint and aiming
//! - [`super::combat`]: firing, damage and weapons

use crate::agent::{Health, PlayerId, VehicleId};
use crate::config::CombatConfig;
use crate::constants::PLAYER_HALF_EXTENTS;
use crate::motion::Body;
use crate::weapons::Arsenal;
use bevy::math::Vec3;

// ── Input abstraction ──────────────────────────────────────────────────────────

/// Discrete movement command relative to the player's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Movement currently held by the input layer.
///
/// The intent persists until replaced; `Stop` releases it and lets friction
/// bring the player to rest.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementIntent {
    Step(MoveDirection),
    /// Analog stick: `x` strafes right, `y` moves forward.  Magnitudes above 1
    /// are clamped.
    Analog(bevy::math::Vec2),
    #[default]
    Stop,
}

// ── Player ─────────────────────────────────────────────────────────────────────

/// The controllable agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub body: Body,
    pub health: Health,
    /// Horizontal unit vector shots are fired along.  Independent of the
    /// movement direction.
    pub aim_direction: Vec3,
    /// Last world point the input layer aimed at.  Doubles as the turret
    /// target while driving.
    pub aim_target: Option<Vec3>,
    pub arsenal: Arsenal,
    pub stamina: f32,
    pub sprinting: bool,
    pub jumping: bool,
    /// Seconds of invulnerability remaining; decremented each tick.
    pub inv_timer: f32,
    /// Seconds until the next shot is allowed; decremented each tick.
    pub fire_cooldown: f32,
    /// Vehicle currently driven.  Non-owning.
    pub vehicle: Option<VehicleId>,
    /// Unoccupied vehicle within reach, refreshed by the collision pass.
    pub can_enter_vehicle: Option<VehicleId>,
    pub(super) intent: MovementIntent,
    pub(super) sprint_requested: bool,
    /// True when a movement command produced velocity this tick.
    pub(super) driven: bool,
}

impl Player {
    pub fn new(id: PlayerId, position: Vec3, config: &CombatConfig) -> Self {
        Self {
            id,
            body: Body::new(position, Vec3::from_array(PLAYER_HALF_EXTENTS)),
            health: Health::new(config.player_max_health),
            aim_direction: Vec3::Z,
            aim_target: None,
            arsenal: Arsenal::default(),
            stamina: config.max_stamina,
            sprinting: false,
            jumping: false,
            inv_timer: 0.0,
            fire_cooldown: 0.0,
            vehicle: None,
            can_enter_vehicle: None,
            intent: MovementIntent::Stop,
            sprint_requested: false,
            driven: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.inv_timer > 0.0
    }

    pub fn in_vehicle(&self) -> bool {
        self.vehicle.is_some()
    }

    /// Advance countdown timers.
    pub(super) fn tick_timers(&mut self, dt: f32) {
        self.inv_timer = (self.inv_timer - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
    }
}
