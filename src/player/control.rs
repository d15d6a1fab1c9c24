//! Player movement, sprint and aim.
//!
//! ## Per-tick pipeline ([`Player::update`])
//!
//! 1. Countdown timers (invulnerability, fire cooldown).
//! 2. Sprint/stamina bookkeeping.
//! 3. Held intent → horizontal velocity relative to facing.
//! 4. Integrate, clamp to the world, apply gravity and settle on the ground.
//! 5. Friction, only if no movement command drove the player this tick.
//!
//! While the player sits in a vehicle only step 1 runs; the vehicle owns the
//! player's position.

use super::state::{MoveDirection, MovementIntent, Player};
use crate::config::CombatConfig;
use crate::constants::ANALOG_DEADZONE;
use crate::geometry::{forward_from_yaw, right_from_yaw, wrap_angle, yaw_of};
use crate::motion::{apply_friction, apply_gravity, integrate, WorldBounds};
use bevy::math::Vec3;

/// Aim points closer than this (horizontally) leave facing untouched.
const MIN_AIM_DISTANCE: f32 = 0.01;

impl Player {
    /// Replace the held movement intent.
    pub fn set_movement_intent(&mut self, intent: MovementIntent, sprint: bool) {
        self.intent = intent;
        self.sprint_requested = sprint;
    }

    /// Start a jump if standing on the ground.
    pub fn jump(&mut self, config: &CombatConfig) {
        if !self.is_alive() || self.in_vehicle() || self.jumping {
            return;
        }
        if self.body.position.y <= 0.0 {
            self.body.velocity.y = config.jump_force;
            self.jumping = true;
        }
    }

    /// Aim at a world point.
    ///
    /// Turns facing toward the point by a fraction of the wrapped angular
    /// difference rather than snapping.  While driving, only the target is
    /// recorded (the turret consumes it).
    pub fn aim_at(&mut self, target: Vec3, config: &CombatConfig) {
        if !target.is_finite() {
            return;
        }
        self.aim_target = Some(target);
        if self.in_vehicle() || !self.is_alive() {
            return;
        }
        let mut offset = target - self.body.position;
        offset.y = 0.0;
        if offset.length() <= MIN_AIM_DISTANCE {
            return;
        }
        let direction = offset.normalize();
        self.aim_direction = direction;
        let turn = wrap_angle(yaw_of(direction) - self.body.facing);
        self.body.facing = wrap_angle(self.body.facing + turn * config.aim_smoothing);
    }

    /// Horizontal velocity the held intent asks for, or `None` when idle.
    pub fn intent_velocity(&self, config: &CombatConfig) -> Option<Vec3> {
        let forward = forward_from_yaw(self.body.facing);
        let right = right_from_yaw(self.body.facing);
        let speed = config.player_speed
            * if self.sprinting {
                config.sprint_multiplier
            } else {
                1.0
            };
        match self.intent {
            MovementIntent::Stop => None,
            MovementIntent::Step(dir) => Some(match dir {
                MoveDirection::Forward => forward * speed,
                MoveDirection::Backward => -forward * speed * config.backward_factor,
                MoveDirection::Left => -right * speed * config.strafe_factor,
                MoveDirection::Right => right * speed * config.strafe_factor,
            }),
            MovementIntent::Analog(stick) => {
                if !stick.is_finite() || stick.length() < ANALOG_DEADZONE {
                    return None;
                }
                let stick = stick.clamp_length_max(1.0);
                let backward = if stick.y < 0.0 {
                    config.backward_factor
                } else {
                    1.0
                };
                Some(
                    (forward * stick.y * backward + right * stick.x * config.strafe_factor)
                        * speed,
                )
            }
        }
    }

    fn wants_to_move(&self) -> bool {
        match self.intent {
            MovementIntent::Stop => false,
            MovementIntent::Step(_) => true,
            MovementIntent::Analog(stick) => {
                stick.is_finite() && stick.length() >= ANALOG_DEADZONE
            }
        }
    }

    /// Sprint is honoured only with stamina left; it drains while active and
    /// regenerates otherwise.  Running dry cancels the sprint this tick.
    pub(super) fn update_sprint(&mut self, dt: f32, config: &CombatConfig) {
        if self.sprint_requested && self.wants_to_move() && self.stamina > 0.0 {
            self.sprinting = true;
            self.stamina -= config.stamina_drain_rate * dt;
            if self.stamina <= 0.0 {
                self.stamina = 0.0;
                self.sprinting = false;
            }
        } else {
            self.sprinting = false;
            self.stamina = (self.stamina + config.stamina_regen_rate * dt).min(config.max_stamina);
        }
    }

    /// Advance the player by `dt`.  Obstacle resolution is left to the
    /// collision pass.
    pub fn update(&mut self, dt: f32, config: &CombatConfig, bounds: &WorldBounds) {
        self.tick_timers(dt);
        if self.in_vehicle() || !self.is_alive() {
            self.driven = false;
            self.sprinting = false;
            return;
        }

        self.update_sprint(dt, config);
        match self.intent_velocity(config) {
            Some(velocity) => {
                self.body.velocity.x = velocity.x;
                self.body.velocity.z = velocity.z;
                self.driven = true;
            }
            None => self.driven = false,
        }

        integrate(&mut self.body, dt, bounds);
        if apply_gravity(&mut self.body, config.gravity, dt) {
            self.jumping = false;
        }
        if !self.driven {
            apply_friction(&mut self.body, config.player_friction);
        }
    }

    /// True when a movement command drove the player during the last update.
    pub fn was_driven(&self) -> bool {
        self.driven
    }
}
