//! Top-down combat simulation core.
//!
//! A fixed-rate world of one player, AI-driven enemies, drivable vehicles
//! and projectiles, advanced one tick at a time by [`battlefield::Battlefield`].
//! Rendering, audio and input capture live outside this crate; they feed
//! [`battlefield::PlayerCommand`]s in and read [`events::SimEvent`]s out.
//! [`simulation::CombatPlugin`] wires both ends into a Bevy app.

pub mod agent;
pub mod battlefield;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod error;
pub mod events;
pub mod geometry;
pub mod motion;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod simulation;
pub mod vehicle;
pub mod weapons;
