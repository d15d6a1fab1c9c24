//! Centralised simulation and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::CombatConfig`] mirrors the runtime-tunable subset and uses
//! these values as its defaults.
//!
//! ## Tuning guidance
//!
//! Each constant notes the observable consequence of changing it.  After
//! editing, run the scenario tests under `tests/` to confirm combat behaviour
//! has not regressed.

// ── World Bounds ──────────────────────────────────────────────────────────────

/// Edge length of the square play area (world units), centred on the origin.
pub const MAP_SIZE: f32 = 500.0;

/// Margin kept between agents and the map edge.
///
/// Agents are clamped to `±(MAP_SIZE / 2 - EDGE_BUFFER)` on X and Z so they
/// never clip into the boundary walls placed by the environment.
pub const EDGE_BUFFER: f32 = 5.0;

/// Largest frame delta (seconds) the tick will integrate in one step.
///
/// A stalled frame (tab switch, debugger break) would otherwise teleport fast
/// projectiles straight through thin walls.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Extra push (u) added when separating an agent from an obstacle so the pair
/// does not re-register as overlapping on the next tick.
pub const COLLISION_SKIN: f32 = 0.05;

// ── Player: Movement ─────────────────────────────────────────────────────────

/// Base run speed (u/s).
pub const PLAYER_SPEED: f32 = 10.0;

/// Speed multiplier applied while sprinting.
pub const SPRINT_MULTIPLIER: f32 = 1.7;

/// Speed factor for backpedalling relative to `PLAYER_SPEED`.
pub const BACKWARD_FACTOR: f32 = 0.7;

/// Speed factor for strafing relative to `PLAYER_SPEED`.
pub const STRAFE_FACTOR: f32 = 0.8;

/// Initial upward velocity (u/s) of a jump.
pub const JUMP_FORCE: f32 = 15.0;

/// Downward acceleration (u/s²) applied to an airborne player.
///
/// With `JUMP_FORCE = 15` a jump peaks at ≈3.75 u and lands after 1 s.
pub const GRAVITY: f32 = 30.0;

/// Per-tick multiplier applied to horizontal velocity when no movement
/// command drove the player this tick.  Lower values stop the player faster.
pub const PLAYER_FRICTION: f32 = 0.9;

/// Analog stick magnitude below which movement input is treated as released.
pub const ANALOG_DEADZONE: f32 = 0.1;

/// Half extents (u) of the player's collider; the box sits on the feet.
pub const PLAYER_HALF_EXTENTS: [f32; 3] = [0.5, 1.0, 0.5];

// ── Player: Stamina ───────────────────────────────────────────────────────────

/// Full sprint stamina pool.
pub const MAX_STAMINA: f32 = 100.0;

/// Stamina consumed per second of sprinting.
pub const STAMINA_DRAIN_RATE: f32 = 20.0;

/// Stamina recovered per second while not sprinting.  Deliberately slower than
/// the drain so sprinting has to be rationed.
pub const STAMINA_REGEN_RATE: f32 = 10.0;

// ── Player: Health & Aim ──────────────────────────────────────────────────────

/// Maximum player health.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Seconds of invulnerability granted after any accepted hit.
pub const INVULNERABILITY_DURATION: f32 = 1.0;

/// Fraction of the remaining yaw error closed per aim update.
///
/// 1.0 snaps instantly; 0.15 gives a short, visible turn that hides
/// mouse jitter.
pub const AIM_SMOOTHING: f32 = 0.15;

/// Height (u) of the horizontal plane aim rays are intersected with.
pub const AIM_PLANE_HEIGHT: f32 = 0.5;

/// Height (u) above the feet where hand-held weapons spawn projectiles.
pub const MUZZLE_HEIGHT: f32 = 1.2;

/// Distance (u) in front of the body where hand-held weapons spawn projectiles.
pub const MUZZLE_FORWARD: f32 = 0.6;

/// Upward bias added to the aim direction of lobbed (ballistic) weapons.
pub const BALLISTIC_LOFT: f32 = 0.35;

// ── Projectiles ──────────────────────────────────────────────────────────────

/// Proximity (u) at which a projectile counts as touching a collider.
pub const PROJECTILE_HIT_RADIUS: f32 = 0.5;

/// Amount subtracted from `direction.y` per second for ballistic projectiles.
pub const BALLISTIC_DROP: f32 = 0.9;

// ── Vehicles ─────────────────────────────────────────────────────────────────

/// Fraction of a vehicle's drive speed used to creep forward when turning
/// from rest.
pub const VEHICLE_CREEP_FACTOR: f32 = 0.2;

/// Per-tick multiplier applied to vehicle velocity when not being driven.
pub const VEHICLE_FRICTION: f32 = 0.93;

/// Radius (u) within which an unguided turret auto-tracks the nearest enemy.
pub const TURRET_DETECTION_RANGE: f32 = 50.0;

/// Height (u) of the turret pivot above the vehicle's base.
pub const TURRET_HEIGHT: f32 = 3.0;

/// Barrel length (u); projectiles spawn this far along the turret facing.
pub const TURRET_BARREL_LENGTH: f32 = 2.6;

/// Gap (u) between the player's collider and a vehicle's collider within
/// which the player may climb in.
pub const VEHICLE_INTERACT_DISTANCE: f32 = 1.5;

/// Flat damage dealt to an occupant when their vehicle is destroyed.
pub const VEHICLE_DESTRUCTION_DAMAGE: f32 = 20.0;

/// Seat height (u) of an occupant above the vehicle's base.
pub const VEHICLE_SEAT_HEIGHT: f32 = 1.0;

/// Radius of the purely visual blast emitted when a vehicle is destroyed.
pub const VEHICLE_WRECK_BLAST_RADIUS: f32 = 4.0;

/// Flat distance band (u) from the player in which random vehicles appear.
pub const VEHICLE_SPAWN_RING: (f32, f32) = (15.0, 25.0);

// ── Enemy AI ─────────────────────────────────────────────────────────────────

/// Speed factor applied while sidestepping around an obstacle.
pub const SIDESTEP_SPEED_FACTOR: f32 = 0.5;

/// Magnitude of the lateral wander used while the target is out of sight.
pub const LOS_JITTER: f32 = 0.6;

/// Minimum look-ahead distance (u) used when probing for obstacles ahead.
pub const AVOIDANCE_LOOKAHEAD: f32 = 1.0;

/// Damage dealt to the on-foot player by touching an enemy.
pub const ENEMY_CONTACT_DAMAGE: f32 = 10.0;

/// Minimum distance (u) between a freshly spawned enemy and the player.
pub const MIN_ENEMY_SPAWN_DISTANCE: f32 = 10.0;

/// Health multiplier gained per tier above 1.
pub const TIER_HEALTH_STEP: f32 = 0.25;

/// Damage multiplier gained per tier above 1.
pub const TIER_DAMAGE_STEP: f32 = 0.15;

/// Highest tier an enemy can be spawned at; larger requests are clamped.
pub const ENEMY_TIER_CAP: u32 = 4;

// ── Pickups & Scoring ─────────────────────────────────────────────────────────

/// Proximity (u) between the player and a pickup that collects it.
pub const PICKUP_RADIUS: f32 = 1.5;

/// Points awarded per enemy killed.
pub const SCORE_PER_ENEMY: u32 = 100;

/// Points awarded per vehicle destroyed by player fire.
pub const SCORE_PER_VEHICLE: u32 = 250;
