//! Shared motion integration and obstacle resolution.
//!
//! Every walking or driving agent owns a [`Body`].  A tick integrates the
//! body's velocity, clamps it into the playable area, and then pushes it out
//! of anything solid it ended up overlapping.  The collider is rebuilt after
//! every position change so later passes in the same tick see the final pose.

use crate::constants::COLLISION_SKIN;
use crate::geometry::{penetration, Aabb, Axis};
use bevy::math::Vec3;

/// Static obstacle supplied by the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub collider: Aabb,
    /// Non-solid obstacles (decals, foliage) are ignored by every pass.
    pub solid: bool,
}

impl Obstacle {
    pub fn solid(collider: Aabb) -> Self {
        Self {
            collider,
            solid: true,
        }
    }
}

/// Square playable area centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    /// Largest |x| and |z| an agent may occupy.
    pub half_extent: f32,
}

impl WorldBounds {
    pub fn new(map_size: f32, edge_buffer: f32) -> Self {
        Self {
            half_extent: (map_size * 0.5 - edge_buffer).max(0.0),
        }
    }

    pub fn clamp(&self, mut position: Vec3) -> Vec3 {
        position.x = position.x.clamp(-self.half_extent, self.half_extent);
        position.z = position.z.clamp(-self.half_extent, self.half_extent);
        position
    }

    pub fn contains(&self, position: Vec3) -> bool {
        position.x.abs() <= self.half_extent && position.z.abs() <= self.half_extent
    }
}

/// Kinematic state of one agent.
///
/// `position` is the foot point; the collider is a box of `half_extents`
/// standing on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Yaw in radians.
    pub facing: f32,
    pub half_extents: Vec3,
    collider: Aabb,
}

impl Body {
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        let mut body = Self {
            position,
            velocity: Vec3::ZERO,
            facing: 0.0,
            half_extents,
            collider: Aabb::new(position, position),
        };
        body.recompute_collider();
        body
    }

    pub fn collider(&self) -> Aabb {
        self.collider
    }

    /// Centre of the collider (mid-height above the feet).
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.half_extents.y, 0.0)
    }

    /// Collider this body would have standing at `position`.
    pub fn collider_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(
            position + Vec3::new(0.0, self.half_extents.y, 0.0),
            self.half_extents,
        )
    }

    pub fn recompute_collider(&mut self) {
        self.collider = self.collider_at(self.position);
    }

    /// Move the body directly (teleport), keeping the collider in sync.
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.recompute_collider();
    }
}

/// Advance `body` by its velocity and clamp X/Z into `bounds`.
pub fn integrate(body: &mut Body, dt: f32, bounds: &WorldBounds) {
    body.position += body.velocity * dt;
    body.position = bounds.clamp(body.position);
    body.recompute_collider();
}

/// Apply gravity while airborne and settle on the ground plane.
///
/// Returns `true` when the body is on the ground after the call.
pub fn apply_gravity(body: &mut Body, gravity: f32, dt: f32) -> bool {
    if body.position.y > 0.0 || body.velocity.y > 0.0 {
        body.velocity.y -= gravity * dt;
    }
    if body.position.y <= 0.0 && body.velocity.y <= 0.0 {
        body.position.y = 0.0;
        body.velocity.y = 0.0;
        body.recompute_collider();
        return true;
    }
    false
}

/// Scale horizontal velocity by a per-tick friction factor.
pub fn apply_friction(body: &mut Body, factor: f32) {
    body.velocity.x *= factor;
    body.velocity.z *= factor;
}

/// Push `body` out of `obstacle` along the shallower horizontal axis.
///
/// Zeroes the velocity component on that axis.  Returns `false` (and leaves
/// the body untouched) when the two do not overlap, so repeated calls on a
/// resolved pair are no-ops.
pub fn resolve_overlap(body: &mut Body, obstacle: &Aabb) -> bool {
    let Some(hit) = penetration(&body.collider, obstacle) else {
        return false;
    };
    body.position += hit.push(COLLISION_SKIN);
    match hit.axis {
        Axis::X => body.velocity.x = 0.0,
        Axis::Z => body.velocity.z = 0.0,
    }
    body.recompute_collider();
    true
}

/// Resolve `body` against every solid obstacle once, in order.
pub fn resolve_against_obstacles(body: &mut Body, obstacles: &[Obstacle]) -> usize {
    obstacles
        .iter()
        .filter(|o| o.solid)
        .filter(|o| resolve_overlap(body, &o.collider))
        .count()
}

/// True if a body standing at `position` would overlap any solid obstacle.
pub fn blocked_at(body: &Body, position: Vec3, obstacles: &[Obstacle]) -> bool {
    let probe = body.collider_at(position);
    obstacles
        .iter()
        .any(|o| o.solid && probe.intersects(&o.collider))
}

/// True if the segment `from → to` passes through any solid obstacle.
pub fn line_blocked(from: Vec3, to: Vec3, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| o.solid && o.collider.segment_hits(from, to))
}
