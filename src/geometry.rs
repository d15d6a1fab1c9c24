//! Geometry utilities shared by every collision and AI pass.
//!
//! Everything here is a pure function of its arguments.  The coordinate
//! convention is Y-up with the ground on `y = 0`; yaw is measured so that
//! `forward_from_yaw(yaw) = (sin yaw, 0, cos yaw)`.

use bevy::math::Vec3;
use std::f32::consts::{PI, TAU};

/// Direction vectors shorter than this are treated as "no direction".
pub const MIN_DIRECTION_LENGTH: f32 = 1e-4;

// ── Axis-aligned boxes ────────────────────────────────────────────────────────

/// Axis-aligned bounding box given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap test: boxes that merely touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Distance from `point` to the box surface; 0 when inside.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.closest_point(point).distance(point)
    }

    /// Gap between two boxes (0 when they touch or overlap).
    pub fn distance_to(&self, other: &Aabb) -> f32 {
        let gap = (other.min - self.max).max(self.min - other.max).max(Vec3::ZERO);
        gap.length()
    }

    /// Slab test: does the segment `start → end` pass through the box?
    pub fn segment_hits(&self, start: Vec3, end: Vec3) -> bool {
        let delta = end - start;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;
        for axis in 0..3 {
            let origin = start[axis];
            let d = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

// ── Spheres ───────────────────────────────────────────────────────────────────

/// Point-or-small-sphere proximity test against a box.
pub fn sphere_touches_aabb(center: Vec3, radius: f32, aabb: &Aabb) -> bool {
    aabb.distance_to_point(center) <= radius
}

// ── Penetration ───────────────────────────────────────────────────────────────

/// Horizontal axis along which a penetration is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

/// Minimal-displacement push that separates `mover` from `obstacle` on XZ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub axis: Axis,
    /// Overlap magnitude along `axis` (always > 0).
    pub depth: f32,
    /// +1 or -1: the direction the mover must travel along `axis`.
    pub sign: f32,
}

impl Penetration {
    /// Displacement vector for this push, with `skin` added to the depth.
    pub fn push(&self, skin: f32) -> Vec3 {
        let amount = (self.depth + skin) * self.sign;
        match self.axis {
            Axis::X => Vec3::new(amount, 0.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, amount),
        }
    }
}

/// Penetration of `mover` into `obstacle`, or `None` when they do not overlap.
///
/// Picks the horizontal axis with the smaller overlap; equal overlaps resolve
/// on X.  The sign points from the obstacle centre toward the mover centre,
/// positive when the centres coincide on that axis.
pub fn penetration(mover: &Aabb, obstacle: &Aabb) -> Option<Penetration> {
    if !mover.intersects(obstacle) {
        return None;
    }
    let overlap_x = (mover.max.x - obstacle.min.x).min(obstacle.max.x - mover.min.x);
    let overlap_z = (mover.max.z - obstacle.min.z).min(obstacle.max.z - mover.min.z);
    let offset = mover.center() - obstacle.center();
    let sign_of = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };

    let (axis, depth, sign) = if overlap_x <= overlap_z {
        (Axis::X, overlap_x, sign_of(offset.x))
    } else {
        (Axis::Z, overlap_z, sign_of(offset.z))
    };
    Some(Penetration { axis, depth, sign })
}

// ── Directions & angles ───────────────────────────────────────────────────────

/// Unit vector from `from` to `to`, or `None` if the points coincide.
pub fn direction_to(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = to - from;
    (delta.length() > MIN_DIRECTION_LENGTH).then(|| delta.normalize())
}

/// Horizontal unit vector from `from` to `to` (Y ignored).
pub fn flat_direction_to(from: Vec3, to: Vec3) -> Option<Vec3> {
    let mut delta = to - from;
    delta.y = 0.0;
    (delta.length() > MIN_DIRECTION_LENGTH).then(|| delta.normalize())
}

pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Yaw of a horizontal direction.
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Unit vector 90° clockwise (seen from above) of `forward_from_yaw(yaw)`.
pub fn right_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Wrap an angle into `[-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Where a ray meets the horizontal plane `y = plane_y`.
///
/// Returns `None` for rays parallel to the plane or pointing away from it.
pub fn ray_plane_intersection(origin: Vec3, direction: Vec3, plane_y: f32) -> Option<Vec3> {
    if direction.y.abs() < f32::EPSILON {
        return None;
    }
    let t = (plane_y - origin.y) / direction.y;
    (t >= 0.0 && t.is_finite()).then(|| origin + direction * t)
}
