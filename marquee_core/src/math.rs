// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid-body poses, axis-aligned bounds, and rays.
//!
//! These cover exactly the geometry the menu system needs: composing node
//! transforms down the tree, transforming pick rays into node-local space,
//! and slab-testing rays against node bounds. Vector and quaternion math
//! comes from [`cgmath`]; this module only adds the thin domain types.

use cgmath::{InnerSpace, Quaternion, Vector3};
use core::ops::Mul;

/// A rigid transform: rotation followed by translation, no scale.
///
/// Equivalent to a position + unit quaternion pair. Composition follows the
/// parent-times-local convention used everywhere in the node tree:
/// `world = parent_world * local`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Translation component.
    pub position: Vector3<f32>,
    /// Rotation component. Must be (close to) unit length.
    pub orientation: Quaternion<f32>,
}

impl Pose {
    /// The identity pose: no translation, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        orientation: Quaternion {
            s: 1.0,
            v: Vector3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        },
    };

    /// Creates a pose from a position and orientation.
    #[inline]
    #[must_use]
    pub const fn new(position: Vector3<f32>, orientation: Quaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a pure translation pose.
    #[inline]
    #[must_use]
    pub const fn from_translation(position: Vector3<f32>) -> Self {
        Self {
            position,
            orientation: Self::IDENTITY.orientation,
        }
    }

    /// Transforms a point from this pose's local space to its parent space.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, p: Vector3<f32>) -> Vector3<f32> {
        self.orientation * p + self.position
    }

    /// Rotates a direction vector (ignores translation).
    #[inline]
    #[must_use]
    pub fn transform_vector(&self, v: Vector3<f32>) -> Vector3<f32> {
        self.orientation * v
    }

    /// Returns the inverse pose, assuming a unit orientation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rot = self.orientation.conjugate();
        Self {
            position: inv_rot * -self.position,
            orientation: inv_rot,
        }
    }

    /// Is every element of this pose [finite](f32::is_finite)?
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.position.z.is_finite()
            && self.orientation.s.is_finite()
            && self.orientation.v.x.is_finite()
            && self.orientation.v.y.is_finite()
            && self.orientation.v.z.is_finite()
    }
}

impl Default for Pose {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Pose {
    type Output = Self;

    /// `a * b` applies `b` first, then `a` (parent-times-local).
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            position: self.transform_point(rhs.position),
            orientation: (self.orientation * rhs.orientation).normalize(),
        }
    }
}

/// An axis-aligned bounding box in a node's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vector3<f32>,
    /// Maximum corner.
    pub max: Vector3<f32>,
}

impl Bounds {
    /// A zero-extent box at the origin.
    pub const ZERO: Self = Self {
        min: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        max: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
    };

    /// Creates bounds from min/max corners.
    #[inline]
    #[must_use]
    pub const fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Creates bounds centered at the origin with the given half extents.
    #[must_use]
    pub fn from_half_extents(hx: f32, hy: f32, hz: f32) -> Self {
        Self {
            min: Vector3::new(-hx, -hy, -hz),
            max: Vector3::new(hx, hy, hz),
        }
    }

    /// Creates bounds centered at `center` with the given half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// True when the box has zero extent on every axis. Unset bounds stay
    /// at [`Bounds::ZERO`] and are never hit targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    /// The center of the box.
    #[must_use]
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Grows the box to contain `p`.
    pub fn expand_to(&mut self, p: Vector3<f32>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Returns the smallest box containing both inputs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.expand_to(other.min);
        out.expand_to(other.max);
        out
    }

    /// Whether `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Vector3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Slab-method ray intersection.
    ///
    /// Returns the entry distance along `ray` if it hits, with rays that
    /// start inside the box reporting distance `0.0`. Misses and purely
    /// negative-distance hits return `None`.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let (origin, dir, min, max) = match axis {
                0 => (ray.origin.x, ray.dir.x, self.min.x, self.max.x),
                1 => (ray.origin.y, ray.dir.y, self.min.y, self.max.y),
                _ => (ray.origin.z, ray.dir.z, self.min.z, self.max.z),
            };
            if dir.abs() < f32::EPSILON {
                // Parallel to the slab: must already be inside it.
                if origin < min || origin > max {
                    return None;
                }
            } else {
                let inv = 1.0 / dir;
                let (t0, t1) = {
                    let a = (min - origin) * inv;
                    let b = (max - origin) * inv;
                    if a < b { (a, b) } else { (b, a) }
                };
                t_near = t_near.max(t0);
                t_far = t_far.min(t1);
                if t_near > t_far {
                    return None;
                }
            }
        }

        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// A ray with an origin and a (not necessarily normalized) direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Origin point.
    pub origin: Vector3<f32>,
    /// Direction. Distances returned by intersection tests are expressed in
    /// multiples of this vector's length.
    pub dir: Vector3<f32>,
}

impl Ray {
    /// Creates a ray.
    #[inline]
    #[must_use]
    pub const fn new(origin: Vector3<f32>, dir: Vector3<f32>) -> Self {
        Self { origin, dir }
    }

    /// The point at distance `t` along the ray.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.dir * t
    }

    /// Maps this ray through `pose` (typically an inverse world pose, to
    /// bring a world-space ray into node-local space).
    #[must_use]
    pub fn transformed_by(&self, pose: &Pose) -> Self {
        Self {
            origin: pose.transform_point(self.origin),
            dir: pose.transform_vector(self.dir),
        }
    }
}
