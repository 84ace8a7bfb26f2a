//! # Scene Geometry
//!
//! Points and axis-aligned boxes. Scenes use a right-handed frame where
//! x is left-right, y is forward-backward and z is up-down.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point or extent in 3D space. Serializes as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point, without intermediate overflow
    pub fn distance(&self, other: &Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.hypot(dy).hypot(dz)
    }

    /// Componentwise halfway point between `self` and `other`
    pub fn midpoint(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}, {:.4}]", self.x, self.y, self.z)
    }
}

/// Axis-aligned box centered at `center` with full extents `size`.
///
/// Construction does not validate; [`BoundingBox3D::validate`] is run by
/// the scene index so that a malformed box is reported against its object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    center: Vec3,
    size: Vec3,
}

impl BoundingBox3D {
    pub fn new(center: impl Into<Vec3>, size: impl Into<Vec3>) -> Self {
        Self {
            center: center.into(),
            size: size.into(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Corner with the smallest coordinates
    pub fn min(&self) -> Vec3 {
        Vec3::new(
            self.center.x - self.size.x / 2.0,
            self.center.y - self.size.y / 2.0,
            self.center.z - self.size.z / 2.0,
        )
    }

    /// Corner with the largest coordinates
    pub fn max(&self) -> Vec3 {
        Vec3::new(
            self.center.x + self.size.x / 2.0,
            self.center.y + self.size.y / 2.0,
            self.center.z + self.size.z / 2.0,
        )
    }

    pub fn volume(&self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }

    /// Whether `point` lies inside the box (faces inclusive)
    pub fn contains(&self, point: &Vec3) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (lo.x..=hi.x).contains(&point.x)
            && (lo.y..=hi.y).contains(&point.y)
            && (lo.z..=hi.z).contains(&point.z)
    }

    /// Check that all numbers are finite and no extent is negative.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if !self.center.is_finite() {
            return Err(format!("center {:?} is not finite", self.center.to_array()));
        }
        if !self.size.is_finite() {
            return Err(format!("size {:?} is not finite", self.size.to_array()));
        }
        for (axis, extent) in [("x", self.size.x), ("y", self.size.y), ("z", self.size.z)] {
            if extent < 0.0 {
                return Err(format!("size along {} is negative ({})", axis, extent));
            }
        }
        Ok(())
    }
}
