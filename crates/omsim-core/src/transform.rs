//! Rigid transforms used to place solids and volumes.

use std::ops::Mul;

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// A rotation followed by a translation.
///
/// Composition follows the usual operator convention: `(a * b).transform_point(p)`
/// equals `a.transform_point(b.transform_point(p))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Rotation component as a quaternion.
    pub rotation: DQuat,
    /// Translation component.
    pub translation: DVec3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            translation: DVec3::ZERO,
        }
    }
}

impl RigidTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: DQuat::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Creates a transform from a rotation and a translation.
    #[must_use]
    pub fn new(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Creates a transform from a translation.
    #[must_use]
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Creates a transform from a rotation.
    #[must_use]
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Creates a pure translation along the z axis.
    #[must_use]
    pub fn along_z(offset: f64) -> Self {
        Self::from_translation(DVec3::new(0.0, 0.0, offset))
    }

    /// Returns the inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Maps a point from the local frame into the parent frame.
    #[must_use]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Maps a point from the parent frame back into the local frame.
    #[must_use]
    pub fn inverse_transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation.inverse() * (point - self.translation)
    }

    /// Rotates a direction; the translation is ignored.
    #[must_use]
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.rotation * vector
    }

    /// Returns the rotation as an (axis, angle) pair. The angle is in radians.
    #[must_use]
    pub fn axis_angle(&self) -> (DVec3, f64) {
        self.rotation.to_axis_angle()
    }

    /// Converts this transform to a homogeneous matrix.
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.translation)
    }

    /// Returns true if both transforms move every point by less than `eps`
    /// apart within a unit ball.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, eps: f64) -> bool {
        self.translation.abs_diff_eq(other.translation, eps)
            && [DVec3::X, DVec3::Y, DVec3::Z].iter().all(|axis| {
                (self.rotation * *axis).abs_diff_eq(other.rotation * *axis, eps)
            })
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        RigidTransform {
            rotation: (self.rotation * rhs.rotation).normalize(),
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}
