//! Optical-unit placement frames.
//!
//! A frame is an origin plus two reference directions, orthonormalized when
//! used. Units are requested in spherical coordinates of that frame and
//! resolved into global target points and placement transforms.

use glam::{DMat3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::transform::RigidTransform;

/// Below this cross-product length a direction counts as parallel to the z axis.
///
/// Spherical coordinates at the poles carry round-off of order 1e-16 in the
/// transverse components.
pub const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Minimum `|ref_x × ref_y|` for a frame to span three dimensions.
pub const BASIS_TOLERANCE: f64 = 1e-9;

/// Local placement frame for optical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticalUnitFrame {
    origin: DVec3,
    ref_x: DVec3,
    ref_y: DVec3,
}

impl Default for OpticalUnitFrame {
    fn default() -> Self {
        Self {
            origin: DVec3::ZERO,
            ref_x: DVec3::X,
            ref_y: DVec3::Y,
        }
    }
}

impl OpticalUnitFrame {
    /// Creates a frame. Both reference vectors are normalized.
    pub fn new(origin: DVec3, ref_x: DVec3, ref_y: DVec3) -> Result<Self> {
        let mut frame = Self {
            origin,
            ..Self::default()
        };
        frame.set_ref_x(ref_x)?;
        frame.set_ref_y(ref_y)?;
        Ok(frame)
    }

    /// Returns the frame origin.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Sets the frame origin.
    pub fn set_origin(&mut self, origin: DVec3) {
        self.origin = origin;
    }

    /// Returns the first reference direction.
    pub fn ref_x(&self) -> DVec3 {
        self.ref_x
    }

    /// Sets the first reference direction (re-normalized).
    pub fn set_ref_x(&mut self, ref_x: DVec3) -> Result<()> {
        self.ref_x = normalized(ref_x)?;
        Ok(())
    }

    /// Returns the second reference direction.
    pub fn ref_y(&self) -> DVec3 {
        self.ref_y
    }

    /// Sets the second reference direction (re-normalized).
    pub fn set_ref_y(&mut self, ref_y: DVec3) -> Result<()> {
        self.ref_y = normalized(ref_y)?;
        Ok(())
    }

    /// Returns the implicit third axis, `ref_x × ref_y`.
    pub fn ref_z(&self) -> DVec3 {
        self.ref_x.cross(self.ref_y)
    }

    /// The orthonormal basis `(ref_x, ref_y', ref_z)` as matrix columns.
    ///
    /// `ref_y'` is `ref_y` with its component along `ref_x` removed, so a
    /// skewed pair still yields a rigid mapping. Parallel reference vectors
    /// are rejected here rather than in the setters, which may pass through a
    /// parallel pair while the frame is reconfigured one axis at a time.
    pub fn basis(&self) -> Result<DMat3> {
        let ref_z = self.ref_z();
        if ref_z.length() <= BASIS_TOLERANCE {
            return Err(GeometryError::DegenerateVector(ref_z.to_array()));
        }
        let ref_y = (self.ref_y - self.ref_y.dot(self.ref_x) * self.ref_x).normalize();
        Ok(DMat3::from_cols(self.ref_x, ref_y, self.ref_x.cross(ref_y)))
    }

    /// The linear map sending the frame axes onto `(x̂, ŷ, ẑ)`.
    pub fn to_canonical(&self) -> Result<DMat3> {
        Ok(self.basis()?.transpose())
    }

    /// Maps a point given in frame coordinates into the global frame.
    pub fn local_to_global(&self, local: DVec3) -> Result<DVec3> {
        Ok(self.basis()? * local + self.origin)
    }

    /// Maps a global point back into frame coordinates.
    pub fn global_to_local(&self, global: DVec3) -> Result<DVec3> {
        Ok(self.to_canonical()? * (global - self.origin))
    }
}

fn normalized(v: DVec3) -> Result<DVec3> {
    v.try_normalize()
        .ok_or(GeometryError::DegenerateVector(v.to_array()))
}

/// Converts `(radius, theta, phi)` into Cartesian coordinates. Angles in radians.
pub fn spherical_to_cartesian(radius: f64, theta: f64, phi: f64) -> DVec3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    DVec3::new(
        radius * sin_theta * cos_phi,
        radius * sin_theta * sin_phi,
        radius * cos_theta,
    )
}

/// Derives the rotation taking ẑ onto the unit vector `direction`.
///
/// Directions along ±ẑ have no defined rotation axis: ẑ gives the identity
/// and −ẑ gives a half turn about x̂.
pub fn rotation_from_direction(direction: DVec3) -> DQuat {
    let cross = DVec3::Z.cross(direction);
    if cross.length() <= PARALLEL_TOLERANCE {
        return if direction.z >= 0.0 {
            DQuat::IDENTITY
        } else {
            DQuat::from_axis_angle(DVec3::X, std::f64::consts::PI)
        };
    }
    let angle = DVec3::Z.dot(direction).clamp(-1.0, 1.0).acos();
    DQuat::from_axis_angle(cross.normalize(), angle)
}

/// One requested optical unit, in spherical coordinates of the active frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticalUnitRequest {
    /// Distance from the frame origin (mm).
    pub radius: f64,
    /// Polar angle from the frame's z axis (radians).
    pub theta: f64,
    /// Azimuth in the frame's xy plane (radians).
    pub phi: f64,
}

impl OpticalUnitRequest {
    pub fn new(radius: f64, theta: f64, phi: f64) -> Self {
        Self { radius, theta, phi }
    }

    /// Resolves the request against `frame`, freezing the frame origin.
    ///
    /// Fails with [`GeometryError::DegenerateVector`] when the frame's
    /// reference directions are parallel.
    pub fn resolve(self, frame: &OpticalUnitFrame) -> Result<UnitTarget> {
        let local = spherical_to_cartesian(self.radius, self.theta, self.phi);
        Ok(UnitTarget {
            request: self,
            target: frame.local_to_global(local)?,
            center: frame.origin(),
        })
    }
}

/// A request resolved into global coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTarget {
    /// The request this target was resolved from.
    pub request: OpticalUnitRequest,
    /// Global position of the unit tip.
    pub target: DVec3,
    /// Frame origin at the time the request was made.
    pub center: DVec3,
}

impl UnitTarget {
    /// Outward unit direction from the center to the target.
    ///
    /// A zero-radius request has no direction and points along ẑ.
    pub fn direction(&self) -> DVec3 {
        (self.target - self.center).try_normalize().unwrap_or(DVec3::Z)
    }

    /// Rigid transform placing a unit with its axis along [`Self::direction`].
    pub fn placement(&self) -> RigidTransform {
        RigidTransform::new(rotation_from_direction(self.direction()), self.target)
    }
}
