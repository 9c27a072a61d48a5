//! Solid algebra helpers.
//!
//! Thin constructors for the primitives used by the sensor assemblies, the
//! three boolean combinators, and [`CsgChain`], which records a sequence of
//! boolean steps and folds them into one solid.

use glam::DVec3;

use crate::solid::{BooleanOp, Shape, Solid};
use crate::transform::RigidTransform;

/// Truncated cone with radii given at `-half_z` and `+half_z`.
pub fn cone(
    name: impl Into<String>,
    (rmin_lo, rmax_lo): (f64, f64),
    (rmin_hi, rmax_hi): (f64, f64),
    half_z: f64,
) -> Solid {
    Solid::primitive(
        name,
        Shape::Cone {
            rmin_lo,
            rmax_lo,
            rmin_hi,
            rmax_hi,
            half_z,
        },
    )
}

/// Spherical shell; `inner == 0` gives a full ball.
pub fn sphere(name: impl Into<String>, inner: f64, outer: f64) -> Solid {
    Solid::primitive(name, Shape::Sphere { inner, outer })
}

/// Cylindrical shell; `inner == 0` gives a solid cylinder.
pub fn tube(name: impl Into<String>, inner: f64, outer: f64, half_z: f64) -> Solid {
    Solid::primitive(
        name,
        Shape::Tube {
            inner,
            outer,
            half_z,
        },
    )
}

/// Ellipsoid with semi-axes `semi`, cut to `z_bottom ..= z_top`.
pub fn ellipsoid(name: impl Into<String>, semi: DVec3, z_bottom: f64, z_top: f64) -> Solid {
    Solid::primitive(
        name,
        Shape::Ellipsoid {
            semi_x: semi.x,
            semi_y: semi.y,
            semi_z: semi.z,
            z_bottom,
            z_top,
        },
    )
}

/// Cylinder with an elliptical cross-section.
pub fn elliptical_tube(name: impl Into<String>, semi_x: f64, semi_y: f64, half_z: f64) -> Solid {
    Solid::primitive(
        name,
        Shape::EllipticalTube {
            semi_x,
            semi_y,
            half_z,
        },
    )
}

/// Axis-aligned box given by its half extents.
pub fn cuboid(name: impl Into<String>, half: DVec3) -> Solid {
    Solid::primitive(
        name,
        Shape::Box {
            half_x: half.x,
            half_y: half.y,
            half_z: half.z,
        },
    )
}

/// `a ∪ b`, with `b` placed in `a`'s frame by `transform`.
pub fn union(name: impl Into<String>, a: &Solid, b: &Solid, transform: RigidTransform) -> Solid {
    Solid::boolean(name, BooleanOp::Union, a, b, transform)
}

/// `a − b`, with `b` placed in `a`'s frame by `transform`.
pub fn subtract(name: impl Into<String>, a: &Solid, b: &Solid, transform: RigidTransform) -> Solid {
    Solid::boolean(name, BooleanOp::Subtraction, a, b, transform)
}

/// `a ∩ b`, with `b` placed in `a`'s frame by `transform`.
pub fn intersect(name: impl Into<String>, a: &Solid, b: &Solid, transform: RigidTransform) -> Solid {
    Solid::boolean(name, BooleanOp::Intersection, a, b, transform)
}

/// One recorded step of a [`CsgChain`].
#[derive(Debug, Clone, PartialEq)]
pub struct CsgStep {
    pub op: BooleanOp,
    pub operand: Solid,
    pub transform: RigidTransform,
}

/// A boolean expression built as a left fold over recorded steps.
///
/// Steps are only recorded until [`CsgChain::build`]; every intermediate
/// result is a fresh node named after the chain.
#[derive(Debug, Clone)]
pub struct CsgChain {
    name: String,
    base: Solid,
    steps: Vec<CsgStep>,
}

impl CsgChain {
    /// Starts a chain from `base`.
    pub fn new(name: impl Into<String>, base: &Solid) -> Self {
        Self {
            name: name.into(),
            base: base.clone(),
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn then(mut self, op: BooleanOp, operand: &Solid, transform: RigidTransform) -> Self {
        self.push(op, operand, transform);
        self
    }

    /// Appends a step in place.
    pub fn push(&mut self, op: BooleanOp, operand: &Solid, transform: RigidTransform) {
        self.steps.push(CsgStep {
            op,
            operand: operand.clone(),
            transform,
        });
    }

    #[must_use]
    pub fn union(self, operand: &Solid, transform: RigidTransform) -> Self {
        self.then(BooleanOp::Union, operand, transform)
    }

    #[must_use]
    pub fn subtract(self, operand: &Solid, transform: RigidTransform) -> Self {
        self.then(BooleanOp::Subtraction, operand, transform)
    }

    #[must_use]
    pub fn intersect(self, operand: &Solid, transform: RigidTransform) -> Self {
        self.then(BooleanOp::Intersection, operand, transform)
    }

    /// The recorded steps, in application order.
    pub fn steps(&self) -> &[CsgStep] {
        &self.steps
    }

    /// Folds the steps onto the base. An empty chain returns the base itself.
    pub fn build(&self) -> Solid {
        self.steps.iter().fold(self.base.clone(), |acc, step| {
            Solid::boolean(&self.name, step.op, &acc, &step.operand, step.transform)
        })
    }
}
