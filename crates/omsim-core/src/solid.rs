//! Constructive-solid-geometry nodes.
//!
//! A [`Solid`] is an immutable, reference-counted tree. Boolean nodes hold
//! their operands by handle, so composing a new solid never copies or
//! mutates the operands.

use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::transform::RigidTransform;

/// Primitive shapes, each centered on its local origin with its axis along z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned box given by half lengths.
    Box { half_x: f64, half_y: f64, half_z: f64 },
    /// Truncated cone; radii are given at `-half_z` (lo) and `+half_z` (hi).
    Cone {
        rmin_lo: f64,
        rmax_lo: f64,
        rmin_hi: f64,
        rmax_hi: f64,
        half_z: f64,
    },
    /// Full spherical shell.
    Sphere { inner: f64, outer: f64 },
    /// Cylindrical shell.
    Tube { inner: f64, outer: f64, half_z: f64 },
    /// Ellipsoid cut to `z_bottom ..= z_top`.
    Ellipsoid {
        semi_x: f64,
        semi_y: f64,
        semi_z: f64,
        z_bottom: f64,
        z_top: f64,
    },
    /// Cylinder with an elliptical cross-section.
    EllipticalTube { semi_x: f64, semi_y: f64, half_z: f64 },
}

impl Shape {
    /// Point-in-shape test in the shape's local frame. Surface points count as inside.
    pub fn contains(&self, p: DVec3) -> bool {
        match *self {
            Shape::Box {
                half_x,
                half_y,
                half_z,
            } => p.x.abs() <= half_x && p.y.abs() <= half_y && p.z.abs() <= half_z,
            Shape::Cone {
                rmin_lo,
                rmax_lo,
                rmin_hi,
                rmax_hi,
                half_z,
            } => {
                if p.z.abs() > half_z {
                    return false;
                }
                let t = if half_z > 0.0 {
                    (p.z + half_z) / (2.0 * half_z)
                } else {
                    0.5
                };
                let r = p.x.hypot(p.y);
                let rmin = rmin_lo + (rmin_hi - rmin_lo) * t;
                let rmax = rmax_lo + (rmax_hi - rmax_lo) * t;
                r >= rmin && r <= rmax
            }
            Shape::Sphere { inner, outer } => {
                let r = p.length();
                r >= inner && r <= outer
            }
            Shape::Tube {
                inner,
                outer,
                half_z,
            } => {
                let r = p.x.hypot(p.y);
                p.z.abs() <= half_z && r >= inner && r <= outer
            }
            Shape::Ellipsoid {
                semi_x,
                semi_y,
                semi_z,
                z_bottom,
                z_top,
            } => {
                let q = (p.x / semi_x).powi(2) + (p.y / semi_y).powi(2) + (p.z / semi_z).powi(2);
                q <= 1.0 && p.z >= z_bottom && p.z <= z_top
            }
            Shape::EllipticalTube {
                semi_x,
                semi_y,
                half_z,
            } => {
                p.z.abs() <= half_z && (p.x / semi_x).powi(2) + (p.y / semi_y).powi(2) <= 1.0
            }
        }
    }
}

/// The three boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    Union,
    /// First operand minus second operand.
    Subtraction,
    Intersection,
}

/// A boolean node: `left op right`, with `right` positioned in `left`'s frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanNode {
    pub op: BooleanOp,
    pub left: Solid,
    pub right: Solid,
    /// Placement of `right` inside `left`'s local frame.
    pub transform: RigidTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SolidKind {
    Primitive(Shape),
    Boolean(BooleanNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SolidData {
    name: String,
    kind: SolidKind,
}

/// A named, immutable CSG solid. Cloning is cheap and shares the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solid(Arc<SolidData>);

impl Solid {
    /// Wraps a primitive shape.
    pub fn primitive(name: impl Into<String>, shape: Shape) -> Self {
        Self(Arc::new(SolidData {
            name: name.into(),
            kind: SolidKind::Primitive(shape),
        }))
    }

    /// Combines two solids. Neither operand is modified.
    pub fn boolean(
        name: impl Into<String>,
        op: BooleanOp,
        left: &Solid,
        right: &Solid,
        transform: RigidTransform,
    ) -> Self {
        Self(Arc::new(SolidData {
            name: name.into(),
            kind: SolidKind::Boolean(BooleanNode {
                op,
                left: left.clone(),
                right: right.clone(),
                transform,
            }),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the primitive shape, if this is a leaf.
    pub fn shape(&self) -> Option<&Shape> {
        match &self.0.kind {
            SolidKind::Primitive(shape) => Some(shape),
            SolidKind::Boolean(_) => None,
        }
    }

    /// Returns the boolean node, if this is not a leaf.
    pub fn boolean_node(&self) -> Option<&BooleanNode> {
        match &self.0.kind {
            SolidKind::Primitive(_) => None,
            SolidKind::Boolean(node) => Some(node),
        }
    }

    /// Returns the boolean operation at the root, if any.
    pub fn op(&self) -> Option<BooleanOp> {
        self.boolean_node().map(|node| node.op)
    }

    /// True if both handles point at the same tree node.
    pub fn ptr_eq(&self, other: &Solid) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Point-in-solid test in the solid's local frame.
    pub fn contains(&self, p: DVec3) -> bool {
        match &self.0.kind {
            SolidKind::Primitive(shape) => shape.contains(p),
            SolidKind::Boolean(node) => {
                let in_left = node.left.contains(p);
                let in_right = || node.right.contains(node.transform.inverse_transform_point(p));
                match node.op {
                    BooleanOp::Union => in_left || in_right(),
                    BooleanOp::Subtraction => in_left && !in_right(),
                    BooleanOp::Intersection => in_left && in_right(),
                }
            }
        }
    }

    /// Number of primitive leaves in the tree.
    pub fn primitive_count(&self) -> usize {
        match &self.0.kind {
            SolidKind::Primitive(_) => 1,
            SolidKind::Boolean(node) => node.left.primitive_count() + node.right.primitive_count(),
        }
    }

    /// Height of the tree; a primitive has depth 1.
    pub fn depth(&self) -> usize {
        match &self.0.kind {
            SolidKind::Primitive(_) => 1,
            SolidKind::Boolean(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Operations applied along the left spine, innermost first.
    ///
    /// For a solid built as a left fold this is the sequence of steps that
    /// produced it.
    pub fn left_spine_ops(&self) -> Vec<BooleanOp> {
        let mut ops = Vec::new();
        let mut current = self;
        while let Some(node) = current.boolean_node() {
            ops.push(node.op);
            current = &node.left;
        }
        ops.reverse();
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Solid {
        Solid::primitive("s", Shape::Sphere { inner: 0.0, outer: 1.0 })
    }

    #[test]
    fn test_cone_radius_interpolates() {
        let cone = Shape::Cone {
            rmin_lo: 0.0,
            rmax_lo: 1.0,
            rmin_hi: 0.0,
            rmax_hi: 3.0,
            half_z: 1.0,
        };
        assert!(cone.contains(DVec3::new(1.9, 0.0, 0.0)));
        assert!(!cone.contains(DVec3::new(2.1, 0.0, 0.0)));
        assert!(cone.contains(DVec3::new(2.9, 0.0, 1.0)));
        assert!(!cone.contains(DVec3::new(0.0, 0.0, 1.1)));
    }

    #[test]
    fn test_ellipsoid_cuts() {
        let cap = Shape::Ellipsoid {
            semi_x: 2.0,
            semi_y: 2.0,
            semi_z: 2.0,
            z_bottom: 1.0,
            z_top: 2.0,
        };
        assert!(cap.contains(DVec3::new(0.0, 0.0, 1.5)));
        assert!(!cap.contains(DVec3::new(0.0, 0.0, 0.5)));
    }

    #[test]
    fn test_shell_excludes_core() {
        let shell = Shape::Sphere { inner: 1.0, outer: 2.0 };
        assert!(!shell.contains(DVec3::ZERO));
        assert!(shell.contains(DVec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_subtraction_uses_transform() {
        let big = Solid::primitive("big", Shape::Sphere { inner: 0.0, outer: 3.0 });
        let moved = RigidTransform::from_translation(DVec3::new(2.0, 0.0, 0.0));
        let cut = Solid::boolean("cut", BooleanOp::Subtraction, &big, &unit_sphere(), moved);
        assert!(!cut.contains(DVec3::new(2.0, 0.0, 0.0)));
        assert!(cut.contains(DVec3::new(-2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_operands_are_shared_not_copied() {
        let a = unit_sphere();
        let b = unit_sphere();
        let u = Solid::boolean("u", BooleanOp::Union, &a, &b, RigidTransform::IDENTITY);
        let node = u.boolean_node().unwrap();
        assert!(node.left.ptr_eq(&a));
        assert!(node.right.ptr_eq(&b));
        assert_eq!(u.primitive_count(), 2);
        assert_eq!(u.depth(), 2);
        assert_eq!(a.op(), None);
    }

    #[test]
    fn test_serde_roundtrip_keeps_tree() {
        let cut = Solid::boolean(
            "cut",
            BooleanOp::Intersection,
            &unit_sphere(),
            &unit_sphere(),
            RigidTransform::along_z(0.5),
        );
        let json = serde_json::to_string(&cut).unwrap();
        let back: Solid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cut);
    }
}
