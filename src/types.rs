//! Core data types for 2D structural analysis.
//!
//! Defines the geometric and tensorial primitives used throughout the crate:
//! points, the axis enumeration that orders each node's DOF block, and the
//! plane stress state recovered per element.

use nalgebra::Vector2;

/// A point in the 2D plane.
pub type Point2 = Vector2<f64>;

/// Stable node identifier.
pub type NodeId = usize;

/// Stable element identifier.
pub type ElementId = usize;

/// Number of displacement DOFs per node.
pub const DOFS_PER_NODE: usize = 2;

/// Coordinate axis of a nodal degree of freedom.
///
/// Ordering is significant: `X` occupies slot 0 and `Y` slot 1 within a
/// node's DOF block. Iterate with [`Axis::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes in DOF-block order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Offset of this axis within a node's DOF block.
    pub fn offset(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Plane stress state in Voigt notation.
///
/// Components are ordered as `[σ_xx, σ_yy, τ_xy]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStress {
    pub sx: f64,
    pub sy: f64,
    pub txy: f64,
}

impl PlaneStress {
    /// Create a stress state from Voigt components.
    pub fn new(sx: f64, sy: f64, txy: f64) -> Self {
        Self { sx, sy, txy }
    }

    /// Zero stress state.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Von Mises equivalent stress for the plane stress state:
    /// `sqrt(σx² + σy² − σx·σy + 3·τxy²)`.
    pub fn von_mises(&self) -> f64 {
        (self.sx.powi(2) + self.sy.powi(2) - self.sx * self.sy + 3.0 * self.txy.powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_von_mises_uniaxial() {
        let stress = PlaneStress::new(3.0, 0.0, 0.0);
        assert_relative_eq!(stress.von_mises(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_von_mises_pure_shear() {
        // von Mises = √3 * τ
        let stress = PlaneStress::new(0.0, 0.0, 1.0);
        assert_relative_eq!(stress.von_mises(), 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_von_mises_biaxial() {
        // Equal biaxial tension: σ_eq equals the common component.
        let stress = PlaneStress::new(5.0, 5.0, 0.0);
        assert_relative_eq!(stress.von_mises(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_order() {
        assert_eq!(Axis::ALL[0], Axis::X);
        assert_eq!(Axis::ALL[1], Axis::Y);
        assert_eq!(Axis::X.offset(), 0);
        assert_eq!(Axis::Y.offset(), 1);
    }
}
