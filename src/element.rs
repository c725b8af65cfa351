//! Element trait and implementations.
//!
//! The Element trait defines the interface for finite elements, enabling the
//! assembly and stress-recovery passes to work with any element type
//! uniformly. Implementations are stateless formulas; connectivity lives in
//! the [`Mesh`](crate::mesh::Mesh).

use crate::material::{Material, ProblemType};
use crate::mesh::ElementType;
use crate::types::{PlaneStress, Point2, DOFS_PER_NODE};
use nalgebra::DMatrix;

pub mod tri3;

pub use tri3::Tri3;

/// Finite element interface.
///
/// All element types implement this trait, providing:
/// - Element stiffness matrix computation
/// - Strain-displacement matrix for stress recovery
/// - Stress recovery from nodal displacements
///
/// Geometry validity is the caller's concern: assembly checks [`area`]
/// before evaluating the matrices, so implementations may assume a
/// positive area.
///
/// [`area`]: Element::area
pub trait Element: Send + Sync {
    /// Number of nodes in this element.
    fn n_nodes(&self) -> usize;

    /// Degrees of freedom per node.
    fn dofs_per_node(&self) -> usize {
        DOFS_PER_NODE
    }

    /// Total degrees of freedom for this element.
    fn n_dofs(&self) -> usize {
        self.n_nodes() * self.dofs_per_node()
    }

    /// Signed element area. Non-positive indicates degenerate or inverted
    /// geometry.
    fn area(&self, coords: &[Point2]) -> f64;

    /// Strain-displacement matrix B of shape (3, n_dofs), mapping the nodal
    /// displacement vector to `[ε_xx, ε_yy, γ_xy]`.
    fn strain_displacement(&self, coords: &[Point2]) -> DMatrix<f64>;

    /// Element stiffness matrix of shape (n_dofs, n_dofs).
    fn stiffness(
        &self,
        coords: &[Point2],
        material: &Material,
        problem_type: ProblemType,
    ) -> DMatrix<f64>;

    /// Recover the element stress state from its nodal displacement
    /// sub-vector (length n_dofs, node-major with X before Y).
    fn stress(
        &self,
        coords: &[Point2],
        displacements: &[f64],
        material: &Material,
        problem_type: ProblemType,
    ) -> PlaneStress;
}

/// Create an element implementation from its type tag.
pub fn create_element(element_type: ElementType) -> Box<dyn Element> {
    match element_type {
        ElementType::Tri3 => Box::new(Tri3),
    }
}
