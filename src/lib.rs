//! planefem - 2D linear static finite element analysis
//!
//! Assembles a global sparse stiffness system from per-element
//! contributions, applies displacement boundary conditions by contraction,
//! solves for the unknown nodal displacements, and recovers per-element
//! von Mises stress.
//!
//! # Architecture
//!
//! The pipeline is built around these core abstractions:
//!
//! - [`Mesh`]: node/element arenas with stable ids and node→element adjacency
//! - [`Element`] trait: element stiffness and stress recovery formulas
//! - [`DofMap`]: bijection between (node, axis) pairs and dense DOF indices,
//!   with contraction to the unconstrained subspace
//! - [`ConstraintCollection`] / [`LoadCollection`]: boundary conditions
//! - [`Solver`] trait: linear system solution strategies
//! - [`Structure`]: orchestrates assemble → contract → solve → recover
//!
//! # Example
//!
//! ```
//! use planefem::{
//!     Axis, ConstraintCollection, ElementType, LoadCollection, Material, Mesh,
//!     Point2, ProblemType, Structure,
//! };
//!
//! let mut mesh = Mesh::new();
//! let n0 = mesh.add_node(Point2::new(0.0, 0.0));
//! let n1 = mesh.add_node(Point2::new(1.0, 0.0));
//! let n2 = mesh.add_node(Point2::new(0.0, 1.0));
//! mesh.add_element(ElementType::Tri3, vec![n0, n1, n2]).unwrap();
//!
//! let material = Material::new(200e9, 0.3).unwrap();
//! let mut structure = Structure::new(mesh, material, ProblemType::PlaneStress);
//!
//! let mut constraints = ConstraintCollection::new();
//! constraints.fix(n0, Axis::X, 0.0).unwrap();
//! constraints.fix(n0, Axis::Y, 0.0).unwrap();
//! constraints.fix(n2, Axis::X, 0.0).unwrap();
//! structure.set_constraints(constraints);
//!
//! let mut loads = LoadCollection::new();
//! loads.add_force(n1, Axis::X, 1000.0);
//! structure.set_loads(loads);
//!
//! structure.analyze().unwrap();
//! let ux = structure.displacements().value(n1, Axis::X).unwrap();
//! assert!(ux > 0.0);
//! ```

pub mod assembly;
pub mod constraint;
pub mod dof;
pub mod element;
pub mod error;
pub mod load;
pub mod material;
pub mod mesh;
pub mod results;
pub mod solver;
pub mod sparse;
pub mod structure;
pub mod types;

pub use constraint::ConstraintCollection;
pub use dof::DofMap;
pub use element::{create_element, Element};
pub use error::{Error, Result};
pub use load::LoadCollection;
pub use material::{Material, ProblemType};
pub use mesh::{ElementType, Mesh};
pub use results::{DisplacementField, StressField};
pub use solver::{Solver, SolverConfig, SolverType};
pub use sparse::CsrMatrix;
pub use structure::Structure;
pub use types::{Axis, ElementId, NodeId, PlaneStress, Point2};
