//! Error types for analysis operations.

use crate::types::{Axis, ElementId, NodeId};
use thiserror::Error;

/// Result type alias using the crate Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or analyzing a structure.
#[derive(Error, Debug)]
pub enum Error {
    /// The same DOF was constrained with two different prescribed values.
    #[error("duplicate constraint on node {node} axis {axis}: {existing} vs {conflicting}")]
    DuplicateConstraint {
        node: NodeId,
        axis: Axis,
        existing: f64,
        conflicting: f64,
    },

    /// An element's geometry yields a non-physical local stiffness.
    #[error("degenerate element {element}: area {area} is not positive")]
    DegenerateElement { element: ElementId, area: f64 },

    /// The reduced system failed to solve within tolerance/iteration limits.
    #[error("solver did not converge after {iterations} iterations (residual {residual:e})")]
    NonConvergence { iterations: usize, residual: f64 },

    /// Matrix singularity or conditioning issues (insufficient constraints).
    #[error("singular matrix: {0}")]
    SingularMatrix(String),

    /// Other solver errors.
    #[error("solver error: {0}")]
    Solver(String),

    /// Mesh-related errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Invalid material properties.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Internal DOF-mapping inconsistency. Indicates a programming defect.
    #[error("invariant violation: {0}")]
    Internal(String),
}
