//! Prescribed-displacement boundary conditions.
//!
//! A constraint fixes one nodal DOF to a known displacement value (commonly
//! zero). Each DOF may carry at most one prescribed value; conflicting
//! registrations are rejected. Before the solve, the constrained DOF indices
//! are removed from the system and the known values are merged back into the
//! displacement result.

use crate::dof::DofMap;
use crate::error::{Error, Result};
use crate::results::DisplacementField;
use crate::types::{Axis, NodeId};
use std::collections::BTreeMap;

/// Collection of prescribed-displacement constraints.
#[derive(Debug, Clone, Default)]
pub struct ConstraintCollection {
    prescribed: BTreeMap<(NodeId, Axis), f64>,
}

impl ConstraintCollection {
    /// Create an empty constraint collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prescribe a displacement value for one nodal DOF.
    ///
    /// Re-registering the same value is accepted; a different value for an
    /// already-constrained DOF is rejected.
    pub fn fix(&mut self, node: NodeId, axis: Axis, value: f64) -> Result<()> {
        if let Some(&existing) = self.prescribed.get(&(node, axis)) {
            if existing != value {
                return Err(Error::DuplicateConstraint {
                    node,
                    axis,
                    existing,
                    conflicting: value,
                });
            }
            return Ok(());
        }
        self.prescribed.insert((node, axis), value);
        Ok(())
    }

    /// Prescribed value for a DOF, if any.
    pub fn value(&self, node: NodeId, axis: Axis) -> Option<f64> {
        self.prescribed.get(&(node, axis)).copied()
    }

    /// Number of constrained DOFs.
    pub fn len(&self) -> usize {
        self.prescribed.len()
    }

    /// Whether no DOFs are constrained.
    pub fn is_empty(&self) -> bool {
        self.prescribed.is_empty()
    }

    /// Sorted global indices of the constrained DOFs under `dof_map`.
    ///
    /// Constraints on nodes outside the index space (removed from the mesh
    /// after registration) are skipped.
    pub fn constraint_indexes(&self, dof_map: &DofMap) -> Vec<usize> {
        let mut indexes: Vec<usize> = self
            .prescribed
            .keys()
            .filter_map(|&(node, axis)| dof_map.index_of(node, axis))
            .collect();
        indexes.sort_unstable();
        indexes
    }

    /// (global index, prescribed value) pairs under `dof_map`, sorted by
    /// index. Input to the force-vector condensation step.
    pub fn indexed_values(&self, dof_map: &DofMap) -> Vec<(usize, f64)> {
        let mut pairs: Vec<(usize, f64)> = self
            .prescribed
            .iter()
            .filter_map(|(&(node, axis), &value)| {
                dof_map.index_of(node, axis).map(|i| (i, value))
            })
            .collect();
        pairs.sort_unstable_by_key(|&(i, _)| i);
        pairs
    }

    /// Partial displacement field pre-populated with the prescribed values.
    pub fn displacement(&self) -> DisplacementField {
        let mut field = DisplacementField::new();
        for (&(node, axis), &value) in &self.prescribed {
            field.set(node, axis, value);
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_value_rejected() {
        let mut constraints = ConstraintCollection::new();
        constraints.fix(0, Axis::X, 0.0).unwrap();

        let err = constraints.fix(0, Axis::X, 0.5).unwrap_err();
        assert!(matches!(err, Error::DuplicateConstraint { node: 0, .. }));

        // Same value again is idempotent.
        constraints.fix(0, Axis::X, 0.0).unwrap();
        assert_eq!(constraints.len(), 1);
    }

    #[test]
    fn test_constraint_indexes_sorted() {
        let dof_map = DofMap::new([0, 1, 2]);
        let mut constraints = ConstraintCollection::new();
        constraints.fix(2, Axis::Y, 0.0).unwrap();
        constraints.fix(0, Axis::X, 0.0).unwrap();
        constraints.fix(1, Axis::X, 0.1).unwrap();

        assert_eq!(constraints.constraint_indexes(&dof_map), vec![0, 2, 5]);
        assert_eq!(
            constraints.indexed_values(&dof_map),
            vec![(0, 0.0), (2, 0.1), (5, 0.0)]
        );
    }

    #[test]
    fn test_inactive_node_skipped() {
        let dof_map = DofMap::new([0, 1]);
        let mut constraints = ConstraintCollection::new();
        constraints.fix(0, Axis::X, 0.0).unwrap();
        constraints.fix(9, Axis::X, 0.0).unwrap();

        assert_eq!(constraints.constraint_indexes(&dof_map), vec![0]);
    }

    #[test]
    fn test_displacement_prepopulated() {
        let mut constraints = ConstraintCollection::new();
        constraints.fix(3, Axis::Y, -0.25).unwrap();

        let field = constraints.displacement();
        assert_eq!(field.value(3, Axis::Y), Some(-0.25));
        assert_eq!(field.value(3, Axis::X), None);
    }
}
