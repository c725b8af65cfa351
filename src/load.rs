//! External nodal load specification.
//!
//! Loads are registered per (node, axis) and accumulated into the dense
//! force vector over the full DOF index space when an analysis runs.
//! Multiple loads on the same DOF sum.

use crate::dof::DofMap;
use crate::error::{Error, Result};
use crate::types::{Axis, NodeId};

/// A concentrated force on one nodal DOF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodalLoad {
    pub node: NodeId,
    pub axis: Axis,
    pub value: f64,
}

/// Collection of external nodal loads.
#[derive(Debug, Clone, Default)]
pub struct LoadCollection {
    loads: Vec<NodalLoad>,
}

impl LoadCollection {
    /// Create an empty load collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concentrated force on a nodal DOF.
    pub fn add_force(&mut self, node: NodeId, axis: Axis, value: f64) {
        self.loads.push(NodalLoad { node, axis, value });
    }

    /// Number of registered loads.
    pub fn len(&self) -> usize {
        self.loads.len()
    }

    /// Whether no loads are registered.
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Accumulate all loads into a dense force vector aligned to `dof_map`.
    ///
    /// # Errors
    ///
    /// Fails if a load names a node that is not part of the index space.
    pub fn force_vector(&self, dof_map: &DofMap) -> Result<Vec<f64>> {
        let mut force = vec![0.0; dof_map.len()];

        for load in &self.loads {
            let index = dof_map.index_of(load.node, load.axis).ok_or_else(|| {
                Error::Mesh(format!(
                    "load on node {} axis {} references no active node",
                    load.node, load.axis
                ))
            })?;
            force[index] += load.value;
        }

        Ok(force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_force_vector_accumulates() {
        let dof_map = DofMap::new([0, 1]);
        let mut loads = LoadCollection::new();
        loads.add_force(1, Axis::Y, 100.0);
        loads.add_force(1, Axis::Y, 50.0);
        loads.add_force(0, Axis::X, -25.0);

        let f = loads.force_vector(&dof_map).unwrap();
        assert_relative_eq!(f[0], -25.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(f[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(f[3], 150.0, epsilon = 1e-12);
    }

    #[test]
    fn test_force_vector_unknown_node() {
        let dof_map = DofMap::new([0]);
        let mut loads = LoadCollection::new();
        loads.add_force(9, Axis::X, 1.0);
        assert!(loads.force_vector(&dof_map).is_err());
    }
}
