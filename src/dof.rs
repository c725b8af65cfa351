//! Degree-of-freedom indexing.
//!
//! A [`DofMap`] is the bijection between (node, axis) pairs and a dense
//! 0-based index space. The full map is built once per analysis from the
//! active node set; contraction produces the reduced map over the
//! unconstrained DOFs, which also decodes solver output back to nodal
//! values. Both maps are read-only once built.

use crate::types::{Axis, NodeId};
use std::collections::{HashMap, HashSet};

/// Bijection between (node, axis) pairs and dense DOF indices.
#[derive(Debug, Clone)]
pub struct DofMap {
    entries: Vec<(NodeId, Axis)>,
    indices: HashMap<(NodeId, Axis), usize>,
}

impl DofMap {
    /// Build the full DOF map over the given nodes, in iteration order,
    /// with both axes per node in [`Axis::ALL`] order.
    pub fn new(node_ids: impl IntoIterator<Item = NodeId>) -> Self {
        let mut entries = Vec::new();
        for node in node_ids {
            for axis in Axis::ALL {
                entries.push((node, axis));
            }
        }
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<(NodeId, Axis)>) -> Self {
        let indices = entries
            .iter()
            .enumerate()
            .map(|(i, &dof)| (dof, i))
            .collect();
        Self { entries, indices }
    }

    /// Number of indexed DOFs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no DOFs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the given DOF, if it is part of this map.
    pub fn index_of(&self, node: NodeId, axis: Axis) -> Option<usize> {
        self.indices.get(&(node, axis)).copied()
    }

    /// Decode an index back to its (node, axis) pair.
    pub fn dof_at(&self, index: usize) -> Option<(NodeId, Axis)> {
        self.entries.get(index).copied()
    }

    /// Iterate (index, node, axis) in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId, Axis)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, &(node, axis))| (i, node, axis))
    }

    /// Build the reduced map over the complement of `excluded`, renumbered
    /// contiguously while preserving relative order.
    pub fn contract(&self, excluded: &[usize]) -> DofMap {
        let excluded: HashSet<usize> = excluded.iter().copied().collect();
        let entries = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| !excluded.contains(i))
            .map(|(_, &dof)| dof)
            .collect();
        Self::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_map_layout() {
        let map = DofMap::new([0, 1, 2]);
        assert_eq!(map.len(), 6);
        assert_eq!(map.index_of(0, Axis::X), Some(0));
        assert_eq!(map.index_of(0, Axis::Y), Some(1));
        assert_eq!(map.index_of(2, Axis::Y), Some(5));
        assert_eq!(map.dof_at(4), Some((2, Axis::X)));
        assert_eq!(map.index_of(3, Axis::X), None);
    }

    #[test]
    fn test_non_contiguous_node_ids() {
        // Ids stay stable after removals; the index space is still dense.
        let map = DofMap::new([0, 2, 5]);
        assert_eq!(map.len(), 6);
        assert_eq!(map.index_of(2, Axis::X), Some(2));
        assert_eq!(map.index_of(5, Axis::Y), Some(5));
        assert_eq!(map.index_of(1, Axis::X), None);
    }

    #[test]
    fn test_contract_preserves_order() {
        let map = DofMap::new([0, 1, 2]);
        // Remove node 0 X and node 1 Y (indices 0 and 3).
        let reduced = map.contract(&[0, 3]);

        assert_eq!(reduced.len(), 4);
        assert_eq!(reduced.dof_at(0), Some((0, Axis::Y)));
        assert_eq!(reduced.dof_at(1), Some((1, Axis::X)));
        assert_eq!(reduced.dof_at(2), Some((2, Axis::X)));
        assert_eq!(reduced.dof_at(3), Some((2, Axis::Y)));
        assert_eq!(reduced.index_of(0, Axis::X), None);
        assert_eq!(reduced.index_of(2, Axis::Y), Some(3));
    }

    #[test]
    fn test_contract_everything() {
        let map = DofMap::new([0]);
        let reduced = map.contract(&[0, 1]);
        assert!(reduced.is_empty());
    }
}
