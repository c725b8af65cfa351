//! Analysis result fields.
//!
//! Each `analyze()` call produces fresh result values; queries read the last
//! published ones. Element removal purges the affected entries so neither
//! field ever refers to inactive nodes or elements.

use crate::types::{Axis, ElementId, NodeId};
use std::collections::BTreeMap;

/// Nodal displacement field: (node, axis) → displacement value.
///
/// After a completed analysis this holds exactly one entry per active DOF.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplacementField {
    values: BTreeMap<(NodeId, Axis), f64>,
}

impl DisplacementField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for one DOF.
    pub fn set(&mut self, node: NodeId, axis: Axis, value: f64) {
        self.values.insert((node, axis), value);
    }

    /// Value for one DOF, if present.
    pub fn value(&self, node: NodeId, axis: Axis) -> Option<f64> {
        self.values.get(&(node, axis)).copied()
    }

    /// Whether the field holds a value for the DOF.
    pub fn has_value(&self, node: NodeId, axis: Axis) -> bool {
        self.values.contains_key(&(node, axis))
    }

    /// Drop both axis entries of a node.
    pub fn remove_node(&mut self, node: NodeId) {
        for axis in Axis::ALL {
            self.values.remove(&(node, axis));
        }
    }

    /// Number of stored DOF values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate (node, axis, value) in key order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Axis, f64)> + '_ {
        self.values.iter().map(|(&(n, a), &v)| (n, a, v))
    }
}

/// Per-element equivalent stress field: element → von Mises scalar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StressField {
    values: BTreeMap<ElementId, f64>,
}

impl StressField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the equivalent stress for an element.
    pub fn set(&mut self, element: ElementId, von_mises: f64) {
        self.values.insert(element, von_mises);
    }

    /// Equivalent stress for an element, if present.
    pub fn value(&self, element: ElementId) -> Option<f64> {
        self.values.get(&element).copied()
    }

    /// Drop an element's entry.
    pub fn remove(&mut self, element: ElementId) {
        self.values.remove(&element);
    }

    /// Number of stored element stresses.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum equivalent stress across all elements.
    pub fn max_von_mises(&self) -> f64 {
        self.values.values().copied().fold(0.0, f64::max)
    }

    /// Iterate (element, von Mises) in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, f64)> + '_ {
        self.values.iter().map(|(&e, &v)| (e, v))
    }
}
