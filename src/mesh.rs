//! Mesh data structure.
//!
//! Owns the active nodes and elements in id-keyed arenas, plus the
//! node→element adjacency map. Elements reference nodes by id, never by
//! ownership, so removal is bookkeeping: an element removal drops every node
//! left with no referencing element.

use crate::error::{Error, Result};
use crate::types::{ElementId, NodeId, Point2};
use std::collections::{BTreeMap, HashMap};

/// Coordinate tolerance for [`Mesh::node_at`] matching.
pub const NODE_MATCH_TOLERANCE: f64 = 1e-6;

/// Supported element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 3-node constant-strain triangle.
    Tri3,
}

impl ElementType {
    /// Number of nodes for this element type.
    pub fn n_nodes(self) -> usize {
        match self {
            ElementType::Tri3 => 3,
        }
    }
}

/// Element connectivity: ordered node ids for an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementConnectivity {
    /// Element type identifier.
    pub element_type: ElementType,
    /// Node ids, in element-local order.
    pub nodes: Vec<NodeId>,
}

/// Outcome of an element removal.
#[derive(Debug, Clone)]
pub struct RemovedElement {
    /// The removed element's connectivity.
    pub connectivity: ElementConnectivity,
    /// Nodes dropped because no remaining element references them.
    pub orphaned_nodes: Vec<NodeId>,
}

/// Finite element mesh.
///
/// Nodes and elements carry stable ids; id-ordered maps make iteration order
/// deterministic, which the closest-node tie rule relies on.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    nodes: BTreeMap<NodeId, Point2>,
    elements: BTreeMap<ElementId, ElementConnectivity>,
    adjacency: HashMap<NodeId, Vec<ElementId>>,
    next_node_id: NodeId,
    next_element_id: ElementId,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its id.
    pub fn add_node(&mut self, point: Point2) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.nodes.insert(id, point);
        id
    }

    /// Add an element, returning its id.
    ///
    /// # Errors
    ///
    /// Fails if the node count does not match the element type or a node id
    /// is unknown.
    pub fn add_element(&mut self, element_type: ElementType, nodes: Vec<NodeId>) -> Result<ElementId> {
        if nodes.len() != element_type.n_nodes() {
            return Err(Error::Mesh(format!(
                "element type {:?} requires {} nodes, got {}",
                element_type,
                element_type.n_nodes(),
                nodes.len()
            )));
        }

        for &node_id in &nodes {
            if !self.nodes.contains_key(&node_id) {
                return Err(Error::Mesh(format!("unknown node id {}", node_id)));
            }
        }

        let id = self.next_element_id;
        self.next_element_id += 1;

        for &node_id in &nodes {
            self.adjacency.entry(node_id).or_default().push(id);
        }

        self.elements.insert(
            id,
            ElementConnectivity {
                element_type,
                nodes,
            },
        );
        Ok(id)
    }

    /// Remove an element, dropping any node left unreferenced.
    ///
    /// The arena, adjacency map, and node set are updated together; no
    /// intermediate state is observable after this returns.
    pub fn remove_element(&mut self, element_id: ElementId) -> Result<RemovedElement> {
        let connectivity = self
            .elements
            .remove(&element_id)
            .ok_or_else(|| Error::Mesh(format!("unknown element id {}", element_id)))?;

        let mut orphaned_nodes = Vec::new();
        for &node_id in &connectivity.nodes {
            let Some(referencing) = self.adjacency.get_mut(&node_id) else {
                continue;
            };
            referencing.retain(|&e| e != element_id);

            if referencing.is_empty() {
                self.adjacency.remove(&node_id);
                self.nodes.remove(&node_id);
                orphaned_nodes.push(node_id);
            }
        }

        Ok(RemovedElement {
            connectivity,
            orphaned_nodes,
        })
    }

    /// Number of active nodes.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of active elements.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Point2)> {
        self.nodes.iter().map(|(&id, p)| (id, p))
    }

    /// Active node ids in iteration order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get a node's coordinates.
    pub fn node(&self, id: NodeId) -> Option<&Point2> {
        self.nodes.get(&id)
    }

    /// Iterate elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ElementConnectivity)> {
        self.elements.iter().map(|(&id, c)| (id, c))
    }

    /// Get an element's connectivity.
    pub fn element(&self, id: ElementId) -> Option<&ElementConnectivity> {
        self.elements.get(&id)
    }

    /// Elements referencing the given node.
    pub fn elements_of(&self, node_id: NodeId) -> &[ElementId] {
        self.adjacency
            .get(&node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Coordinates of an element's nodes, in element-local order.
    pub fn element_coords(&self, element_id: ElementId) -> Option<Vec<Point2>> {
        let connectivity = self.elements.get(&element_id)?;
        connectivity
            .nodes
            .iter()
            .map(|id| self.nodes.get(id).copied())
            .collect()
    }

    /// Find the node whose coordinates match `point` within
    /// [`NODE_MATCH_TOLERANCE`] on both axes. Returns `None` on a miss.
    pub fn node_at(&self, point: &Point2) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, p)| {
                (p.x - point.x).abs() < NODE_MATCH_TOLERANCE
                    && (p.y - point.y).abs() < NODE_MATCH_TOLERANCE
            })
            .map(|(&id, _)| id)
    }

    /// Find the node minimizing squared distance to `point`.
    ///
    /// On an exact tie, the first node in iteration order wins. Returns
    /// `None` only for an empty mesh.
    pub fn node_closest_to(&self, point: &Point2) -> Option<NodeId> {
        let mut closest: Option<(NodeId, f64)> = None;

        for (&id, p) in &self.nodes {
            let d = (p.x - point.x).powi(2) + (p.y - point.y).powi(2);
            match closest {
                Some((_, min)) if d >= min => {}
                _ => closest = Some((id, d)),
            }
        }

        closest.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn two_triangle_square() -> Mesh {
        let mut mesh = Mesh::new();
        let n0 = mesh.add_node(Vector2::new(0.0, 0.0));
        let n1 = mesh.add_node(Vector2::new(1.0, 0.0));
        let n2 = mesh.add_node(Vector2::new(1.0, 1.0));
        let n3 = mesh.add_node(Vector2::new(0.0, 1.0));
        mesh.add_element(ElementType::Tri3, vec![n0, n1, n2]).unwrap();
        mesh.add_element(ElementType::Tri3, vec![n0, n2, n3]).unwrap();
        mesh
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = two_triangle_square();
        assert_eq!(mesh.n_nodes(), 4);
        assert_eq!(mesh.n_elements(), 2);
        assert_eq!(mesh.elements_of(0), &[0, 1]);
        assert_eq!(mesh.elements_of(3), &[1]);
    }

    #[test]
    fn test_invalid_element_node_count() {
        let mut mesh = Mesh::new();
        mesh.add_node(Vector2::new(0.0, 0.0));
        mesh.add_node(Vector2::new(1.0, 0.0));
        assert!(mesh.add_element(ElementType::Tri3, vec![0, 1]).is_err());
    }

    #[test]
    fn test_invalid_node_index() {
        let mut mesh = Mesh::new();
        mesh.add_node(Vector2::new(0.0, 0.0));
        assert!(mesh.add_element(ElementType::Tri3, vec![0, 1, 2]).is_err());
    }

    #[test]
    fn test_remove_element_cascade() {
        let mut mesh = two_triangle_square();

        // Node 1 is only referenced by element 0.
        let removed = mesh.remove_element(0).unwrap();
        assert_eq!(removed.orphaned_nodes, vec![1]);
        assert_eq!(mesh.n_nodes(), 3);
        assert_eq!(mesh.n_elements(), 1);
        assert!(mesh.node(1).is_none());
        assert_eq!(mesh.elements_of(0), &[1]);

        // Removing the last element orphans the rest.
        let removed = mesh.remove_element(1).unwrap();
        assert_eq!(removed.orphaned_nodes, vec![0, 2, 3]);
        assert_eq!(mesh.n_nodes(), 0);
        assert_eq!(mesh.n_elements(), 0);
    }

    #[test]
    fn test_remove_unknown_element() {
        let mut mesh = two_triangle_square();
        assert!(mesh.remove_element(7).is_err());
    }

    #[test]
    fn test_node_at() {
        let mesh = two_triangle_square();
        assert_eq!(mesh.node_at(&Vector2::new(1.0, 1.0)), Some(2));
        // Within tolerance on both axes.
        assert_eq!(mesh.node_at(&Vector2::new(1.0 + 5e-7, 1.0 - 5e-7)), Some(2));
        // Far from every node.
        assert_eq!(mesh.node_at(&Vector2::new(1000.0, 1000.0)), None);
    }

    #[test]
    fn test_node_closest_to() {
        let mesh = two_triangle_square();
        assert_eq!(mesh.node_closest_to(&Vector2::new(0.9, 0.1)), Some(1));
        // Center of the square is equidistant from all four corners; the
        // first node in iteration order wins.
        assert_eq!(mesh.node_closest_to(&Vector2::new(0.5, 0.5)), Some(0));
        assert_eq!(Mesh::new().node_closest_to(&Vector2::new(0.0, 0.0)), None);
    }
}
