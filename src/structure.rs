//! Analysis orchestration.
//!
//! [`Structure`] owns the model — mesh, material, problem type, loads,
//! constraints — and the most recent results. `analyze()` runs the full
//! pipeline (DOF indexing, assembly, contraction, solve, recovery) from
//! scratch each call and publishes the displacement and stress fields
//! atomically: a failure at any step leaves the previous results untouched.

use crate::assembly;
use crate::constraint::ConstraintCollection;
use crate::dof::DofMap;
use crate::element::create_element;
use crate::error::{Error, Result};
use crate::load::LoadCollection;
use crate::material::{Material, ProblemType};
use crate::mesh::{ElementConnectivity, Mesh};
use crate::results::{DisplacementField, StressField};
use crate::solver::{select_solver, SolverConfig};
use crate::sparse;
use crate::types::{Axis, ElementId, NodeId, Point2};

/// A structural model with its loads, constraints, and analysis results.
pub struct Structure {
    mesh: Mesh,
    material: Material,
    problem_type: ProblemType,
    loads: LoadCollection,
    constraints: ConstraintCollection,
    solver_config: SolverConfig,
    displacements: DisplacementField,
    stresses: StressField,
}

impl Structure {
    /// Create a structure over the given mesh and material model.
    pub fn new(mesh: Mesh, material: Material, problem_type: ProblemType) -> Self {
        Self {
            mesh,
            material,
            problem_type,
            loads: LoadCollection::new(),
            constraints: ConstraintCollection::new(),
            solver_config: SolverConfig::default(),
            displacements: DisplacementField::new(),
            stresses: StressField::new(),
        }
    }

    /// Replace the external load specification.
    pub fn set_loads(&mut self, loads: LoadCollection) {
        self.loads = loads;
    }

    /// Replace the constraint specification.
    pub fn set_constraints(&mut self, constraints: ConstraintCollection) {
        self.constraints = constraints;
    }

    /// Replace the solver configuration.
    pub fn set_solver_config(&mut self, config: SolverConfig) {
        self.solver_config = config;
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Number of active nodes.
    pub fn num_nodes(&self) -> usize {
        self.mesh.n_nodes()
    }

    /// Number of active elements.
    pub fn num_elements(&self) -> usize {
        self.mesh.n_elements()
    }

    /// Iterate active nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Point2)> {
        self.mesh.nodes()
    }

    /// Iterate active elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ElementConnectivity)> {
        self.mesh.elements()
    }

    /// Node matching `point` within the fixed tolerance, if any.
    pub fn node_at(&self, point: &Point2) -> Option<NodeId> {
        self.mesh.node_at(point)
    }

    /// Node minimizing squared distance to `point`.
    pub fn node_closest_to(&self, point: &Point2) -> Option<NodeId> {
        self.mesh.node_closest_to(point)
    }

    /// Displacement field from the most recent successful analysis.
    pub fn displacements(&self) -> &DisplacementField {
        &self.displacements
    }

    /// Per-element equivalent stress from the most recent successful
    /// analysis.
    pub fn stresses(&self) -> &StressField {
        &self.stresses
    }

    /// Run the linear static analysis.
    ///
    /// Assembles the global system over the active DOFs, removes the
    /// constrained indices, solves the reduced system, merges known and
    /// solved displacements into a complete field, and recovers per-element
    /// von Mises stress. Results are recomputed from scratch and published
    /// together; on error the previously published results are unchanged.
    pub fn analyze(&mut self) -> Result<()> {
        let dof_map = DofMap::new(self.mesh.node_ids());

        let stiffness = assembly::assemble_stiffness(
            &self.mesh,
            &self.material,
            self.problem_type,
            &dof_map,
        )?;
        let mut force = self.loads.force_vector(&dof_map)?;

        let excluded = self.constraints.constraint_indexes(&dof_map);
        let prescribed = self.constraints.indexed_values(&dof_map);
        assembly::condense_prescribed(&stiffness, &mut force, &prescribed);

        let stiffness_sub = sparse::contract_matrix(&stiffness, &excluded);
        let force_sub = sparse::contract_vector(&force, &excluded);
        let reduced_map = dof_map.contract(&excluded);

        if stiffness_sub.nrows() != reduced_map.len() || force_sub.len() != reduced_map.len() {
            return Err(Error::Internal(format!(
                "contracted sizes disagree: matrix {}, vector {}, index map {}",
                stiffness_sub.nrows(),
                force_sub.len(),
                reduced_map.len()
            )));
        }

        let solver = select_solver(&self.solver_config, reduced_map.len());
        let solved = solver.solve(&stiffness_sub, &force_sub)?;

        let displacements = self.merge_displacements(&dof_map, &reduced_map, &solved)?;
        let stresses = self.recover_stresses(&displacements)?;

        self.displacements = displacements;
        self.stresses = stresses;
        Ok(())
    }

    /// One value per active DOF: the prescribed value where constrained,
    /// the decoded solver value elsewhere.
    fn merge_displacements(
        &self,
        dof_map: &DofMap,
        reduced_map: &DofMap,
        solved: &[f64],
    ) -> Result<DisplacementField> {
        let mut displacements = DisplacementField::new();

        for (_, node, axis) in dof_map.iter() {
            let value = match self.constraints.value(node, axis) {
                Some(prescribed) => prescribed,
                None => {
                    let reduced_index = reduced_map.index_of(node, axis).ok_or_else(|| {
                        Error::Internal(format!(
                            "free DOF (node {}, axis {}) missing from reduced index map",
                            node, axis
                        ))
                    })?;
                    solved[reduced_index]
                }
            };
            displacements.set(node, axis, value);
        }

        Ok(displacements)
    }

    /// Per-element von Mises stress from the full displacement field.
    fn recover_stresses(&self, displacements: &DisplacementField) -> Result<StressField> {
        let mut stresses = StressField::new();

        for (element_id, connectivity) in self.mesh.elements() {
            let element = create_element(connectivity.element_type);
            let coords = self.mesh.element_coords(element_id).ok_or_else(|| {
                Error::Internal(format!("element {} missing node coordinates", element_id))
            })?;

            let mut element_displacements = Vec::with_capacity(element.n_dofs());
            for &node in &connectivity.nodes {
                for axis in Axis::ALL {
                    let value = displacements.value(node, axis).ok_or_else(|| {
                        Error::Internal(format!(
                            "displacement missing for node {} axis {}",
                            node, axis
                        ))
                    })?;
                    element_displacements.push(value);
                }
            }

            let stress = element.stress(
                &coords,
                &element_displacements,
                &self.material,
                self.problem_type,
            );
            stresses.set(element_id, stress.von_mises());
        }

        Ok(stresses)
    }

    /// Remove an element, dropping any node left unreferenced together with
    /// its displacement entries; the element's stress entry is always
    /// dropped. The mesh, adjacency, and result fields are updated as one
    /// consistent step.
    pub fn remove_element(&mut self, element_id: ElementId) -> Result<()> {
        let removed = self.mesh.remove_element(element_id)?;

        for node in removed.orphaned_nodes {
            self.displacements.remove_node(node);
        }
        self.stresses.remove(element_id);
        Ok(())
    }
}
