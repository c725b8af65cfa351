//! Global stiffness assembly.
//!
//! Scatters each element's local stiffness into the global sparse system
//! keyed by the DOF map. Contributions are accumulated in COO form and
//! converted to CSR exactly once, after all elements are processed; shared
//! nodes sum, never overwrite.

use crate::dof::DofMap;
use crate::element::create_element;
use crate::error::{Error, Result};
use crate::material::{Material, ProblemType};
use crate::mesh::Mesh;
use crate::sparse::{CsrMatrix, TripletMatrix};
use crate::types::{Axis, NodeId};
use std::collections::HashMap;

/// Assemble the global stiffness matrix over the full DOF space.
///
/// # Errors
///
/// - [`Error::DegenerateElement`] if an element's area is not positive.
/// - [`Error::Internal`] if an element references a DOF the map does not
///   index, which indicates the map was not built from the current mesh.
pub fn assemble_stiffness(
    mesh: &Mesh,
    material: &Material,
    problem_type: ProblemType,
    dof_map: &DofMap,
) -> Result<CsrMatrix> {
    let n_dofs = dof_map.len();

    // ~18 entries per DOF for a 2D triangular stencil.
    let mut triplet = TripletMatrix::with_capacity(n_dofs, n_dofs, n_dofs * 18);

    for (element_id, connectivity) in mesh.elements() {
        let element = create_element(connectivity.element_type);

        let coords = mesh.element_coords(element_id).ok_or_else(|| {
            Error::Internal(format!("element {} missing node coordinates", element_id))
        })?;

        let area = element.area(&coords);
        if area <= 0.0 {
            return Err(Error::DegenerateElement {
                element: element_id,
                area,
            });
        }

        let ke = element.stiffness(&coords, material, problem_type);

        let dof_indices = element_dof_indices(connectivity.nodes.iter().copied(), dof_map)?;
        triplet.add_submatrix(&dof_indices, &ke);
    }

    Ok(triplet.to_csr())
}

/// Global DOF indices for an element's nodes, node-major with X before Y.
pub fn element_dof_indices(
    nodes: impl Iterator<Item = NodeId>,
    dof_map: &DofMap,
) -> Result<Vec<usize>> {
    let mut indices = Vec::new();
    for node in nodes {
        for axis in Axis::ALL {
            let index = dof_map.index_of(node, axis).ok_or_else(|| {
                Error::Internal(format!("node {} axis {} not indexed", node, axis))
            })?;
            indices.push(index);
        }
    }
    Ok(indices)
}

/// Static condensation of prescribed displacements into the force vector.
///
/// For every free DOF i, subtracts `K[i, j] · u_j` over the constrained DOFs
/// j, so the reduced system solves for the free displacements with the known
/// ones moved to the right-hand side. A no-op when all prescribed values are
/// zero.
pub fn condense_prescribed(
    stiffness: &CsrMatrix,
    force: &mut [f64],
    prescribed: &[(usize, f64)],
) {
    if prescribed.iter().all(|&(_, u)| u == 0.0) {
        return;
    }

    let fixed: HashMap<usize, f64> = prescribed.iter().copied().collect();

    for (row, col, &value) in stiffness.triplet_iter() {
        if fixed.contains_key(&row) {
            continue;
        }
        if let Some(&u) = fixed.get(&col) {
            force[row] -= value * u;
        }
    }
}
