//! Sparse matrix operations.
//!
//! The global stiffness matrix is accumulated in COO (triplet) form while
//! elements are scattered in, then converted once to CSR for querying and
//! solving. CSR entries are never mutated in place; contraction rebuilds
//! through a fresh triplet pass.

use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Compressed Sparse Row matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Builder for assembling a sparse matrix from triplets (COO format).
///
/// Accumulates (row, col, value) contributions and converts to CSR when
/// complete. Duplicate positions are summed during conversion, which is what
/// gives element scatter-add its accumulation semantics.
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Create a new triplet matrix builder.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Create with estimated capacity.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Add a value at (row, col). Duplicates are summed during conversion.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows, "row index out of bounds");
        debug_assert!(col < self.n_cols, "column index out of bounds");

        if value.abs() > f64::EPSILON {
            self.rows.push(row);
            self.cols.push(col);
            self.values.push(value);
        }
    }

    /// Add a dense submatrix at the specified DOF indices.
    ///
    /// This is the core operation for finite element assembly.
    pub fn add_submatrix(&mut self, dof_indices: &[usize], submatrix: &nalgebra::DMatrix<f64>) {
        let n = dof_indices.len();
        debug_assert_eq!(submatrix.nrows(), n);
        debug_assert_eq!(submatrix.ncols(), n);

        for i in 0..n {
            for j in 0..n {
                self.add(dof_indices[i], dof_indices[j], submatrix[(i, j)]);
            }
        }
    }

    /// Number of stored triplets.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert to CSR format, summing duplicate entries.
    pub fn to_csr(self) -> CsrMatrix {
        use nalgebra_sparse::coo::CooMatrix;

        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .expect("triplet indices validated on insertion");

        CsrMatrix::from(&coo)
    }
}

/// Old-index → new-index map for a contraction, `None` for removed indices.
fn contraction_map(n: usize, excluded: &[usize]) -> (Vec<Option<usize>>, usize) {
    let mut removed = vec![false; n];
    for &i in excluded {
        debug_assert!(i < n, "excluded index out of bounds");
        removed[i] = true;
    }

    let mut map = vec![None; n];
    let mut next = 0;
    for (i, &gone) in removed.iter().enumerate() {
        if !gone {
            map[i] = Some(next);
            next += 1;
        }
    }
    (map, next)
}

/// Principal submatrix obtained by deleting the listed rows and columns,
/// with the remaining indices renumbered contiguously in order.
///
/// Symmetry of the input is preserved because rows and columns are removed
/// by the same index set.
pub fn contract_matrix(matrix: &CsrMatrix, excluded: &[usize]) -> CsrMatrix {
    let (map, n_kept) = contraction_map(matrix.nrows(), excluded);

    let mut triplet = TripletMatrix::with_capacity(n_kept, n_kept, matrix.nnz());
    for (row, col, &value) in matrix.triplet_iter() {
        if let (Some(r), Some(c)) = (map[row], map[col]) {
            triplet.add(r, c, value);
        }
    }
    triplet.to_csr()
}

/// Remove the listed rows from a dense vector, preserving the order of the
/// remaining entries.
pub fn contract_vector(vector: &[f64], excluded: &[usize]) -> Vec<f64> {
    let (map, n_kept) = contraction_map(vector.len(), excluded);

    let mut contracted = vec![0.0; n_kept];
    for (i, &value) in vector.iter().enumerate() {
        if let Some(k) = map[i] {
            contracted[k] = value;
        }
    }
    contracted
}

/// Sparse matrix-vector product y = A·x over CSR storage.
pub fn matvec(matrix: &CsrMatrix, x: &[f64]) -> Vec<f64> {
    debug_assert_eq!(matrix.ncols(), x.len());

    let row_offsets = matrix.row_offsets();
    let col_indices = matrix.col_indices();
    let values = matrix.values();

    let mut y = vec![0.0; matrix.nrows()];
    for (row, out) in y.iter_mut().enumerate() {
        let mut sum = 0.0;
        for idx in row_offsets[row]..row_offsets[row + 1] {
            sum += values[idx] * x[col_indices[idx]];
        }
        *out = sum;
    }
    y
}
