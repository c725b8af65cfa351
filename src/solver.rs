//! Linear system solvers.
//!
//! Provides iterative and direct solvers for the reduced system K·u = f.
//!
//! # Solver Backends
//!
//! - [`ConjugateGradientSolver`]: iterative CG for symmetric positive
//!   definite systems, with a fixed convergence tolerance and iteration cap.
//!   Non-convergence within the cap is reported as a distinct error, and an
//!   indefinite search direction (insufficient constraints leaving rigid-body
//!   freedom) is reported as a singular-matrix condition.
//! - [`FaerCholeskySolver`]: sparse LLᵀ factorization using the faer library.
//!   Rejects non-positive-definite matrices explicitly at factorization time.

use crate::error::{Error, Result};
use crate::sparse::{self, CsrMatrix};
use faer::linalg::cholesky::llt::factor::LltError;
use faer::prelude::*;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::linalg::LltError as SparseLltError;
use faer::sparse::{SparseColMat, SymbolicSparseColMat};

/// Linear solver interface.
pub trait Solver {
    /// Solve the linear system K·u = f.
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>>;

    /// Solver name for diagnostics.
    fn name(&self) -> &str;
}

/// Solver selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverType {
    /// Direct solver (sparse Cholesky via faer).
    Direct,
    /// Iterative solver (conjugate gradient).
    #[default]
    Iterative,
    /// Direct below the size threshold, iterative above.
    Auto,
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Solver type to use.
    pub solver_type: SolverType,
    /// Relative residual tolerance for the iterative solver.
    pub tolerance: f64,
    /// Iteration cap for the iterative solver.
    pub max_iterations: usize,
    /// Problem size threshold for auto-selection.
    pub auto_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_type: SolverType::Iterative,
            tolerance: 1e-10,
            max_iterations: 10_000,
            auto_threshold: 50_000,
        }
    }
}

fn check_system(matrix: &CsrMatrix, rhs: &[f64]) -> Result<usize> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(Error::Solver("matrix must be square".into()));
    }
    if n != rhs.len() {
        return Err(Error::Solver(format!(
            "matrix size {} does not match rhs size {}",
            n,
            rhs.len()
        )));
    }
    Ok(n)
}

/// Conjugate gradient solver for symmetric positive definite systems.
pub struct ConjugateGradientSolver {
    /// Relative residual tolerance against ‖f‖.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: usize,
}

impl ConjugateGradientSolver {
    /// Create a CG solver with the given tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

impl Default for ConjugateGradientSolver {
    fn default() -> Self {
        let config = SolverConfig::default();
        Self::new(config.tolerance, config.max_iterations)
    }
}

impl Solver for ConjugateGradientSolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        let n = check_system(matrix, rhs)?;
        if n == 0 {
            return Ok(vec![]);
        }

        let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();

        let rhs_norm = norm(rhs);
        if rhs_norm == 0.0 {
            return Ok(vec![0.0; n]);
        }

        let mut x = vec![0.0; n];
        let mut r = rhs.to_vec();
        let mut p = r.clone();
        let mut rr: f64 = r.iter().map(|ri| ri * ri).sum();

        // A semidefinite matrix rounds to tiny positive curvature along its
        // null directions, so pᵀKp must be compared against the matrix scale
        // rather than zero.
        let max_diag = matrix
            .triplet_iter()
            .filter(|(i, j, _)| i == j)
            .map(|(_, _, v)| v.abs())
            .fold(0.0_f64, f64::max);

        for iteration in 0..self.max_iterations {
            let ap = sparse::matvec(matrix, &p);
            let p_ap: f64 = p.iter().zip(&ap).map(|(pi, api)| pi * api).sum();

            let p_norm_sq: f64 = p.iter().map(|pi| pi * pi).sum();
            let breakdown = f64::EPSILON * (n as f64) * max_diag * p_norm_sq;
            if p_ap <= breakdown {
                return Err(Error::SingularMatrix(format!(
                    "matrix is not positive definite (pᵀKp = {:e} at iteration {})",
                    p_ap, iteration
                )));
            }

            let alpha = rr / p_ap;
            for i in 0..n {
                x[i] += alpha * p[i];
                r[i] -= alpha * ap[i];
            }

            let r_norm = norm(&r);
            if r_norm <= self.tolerance * rhs_norm {
                return Ok(x);
            }

            let rr_new: f64 = r.iter().map(|ri| ri * ri).sum();
            let beta = rr_new / rr;
            rr = rr_new;

            for i in 0..n {
                p[i] = r[i] + beta * p[i];
            }
        }

        Err(Error::NonConvergence {
            iterations: self.max_iterations,
            residual: norm(&r) / rhs_norm,
        })
    }

    fn name(&self) -> &str {
        "conjugate gradient"
    }
}

/// Convert a nalgebra-sparse CSR matrix to a faer CSC matrix.
///
/// Stiffness matrices are symmetric, so CSR of K equals CSC of Kᵀ = K; the
/// conversion is an index transpose.
fn csr_to_faer_csc(csr: &CsrMatrix) -> SparseColMat<usize, f64> {
    let nrows = csr.nrows();
    let ncols = csr.ncols();

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    let mut col_counts = vec![0usize; ncols];
    for &col in col_indices {
        col_counts[col] += 1;
    }

    let mut col_offsets = vec![0usize; ncols + 1];
    for i in 0..ncols {
        col_offsets[i + 1] = col_offsets[i] + col_counts[i];
    }

    let nnz = values.len();
    let mut csc_row_indices = vec![0usize; nnz];
    let mut csc_values = vec![0.0f64; nnz];
    let mut col_positions = col_offsets[..ncols].to_vec();

    for row in 0..nrows {
        for idx in row_offsets[row]..row_offsets[row + 1] {
            let col = col_indices[idx];
            let pos = col_positions[col];
            csc_row_indices[pos] = row;
            csc_values[pos] = values[idx];
            col_positions[col] += 1;
        }
    }

    // SAFETY: offsets and indices form valid CSC data by construction.
    unsafe {
        SparseColMat::new(
            SymbolicSparseColMat::new_unchecked(nrows, ncols, col_offsets, None, csc_row_indices),
            csc_values,
        )
    }
}

/// Sparse Cholesky (LLᵀ) direct solver using the faer library.
pub struct FaerCholeskySolver;

impl FaerCholeskySolver {
    /// Create a new sparse Cholesky solver.
    pub fn new() -> Self {
        Self
    }
}

impl Default for FaerCholeskySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for FaerCholeskySolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        let n = check_system(matrix, rhs)?;
        if n == 0 {
            return Ok(vec![]);
        }

        let csc = csr_to_faer_csc(matrix);
        let csc_ref = csc.as_ref();

        let symbolic = SymbolicLlt::try_new(csc_ref.symbolic(), faer::Side::Lower)
            .map_err(|_| Error::Solver("symbolic Cholesky analysis failed".into()))?;

        let llt =
            Llt::try_new_with_symbolic(symbolic, csc_ref, faer::Side::Lower).map_err(
                |e| match e {
                    SparseLltError::Generic(err) => {
                        Error::Solver(format!("sparse Cholesky error: {:?}", err))
                    }
                    SparseLltError::Numeric(LltError::NonPositivePivot { index }) => {
                        Error::SingularMatrix(format!(
                            "matrix is not positive definite at pivot {}",
                            index
                        ))
                    }
                },
            )?;

        let mut x = faer::Mat::from_fn(n, 1, |i, _| rhs[i]);
        llt.solve_in_place(x.as_mut());

        Ok((0..n).map(|i| x[(i, 0)]).collect())
    }

    fn name(&self) -> &str {
        "faer sparse Cholesky (LLᵀ)"
    }
}

/// Select a solver backend from configuration and problem size.
pub fn select_solver(config: &SolverConfig, n_dofs: usize) -> Box<dyn Solver> {
    let iterative = || -> Box<dyn Solver> {
        Box::new(ConjugateGradientSolver::new(
            config.tolerance,
            config.max_iterations,
        ))
    };

    match config.solver_type {
        SolverType::Direct => Box::new(FaerCholeskySolver::new()),
        SolverType::Iterative => iterative(),
        SolverType::Auto => {
            if n_dofs < config.auto_threshold {
                Box::new(FaerCholeskySolver::new())
            } else {
                iterative()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::TripletMatrix;
    use approx::assert_relative_eq;

    fn spd_2x2() -> CsrMatrix {
        // [4 2; 2 3]
        let mut triplet = TripletMatrix::new(2, 2);
        triplet.add(0, 0, 4.0);
        triplet.add(0, 1, 2.0);
        triplet.add(1, 0, 2.0);
        triplet.add(1, 1, 3.0);
        triplet.to_csr()
    }

    fn indefinite_2x2() -> CsrMatrix {
        // Eigenvalues 3 and -1.
        let mut triplet = TripletMatrix::new(2, 2);
        triplet.add(0, 0, 1.0);
        triplet.add(0, 1, 2.0);
        triplet.add(1, 0, 2.0);
        triplet.add(1, 1, 1.0);
        triplet.to_csr()
    }

    #[test]
    fn test_cg_simple_spd() {
        // [4 2; 2 3]·[x; y] = [4; 5] → x = 0.25, y = 1.5
        let solver = ConjugateGradientSolver::default();
        let solution = solver.solve(&spd_2x2(), &[4.0, 5.0]).unwrap();
        assert_relative_eq!(solution[0], 0.25, epsilon = 1e-8);
        assert_relative_eq!(solution[1], 1.5, epsilon = 1e-8);
    }

    #[test]
    fn test_cg_banded_system() {
        let n = 20;
        let mut triplet = TripletMatrix::new(n, n);
        for i in 0..n {
            triplet.add(i, i, 4.0);
        }
        for i in 0..n - 1 {
            triplet.add(i, i + 1, -1.0);
            triplet.add(i + 1, i, -1.0);
        }
        let matrix = triplet.to_csr();
        let rhs = vec![1.0; n];

        let solution = ConjugateGradientSolver::default()
            .solve(&matrix, &rhs)
            .unwrap();

        let residual: f64 = sparse::matvec(&matrix, &solution)
            .iter()
            .zip(&rhs)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        assert!(residual < 1e-8, "residual too large: {}", residual);
    }

    #[test]
    fn test_cg_zero_rhs() {
        let solution = ConjugateGradientSolver::default()
            .solve(&spd_2x2(), &[0.0, 0.0])
            .unwrap();
        assert_eq!(solution, vec![0.0, 0.0]);
    }

    #[test]
    fn test_cg_empty_system() {
        let matrix = TripletMatrix::new(0, 0).to_csr();
        let solution = ConjugateGradientSolver::default().solve(&matrix, &[]).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_cg_non_convergence_reported() {
        // One iteration cannot reduce the residual of this system to 1e-16.
        let solver = ConjugateGradientSolver::new(1e-16, 1);
        let err = solver.solve(&spd_2x2(), &[4.0, 5.0]).unwrap_err();
        assert!(matches!(err, Error::NonConvergence { iterations: 1, .. }));
    }

    #[test]
    fn test_cg_indefinite_detected() {
        // With rhs [1, -1] the first search direction has pᵀKp < 0.
        let solver = ConjugateGradientSolver::default();
        let err = solver.solve(&indefinite_2x2(), &[1.0, -1.0]).unwrap_err();
        assert!(matches!(err, Error::SingularMatrix(_)));
    }

    #[test]
    fn test_cg_semidefinite_detected() {
        // A single unconstrained triangle's stiffness has three rigid-body
        // null modes; in floating point their curvature is a tiny positive
        // number, not zero. An inconsistent rhs must yield an error rather
        // than a solution dominated by the null space.
        use crate::element::Tri3;
        use crate::element::Element;
        use crate::material::{Material, ProblemType};
        use crate::types::Point2;

        let coords = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let material = Material::new(1000.0, 0.25).unwrap();
        let ke = Tri3.stiffness(&coords, &material, ProblemType::PlaneStress);

        let mut triplet = TripletMatrix::new(6, 6);
        for i in 0..6 {
            for j in 0..6 {
                triplet.add(i, j, ke[(i, j)]);
            }
        }
        let matrix = triplet.to_csr();

        // Net force in X, unreacted: no solution exists.
        let err = ConjugateGradientSolver::default()
            .solve(&matrix, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, Error::SingularMatrix(_)));
    }

    #[test]
    fn test_cg_rhs_mismatch() {
        let solver = ConjugateGradientSolver::default();
        let err = solver.solve(&spd_2x2(), &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::Solver(_)));
    }

    #[test]
    fn test_faer_cholesky_simple_spd() {
        let solver = FaerCholeskySolver::new();
        let solution = solver.solve(&spd_2x2(), &[4.0, 5.0]).unwrap();
        assert_relative_eq!(solution[0], 0.25, epsilon = 1e-10);
        assert_relative_eq!(solution[1], 1.5, epsilon = 1e-10);
    }

    #[test]
    fn test_faer_cholesky_not_positive_definite() {
        let solver = FaerCholeskySolver::new();
        let result = solver.solve(&indefinite_2x2(), &[1.0, 1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_faer_cholesky_empty() {
        let matrix = TripletMatrix::new(0, 0).to_csr();
        let solution = FaerCholeskySolver::new().solve(&matrix, &[]).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_solver_selection() {
        let config = SolverConfig::default();
        assert_eq!(select_solver(&config, 100).name(), "conjugate gradient");

        let direct = SolverConfig {
            solver_type: SolverType::Direct,
            ..SolverConfig::default()
        };
        assert_eq!(
            select_solver(&direct, 100).name(),
            "faer sparse Cholesky (LLᵀ)"
        );

        let auto = SolverConfig {
            solver_type: SolverType::Auto,
            ..SolverConfig::default()
        };
        assert_eq!(
            select_solver(&auto, 100).name(),
            "faer sparse Cholesky (LLᵀ)"
        );
        assert_eq!(
            select_solver(&auto, 1_000_000).name(),
            "conjugate gradient"
        );
    }
}
