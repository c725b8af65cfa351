//! 3-node constant-strain triangle (Tri3).
//!
//! Linear shape functions give a constant strain field, so the strain-
//! displacement matrix is closed-form and one evaluation per element
//! suffices for both stiffness and stress:
//!
//! ```text
//! K_e = t · A · Bᵀ D B
//! σ   = D B u_e
//! ```
//!
//! with thickness t, signed area A, and the constitutive matrix D selected
//! by the problem type.

use crate::element::Element;
use crate::material::{Material, ProblemType};
use crate::types::{PlaneStress, Point2};
use nalgebra::{DMatrix, DVector, SMatrix};

/// 3-node constant-strain triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tri3;

impl Tri3 {
    fn b_matrix(coords: &[Point2], area: f64) -> SMatrix<f64, 3, 6> {
        let (v0, v1, v2) = (&coords[0], &coords[1], &coords[2]);

        let beta_0 = v1.y - v2.y;
        let beta_1 = v2.y - v0.y;
        let beta_2 = v0.y - v1.y;

        let gamma_0 = v2.x - v1.x;
        let gamma_1 = v0.x - v2.x;
        let gamma_2 = v1.x - v0.x;

        SMatrix::<f64, 3, 6>::new(
            beta_0, 0.0, beta_1, 0.0, beta_2, 0.0, //
            0.0, gamma_0, 0.0, gamma_1, 0.0, gamma_2, //
            gamma_0, beta_0, gamma_1, beta_1, gamma_2, beta_2,
        ) / (2.0 * area)
    }
}

impl Element for Tri3 {
    fn n_nodes(&self) -> usize {
        3
    }

    fn area(&self, coords: &[Point2]) -> f64 {
        let (v0, v1, v2) = (&coords[0], &coords[1], &coords[2]);
        0.5 * (v0.x * (v1.y - v2.y) + v1.x * (v2.y - v0.y) + v2.x * (v0.y - v1.y))
    }

    fn strain_displacement(&self, coords: &[Point2]) -> DMatrix<f64> {
        let area = self.area(coords);
        let b = Self::b_matrix(coords, area);
        DMatrix::from_fn(3, 6, |i, j| b[(i, j)])
    }

    fn stiffness(
        &self,
        coords: &[Point2],
        material: &Material,
        problem_type: ProblemType,
    ) -> DMatrix<f64> {
        let area = self.area(coords);
        let b = Self::b_matrix(coords, area);
        let d = material.constitutive(problem_type);

        let ke = (b.transpose() * d * b) * (area * material.thickness);
        DMatrix::from_fn(6, 6, |i, j| ke[(i, j)])
    }

    fn stress(
        &self,
        coords: &[Point2],
        displacements: &[f64],
        material: &Material,
        problem_type: ProblemType,
    ) -> PlaneStress {
        let area = self.area(coords);
        let b = Self::b_matrix(coords, area);
        let d = material.constitutive(problem_type);

        let u = DVector::from_column_slice(displacements);
        let sigma = d * (b * u);

        PlaneStress::new(sigma[0], sigma[1], sigma[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn unit_right_triangle() -> Vec<Point2> {
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_area() {
        assert_relative_eq!(Tri3.area(&unit_right_triangle()), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_area_sign_flips_with_orientation() {
        let mut coords = unit_right_triangle();
        coords.swap(1, 2);
        assert_relative_eq!(Tri3.area(&coords), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_collinear_area_is_zero() {
        let coords = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(2.0, 2.0),
        ];
        assert_relative_eq!(Tri3.area(&coords), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stiffness_symmetric() {
        let mat = Material::new(1.0, 0.25).unwrap();
        let ke = Tri3.stiffness(&unit_right_triangle(), &mat, ProblemType::PlaneStress);
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(ke[(i, j)], ke[(j, i)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_rigid_translation_has_no_strain_energy() {
        let mat = Material::new(1.0, 0.25).unwrap();
        let coords = unit_right_triangle();
        let ke = Tri3.stiffness(&coords, &mat, ProblemType::PlaneStress);

        // Uniform translation in x and y produces zero nodal forces.
        let u = DVector::from_vec(vec![0.3, -0.7, 0.3, -0.7, 0.3, -0.7]);
        let f = &ke * &u;
        for i in 0..6 {
            assert_relative_eq!(f[i], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_stress_uniform_stretch() {
        // ν = 0 so a pure x-stretch of magnitude ε gives σx = E·ε only.
        let mat = Material::new(100.0, 0.0).unwrap();
        let coords = unit_right_triangle();

        // u_x = 0.01 * x → ε_xx = 0.01
        let displacements = [0.0, 0.0, 0.01, 0.0, 0.0, 0.0];
        let stress = Tri3.stress(&coords, &displacements, &mat, ProblemType::PlaneStress);

        assert_relative_eq!(stress.sx, 1.0, epsilon = 1e-12);
        assert_relative_eq!(stress.sy, 0.0, epsilon = 1e-12);
        assert_relative_eq!(stress.txy, 0.0, epsilon = 1e-12);
    }
}
