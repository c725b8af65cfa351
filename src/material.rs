//! Material property definitions.
//!
//! Supports isotropic linear elastic materials. The constitutive form is
//! selected per analysis by [`ProblemType`]: plane stress for thin parts
//! loaded in their plane, plane strain for long prismatic bodies.

use crate::error::{Error, Result};
use nalgebra::Matrix3;

/// 2D problem idealization, selecting the constitutive form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    /// σ_zz = 0; appropriate for thin plates.
    PlaneStress,
    /// ε_zz = 0; appropriate for long prismatic bodies.
    PlaneStrain,
}

/// Isotropic linear elastic material for plane problems.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Young's modulus (Pa).
    pub youngs_modulus: f64,
    /// Poisson's ratio (dimensionless).
    pub poissons_ratio: f64,
    /// Out-of-plane thickness (m). Unity unless set.
    pub thickness: f64,
}

impl Material {
    /// Create a new isotropic linear elastic material with unit thickness.
    ///
    /// # Errors
    ///
    /// Returns an error if the material properties are physically invalid
    /// (E ≤ 0 or ν outside (-1, 0.5)).
    pub fn new(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if youngs_modulus <= 0.0 {
            return Err(Error::InvalidMaterial(
                "Young's modulus must be positive".into(),
            ));
        }
        if poissons_ratio <= -1.0 || poissons_ratio >= 0.5 {
            return Err(Error::InvalidMaterial(
                "Poisson's ratio must be in range (-1, 0.5)".into(),
            ));
        }
        Ok(Self {
            youngs_modulus,
            poissons_ratio,
            thickness: 1.0,
        })
    }

    /// Set the out-of-plane thickness.
    pub fn with_thickness(mut self, thickness: f64) -> Result<Self> {
        if thickness <= 0.0 {
            return Err(Error::InvalidMaterial("thickness must be positive".into()));
        }
        self.thickness = thickness;
        Ok(self)
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poissons_ratio))
    }

    /// Constitutive matrix D for the given problem type, mapping
    /// `[ε_xx, ε_yy, γ_xy]` to `[σ_xx, σ_yy, τ_xy]`.
    pub fn constitutive(&self, problem_type: ProblemType) -> Matrix3<f64> {
        match problem_type {
            ProblemType::PlaneStress => self.constitutive_plane_stress(),
            ProblemType::PlaneStrain => self.constitutive_plane_strain(),
        }
    }

    /// Plane stress constitutive matrix.
    pub fn constitutive_plane_stress(&self) -> Matrix3<f64> {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;

        let factor = e / (1.0 - nu * nu);

        Matrix3::new(
            factor,
            factor * nu,
            0.0,
            factor * nu,
            factor,
            0.0,
            0.0,
            0.0,
            factor * (1.0 - nu) / 2.0,
        )
    }

    /// Plane strain constitutive matrix.
    pub fn constitutive_plane_strain(&self) -> Matrix3<f64> {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;

        let factor = e / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let c11 = factor * (1.0 - nu);
        let c12 = factor * nu;
        let c33 = factor * (1.0 - 2.0 * nu) / 2.0;

        Matrix3::new(c11, c12, 0.0, c12, c11, 0.0, 0.0, 0.0, c33)
    }
}

/// Common material presets.
impl Material {
    /// Structural steel (E = 200 GPa, ν = 0.3).
    pub fn steel() -> Self {
        Self {
            youngs_modulus: 200e9,
            poissons_ratio: 0.3,
            thickness: 1.0,
        }
    }

    /// Aluminum 6061-T6 (E = 68.9 GPa, ν = 0.33).
    pub fn aluminum() -> Self {
        Self {
            youngs_modulus: 68.9e9,
            poissons_ratio: 0.33,
            thickness: 1.0,
        }
    }
}
