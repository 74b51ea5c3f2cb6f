//! Tunable simulation parameters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ClothError, ClothResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverType {
    /// Constraints are projected one at a time, in table order.
    GaussSeidel,
    /// Corrections of a whole family are computed in parallel against the
    /// same positions, then averaged per particle.
    Jacobi,
}

impl Default for SolverType {
    fn default() -> Self {
        Self::GaussSeidel
    }
}

/// How many bend constraints an interior edge produces.
///
/// `Duplicated` emits one from each of the two triangles sharing the edge,
/// which doubles the effective bending stiffness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BendMode {
    Duplicated,
    Deduplicated,
}

impl Default for BendMode {
    fn default() -> Self {
        Self::Duplicated
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Substeps per call to `step`.
    pub substeps: u32,
    /// 0 is rigid.
    pub stretch_compliance: f32,
    pub bend_compliance: f32,
    pub gravity: Vec3,
    /// Height of the infinite ground plane (Y).
    pub ground_height: f32,
    pub solver: SolverType,
    /// Over-relaxation applied to averaged Jacobi corrections.
    pub jacobi_relaxation: f32,
    pub bend_mode: BendMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            substeps: 10,
            stretch_compliance: 0.0,
            bend_compliance: 1.0,
            gravity: Vec3::new(0.0, -10.0, 0.0),
            ground_height: 0.0,
            solver: SolverType::default(),
            jacobi_relaxation: 1.5,
            bend_mode: BendMode::default(),
        }
    }
}

impl SimConfig {
    /// Parses a JSON config. Missing fields take their default value.
    pub fn from_json(json: &str) -> ClothResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClothResult<()> {
        if self.substeps == 0 {
            return Err(ClothError::InvalidConfig("substeps must be > 0".into()));
        }
        for (name, compliance) in [
            ("stretch_compliance", self.stretch_compliance),
            ("bend_compliance", self.bend_compliance),
        ] {
            if !compliance.is_finite() || compliance < 0.0 {
                return Err(ClothError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {compliance}"
                )));
            }
        }
        if !self.gravity.is_finite() {
            return Err(ClothError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !self.ground_height.is_finite() {
            return Err(ClothError::InvalidConfig(format!(
                "ground_height must be finite, got {}",
                self.ground_height
            )));
        }
        if !(self.jacobi_relaxation.is_finite() && self.jacobi_relaxation > 0.0) {
            return Err(ClothError::InvalidConfig(format!(
                "jacobi_relaxation must be > 0, got {}",
                self.jacobi_relaxation
            )));
        }
        Ok(())
    }
}
