use glam::Vec3;
use rayon::prelude::*;

use crate::{config::SolverType, BendC, ConstraintDelta, StretchC};

/// A distance constraint between two particles, solved with XPBD.
pub trait Constraint {
    /// The two particles whose distance is constrained.
    fn endpoints(&self) -> [u32; 2];

    fn rest_distance(&self) -> f32;

    #[inline]
    fn value(&self, positions: &[Vec3]) -> f32 {
        let [i1, i2] = self.endpoints();
        let dist = (positions[i2 as usize] - positions[i1 as usize]).length();
        debug_assert!(dist.is_finite());
        dist - self.rest_distance()
    }

    /// Returns delta_x for both endpoints, or `None` when the constraint has
    /// no valid correction (both ends immovable, or coincident ends).
    fn solve(
        &self,
        positions: &[Vec3],
        inv_mass: &[f32],
        alpha_tilde: f32,
    ) -> Option<[ConstraintDelta; 2]> {
        let [i1, i2] = self.endpoints();
        let (w1, w2) = (inv_mass[i1 as usize], inv_mass[i2 as usize]);
        let w = w1 + w2;
        if w == 0.0 {
            return None;
        }

        let grad = positions[i1 as usize] - positions[i2 as usize];
        let len = grad.length();
        if len == 0.0 {
            return None;
        }

        let dir = grad / len;
        let lambda = -(len - self.rest_distance()) / (w + alpha_tilde);
        debug_assert!(lambda.is_finite(), "l: {} w: {} a: {}", lambda, w, alpha_tilde);

        Some([
            ConstraintDelta {
                particle_idx: i1,
                delta: lambda * w1 * dir,
            },
            ConstraintDelta {
                particle_idx: i2,
                delta: -lambda * w2 * dir,
            },
        ])
    }
}

impl Constraint for StretchC {
    #[inline]
    fn endpoints(&self) -> [u32; 2] {
        self.particles_idx
    }

    #[inline]
    fn rest_distance(&self) -> f32 {
        self.rest_distance
    }
}

impl Constraint for BendC {
    #[inline]
    fn endpoints(&self) -> [u32; 2] {
        self.wings()
    }

    #[inline]
    fn rest_distance(&self) -> f32 {
        self.rest_distance
    }
}

/// Compliance scaled by the substep, so stiffness does not depend on the
/// substep count.
#[inline]
pub fn alpha_tilde(compliance: f32, delta: f32) -> f32 {
    compliance / delta / delta
}

/// One relaxation pass over `constraints`.
pub fn solve_pass<T: Constraint + Sync>(
    solver: SolverType,
    positions: &mut [Vec3],
    inv_mass: &[f32],
    constraints: &[T],
    compliance: f32,
    delta: f32,
    jacobi_relaxation: f32,
) {
    match solver {
        SolverType::GaussSeidel => {
            solve_gauss_seidel(positions, inv_mass, constraints, compliance, delta)
        }
        SolverType::Jacobi => solve_jacobi(
            positions,
            inv_mass,
            constraints,
            compliance,
            delta,
            jacobi_relaxation,
        ),
    }
}

/// Projects constraints one at a time in table order; each correction is
/// visible to the next constraint.
pub fn solve_gauss_seidel<T: Constraint>(
    positions: &mut [Vec3],
    inv_mass: &[f32],
    constraints: &[T],
    compliance: f32,
    delta: f32,
) {
    let alpha = alpha_tilde(compliance, delta);
    for c in constraints {
        if let Some(deltas) = c.solve(positions, inv_mass, alpha) {
            for p_delta in deltas {
                positions[p_delta.particle_idx as usize] += p_delta.delta;
            }
        }
    }
}

/// Computes every correction against the same positions, then moves each
/// particle by the average of its corrections times `relaxation`.
pub fn solve_jacobi<T: Constraint + Sync>(
    positions: &mut [Vec3],
    inv_mass: &[f32],
    constraints: &[T],
    compliance: f32,
    delta: f32,
    relaxation: f32,
) {
    let alpha = alpha_tilde(compliance, delta);
    let x_deltas: Vec<ConstraintDelta> = {
        let frozen: &[Vec3] = positions;
        constraints
            .par_iter()
            .filter_map(|c| c.solve(frozen, inv_mass, alpha))
            .flat_map_iter(|d| d)
            .collect()
    };

    let mut total_delta = vec![Vec3::ZERO; positions.len()];
    let mut num_constraints = vec![0u32; positions.len()];
    for s in &x_deltas {
        total_delta[s.particle_idx as usize] += s.delta;
        num_constraints[s.particle_idx as usize] += 1;
    }

    positions
        .par_iter_mut()
        .zip(total_delta.par_iter())
        .zip(num_constraints.par_iter())
        .for_each(|((p, total), &n)| {
            if n > 0 {
                *p += relaxation * *total / n as f32;
            }
        });
}

/// Sum of |C| over a constraint family.
pub fn error<T: Constraint>(positions: &[Vec3], constraints: &[T]) -> f32 {
    constraints.iter().map(|c| c.value(positions).abs()).sum()
}
