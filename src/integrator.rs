//! One physics step: substeps of predict, ground clamp, constraint projection,
//! ground projection and velocity derivation.

use glam::Vec3;
use log::debug;

use crate::{
    config::SimConfig,
    particles::ParticleSystem,
    solver::solve_pass,
    view::{points, points_mut},
    BendC, StretchC,
};

/// Advances `particles` by `delta` seconds in `config.substeps` equal substeps.
/// A `delta` that is not a positive finite number leaves everything untouched.
pub fn step(
    particles: &mut ParticleSystem,
    stretch: &[StretchC],
    bend: &[BendC],
    config: &SimConfig,
    delta: f32,
) {
    if !(delta > 0.0 && delta.is_finite()) {
        debug!("skipping step with delta {}", delta);
        return;
    }

    let sub_delta = delta / config.substeps as f32;
    for _ in 0..config.substeps {
        substep(particles, stretch, bend, config, sub_delta);
    }
}

fn substep(
    particles: &mut ParticleSystem,
    stretch: &[StretchC],
    bend: &[BendC],
    config: &SimConfig,
    sub_delta: f32,
) {
    predict(particles, config.gravity, config.ground_height, sub_delta);

    let ParticleSystem { pos, inv_mass, .. } = &mut *particles;
    let positions = points_mut(pos);
    let inv_mass: &[f32] = inv_mass;
    solve_pass(
        config.solver,
        positions,
        inv_mass,
        stretch,
        config.stretch_compliance,
        sub_delta,
        config.jacobi_relaxation,
    );
    solve_pass(
        config.solver,
        positions,
        inv_mass,
        bend,
        config.bend_compliance,
        sub_delta,
        config.jacobi_relaxation,
    );

    project_to_ground(particles, config.ground_height);
    update_velocities(particles, sub_delta);
}

/// Explicit prediction for every free particle, then the ground clamp: a
/// particle ending below the plane goes back to its previous position and is
/// put on the plane.
fn predict(particles: &mut ParticleSystem, gravity: Vec3, ground_height: f32, sub_delta: f32) {
    let ParticleSystem {
        pos,
        prev_pos,
        vel,
        inv_mass,
        ..
    } = &mut *particles;

    points_mut(pos)
        .iter_mut()
        .zip(points_mut(prev_pos).iter_mut())
        .zip(points_mut(vel).iter_mut())
        .zip(inv_mass.iter())
        .filter(|(_, &w)| w != 0.0)
        .for_each(|(((p, prev), v), _)| {
            *v += gravity * sub_delta;
            *prev = *p;
            *p += *v * sub_delta;

            if p.y < ground_height {
                *p = *prev;
                p.y = ground_height;
            }
            debug_assert!(p.is_finite(), "p: {}, v: {}", p, v);
        });
}

/// Constraint projection can drag particles back under the plane; lift every
/// free one onto it before velocities are derived.
fn project_to_ground(particles: &mut ParticleSystem, ground_height: f32) {
    let ParticleSystem { pos, inv_mass, .. } = &mut *particles;

    points_mut(pos)
        .iter_mut()
        .zip(inv_mass.iter())
        .filter(|(p, &w)| w != 0.0 && p.y < ground_height)
        .for_each(|(p, _)| p.y = ground_height);
}

fn update_velocities(particles: &mut ParticleSystem, sub_delta: f32) {
    let ParticleSystem {
        pos,
        prev_pos,
        vel,
        inv_mass,
        ..
    } = &mut *particles;

    points_mut(vel)
        .iter_mut()
        .zip(points(pos).iter())
        .zip(points(prev_pos).iter())
        .zip(inv_mass.iter())
        .filter(|(_, &w)| w != 0.0)
        .for_each(|(((v, p), prev), _)| {
            *v = (*p - *prev) / sub_delta;
            debug_assert!(v.is_finite());
        });
}
