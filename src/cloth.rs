use glam::Vec3;
use log::{info, log_enabled, trace, warn, Level};

use crate::{
    config::SimConfig,
    error::{ClothError, ClothResult},
    integrator,
    interaction::{raycast, Ray},
    mesh::ClothMesh,
    particles::ParticleSystem,
    solver,
    surface::Surface,
    topology::Topology,
    view::VectorView,
    BendC, StretchC,
};

/// A cloth: particles, the constraint tables derived from its mesh, and the
/// render data recomputed after each step.
#[derive(Debug, Clone)]
pub struct ClothSim {
    config: SimConfig,
    topology: Topology,
    particles: ParticleSystem,
    stretch_constraints: Vec<StretchC>,
    bend_constraints: Vec<BendC>,
    surface: Surface,
}

impl ClothSim {
    pub fn new(mesh: ClothMesh, config: SimConfig) -> ClothResult<Self> {
        config.validate()?;

        let ClothMesh {
            vertices,
            triangles,
        } = mesh;
        if vertices.len() % 3 != 0 {
            return Err(ClothError::MalformedVertices {
                len: vertices.len(),
            });
        }

        let topology = Topology::build(&triangles, vertices.len() / 3, config.bend_mode)?;
        let particles = ParticleSystem::new(vertices, &topology)?;

        let rest = particles.positions();
        let stretch_constraints: Vec<_> = topology
            .stretch_ids()
            .iter()
            .map(|&[i, j]| StretchC::new([i, j], rest_distance(rest, i, j)))
            .collect();
        let bend_constraints: Vec<_> = topology
            .bend_ids()
            .iter()
            .map(|&ids| BendC::new(ids, rest_distance(rest, ids[2], ids[3])))
            .collect();

        if particles.inv_masses().iter().all(|&w| w == 0.0) {
            warn!("every particle has zero inverse mass, nothing will move");
        }

        let mut surface = Surface::new(particles.len());
        surface.update(particles.positions(), &topology);

        info!(
            "cloth with {} particles, {} triangles, {} stretch and {} bend constraints",
            particles.len(),
            topology.num_triangles(),
            stretch_constraints.len(),
            bend_constraints.len()
        );

        Ok(Self {
            config,
            topology,
            particles,
            stretch_constraints,
            bend_constraints,
            surface,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }

    pub fn stretch_constraints(&self) -> &[StretchC] {
        &self.stretch_constraints
    }

    pub fn bend_constraints(&self) -> &[BendC] {
        &self.bend_constraints
    }

    /// The live flat position buffer.
    pub fn positions(&self) -> &[f32] {
        self.particles.positions()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Advances the cloth by `delta` seconds and refreshes normals and bounds.
    pub fn step(&mut self, delta: f32) {
        integrator::step(
            &mut self.particles,
            &self.stretch_constraints,
            &self.bend_constraints,
            &self.config,
            delta,
        );
        self.surface.update(self.particles.positions(), &self.topology);

        if log_enabled!(Level::Trace) {
            trace!(
                "stretch error: {}, bend error: {}",
                self.stretch_error(),
                self.bend_error()
            );
        }
    }

    pub fn stretch_error(&self) -> f32 {
        solver::error(self.particles.points(), &self.stretch_constraints)
    }

    pub fn bend_error(&self) -> f32 {
        solver::error(self.particles.points(), &self.bend_constraints)
    }

    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        raycast(ray, self.particles.points(), &self.topology)
    }

    pub fn pin<F>(&mut self, mask: F) -> usize
    where
        F: Fn(usize, Vec3) -> bool,
    {
        self.particles.pin(mask)
    }

    pub fn add_velocity(&mut self, i: usize, dv: Vec3) {
        self.particles.add_velocity(i, dv);
    }

    /// Pins the top-left and top-right corners and returns the centre of the
    /// cloth's XY extent.
    pub fn hang_to_air(&mut self) -> Vec3 {
        const EPS: f32 = 0.001;

        let (min, max) = self.particles.points().iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );

        let pinned = self.particles.pin(|_, p| {
            p.y > max.y - EPS && (p.x < min.x + EPS || p.x > max.x - EPS)
        });
        info!("pinned {} corner particles", pinned);

        Vec3::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5, 0.0)
    }

    /// Puts every particle back at its rest position with zero velocity.
    pub fn reset(&mut self) {
        self.particles.reset();
        self.surface.update(self.particles.positions(), &self.topology);
    }
}

fn rest_distance(positions: &[f32], i: u32, j: u32) -> f32 {
    let left = VectorView::new(positions, i as usize);
    let right = VectorView::new(positions, j as usize);
    right.sub(left.get()).length()
}
