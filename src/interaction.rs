//! Pointer picking: grab the particle nearest to where a ray hits the cloth,
//! drag it along with the pointer, and let go.

use glam::Vec3;
use log::{debug, info};

use crate::{particles::ParticleSystem, topology::Topology};

const PARALLEL_EPS: f32 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length when built with [`Ray::new`].
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance along the ray to triangle `abc`, either side facing.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < PARALLEL_EPS {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        (t > 0.0).then_some(t)
    }
}

/// Nearest hit of `ray` against the deformed surface.
pub fn raycast(ray: &Ray, positions: &[Vec3], topology: &Topology) -> Option<f32> {
    (0..topology.num_triangles())
        .filter_map(|t| {
            let [a, b, c] = topology.triangle(t).map(|i| positions[i as usize]);
            ray.intersect_triangle(a, b, c)
        })
        .min_by(|x, y| x.total_cmp(y))
}

#[derive(Clone, Copy, Debug)]
struct Grab {
    particle: usize,
    saved_inv_mass: f32,
    /// Distance along the pointer ray at which the grab started.
    distance: f32,
}

/// `Idle` until a grab begins, `Grabbed` until it ends. While grabbed, the
/// particle has zero inverse mass and follows the pointer.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    grab: Option<Grab>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_grabbing(&self) -> bool {
        self.grab.is_some()
    }

    pub fn grabbed_particle(&self) -> Option<usize> {
        self.grab.map(|g| g.particle)
    }

    /// Grabs the particle nearest to `ray.at(hit_distance)`. Does nothing
    /// when there is no hit, no particle, or a grab is already active.
    pub fn begin_grab(
        &mut self,
        particles: &mut ParticleSystem,
        ray: &Ray,
        hit_distance: Option<f32>,
    ) -> Option<usize> {
        if let Some(grab) = self.grab {
            debug!("grab already active on particle {}, ignoring", grab.particle);
            return None;
        }
        let distance = hit_distance?;
        let particle = particles.nearest_particle(ray.at(distance))?;

        let saved_inv_mass = particles.inv_mass(particle);
        particles.set_inv_mass(particle, 0.0);
        self.grab = Some(Grab {
            particle,
            saved_inv_mass,
            distance,
        });

        info!("grabbed particle {} at distance {:.3}", particle, distance);
        Some(particle)
    }

    /// Moves the grabbed particle to the point on `ray` at the grab distance.
    /// Returns false when idle.
    pub fn drag(&mut self, particles: &mut ParticleSystem, ray: &Ray) -> bool {
        match self.grab {
            Some(grab) => {
                particles.set_position(grab.particle, ray.at(grab.distance));
                true
            }
            None => false,
        }
    }

    /// Restores the grabbed particle's inverse mass. The particle keeps the
    /// velocity it had before the grab until the next step derives a new one.
    pub fn end_grab(&mut self, particles: &mut ParticleSystem) -> Option<usize> {
        let grab = self.grab.take()?;
        particles.set_inv_mass(grab.particle, grab.saved_inv_mass);
        info!("released particle {}", grab.particle);
        Some(grab.particle)
    }
}
