//! Per-particle state, stored as flat `3N` float buffers.

use glam::Vec3;

use crate::{
    error::{ClothError, ClothResult},
    topology::Topology,
    view::{points, VectorView, VectorViewMut},
};

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub(crate) pos: Vec<f32>,
    pub(crate) prev_pos: Vec<f32>,
    pub(crate) rest_pos: Vec<f32>,
    pub(crate) vel: Vec<f32>,
    pub(crate) inv_mass: Vec<f32>,
}

impl ParticleSystem {
    /// Takes ownership of the vertex buffer, which from then on is the live
    /// position buffer. Inverse masses come from the incident triangle areas.
    pub fn new(vertices: Vec<f32>, topology: &Topology) -> ClothResult<Self> {
        if vertices.len() % 3 != 0 {
            return Err(ClothError::MalformedVertices {
                len: vertices.len(),
            });
        }
        if let Some(index) = points(&vertices).iter().position(|p| !p.is_finite()) {
            return Err(ClothError::NonFiniteVertex { index });
        }
        let num_particles = vertices.len() / 3;
        if let Some(&index) = topology
            .triangles()
            .iter()
            .find(|&&i| i as usize >= num_particles)
        {
            return Err(ClothError::IndexOutOfRange {
                index,
                vertex_count: num_particles,
            });
        }

        let mut system = Self {
            prev_pos: vertices.clone(),
            rest_pos: vertices.clone(),
            pos: vertices,
            vel: vec![0.0; 3 * num_particles],
            inv_mass: vec![0.0; num_particles],
        };
        system.init_masses(topology);
        Ok(system)
    }

    fn init_masses(&mut self, topology: &Topology) {
        for t in 0..topology.num_triangles() {
            let [ia, ib, ic] = topology.triangle(t);
            let a = VectorView::new(&self.pos, ia as usize);
            let b = VectorView::new(&self.pos, ib as usize);
            let c = VectorView::new(&self.pos, ic as usize);

            let ab = b.sub(a.get());
            let ac = c.sub(a.get());
            let area = ab.cross(ac).length() * 0.5;

            // Collapsed triangles add nothing.
            let p_inv_mass = if area > 0.0 { 1.0 / area / 3.0 } else { 0.0 };
            for i in [ia, ib, ic] {
                self.inv_mass[i as usize] += p_inv_mass;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inv_mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inv_mass.is_empty()
    }

    /// The live flat position buffer, updated in place by every step.
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    pub fn points(&self) -> &[Vec3] {
        points(&self.pos)
    }

    pub fn position(&self, i: usize) -> Vec3 {
        VectorView::new(&self.pos, i).get()
    }

    pub fn set_position(&mut self, i: usize, p: Vec3) {
        VectorViewMut::new(&mut self.pos, i).set(p);
    }

    pub fn prev_position(&self, i: usize) -> Vec3 {
        VectorView::new(&self.prev_pos, i).get()
    }

    pub fn rest_position(&self, i: usize) -> Vec3 {
        VectorView::new(&self.rest_pos, i).get()
    }

    pub fn velocity(&self, i: usize) -> Vec3 {
        VectorView::new(&self.vel, i).get()
    }

    pub fn add_velocity(&mut self, i: usize, dv: Vec3) {
        VectorViewMut::new(&mut self.vel, i).add_set(dv);
    }

    pub fn inv_mass(&self, i: usize) -> f32 {
        self.inv_mass[i]
    }

    pub fn inv_masses(&self) -> &[f32] {
        &self.inv_mass
    }

    pub(crate) fn set_inv_mass(&mut self, i: usize, w: f32) {
        self.inv_mass[i] = w;
    }

    pub fn is_pinned(&self, i: usize) -> bool {
        self.inv_mass[i] == 0.0
    }

    /// Index of the particle closest to `point`. On ties the lower index wins.
    pub fn nearest_particle(&self, point: Vec3) -> Option<usize> {
        let mut min_dist_squared = f32::MAX;
        let mut min_dist_index = None;
        for i in 0..self.len() {
            let dist_squared = VectorView::new(&self.pos, i).sub(point).length_squared();
            if dist_squared < min_dist_squared {
                min_dist_squared = dist_squared;
                min_dist_index = Some(i);
            }
        }
        min_dist_index
    }

    /// Zeroes the inverse mass of every particle for which `mask` holds,
    /// given its index and current position. Returns how many were pinned.
    pub fn pin<F>(&mut self, mask: F) -> usize
    where
        F: Fn(usize, Vec3) -> bool,
    {
        let mut pinned = 0;
        for i in 0..self.len() {
            if mask(i, self.position(i)) {
                self.inv_mass[i] = 0.0;
                pinned += 1;
            }
        }
        pinned
    }

    /// Back to the rest pose with zero velocity. Inverse masses are untouched.
    pub fn reset(&mut self) {
        self.pos.copy_from_slice(&self.rest_pos);
        self.prev_pos.copy_from_slice(&self.rest_pos);
        self.vel.fill(0.0);
    }
}
