//! Render-side data derived from the particle positions after each step.

use glam::Vec3;

use crate::{
    topology::Topology,
    view::{points, points_mut},
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Centred on the axis-aligned box of `pts`, radius reaching the farthest
    /// point. Empty input gives a zero sphere.
    pub fn from_points(pts: &[Vec3]) -> Self {
        if pts.is_empty() {
            return Self::default();
        }
        let (min, max) = pts
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        let center = (min + max) * 0.5;
        let radius = pts
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max)
            .sqrt();
        Self { center, radius }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.distance(self.center) <= self.radius + f32::EPSILON * self.radius.max(1.0)
    }
}

/// Vertex normals (flat `3N`) and bounds of the deformed cloth.
#[derive(Clone, Debug, Default)]
pub struct Surface {
    normals: Vec<f32>,
    bounds: BoundingSphere,
}

impl Surface {
    pub fn new(num_particles: usize) -> Self {
        Self {
            normals: vec![0.0; 3 * num_particles],
            bounds: BoundingSphere::default(),
        }
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn bounds(&self) -> BoundingSphere {
        self.bounds
    }

    /// Recomputes normals and bounds in place from the flat position buffer.
    pub fn update(&mut self, positions: &[f32], topology: &Topology) {
        let pos = points(positions);
        let normals = points_mut(&mut self.normals);
        normals.fill(Vec3::ZERO);

        // Unnormalized face normals are area weighted.
        for t in 0..topology.num_triangles() {
            let [a, b, c] = topology.triangle(t).map(|i| i as usize);
            let n = (pos[b] - pos[a]).cross(pos[c] - pos[a]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        for n in normals.iter_mut() {
            *n = n.normalize_or_zero();
        }

        self.bounds = BoundingSphere::from_points(pos);
    }
}
