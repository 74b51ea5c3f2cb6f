use bytemuck::{Pod, Zeroable};

pub mod cloth;
pub mod config;
pub mod error;
pub mod integrator;
pub mod interaction;
pub mod mesh;
pub mod particles;
pub mod session;
pub mod solver;
pub mod surface;
pub mod topology;
pub mod view;

pub use cloth::ClothSim;
pub use config::{BendMode, SimConfig, SolverType};
pub use error::{ClothError, ClothResult};
pub use interaction::{InteractionController, Ray};
pub use mesh::ClothMesh;
pub use particles::ParticleSystem;
pub use session::{PointerEvent, Session};
pub use surface::{BoundingSphere, Surface};
pub use topology::Topology;

/// Distance constraint along a mesh edge.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StretchC {
    pub particles_idx: [u32; 2],
    pub rest_distance: f32,
}

impl StretchC {
    pub fn new(particles_idx: [u32; 2], rest_distance: f32) -> Self {
        Self {
            particles_idx,
            rest_distance,
        }
    }
}

/// Bending across the shared edge `particles_idx[0..2]`, expressed as a
/// distance constraint between the two wing vertices `particles_idx[2..4]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BendC {
    pub particles_idx: [u32; 4],
    pub rest_distance: f32,
}

impl BendC {
    pub fn new(particles_idx: [u32; 4], rest_distance: f32) -> Self {
        debug_assert!(rest_distance >= 0.);
        Self {
            particles_idx,
            rest_distance,
        }
    }

    pub fn shared_edge(&self) -> [u32; 2] {
        [self.particles_idx[0], self.particles_idx[1]]
    }

    pub fn wings(&self) -> [u32; 2] {
        [self.particles_idx[2], self.particles_idx[3]]
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ConstraintDelta {
    pub delta: glam::Vec3,
    pub particle_idx: u32,
}
