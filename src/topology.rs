//! Edge adjacency and constraint tables derived from a triangle list.
//!
//! Edge `j` of triangle `i` runs from `triangles[3i + j]` to
//! `triangles[3i + (j + 1) % 3]` and has the global index `3i + j`.

use log::debug;

use crate::{
    config::BendMode,
    error::{ClothError, ClothResult},
};

#[derive(Clone, Copy)]
struct EdgeRecord {
    id0: u32,
    id1: u32,
    global_edge: u32,
}

/// Immutable connectivity of a cloth mesh.
#[derive(Debug, Clone)]
pub struct Topology {
    triangles: Vec<u32>,
    neighbors: Vec<Option<u32>>,
    stretch_ids: Vec<[u32; 2]>,
    bend_ids: Vec<[u32; 4]>,
}

impl Topology {
    pub fn build(
        triangles: &[u32],
        vertex_count: usize,
        bend_mode: BendMode,
    ) -> ClothResult<Self> {
        if triangles.len() % 3 != 0 {
            return Err(ClothError::MalformedTriangles {
                len: triangles.len(),
            });
        }
        if let Some(&index) = triangles.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ClothError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let neighbors = find_neighbors(triangles);
        let num_tris = triangles.len() / 3;

        let mut stretch_ids = Vec::new();
        let mut bend_ids = Vec::new();

        for i in 0..num_tris {
            for j in 0..3 {
                let global_edge = 3 * i + j;
                let id0 = triangles[3 * i + j];
                let id1 = triangles[3 * i + (j + 1) % 3];

                let n = neighbors[global_edge];

                // A shared edge is seen once from each side, with its
                // endpoints swapped; only the side with id0 < id1 keeps it.
                if n.is_none() || id0 < id1 {
                    stretch_ids.push([id0, id1]);
                }

                if let Some(n) = n {
                    let n = n as usize;
                    if bend_mode == BendMode::Deduplicated && n < global_edge {
                        continue;
                    }
                    let (ni, nj) = (n / 3, n % 3);
                    let wing_self = triangles[3 * i + (j + 2) % 3];
                    let wing_other = triangles[3 * ni + (nj + 2) % 3];
                    bend_ids.push([id0, id1, wing_self, wing_other]);
                }
            }
        }

        debug!(
            "topology: {} triangles, {} stretch, {} bend ({:?})",
            num_tris,
            stretch_ids.len(),
            bend_ids.len(),
            bend_mode
        );

        Ok(Self {
            triangles: triangles.to_vec(),
            neighbors,
            stretch_ids,
            bend_ids,
        })
    }

    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn triangle(&self, t: usize) -> [u32; 3] {
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }

    /// Global index of the opposite half of `global_edge`, `None` on the boundary.
    pub fn neighbor(&self, global_edge: usize) -> Option<u32> {
        self.neighbors[global_edge]
    }

    pub fn neighbors(&self) -> &[Option<u32>] {
        &self.neighbors
    }

    pub fn stretch_ids(&self) -> &[[u32; 2]] {
        &self.stretch_ids
    }

    pub fn bend_ids(&self) -> &[[u32; 4]] {
        &self.bend_ids
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_none()).count()
    }

    /// Number of matched edge pairs.
    pub fn interior_edge_count(&self) -> usize {
        (self.neighbors.len() - self.boundary_edge_count()) / 2
    }
}

/// Pairs up the two halves of every shared edge by sorting all half edges
/// on their unordered endpoints. A third or later half on the same endpoints
/// (non-manifold) stays unmatched and is treated as boundary.
fn find_neighbors(triangles: &[u32]) -> Vec<Option<u32>> {
    let num_tris = triangles.len() / 3;

    let mut edges: Vec<EdgeRecord> = (0..num_tris)
        .flat_map(|i| {
            (0..3).map(move |j| {
                let id0 = triangles[3 * i + j];
                let id1 = triangles[3 * i + (j + 1) % 3];
                EdgeRecord {
                    id0: id0.min(id1),
                    id1: id0.max(id1),
                    global_edge: (3 * i + j) as u32,
                }
            })
        })
        .collect();

    // Stable, so equal keys stay in triangle order.
    edges.sort_by_key(|e| (e.id0, e.id1));

    let mut neighbors = vec![None; 3 * num_tris];

    let mut index = 0;
    while index + 1 < edges.len() {
        let (e0, e1) = (edges[index], edges[index + 1]);
        if e0.id0 == e1.id0 && e0.id1 == e1.id1 {
            neighbors[e0.global_edge as usize] = Some(e1.global_edge);
            neighbors[e1.global_edge as usize] = Some(e0.global_edge);
            index += 2;
        } else {
            index += 1;
        }
    }

    neighbors
}
