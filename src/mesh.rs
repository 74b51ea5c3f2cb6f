use glam::Vec3;

/// Input geometry: flat vertex positions and a flat triangle index list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClothMesh {
    pub vertices: Vec<f32>,
    pub triangles: Vec<u32>,
}

impl ClothMesh {
    pub fn new(vertices: Vec<f32>, triangles: Vec<u32>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// A `cols` x `rows` quad sheet in the plane `z = top_left.z`, hanging
    /// down (-Y) and to the right (+X) of `top_left`, two triangles per quad.
    pub fn grid(cols: usize, rows: usize, spacing: f32, top_left: Vec3) -> Self {
        let verts_x = cols + 1;
        let verts_y = rows + 1;

        let mut vertices = Vec::with_capacity(3 * verts_x * verts_y);
        for j in 0..verts_y {
            for i in 0..verts_x {
                let p = top_left + Vec3::new(i as f32 * spacing, -(j as f32) * spacing, 0.0);
                vertices.extend_from_slice(&p.to_array());
            }
        }

        let mut triangles = Vec::with_capacity(6 * cols * rows);
        for j in 0..rows {
            for i in 0..cols {
                let top_left = (j * verts_x + i) as u32;
                let top_right = top_left + 1;
                let bot_left = top_left + verts_x as u32;
                let bot_right = bot_left + 1;

                triangles.extend_from_slice(&[top_left, bot_left, top_right]);
                triangles.extend_from_slice(&[top_right, bot_left, bot_right]);
            }
        }

        Self {
            vertices,
            triangles,
        }
    }

    /// The demo cloth: 0.4 x 0.8 in the XY plane with its top edge at
    /// y = 1.145859, as 10 x 20 quads of 0.04 (231 particles, 400 triangles).
    /// This is a coarse sheet: per-particle mass and effective stiffness
    /// differ from a fine 0.01 grid of the same size. Particles are stored
    /// row by row from the top left, so particle `11 * row + col` sits `col`
    /// quads right and `row` quads down.
    pub fn hanging_sheet() -> Self {
        Self::grid(10, 20, 0.04, Vec3::new(-0.2, 1.145859, 0.0))
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }
}
