//! Views over flat `[x0, y0, z0, x1, y1, z1, ..]` buffers.
//!
//! The renderer and the mesh loader both speak in flat float arrays, the
//! solver speaks in `Vec3`. Nothing here copies the buffer: a whole buffer is
//! reinterpreted with `bytemuck`, and a single point is addressed through a
//! [`VectorView`] / [`VectorViewMut`] holding the buffer and an offset.

use glam::Vec3;

/// Reinterprets a flat buffer as points. Panics if `buf.len()` is not a
/// multiple of 3, which the constructors rule out up front.
#[inline]
pub fn points(buf: &[f32]) -> &[Vec3] {
    bytemuck::cast_slice(buf)
}

#[inline]
pub fn points_mut(buf: &mut [f32]) -> &mut [Vec3] {
    bytemuck::cast_slice_mut(buf)
}

/// Read-only access to the `ith` point of a flat buffer.
#[derive(Clone, Copy)]
pub struct VectorView<'a> {
    buf: &'a [f32],
    start: usize,
}

impl<'a> VectorView<'a> {
    pub fn new(buf: &'a [f32], ith: usize) -> Self {
        debug_assert!(3 * ith + 2 < buf.len());
        Self {
            buf,
            start: 3 * ith,
        }
    }

    pub fn index(&self) -> usize {
        self.start / 3
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.buf[self.start]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.buf[self.start + 1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.buf[self.start + 2]
    }

    #[inline]
    pub fn get(&self) -> Vec3 {
        Vec3::from_slice(&self.buf[self.start..self.start + 3])
    }

    pub fn add(&self, v: Vec3) -> Vec3 {
        self.get() + v
    }

    pub fn sub(&self, v: Vec3) -> Vec3 {
        self.get() - v
    }

    pub fn mul(&self, s: f32) -> Vec3 {
        self.get() * s
    }

    pub fn dot(&self, v: Vec3) -> f32 {
        self.get().dot(v)
    }

    pub fn cross(&self, v: Vec3) -> Vec3 {
        self.get().cross(v)
    }

    pub fn length_squared(&self) -> f32 {
        self.get().length_squared()
    }

    pub fn length(&self) -> f32 {
        self.get().length()
    }
}

/// Mutable access to the `ith` point of a flat buffer.
pub struct VectorViewMut<'a> {
    buf: &'a mut [f32],
    start: usize,
}

impl<'a> VectorViewMut<'a> {
    pub fn new(buf: &'a mut [f32], ith: usize) -> Self {
        debug_assert!(3 * ith + 2 < buf.len());
        Self {
            buf,
            start: 3 * ith,
        }
    }

    pub fn index(&self) -> usize {
        self.start / 3
    }

    #[inline]
    pub fn get(&self) -> Vec3 {
        Vec3::from_slice(&self.buf[self.start..self.start + 3])
    }

    #[inline]
    pub fn set(&mut self, v: Vec3) {
        v.write_to_slice(&mut self.buf[self.start..self.start + 3]);
    }

    pub fn set_x(&mut self, val: f32) {
        self.buf[self.start] = val;
    }

    pub fn set_y(&mut self, val: f32) {
        self.buf[self.start + 1] = val;
    }

    pub fn set_z(&mut self, val: f32) {
        self.buf[self.start + 2] = val;
    }

    pub fn add_set(&mut self, v: Vec3) {
        let cur = self.get();
        self.set(cur + v);
    }

    pub fn sub_set(&mut self, v: Vec3) {
        let cur = self.get();
        self.set(cur - v);
    }

    pub fn mul_set(&mut self, s: f32) {
        let cur = self.get();
        self.set(cur * s);
    }
}
