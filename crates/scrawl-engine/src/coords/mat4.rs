use core::ops::Mul;

use bytemuck::{Pod, Zeroable};

use super::Vec3;

/// Column-major 4x4 matrix.
///
/// Layout matches what the draw shader's `mat4x4<f32>` uniform expects, so a
/// matrix can be uploaded with `bytemuck::bytes_of` without reshuffling.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    #[inline]
    pub fn from_translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    #[inline]
    pub fn from_scale(s: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = s.x;
        m.cols[1][1] = s.y;
        m.cols[2][2] = s.z;
        m
    }

    /// Rotation about +Z. With the engine's top-left, +Y-down pixel space a
    /// positive angle turns clockwise on screen.
    pub fn from_rotation_z(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.cols[0] = [cos, sin, 0.0, 0.0];
        m.cols[1] = [-sin, cos, 0.0, 0.0];
        m
    }

    /// Right-handed orthographic projection with a [0, 1] clip-space depth
    /// range, as wgpu expects.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rw = 1.0 / (right - left);
        let rh = 1.0 / (top - bottom);
        let rd = 1.0 / (near - far);
        Self {
            cols: [
                [2.0 * rw, 0.0, 0.0, 0.0],
                [0.0, 2.0 * rh, 0.0, 0.0],
                [0.0, 0.0, rd, 0.0],
                [-(right + left) * rw, -(top + bottom) * rh, rd * near, 1.0],
            ],
        }
    }

    /// Applies the matrix to a point with w = 1. The w row is ignored, which
    /// is exact for the affine transforms this engine composes.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.cols;
        Vec3::new(
            m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
            m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
            m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut cols = [[0.0f32; 4]; 4];
        for (j, col) in cols.iter_mut().enumerate() {
            for (i, out) in col.iter_mut().enumerate() {
                *out = self.cols[0][i] * rhs.cols[j][0]
                    + self.cols[1][i] * rhs.cols[j][1]
                    + self.cols[2][i] * rhs.cols[j][2]
                    + self.cols[3][i] * rhs.cols[j][3];
            }
        }
        Mat4 { cols }
    }
}
