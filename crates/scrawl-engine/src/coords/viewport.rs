/// Viewport size in logical pixels.
///
/// The draw layer treats this as the coordinate basis when building a pixel
/// projection; see [`Viewport::pixel_projection`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Orthographic projection putting (0, 0) at the top-left and
    /// (width, height) at the bottom-right, with z = 0 inside the depth range.
    pub fn pixel_projection(self) -> super::Mat4 {
        super::Mat4::orthographic(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }
}
