//! Coordinate and color types shared across the engine.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The draw layer converts to NDC with an orthographic projection uniform; z is
//! carried through for layering but never perspective-divided.

mod color;
mod mat4;
mod vec2;
mod vec3;
mod viewport;

pub use color::Color;
pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use viewport::Viewport;
