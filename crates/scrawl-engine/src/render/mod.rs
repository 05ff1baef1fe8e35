//! Renderer-facing context types.
//!
//! Renderers get a [`RenderCtx`] (device, queue, format, viewport) and a
//! [`RenderTarget`] (encoder + color view) per frame and own their GPU
//! resources themselves.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex stage converts to NDC via a projection uniform.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
