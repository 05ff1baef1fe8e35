//! Runtime-facing app contracts.
//!
//! The stable seam between the platform loop and app code: implement [`App`],
//! draw through the [`FrameCtx`] handed to each frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
