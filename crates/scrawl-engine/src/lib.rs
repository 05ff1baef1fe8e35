//! Scrawl engine crate.
//!
//! Windowing, GPU plumbing, and an immediate-mode 2D draw layer: record
//! colored triangles and lines between `begin`/`end`, flush the whole frame
//! in two draw calls.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod draw;
