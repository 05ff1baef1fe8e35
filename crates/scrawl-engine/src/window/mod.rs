//! Platform loop: one window, one GPU surface, continuous redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
