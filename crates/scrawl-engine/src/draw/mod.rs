//! Immediate-mode 2D drawing.
//!
//! [`Draw2d`] records transformed, colored geometry into fixed-capacity
//! per-topology batches between `begin` and `end`; `end` flushes the whole
//! frame through a [`GeometrySink`]. [`GeometryRenderer`] is the GPU sink:
//! it uploads the live slice of each batch and draws each topology with a
//! single indexed call. Tests substitute their own sink, so everything up to
//! the upload is observable without a device.

mod batch;
mod context;
mod renderer;

pub use batch::{BatchFull, GeometryBatch, Topology, Vertex};
pub use context::{Draw2d, Draw2dConfig, GeometrySink};
pub use renderer::{GeometryPass, GeometryRenderer};
