//! Keyboard and pointer input for a single window.
//!
//! The runtime translates winit events into [`InputState`] (held keys, pointer
//! position) and [`InputFrame`] (this frame's press/release edges). Apps read
//! both from the frame context; the runtime clears the frame deltas after
//! every frame callback.

mod state;

pub use state::{InputFrame, InputState, Key};
