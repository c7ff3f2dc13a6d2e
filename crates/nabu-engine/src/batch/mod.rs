//! Geometry batching.
//!
//! Responsibilities:
//! - accumulate per-draw-set vertex/texcoord/color data into growable flat arrays
//! - group consecutive draw-sets sharing one [`RenderState`](crate::state::RenderState) into runs
//! - replay runs as the fewest device draw calls on flush, then reset for the next frame
//!
//! Performance characteristics:
//! - `add_vertices` is amortized O(1) per vertex; arrays grow by doubling
//! - state setters are O(1); consecutive changes with no geometry collapse into one run
//! - `reset` keeps all allocated capacity for reuse

mod buffer;
mod flat;
mod init;
mod run;

pub use buffer::RenderBuffer;
pub use flat::FlatBuffer;
pub use init::{BufferStats, RenderBufferInit};
pub use run::{Run, RunSpan};
