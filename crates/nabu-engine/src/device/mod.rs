//! Graphics device seam.
//!
//! This module is responsible for:
//! - the [`GraphicsDevice`] trait the batching layer drives
//! - the borrowed [`VertexArrays`] view handed to the device while buffers are locked
//! - [`RecordingDevice`], an in-memory device that logs every call
//!
//! Realizing these calls on actual hardware is left to implementors of the trait.

mod api;
mod recording;

pub use api::{DeviceCaps, GraphicsDevice, VertexArrays};
pub use recording::{BoundArrays, DeviceCall, RecordingDevice};
