//! Nabu engine crate.
//!
//! Batches immediate-mode geometry (points, lines, polygons) into contiguous
//! vertex arrays and replays it against a retained, buffer-based graphics
//! device with as few draw calls as the recorded state changes allow.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`state`] | `RenderState` and the device-state cache (`StateCache`) |
//! | [`batch`] | `RenderBuffer`, run records, growable flat arrays |
//! | [`device`] | `GraphicsDevice` seam and the in-memory `RecordingDevice` |
//! | [`render`] | `RenderCtx` passed to a flush |
//! | [`logging`] | logger initialization |

pub mod batch;
pub mod device;
pub mod logging;
pub mod render;
pub mod state;
