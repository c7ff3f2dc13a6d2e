//! Rendering state.
//!
//! [`RenderState`] is a plain value describing one complete rendering
//! configuration. [`StateCache`] mirrors what is currently bound on a
//! [`GraphicsDevice`](crate::device::GraphicsDevice) and turns a state change
//! into the minimal sequence of device calls.
//!
//! Float fields compare with an epsilon tolerance so repeated pushes of the
//! "same" computed value do not split batches.

mod alpha;
mod blend;
mod cache;
mod mode;
mod render_state;
mod texture;

pub use alpha::{AlphaFunc, AlphaTest};
pub use blend::{BlendFactor, BlendFactors};
pub use cache::StateCache;
pub use mode::PrimitiveMode;
pub use render_state::{RenderState, floats_differ};
pub use texture::TextureHandle;
