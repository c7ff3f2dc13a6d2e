//! Flush-time context.
//!
//! A flush needs the device and the cache mirroring that device; both are
//! owned by the caller and lent for the duration of the call.

mod ctx;

pub use ctx::RenderCtx;
