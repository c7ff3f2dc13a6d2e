use crate::device::GraphicsDevice;
use crate::state::{RenderState, StateCache};

/// Renderer-facing context (device + the state cache that mirrors it).
///
/// Keep one `StateCache` per device; pairing a cache with a different device
/// leaves both out of sync.
pub struct RenderCtx<'a> {
    pub device: &'a mut dyn GraphicsDevice,
    pub cache: &'a mut StateCache,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(device: &'a mut dyn GraphicsDevice, cache: &'a mut StateCache) -> Self {
        Self { device, cache }
    }

    /// Binds `state` through the cache.
    #[inline]
    pub fn bind(&mut self, state: &RenderState) {
        self.cache.bind(&mut *self.device, state);
    }

    /// Resynchronizes the device from the cache. See [`StateCache::restore`].
    #[inline]
    pub fn restore(&mut self, state: Option<&RenderState>) {
        self.cache.restore(&mut *self.device, state);
    }
}
