use crate::state::{AlphaTest, BlendFactors, PrimitiveMode, TextureHandle};

use super::{DeviceCaps, GraphicsDevice, VertexArrays};

/// One call received by a [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    BindTexture(TextureHandle),
    EnableTexturing(bool),
    EnableBlending(bool),
    SetBlendFunction(BlendFactors),
    EnableAlphaTest(bool),
    SetAlphaFunction(AlphaTest),
    SetLineWidth(f32),
    BindVertexArrays { vertices: usize },
    UnbindVertexArrays,
    LockArrayRange { start: u32, count: u32 },
    UnlockArrayRange,
    DrawArrays {
        mode: PrimitiveMode,
        start: u32,
        count: u32,
    },
    MultiDrawArrays {
        mode: PrimitiveMode,
        starts: Vec<u32>,
        counts: Vec<u32>,
    },
}

impl DeviceCall {
    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawArrays { .. } | Self::MultiDrawArrays { .. })
    }
}

/// Snapshot of the vertex data lent through `bind_vertex_arrays`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArrays {
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub colors: Vec<[u8; 4]>,
}

/// In-memory device that records every call in order.
///
/// Used as the mock device in tests and by the studio binary to inspect what
/// a flush would send to hardware. Bound vertex data is copied, the way a
/// retained device uploads it.
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    caps: DeviceCaps,
    generation: u64,
    calls: Vec<DeviceCall>,
    bound: Option<BoundArrays>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caps(caps: DeviceCaps) -> Self {
        Self {
            caps,
            ..Self::default()
        }
    }

    #[inline]
    pub fn set_caps(&mut self, caps: DeviceCaps) {
        self.caps = caps;
    }

    /// Simulates an external context invalidation (e.g. a context loss/recreate).
    #[inline]
    pub fn advance_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Recorded draw calls only, in order.
    pub fn draws(&self) -> impl Iterator<Item = &DeviceCall> {
        self.calls.iter().filter(|c| c.is_draw())
    }

    /// Vertex data currently bound, if any.
    #[inline]
    pub fn bound(&self) -> Option<&BoundArrays> {
        self.bound.as_ref()
    }

    #[inline]
    fn record(&mut self, call: DeviceCall) {
        log::trace!("device: {call:?}");
        self.calls.push(call);
    }
}

impl GraphicsDevice for RecordingDevice {
    fn bind_texture(&mut self, texture: TextureHandle) {
        self.record(DeviceCall::BindTexture(texture));
    }

    fn enable_texturing(&mut self, enabled: bool) {
        self.record(DeviceCall::EnableTexturing(enabled));
    }

    fn enable_blending(&mut self, enabled: bool) {
        self.record(DeviceCall::EnableBlending(enabled));
    }

    fn set_blend_function(&mut self, blend: BlendFactors) {
        self.record(DeviceCall::SetBlendFunction(blend));
    }

    fn enable_alpha_test(&mut self, enabled: bool) {
        self.record(DeviceCall::EnableAlphaTest(enabled));
    }

    fn set_alpha_function(&mut self, alpha: AlphaTest) {
        self.record(DeviceCall::SetAlphaFunction(alpha));
    }

    fn set_line_width(&mut self, width: f32) {
        self.record(DeviceCall::SetLineWidth(width));
    }

    fn bind_vertex_arrays(&mut self, arrays: VertexArrays<'_>) {
        self.bound = Some(BoundArrays {
            positions: arrays.positions.to_vec(),
            texcoords: arrays.texcoords.to_vec(),
            colors: arrays.colors.to_vec(),
        });
        self.record(DeviceCall::BindVertexArrays { vertices: arrays.len() });
    }

    fn unbind_vertex_arrays(&mut self) {
        self.bound = None;
        self.record(DeviceCall::UnbindVertexArrays);
    }

    fn capabilities(&self) -> DeviceCaps {
        self.caps
    }

    fn lock_array_range(&mut self, start: u32, count: u32) {
        self.record(DeviceCall::LockArrayRange { start, count });
    }

    fn unlock_array_range(&mut self) {
        self.record(DeviceCall::UnlockArrayRange);
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, start: u32, count: u32) {
        self.record(DeviceCall::DrawArrays { mode, start, count });
    }

    fn multi_draw_arrays(&mut self, mode: PrimitiveMode, starts: &[u32], counts: &[u32]) {
        debug_assert_eq!(starts.len(), counts.len());
        self.record(DeviceCall::MultiDrawArrays {
            mode,
            starts: starts.to_vec(),
            counts: counts.to_vec(),
        });
    }

    fn context_generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_and_takes() {
        let mut dev = RecordingDevice::new();
        dev.enable_blending(true);
        dev.draw_arrays(PrimitiveMode::Triangles, 0, 3);

        assert_eq!(
            dev.calls(),
            &[
                DeviceCall::EnableBlending(true),
                DeviceCall::DrawArrays {
                    mode: PrimitiveMode::Triangles,
                    start: 0,
                    count: 3,
                },
            ]
        );
        assert_eq!(dev.draws().count(), 1);

        let taken = dev.take_calls();
        assert_eq!(taken.len(), 2);
        assert!(dev.calls().is_empty());
    }

    #[test]
    fn bind_copies_vertex_data() {
        let mut dev = RecordingDevice::new();
        let positions = [[0.0, 0.0, 0.0]];
        let texcoords = [[0.25, 0.75]];
        let colors = [[1, 2, 3, 4]];
        dev.bind_vertex_arrays(VertexArrays {
            positions: &positions,
            texcoords: &texcoords,
            colors: &colors,
        });

        let bound = dev.bound().cloned().unwrap();
        assert_eq!(bound.texcoords, vec![[0.25, 0.75]]);
        assert_eq!(dev.calls(), &[DeviceCall::BindVertexArrays { vertices: 1 }]);

        dev.unbind_vertex_arrays();
        assert!(dev.bound().is_none());
    }

    #[test]
    fn set_caps_replaces_capabilities() {
        let mut dev = RecordingDevice::new();
        assert!(dev.supports_multi_draw());
        assert!(dev.supports_compiled_arrays());

        dev.set_caps(DeviceCaps {
            multi_draw: false,
            compiled_arrays: true,
        });
        assert!(!dev.supports_multi_draw());
        assert!(dev.supports_compiled_arrays());
    }

    #[test]
    fn generation_advances() {
        let mut dev = RecordingDevice::new();
        assert_eq!(dev.context_generation(), 0);
        dev.advance_generation();
        assert_eq!(dev.context_generation(), 1);
    }
}
