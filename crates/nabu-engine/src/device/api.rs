use crate::state::{AlphaTest, BlendFactors, PrimitiveMode, TextureHandle};

/// Optional device capabilities.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DeviceCaps {
    /// Device can issue many draw-sets of identical state in one command.
    pub multi_draw: bool,
    /// Device accepts `lock_array_range`/`unlock_array_range` hints.
    pub compiled_arrays: bool,
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self {
            multi_draw: true,
            compiled_arrays: true,
        }
    }
}

/// Borrowed view of a render buffer's live vertex data.
///
/// All three slices have the same length (one entry per vertex).
#[derive(Debug, Copy, Clone)]
pub struct VertexArrays<'a> {
    pub positions: &'a [[f32; 3]],
    pub texcoords: &'a [[f32; 2]],
    pub colors: &'a [[u8; 4]],
}

impl<'a> VertexArrays<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a tightly packed `xyz` float stream.
    #[inline]
    pub fn position_floats(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.positions)
    }

    /// Texture coordinates as a tightly packed `uv` float stream.
    #[inline]
    pub fn texcoord_floats(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.texcoords)
    }

    /// Colors as a tightly packed RGBA8 byte stream.
    #[inline]
    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.colors)
    }
}

/// A retained, buffer-based graphics device.
///
/// Calls are expected on the thread that owns the device context. None of
/// them report failure; synchronization is best effort.
///
/// `bind_vertex_arrays` only lends the data for the duration of the call.
/// Devices that read vertices lazily (at draw time) must copy or upload
/// them there.
pub trait GraphicsDevice {
    fn bind_texture(&mut self, texture: TextureHandle);
    fn enable_texturing(&mut self, enabled: bool);

    fn enable_blending(&mut self, enabled: bool);
    fn set_blend_function(&mut self, blend: BlendFactors);

    fn enable_alpha_test(&mut self, enabled: bool);
    fn set_alpha_function(&mut self, alpha: AlphaTest);

    fn set_line_width(&mut self, width: f32);

    fn bind_vertex_arrays(&mut self, arrays: VertexArrays<'_>);
    fn unbind_vertex_arrays(&mut self);

    fn capabilities(&self) -> DeviceCaps;

    /// Hint that vertices `start..start + count` stay unchanged until
    /// `unlock_array_range`. Only called when `capabilities().compiled_arrays`.
    fn lock_array_range(&mut self, start: u32, count: u32);
    fn unlock_array_range(&mut self);

    fn draw_arrays(&mut self, mode: PrimitiveMode, start: u32, count: u32);

    /// Draws `starts.len()` ranges in one command. Only called when
    /// `capabilities().multi_draw`.
    fn multi_draw_arrays(&mut self, mode: PrimitiveMode, starts: &[u32], counts: &[u32]);

    /// Monotonic counter advanced whenever the device context is invalidated
    /// outside the batching layer's control.
    fn context_generation(&self) -> u64;

    #[inline]
    fn supports_multi_draw(&self) -> bool {
        self.capabilities().multi_draw
    }

    #[inline]
    fn supports_compiled_arrays(&self) -> bool {
        self.capabilities().compiled_arrays
    }
}
