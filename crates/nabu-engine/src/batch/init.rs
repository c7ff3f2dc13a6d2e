use crate::state::RenderState;

/// Construction parameters for a [`RenderBuffer`](super::RenderBuffer).
#[derive(Debug, Clone)]
pub struct RenderBufferInit {
    /// Vertex capacity allocated up front (positions, texcoords and colors).
    pub initial_vertices: usize,

    /// Draw-set capacity allocated up front.
    pub initial_sets: usize,

    /// Capacity multiplier applied when an array overflows.
    ///
    /// Non-finite values and values `<= 1.0` cannot amortize and fall back to `2.0`.
    pub growth_factor: f64,

    /// State of the first open run.
    pub initial_state: RenderState,
}

impl Default for RenderBufferInit {
    fn default() -> Self {
        Self {
            initial_vertices: 512,
            initial_sets: 512,
            growth_factor: 2.0,
            initial_state: RenderState::DEFAULT,
        }
    }
}

impl RenderBufferInit {
    pub(super) fn effective_growth_factor(&self) -> f64 {
        if self.growth_factor.is_finite() && self.growth_factor > 1.0 {
            return self.growth_factor;
        }
        log::warn!(
            "RenderBufferInit: growth_factor {} cannot amortize; using 2.0",
            self.growth_factor
        );
        2.0
    }
}

/// Capacity and reallocation counters for diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct BufferStats {
    pub vertices: usize,
    pub sets: usize,
    pub runs: usize,

    pub position_capacity: usize,
    pub texcoord_capacity: usize,
    pub color_capacity: usize,
    pub set_capacity: usize,

    pub position_grows: u32,
    pub texcoord_grows: u32,
    pub color_grows: u32,
    pub set_grows: u32,
}
