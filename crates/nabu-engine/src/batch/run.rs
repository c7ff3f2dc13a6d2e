use core::ops::Range;

use crate::state::RenderState;

/// Index bookkeeping for one run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct RunSpan {
    /// Offset of the run's first entry in the flat draw-set arrays.
    pub start_set: usize,
    /// Draw-sets added so far. Zero while the run is open and empty.
    pub set_count: usize,
    /// Sum of vertices contributed by the run's draw-sets.
    pub vertex_count: usize,
}

/// Contiguous draw-sets sharing one rendering state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Run {
    pub span: RunSpan,
    pub state: RenderState,
}

impl Run {
    /// An empty run beginning at draw-set `start_set`.
    #[inline]
    pub const fn open(start_set: usize, state: RenderState) -> Self {
        Self {
            span: RunSpan {
                start_set,
                set_count: 0,
                vertex_count: 0,
            },
            state,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.set_count == 0
    }

    /// Range of this run's entries in the flat draw-set arrays.
    #[inline]
    pub fn sets(&self) -> Range<usize> {
        self.span.start_set..self.span.start_set + self.span.set_count
    }
}
