use core::iter;

use crate::device::{GraphicsDevice, VertexArrays};
use crate::render::RenderCtx;
use crate::state::{
    AlphaFunc, AlphaTest, BlendFactor, BlendFactors, PrimitiveMode, RenderState, TextureHandle,
    floats_differ,
};

use super::{BufferStats, FlatBuffer, RenderBufferInit, Run};

const OPAQUE_WHITE: [u8; 4] = [255; 4];

/// Vertex batching engine.
///
/// Geometry arrives as draw-sets through [`add_vertices`](Self::add_vertices);
/// each draw-set is attributed to the currently open run. State setters either
/// overwrite the open run's state (when it has no geometry yet) or seal it and
/// open a new one. [`render`](Self::render) replays runs oldest first, binding
/// each run's state and issuing one multi-draw (or one draw per set) per run.
///
/// Lifecycle: construct once, then per frame add geometry, `render`, `reset`.
/// `reset` keeps capacity and the most recent state.
///
/// While locked (see [`lock_buffers`](Self::lock_buffers)) the device may be
/// reading the arrays, so geometry is dropped instead of written.
#[derive(Debug)]
pub struct RenderBuffer {
    positions: FlatBuffer<[f32; 3]>,
    texcoords: FlatBuffer<[f32; 2]>,
    colors: FlatBuffer<[u8; 4]>,

    set_starts: FlatBuffer<u32>,
    set_counts: FlatBuffer<u32>,

    /// Vertex write cursor.
    index: usize,
    /// Draw-sets recorded.
    sets: usize,
    lock: u32,

    /// Sealed runs, oldest first. Every sealed run has at least one draw-set.
    runs: Vec<Run>,
    /// Run receiving new draw-sets.
    open: Run,
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_init(RenderBufferInit::default())
    }

    pub fn with_init(init: RenderBufferInit) -> Self {
        let growth = init.effective_growth_factor();
        let vertices = init.initial_vertices;
        let sets = init.initial_sets;

        Self {
            positions: FlatBuffer::with_capacity("render buffer positions", vertices, growth),
            texcoords: FlatBuffer::with_capacity("render buffer texcoords", vertices, growth),
            colors: FlatBuffer::with_capacity("render buffer colors", vertices, growth),
            set_starts: FlatBuffer::with_capacity("render buffer set starts", sets, growth),
            set_counts: FlatBuffer::with_capacity("render buffer set counts", sets, growth),
            index: 0,
            sets: 0,
            lock: 0,
            runs: Vec::new(),
            open: Run::open(0, init.initial_state),
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Number of runs, including the open one (always at least 1).
    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len() + 1
    }

    /// Runs oldest first; the last item is the open run.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().chain(iter::once(&self.open))
    }

    /// State of the open run, i.e. the state the next draw-set will use.
    #[inline]
    pub fn current_state(&self) -> &RenderState {
        &self.open.state
    }

    #[inline]
    pub fn lock_depth(&self) -> u32 {
        self.lock
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock != 0
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions.as_slice()[..self.index]
    }

    #[inline]
    pub fn texcoords(&self) -> &[[f32; 2]] {
        &self.texcoords.as_slice()[..self.index]
    }

    #[inline]
    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors.as_slice()[..self.index]
    }

    /// First vertex of each draw-set.
    #[inline]
    pub fn set_starts(&self) -> &[u32] {
        &self.set_starts.as_slice()[..self.sets]
    }

    /// Vertex count of each draw-set.
    #[inline]
    pub fn set_counts(&self) -> &[u32] {
        &self.set_counts.as_slice()[..self.sets]
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats {
            vertices: self.index,
            sets: self.sets,
            runs: self.run_count(),
            position_capacity: self.positions.capacity(),
            texcoord_capacity: self.texcoords.capacity(),
            color_capacity: self.colors.capacity(),
            set_capacity: self.set_starts.capacity(),
            position_grows: self.positions.grow_count(),
            texcoord_grows: self.texcoords.grow_count(),
            color_grows: self.colors.grow_count(),
            set_grows: self.set_starts.grow_count(),
        }
    }

    #[inline]
    fn vertex_arrays(&self) -> VertexArrays<'_> {
        VertexArrays {
            positions: self.positions(),
            texcoords: self.texcoords(),
            colors: self.colors(),
        }
    }

    // ── state setters ─────────────────────────────────────────────────────

    pub fn set_texture(&mut self, texture: TextureHandle) {
        if self.open.state.texture != texture {
            self.start_new_run_if_needed();
            self.open.state.texture = texture;
        }
    }

    pub fn set_mode(&mut self, mode: PrimitiveMode) {
        if self.open.state.mode != mode {
            self.start_new_run_if_needed();
            self.open.state.mode = mode;
        }
    }

    pub fn set_blend_func(&mut self, source: BlendFactor, dest: BlendFactor) {
        let blend = BlendFactors::new(source, dest);
        if self.open.state.blend != blend {
            self.start_new_run_if_needed();
            self.open.state.blend = blend;
        }
    }

    /// `reference` is clamped to `[0, 1]`.
    pub fn set_alpha_func(&mut self, func: AlphaFunc, reference: f32) {
        let alpha = AlphaTest::new(func, reference);
        if self.open.state.alpha != alpha {
            self.start_new_run_if_needed();
            self.open.state.alpha = alpha;
        }
    }

    pub fn set_line_width(&mut self, width: f32) {
        if floats_differ(self.open.state.line_width, width) {
            self.start_new_run_if_needed();
            self.open.state.line_width = width;
        }
    }

    /// Seals the open run if it already holds geometry and opens a fresh one
    /// carrying the same state. An empty open run is reused in place, so
    /// state changes with no geometry in between collapse into one run.
    fn start_new_run_if_needed(&mut self) {
        if !self.open.is_empty() {
            let next = Run::open(self.sets, self.open.state);
            self.runs.push(core::mem::replace(&mut self.open, next));
        }
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Appends one draw-set of `positions.len()` vertices to the open run.
    ///
    /// - `texcoords`: when `None`, the texcoord slots are left as they are
    ///   (stale data from an earlier frame may show through).
    /// - `colors`: when `None`, vertices are opaque white.
    ///
    /// Attribute slices are expected to match `positions` in length; shorter
    /// texcoords leave the tail untouched, shorter colors pad with white.
    ///
    /// Ignored while the buffer is locked.
    pub fn add_vertices(
        &mut self,
        positions: &[[f32; 3]],
        texcoords: Option<&[[f32; 2]]>,
        colors: Option<&[[u8; 4]]>,
    ) {
        if self.lock != 0 {
            log::debug!(
                "RenderBuffer: add_vertices while locked; {} vertices dropped",
                positions.len()
            );
            return;
        }

        let elements = positions.len();
        let index = self.index;
        let set = self.sets;

        self.set_starts.ensure(set + 1);
        self.set_counts.ensure(set + 1);
        self.set_starts.set(set, index as u32);
        self.set_counts.set(set, elements as u32);

        let required = index + elements;
        self.positions.ensure(required);
        self.texcoords.ensure(required);
        self.colors.ensure(required);

        self.positions.write(index, positions);

        if let Some(texcoords) = texcoords {
            debug_assert_eq!(
                texcoords.len(),
                elements,
                "texcoord count does not match vertex count"
            );
            let n = texcoords.len().min(elements);
            self.texcoords.write(index, &texcoords[..n]);
        }

        match colors {
            Some(colors) => {
                debug_assert_eq!(colors.len(), elements, "color count does not match vertex count");
                let n = colors.len().min(elements);
                self.colors.write(index, &colors[..n]);
                self.colors.fill(index + n, elements - n, OPAQUE_WHITE);
            }
            None => self.colors.fill(index, elements, OPAQUE_WHITE),
        }

        self.sets += 1;
        self.index += elements;
        self.open.span.set_count += 1;
        self.open.span.vertex_count += elements;
    }

    // ── locking ───────────────────────────────────────────────────────────

    /// Enters a lock scope. On the outermost lock with geometry present, lends
    /// the arrays to the device and hints that the range is stable.
    pub fn lock_buffers(&mut self, device: &mut dyn GraphicsDevice) {
        if self.lock == 0 && self.index > 0 {
            device.bind_vertex_arrays(self.vertex_arrays());
            if device.supports_compiled_arrays() {
                device.lock_array_range(0, self.index as u32);
            }
        }
        self.lock += 1;
    }

    /// Leaves a lock scope. The outermost unlock releases the hint and detaches
    /// the arrays. Unbalanced calls are ignored.
    pub fn unlock_buffers(&mut self, device: &mut dyn GraphicsDevice) {
        if self.lock == 0 {
            log::warn!("RenderBuffer: unlock_buffers called without a matching lock_buffers");
            return;
        }

        self.lock -= 1;
        if self.lock == 0 && self.index > 0 {
            if device.supports_compiled_arrays() {
                device.unlock_array_range();
            }
            device.unbind_vertex_arrays();
        }
    }

    /// Runs `f` inside a lock scope.
    pub fn locked<R>(
        &mut self,
        device: &mut dyn GraphicsDevice,
        f: impl FnOnce(&mut Self, &mut dyn GraphicsDevice) -> R,
    ) -> R {
        self.lock_buffers(device);
        let out = f(&mut *self, &mut *device);
        self.unlock_buffers(device);
        out
    }

    // ── flush ─────────────────────────────────────────────────────────────

    /// Issues draw calls for every non-empty run, oldest first.
    ///
    /// Each run binds its state, then issues one multi-draw when the device
    /// supports it and the run has more than one draw-set, otherwise one draw
    /// per draw-set. Nothing is consumed; rendering twice replays the same draws.
    pub fn render(&mut self, ctx: &mut RenderCtx<'_>) {
        if self.sets == 0 {
            return;
        }

        self.lock_buffers(&mut *ctx.device);

        let multi_draw = ctx.device.supports_multi_draw();
        let starts = self.set_starts.as_slice();
        let counts = self.set_counts.as_slice();

        for run in self.runs.iter().chain(iter::once(&self.open)) {
            if run.is_empty() {
                continue;
            }

            ctx.cache.bind(&mut *ctx.device, &run.state);

            let sets = run.sets();
            let mode = run.state.mode;

            if multi_draw && sets.len() > 1 {
                log::trace!(
                    "RenderBuffer: multi-draw {:?} x{} at set {}",
                    mode,
                    sets.len(),
                    sets.start
                );
                ctx.device.multi_draw_arrays(mode, &starts[sets.clone()], &counts[sets]);
            } else {
                for set in sets {
                    log::trace!("RenderBuffer: draw {:?} {}+{}", mode, starts[set], counts[set]);
                    ctx.device.draw_arrays(mode, starts[set], counts[set]);
                }
            }
        }

        self.unlock_buffers(&mut *ctx.device);
    }

    /// Forgets accumulated geometry, keeping capacity and the most recent state.
    ///
    /// Ignored while locked or when nothing was added.
    pub fn reset(&mut self) {
        if self.lock != 0 {
            log::debug!("RenderBuffer: reset while locked; ignored");
            return;
        }

        if self.sets == 0 {
            return;
        }

        self.index = 0;
        self.sets = 0;
        self.runs.clear();
        self.open = Run::open(0, self.open.state);
    }
}
