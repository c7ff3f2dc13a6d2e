/// Primitive topology used to interpret a draw-set's vertices.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    #[default]
    Polygon,
}

impl PrimitiveMode {
    /// Returns `true` for topologies rasterized as lines (where line width applies).
    #[inline]
    pub const fn is_line(self) -> bool {
        matches!(self, Self::Lines | Self::LineLoop | Self::LineStrip)
    }
}
