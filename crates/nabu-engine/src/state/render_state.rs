use super::{AlphaTest, BlendFactors, PrimitiveMode, TextureHandle};

/// Returns `true` when `a` and `b` differ by at least `f32::EPSILON`.
#[inline]
pub fn floats_differ(a: f32, b: f32) -> bool {
    (a - b).abs() >= f32::EPSILON
}

/// One complete rendering configuration.
///
/// Copied by value into each run of a [`RenderBuffer`](crate::batch::RenderBuffer).
/// Equality is field-wise; `line_width` and the alpha reference compare within
/// `f32::EPSILON`.
#[derive(Debug, Copy, Clone)]
pub struct RenderState {
    pub texture: TextureHandle,
    pub mode: PrimitiveMode,
    pub blend: BlendFactors,
    pub alpha: AlphaTest,
    /// Only applied when `mode` is a line topology.
    pub line_width: f32,
}

impl RenderState {
    /// Untextured polygons, no blending, no alpha test, 1px lines.
    pub const DEFAULT: Self = Self {
        texture: TextureHandle::NONE,
        mode: PrimitiveMode::Polygon,
        blend: BlendFactors::REPLACE,
        alpha: AlphaTest::DISABLED,
        line_width: 1.0,
    };
}

impl Default for RenderState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PartialEq for RenderState {
    fn eq(&self, other: &Self) -> bool {
        self.texture == other.texture
            && self.mode == other.mode
            && self.blend == other.blend
            && self.alpha == other.alpha
            && !floats_differ(self.line_width, other.line_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AlphaFunc;

    #[test]
    fn floats_differ_uses_epsilon() {
        assert!(!floats_differ(1.0, 1.0));
        assert!(!floats_differ(1.0, 1.0 + f32::EPSILON * 0.5));
        assert!(floats_differ(1.0, 1.0 + f32::EPSILON * 2.0));
        assert!(floats_differ(2.0, 3.0));
    }

    #[test]
    fn default_state() {
        let s = RenderState::default();
        assert!(s.texture.is_none());
        assert_eq!(s.mode, PrimitiveMode::Polygon);
        assert!(s.blend.is_identity());
        assert!(s.alpha.is_disabled());
        assert_eq!(s.line_width, 1.0);
    }

    #[test]
    fn equality_is_field_wise() {
        let base = RenderState::default();

        let mut textured = base;
        textured.texture = TextureHandle::new(3);
        assert_ne!(base, textured);

        let mut blended = base;
        blended.blend = BlendFactors::ALPHA;
        assert_ne!(base, blended);

        let mut tested = base;
        tested.alpha = AlphaTest::new(AlphaFunc::Greater, 0.1);
        assert_ne!(base, tested);

        let mut noisy = base;
        noisy.line_width = 1.0 + f32::EPSILON * 0.5;
        assert_eq!(base, noisy);
    }
}
