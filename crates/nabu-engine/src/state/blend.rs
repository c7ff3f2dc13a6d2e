/// Source/destination factor for the fixed-function blend equation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

/// Blend function pair.
///
/// `(One, Zero)` replaces the destination outright; binding it disables
/// blending on the device instead of issuing a blend function.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendFactors {
    pub source: BlendFactor,
    pub dest: BlendFactor,
}

impl BlendFactors {
    /// No blending: `src * 1 + dst * 0`.
    pub const REPLACE: Self = Self::new(BlendFactor::One, BlendFactor::Zero);

    /// Straight-alpha "over".
    pub const ALPHA: Self = Self::new(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

    pub const ADDITIVE: Self = Self::new(BlendFactor::SrcAlpha, BlendFactor::One);

    pub const MULTIPLY: Self = Self::new(BlendFactor::DstColor, BlendFactor::Zero);

    #[inline]
    pub const fn new(source: BlendFactor, dest: BlendFactor) -> Self {
        Self { source, dest }
    }

    /// Returns `true` for `(One, Zero)`, i.e. blending has no effect.
    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::REPLACE
    }
}

impl Default for BlendFactors {
    fn default() -> Self {
        Self::REPLACE
    }
}
