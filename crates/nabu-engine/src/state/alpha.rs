use super::render_state::floats_differ;

/// Comparison used by the alpha test.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum AlphaFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    #[default]
    Always,
}

/// Alpha test configuration: fragments pass when `alpha <func> reference`.
///
/// `reference` is kept in `[0, 1]`. Equality is epsilon-tolerant on `reference`.
#[derive(Debug, Copy, Clone, Default)]
pub struct AlphaTest {
    pub func: AlphaFunc,
    pub reference: f32,
}

impl AlphaTest {
    /// Test disabled (`Always`, reference 0).
    pub const DISABLED: Self = Self {
        func: AlphaFunc::Always,
        reference: 0.0,
    };

    #[inline]
    pub fn new(func: AlphaFunc, reference: f32) -> Self {
        Self {
            func,
            reference: reference.clamp(0.0, 1.0),
        }
    }

    /// Returns `true` when every fragment passes, so the device test can stay off.
    #[inline]
    pub fn is_disabled(self) -> bool {
        self.func == AlphaFunc::Always
    }
}

impl PartialEq for AlphaTest {
    fn eq(&self, other: &Self) -> bool {
        self.func == other.func && !floats_differ(self.reference, other.reference)
    }
}
