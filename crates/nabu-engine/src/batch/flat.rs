use bytemuck::Zeroable;

/// A single growth never allocates more than this multiple of the required size.
const MAX_OVERSHOOT: usize = 16;

/// Fixed-capacity flat array that grows geometrically on demand.
///
/// The whole capacity is addressable (zero-filled when allocated); callers
/// track how much of it is live. Growth allocates a new array of
/// `max(capacity * growth_factor, required)` elements (the scaled size capped
/// at `MAX_OVERSHOOT * required`) and copies the old contents over, so `n`
/// writes of bounded size trigger O(log n) growths.
#[derive(Debug, Clone)]
pub struct FlatBuffer<T> {
    label: &'static str,
    data: Vec<T>,
    growth_factor: f64,
    grow_count: u32,
}

impl<T: Copy + Zeroable> FlatBuffer<T> {
    pub fn with_capacity(label: &'static str, capacity: usize, growth_factor: f64) -> Self {
        Self {
            label,
            data: vec![T::zeroed(); capacity],
            growth_factor,
            grow_count: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of reallocations since construction.
    #[inline]
    pub fn grow_count(&self) -> u32 {
        self.grow_count
    }

    /// Ensures at least `required` elements are addressable.
    ///
    /// Returns `true` if the array was reallocated.
    pub fn ensure(&mut self, required: usize) -> bool {
        let capacity = self.data.len();
        if required <= capacity {
            return false;
        }

        let scaled = capacity as f64 * self.growth_factor;
        let ceiling = required.saturating_mul(MAX_OVERSHOOT);
        let scaled = if scaled.is_finite() && scaled < ceiling as f64 {
            scaled as usize
        } else {
            ceiling
        };
        let new_capacity = scaled.max(required);

        let mut grown = Vec::with_capacity(new_capacity);
        grown.extend_from_slice(&self.data);
        grown.resize(new_capacity, T::zeroed());
        self.data = grown;
        self.grow_count += 1;

        log::debug!("{}: grew {} -> {}", self.label, capacity, new_capacity);
        true
    }

    /// Copies `src` to `at..at + src.len()`. The range must already be addressable.
    #[inline]
    pub fn write(&mut self, at: usize, src: &[T]) {
        self.data[at..at + src.len()].copy_from_slice(src);
    }

    /// Sets `at..at + len` to `value`. The range must already be addressable.
    #[inline]
    pub fn fill(&mut self, at: usize, len: usize, value: T) {
        self.data[at..at + len].fill(value);
    }

    #[inline]
    pub fn set(&mut self, at: usize, value: T) {
        self.data[at] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
