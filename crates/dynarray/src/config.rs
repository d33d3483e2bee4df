//! Array construction parameters.

/// Configuration for a [`ByteArray`](crate::ByteArray).
///
/// Validated at construction; the element width is immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayConfig {
    /// Initial number of element slots. Must be non-zero.
    pub capacity: usize,

    /// Size of every element in bytes. Must be non-zero.
    pub element_width: usize,

    /// Upper bound, in bytes, on any single storage allocation.
    ///
    /// `None` leaves allocation bounded only by the system allocator. When
    /// set, a resize whose byte size would exceed the limit is refused in
    /// the same way as an allocator failure, so the growth fallback and
    /// reallocation-failure paths behave identically under both.
    pub memory_limit: Option<usize>,

    /// Number of storage resizes (growths and shrinks) permitted after
    /// construction.
    ///
    /// `None` is unlimited. Once the budget is spent every further resize
    /// is refused like an allocator failure, which makes the shrink
    /// failure after a removal reproducible.
    pub resize_budget: Option<usize>,
}

impl ArrayConfig {
    /// Default initial capacity in elements.
    pub const DEFAULT_CAPACITY: usize = 8;

    /// Create a config with no memory limit.
    pub fn new(capacity: usize, element_width: usize) -> Self {
        Self {
            capacity,
            element_width,
            memory_limit: None,
            resize_budget: None,
        }
    }

    /// Config with [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY) slots of the given width.
    pub fn for_width(element_width: usize) -> Self {
        Self::new(Self::DEFAULT_CAPACITY, element_width)
    }

    /// Set the per-allocation byte limit.
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Allow at most `resizes` storage resizes after construction.
    pub fn with_resize_budget(mut self, resizes: usize) -> Self {
        self.resize_budget = Some(resizes);
        self
    }

    /// Bytes needed for the initial storage, or `None` on overflow.
    pub fn initial_bytes(&self) -> Option<usize> {
        self.capacity.checked_mul(self.element_width)
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::for_width(1)
    }
}
