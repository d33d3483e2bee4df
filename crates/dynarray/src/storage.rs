//! Contiguous slot storage with fallible resizing.
//!
//! [`Storage`] is a `Vec<u8>` whose length is always `slots * width`.
//! Every slot is initialised (zeroed on first allocation) so slot access
//! never touches uninitialised memory. Resizes use `try_reserve_exact`
//! and a fresh buffer for shrinking, so an allocator refusal surfaces as
//! `None` instead of aborting the process.

/// Fixed-width slot buffer owned by a single array.
#[derive(Clone, Debug)]
pub(crate) struct Storage {
    /// Backing bytes. `bytes.len() == slots * width` at all times.
    bytes: Vec<u8>,
    /// Width of one slot in bytes. Never zero.
    width: usize,
}

impl Storage {
    /// Allocate `slots` zeroed slots of `width` bytes.
    ///
    /// Returns `None` if the byte size overflows, exceeds `limit`, or the
    /// allocator refuses the request.
    pub fn allocate(slots: usize, width: usize, limit: Option<usize>) -> Option<Self> {
        debug_assert!(width > 0, "zero-width storage");
        let len = checked_bytes(slots, width, limit)?;
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).ok()?;
        bytes.resize(len, 0);
        Some(Self { bytes, width })
    }

    /// Number of slots currently allocated.
    pub fn slots(&self) -> usize {
        self.bytes.len() / self.width
    }

    /// Width of one slot in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Resize to exactly `slots` slots, preserving the common prefix.
    ///
    /// On `None` the storage is untouched.
    pub fn resize(&mut self, slots: usize, limit: Option<usize>) -> Option<()> {
        let new_len = checked_bytes(slots, self.width, limit)?;
        let old_len = self.bytes.len();
        if new_len >= old_len {
            self.bytes.try_reserve_exact(new_len - old_len).ok()?;
            self.bytes.resize(new_len, 0);
        } else {
            // Vec::shrink_to cannot report failure, so move into a fresh buffer.
            let mut smaller = Vec::new();
            smaller.try_reserve_exact(new_len).ok()?;
            smaller.extend_from_slice(&self.bytes[..new_len]);
            self.bytes = smaller;
        }
        Some(())
    }

    /// Bytes of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.slots()`.
    pub fn slot(&self, index: usize) -> &[u8] {
        let start = index * self.width;
        &self.bytes[start..start + self.width]
    }

    /// Mutable bytes of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.slots()`.
    pub fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.width;
        &mut self.bytes[start..start + self.width]
    }

    /// The first `count` slots as one contiguous slice.
    pub fn prefix(&self, count: usize) -> &[u8] {
        &self.bytes[..count * self.width]
    }

    /// Move slots `[pos, len)` up by one, vacating `pos`.
    ///
    /// Requires `len < self.slots()`. The source and destination overlap;
    /// `copy_within` has memmove semantics so no unshifted slot is clobbered.
    pub fn shift_up(&mut self, pos: usize, len: usize) {
        debug_assert!(len < self.slots());
        let w = self.width;
        self.bytes.copy_within(pos * w..len * w, (pos + 1) * w);
    }

    /// Move slots `(pos, len)` down by one, overwriting `pos`.
    ///
    /// Slot `len - 1` keeps its stale bytes; it is slack after the caller
    /// decrements its length.
    pub fn shift_down(&mut self, pos: usize, len: usize) {
        debug_assert!(pos < len && len <= self.slots());
        let w = self.width;
        self.bytes.copy_within((pos + 1) * w..len * w, pos * w);
    }

    /// Reorder the first `order.len()` slots so slot `i` receives the
    /// previous contents of slot `order[i]`.
    ///
    /// `order` must be a permutation of `0..order.len()`. Slack past the
    /// permuted prefix is carried over unchanged.
    pub fn permute(&mut self, order: &[usize]) {
        let mut reordered = Vec::with_capacity(self.bytes.len());
        for &src in order {
            reordered.extend_from_slice(self.slot(src));
        }
        reordered.extend_from_slice(&self.bytes[order.len() * self.width..]);
        self.bytes = reordered;
    }

    /// Memory usage of the backing buffer in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.bytes.len()
    }
}

fn checked_bytes(slots: usize, width: usize, limit: Option<usize>) -> Option<usize> {
    let len = slots.checked_mul(width)?;
    match limit {
        Some(max) if len > max => None,
        _ => Some(len),
    }
}
