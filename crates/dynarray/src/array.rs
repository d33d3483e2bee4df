//! The type-erased resizable array.
//!
//! [`ByteArray`] stores `len` elements of a fixed, caller-declared byte
//! width in one contiguous buffer. Every operation returns a `Result` (or a
//! [`SearchOutcome`]) and also records its outcome as the container's last
//! error, readable through [`ByteArray::last_error`]. The last error is not
//! sticky: accessors such as [`ByteArray::len`] reset it to
//! [`ErrorCode::NoError`], so it must be read straight after the call of
//! interest.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::config::ArrayConfig;
use crate::error::{ArrayError, ErrorCode};
use crate::policy;
use crate::search::SearchOutcome;
use crate::storage::Storage;

/// A growable array of fixed-width byte elements.
///
/// Capacity grows to `2c + 1` slots when an insert finds the array full
/// (falling back to `c + 1` if that cannot be allocated) and halves after a
/// removal leaves fewer than `c / 2` live elements.
///
/// The last-error field uses a [`Cell`], so the type is `Send` but not
/// `Sync`; share it across threads only behind a lock.
#[derive(Debug)]
pub struct ByteArray {
    storage: Storage,
    len: usize,
    memory_limit: Option<usize>,
    /// Resizes still permitted; `None` is unlimited.
    resizes_left: Option<usize>,
    last_error: Cell<ErrorCode>,
}

impl ByteArray {
    /// Create an empty array with room for `capacity` elements of
    /// `element_width` bytes each.
    ///
    /// Fails if either argument is zero or the storage cannot be allocated.
    pub fn new(capacity: usize, element_width: usize) -> Result<Self, ArrayError> {
        Self::with_config(ArrayConfig::new(capacity, element_width))
    }

    /// Create an empty array from a full [`ArrayConfig`].
    pub fn with_config(config: ArrayConfig) -> Result<Self, ArrayError> {
        if config.capacity == 0 {
            return Err(ArrayError::ZeroCapacity);
        }
        if config.element_width == 0 {
            return Err(ArrayError::ZeroElementWidth);
        }
        let storage = Storage::allocate(config.capacity, config.element_width, config.memory_limit)
            .ok_or(ArrayError::AllocationFailed {
                requested_capacity: config.capacity,
                element_width: config.element_width,
            })?;
        Ok(Self {
            storage,
            len: 0,
            memory_limit: config.memory_limit,
            resizes_left: config.resize_budget,
            last_error: Cell::new(ErrorCode::NoError),
        })
    }

    // ── accessors ───────────────────────────────────────────────

    /// Number of live elements. Resets the last error.
    pub fn len(&self) -> usize {
        self.succeed();
        self.len
    }

    /// Whether the array holds no elements. Resets the last error.
    pub fn is_empty(&self) -> bool {
        self.succeed();
        self.len == 0
    }

    /// Number of allocated element slots. Resets the last error.
    pub fn capacity(&self) -> usize {
        self.succeed();
        self.storage.slots()
    }

    /// Width of every element in bytes. Resets the last error.
    pub fn element_width(&self) -> usize {
        self.succeed();
        self.storage.width()
    }

    /// Per-allocation byte limit this array was configured with.
    /// Resets the last error.
    pub fn memory_limit(&self) -> Option<usize> {
        self.succeed();
        self.memory_limit
    }

    /// The live elements as one contiguous byte slice. Resets the last error.
    pub fn as_bytes(&self) -> &[u8] {
        self.succeed();
        self.storage.prefix(self.len)
    }

    /// Size of the backing buffer in bytes (`capacity * element_width`).
    /// Resets the last error.
    pub fn memory_bytes(&self) -> usize {
        self.succeed();
        self.storage.memory_bytes()
    }

    /// Outcome of the most recent operation on this array.
    ///
    /// Reading the last error does not itself overwrite it.
    pub fn last_error(&self) -> ErrorCode {
        self.last_error.get()
    }

    /// Record `error` as the outcome of an operation refused before it
    /// reached the array, and hand it back.
    ///
    /// Used by foreign-call shims that reject an argument (for example a
    /// null comparator) which has no representation in the Rust API.
    pub fn record_failure(&self, error: ArrayError) -> ArrayError {
        self.last_error.set(error.code());
        error
    }

    // ── element access ──────────────────────────────────────────

    /// Bytes of the element at `pos`.
    pub fn get(&self, pos: usize) -> Result<&[u8], ArrayError> {
        self.record(self.check_index(pos))?;
        Ok(self.storage.slot(pos))
    }

    /// Mutable bytes of the element at `pos`.
    pub fn get_mut(&mut self, pos: usize) -> Result<&mut [u8], ArrayError> {
        self.record(self.check_index(pos))?;
        Ok(self.storage.slot_mut(pos))
    }

    /// Overwrite the element at `pos` with `value`.
    ///
    /// `value.len()` must equal the element width. On failure the storage
    /// is unchanged.
    pub fn set(&mut self, pos: usize, value: &[u8]) -> Result<(), ArrayError> {
        self.record(self.check_index(pos).and_then(|()| self.check_width(value)))?;
        self.storage.slot_mut(pos).copy_from_slice(value);
        Ok(())
    }

    // ── structural mutation ─────────────────────────────────────

    /// Insert `value` at `pos`, shifting elements at `pos..` up by one.
    ///
    /// `pos == len` appends. Grows the storage first if the array is full;
    /// if growth fails nothing is shifted and the array is unchanged.
    pub fn insert(&mut self, pos: usize, value: &[u8]) -> Result<(), ArrayError> {
        let checked = if pos > self.len {
            Err(ArrayError::InsertPositionOutOfBounds {
                index: pos,
                len: self.len,
            })
        } else {
            self.check_width(value)
        };
        self.record(checked)?;

        if self.len == self.storage.slots() {
            let grown = self.grow();
            self.record(grown)?;
        }

        self.storage.shift_up(pos, self.len);
        self.storage.slot_mut(pos).copy_from_slice(value);
        self.len += 1;
        Ok(())
    }

    /// Append `value` after the last element.
    pub fn push(&mut self, value: &[u8]) -> Result<(), ArrayError> {
        self.insert(self.len, value)
    }

    /// Remove the element at `pos`, shifting elements after it down by one.
    ///
    /// After the removal the storage is halved if fewer than half the slots
    /// are live. If that shrink cannot be allocated the removal still stands
    /// and [`ArrayError::ShrinkFailed`] is returned: the array is consistent
    /// but over-allocated.
    pub fn pop(&mut self, pos: usize) -> Result<(), ArrayError> {
        self.record(self.check_index(pos))?;

        self.storage.shift_down(pos, self.len);
        self.len -= 1;

        let current = self.storage.slots();
        let shrunk = match policy::shrink_target(self.len, current) {
            Some(target) => {
                if self.resize_storage(target).is_some() {
                    log::debug!("shrank array storage from {current} to {target} elements");
                    Ok(())
                } else {
                    log::warn!(
                        "array shrink from {current} to {target} elements failed; \
                         removal kept, storage left over-allocated"
                    );
                    Err(ArrayError::ShrinkFailed {
                        requested_capacity: target,
                        len: self.len,
                    })
                }
            }
            None => Ok(()),
        };
        self.record(shrunk)
    }

    // ── search & ordering ───────────────────────────────────────

    /// Index of the first element whose bytes equal `key`.
    pub fn linear_search(&self, key: &[u8]) -> SearchOutcome {
        if self.record(self.check_width(key)).is_err() {
            return SearchOutcome::Invalid;
        }
        (0..self.len)
            .position(|i| self.storage.slot(i) == key)
            .map_or(SearchOutcome::NotFound, SearchOutcome::Found)
    }

    /// Binary search for `key` in an array sorted ascending by `compare`.
    ///
    /// `compare` is called as `compare(element, key)`. With duplicates, the
    /// index of any one of them may be returned. The result is unspecified
    /// (but memory-safe) if the array is not sorted.
    pub fn binary_search_by<F>(&self, key: &[u8], mut compare: F) -> SearchOutcome
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        if self.record(self.check_width(key)).is_err() {
            return SearchOutcome::Invalid;
        }
        let (mut lo, mut hi) = (0, self.len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match compare(self.storage.slot(mid), key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return SearchOutcome::Found(mid),
            }
        }
        SearchOutcome::NotFound
    }

    /// Sort the live elements ascending by `compare`. Not stable.
    ///
    /// The storage is only rewritten after every comparison has run, so a
    /// panicking comparator leaves the array in its previous order.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        if self.len > 1 {
            let mut order: Vec<usize> = (0..self.len).collect();
            let storage = &self.storage;
            order.sort_unstable_by(|&a, &b| compare(storage.slot(a), storage.slot(b)));
            self.storage.permute(&order);
        }
        self.succeed();
    }

    // ── internals ───────────────────────────────────────────────

    fn grow(&mut self) -> Result<(), ArrayError> {
        let current = self.storage.slots();
        let mut attempted = current;
        for candidate in policy::growth_candidates(current) {
            attempted = candidate;
            if self.resize_storage(candidate).is_some() {
                log::debug!("grew array storage from {current} to {candidate} elements");
                return Ok(());
            }
            log::debug!("growth from {current} to {candidate} elements refused");
        }
        log::warn!("array growth from {current} elements failed");
        Err(ArrayError::AllocationFailed {
            requested_capacity: attempted,
            element_width: self.storage.width(),
        })
    }

    fn resize_storage(&mut self, slots: usize) -> Option<()> {
        if self.resizes_left == Some(0) {
            return None;
        }
        self.storage.resize(slots, self.memory_limit)?;
        if let Some(left) = self.resizes_left.as_mut() {
            *left -= 1;
        }
        Some(())
    }

    fn check_index(&self, pos: usize) -> Result<(), ArrayError> {
        if pos < self.len {
            Ok(())
        } else {
            Err(ArrayError::IndexOutOfBounds {
                index: pos,
                len: self.len,
            })
        }
    }

    fn check_width(&self, value: &[u8]) -> Result<(), ArrayError> {
        let expected = self.storage.width();
        if value.len() == expected {
            Ok(())
        } else {
            Err(ArrayError::WidthMismatch {
                expected,
                actual: value.len(),
            })
        }
    }

    fn record<T>(&self, result: Result<T, ArrayError>) -> Result<T, ArrayError> {
        self.last_error.set(match &result {
            Ok(_) => ErrorCode::NoError,
            Err(e) => e.code(),
        });
        result
    }

    fn succeed(&self) {
        self.last_error.set(ErrorCode::NoError);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> ByteArray {
        let mut arr = ByteArray::new(2, 4).unwrap();
        for v in values {
            arr.push(&v.to_ne_bytes()).unwrap();
        }
        arr
    }

    fn read(arr: &ByteArray) -> Vec<i32> {
        arr.as_bytes()
            .chunks_exact(4)
            .map(|c| i32::from_ne_bytes(c.try_into().unwrap()))
            .collect()
    }

    fn cmp_i32(a: &[u8], b: &[u8]) -> Ordering {
        let a = i32::from_ne_bytes(a.try_into().unwrap());
        let b = i32::from_ne_bytes(b.try_into().unwrap());
        a.cmp(&b)
    }

    #[test]
    fn new_rejects_zero_arguments() {
        assert_eq!(ByteArray::new(0, 4).unwrap_err(), ArrayError::ZeroCapacity);
        assert_eq!(
            ByteArray::new(4, 0).unwrap_err(),
            ArrayError::ZeroElementWidth
        );
    }

    #[test]
    fn new_starts_empty_without_error() {
        let arr = ByteArray::new(3, 8).unwrap();
        assert_eq!(arr.last_error(), ErrorCode::NoError);
        assert_eq!(arr.len(), 0);
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), 3);
        assert_eq!(arr.element_width(), 8);
    }

    #[test]
    fn new_over_memory_limit_fails() {
        let config = ArrayConfig::new(4, 4).with_memory_limit(8);
        assert!(matches!(
            ByteArray::with_config(config),
            Err(ArrayError::AllocationFailed {
                requested_capacity: 4,
                element_width: 4
            })
        ));
    }

    #[test]
    fn insert_middle_shifts_tail() {
        let mut arr = ByteArray::new(2, 4).unwrap();
        arr.insert(0, &10i32.to_ne_bytes()).unwrap();
        arr.insert(1, &20i32.to_ne_bytes()).unwrap();
        arr.insert(1, &15i32.to_ne_bytes()).unwrap();
        assert_eq!(read(&arr), vec![10, 15, 20]);
        assert_eq!(arr.len(), 3);
        assert!(arr.capacity() >= 3);

        arr.pop(0).unwrap();
        assert_eq!(read(&arr), vec![15, 20]);
        assert_eq!(arr.len(), 2);
    }

    #[test]
    fn insert_at_front() {
        let mut arr = ints(&[2, 3]);
        arr.insert(0, &1i32.to_ne_bytes()).unwrap();
        assert_eq!(read(&arr), vec![1, 2, 3]);
    }

    #[test]
    fn growth_doubles_plus_one() {
        let mut arr = ints(&[1, 2]);
        assert_eq!(arr.capacity(), 2);
        arr.push(&3i32.to_ne_bytes()).unwrap();
        assert_eq!(arr.capacity(), 5);
    }

    #[test]
    fn growth_falls_back_to_one_more_slot() {
        // 2 slots of 4 bytes; a 5-slot buffer (20 bytes) exceeds the limit
        // but a 3-slot buffer (12 bytes) fits.
        let config = ArrayConfig::new(2, 4).with_memory_limit(12);
        let mut arr = ByteArray::with_config(config).unwrap();
        arr.push(&1i32.to_ne_bytes()).unwrap();
        arr.push(&2i32.to_ne_bytes()).unwrap();
        arr.push(&3i32.to_ne_bytes()).unwrap();
        assert_eq!(arr.capacity(), 3);
        assert_eq!(read(&arr), vec![1, 2, 3]);
    }

    #[test]
    fn failed_growth_leaves_array_unchanged() {
        let config = ArrayConfig::new(2, 4).with_memory_limit(8);
        let mut arr = ByteArray::with_config(config).unwrap();
        arr.push(&1i32.to_ne_bytes()).unwrap();
        arr.push(&2i32.to_ne_bytes()).unwrap();

        let err = arr.insert(0, &0i32.to_ne_bytes()).unwrap_err();
        assert_eq!(
            err,
            ArrayError::AllocationFailed {
                requested_capacity: 3,
                element_width: 4
            }
        );
        assert_eq!(arr.last_error(), ErrorCode::ReallocationFailure);
        assert_eq!(read(&arr), vec![1, 2]);
        assert_eq!(arr.capacity(), 2);
    }

    #[test]
    fn pop_shrinks_below_half() {
        let mut arr = ints(&[1, 2, 3]);
        assert_eq!(arr.capacity(), 5);
        arr.pop(2).unwrap();
        assert_eq!(arr.capacity(), 5);
        arr.pop(1).unwrap();
        // len 1 < 5 / 2
        assert_eq!(arr.capacity(), 2);
        assert_eq!(read(&arr), vec![1]);
    }

    #[test]
    fn pop_keeps_removal_when_shrink_is_refused() {
        let config = ArrayConfig::new(8, 4).with_resize_budget(0);
        let mut arr = ByteArray::with_config(config).unwrap();
        for v in [1i32, 2, 3, 4] {
            arr.push(&v.to_ne_bytes()).unwrap();
        }

        let err = arr.pop(0).unwrap_err();
        assert_eq!(
            err,
            ArrayError::ShrinkFailed {
                requested_capacity: 4,
                len: 3
            }
        );
        assert_eq!(arr.last_error(), ErrorCode::ReallocationFailure);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.capacity(), 8);
        assert_eq!(read(&arr), vec![2, 3, 4]);
    }

    #[test]
    fn spent_resize_budget_refuses_growth() {
        let config = ArrayConfig::new(1, 4).with_resize_budget(1);
        let mut arr = ByteArray::with_config(config).unwrap();
        arr.push(&1i32.to_ne_bytes()).unwrap();
        arr.push(&2i32.to_ne_bytes()).unwrap();
        assert_eq!(arr.capacity(), 3);
        arr.push(&3i32.to_ne_bytes()).unwrap();

        let err = arr.push(&4i32.to_ne_bytes()).unwrap_err();
        assert_eq!(
            err,
            ArrayError::AllocationFailed {
                requested_capacity: 4,
                element_width: 4
            }
        );
        assert_eq!(read(&arr), vec![1, 2, 3]);
        assert_eq!(arr.capacity(), 3);
    }

    #[test]
    fn pop_last_element_keeps_one_slot() {
        let mut arr = ints(&[7]);
        arr.pop(0).unwrap();
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), 1);
    }

    #[test]
    fn pop_out_of_range_is_rejected() {
        let mut arr = ints(&[1, 2]);
        assert_eq!(
            arr.pop(2).unwrap_err(),
            ArrayError::IndexOutOfBounds { index: 2, len: 2 }
        );
        assert_eq!(arr.last_error(), ErrorCode::InvalidParameters);
        assert_eq!(read(&arr), vec![1, 2]);
    }

    #[test]
    fn insert_past_end_is_rejected() {
        let mut arr = ints(&[1]);
        assert!(matches!(
            arr.insert(2, &5i32.to_ne_bytes()),
            Err(ArrayError::InsertPositionOutOfBounds { index: 2, len: 1 })
        ));
        assert_eq!(read(&arr), vec![1]);
    }

    #[test]
    fn width_mismatch_is_rejected_everywhere() {
        let mut arr = ints(&[1, 2]);
        let short = [0u8; 2];
        assert!(arr.set(0, &short).is_err());
        assert_eq!(arr.last_error(), ErrorCode::InvalidParameters);
        assert!(arr.insert(0, &short).is_err());
        assert_eq!(arr.linear_search(&short), SearchOutcome::Invalid);
        assert_eq!(arr.binary_search_by(&short, cmp_i32), SearchOutcome::Invalid);
        assert_eq!(arr.last_error(), ErrorCode::InvalidParameters);
        assert_eq!(read(&arr), vec![1, 2]);
    }

    #[test]
    fn get_set_round_trip() {
        let mut arr = ints(&[1, 2, 3]);
        arr.set(1, &42i32.to_ne_bytes()).unwrap();
        assert_eq!(arr.get(1).unwrap(), &42i32.to_ne_bytes());
        arr.get_mut(2).unwrap().copy_from_slice(&9i32.to_ne_bytes());
        assert_eq!(read(&arr), vec![1, 42, 9]);
    }

    #[test]
    fn get_past_len_fails_even_within_capacity() {
        let arr = ints(&[1, 2, 3]);
        assert!(arr.capacity() > 3);
        assert!(arr.get(3).is_err());
        assert_eq!(arr.last_error(), ErrorCode::InvalidParameters);
    }

    #[test]
    fn accessor_resets_last_error() {
        let arr = ints(&[1]);
        let _ = arr.get(5);
        assert_eq!(arr.last_error(), ErrorCode::InvalidParameters);
        let _ = arr.len();
        assert_eq!(arr.last_error(), ErrorCode::NoError);
    }

    #[test]
    fn linear_search_returns_first_match() {
        let arr = ints(&[4, 7, 4, 9]);
        assert_eq!(arr.linear_search(&4i32.to_ne_bytes()), SearchOutcome::Found(0));
        assert_eq!(arr.linear_search(&9i32.to_ne_bytes()), SearchOutcome::Found(3));
        assert_eq!(arr.linear_search(&5i32.to_ne_bytes()), SearchOutcome::NotFound);
        assert_eq!(arr.last_error(), ErrorCode::NoError);
    }

    #[test]
    fn sort_then_binary_search() {
        let mut arr = ints(&[5, -3, 12, 0, 7]);
        arr.sort_by(cmp_i32);
        assert_eq!(read(&arr), vec![-3, 0, 5, 7, 12]);
        for (i, v) in [-3i32, 0, 5, 7, 12].iter().enumerate() {
            assert_eq!(
                arr.binary_search_by(&v.to_ne_bytes(), cmp_i32),
                SearchOutcome::Found(i)
            );
        }
        assert_eq!(
            arr.binary_search_by(&6i32.to_ne_bytes(), cmp_i32),
            SearchOutcome::NotFound
        );
    }

    #[test]
    fn binary_search_on_empty_is_not_found() {
        let arr = ByteArray::new(1, 4).unwrap();
        assert_eq!(
            arr.binary_search_by(&1i32.to_ne_bytes(), cmp_i32),
            SearchOutcome::NotFound
        );
    }

    #[test]
    fn panicking_comparator_leaves_order_intact() {
        let mut arr = ints(&[3, 1, 2]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            arr.sort_by(|_, _| panic!("comparator failure"));
        }));
        assert!(result.is_err());
        assert_eq!(read(&arr), vec![3, 1, 2]);
    }

    #[test]
    fn record_failure_sets_code() {
        let arr = ints(&[]);
        let err = arr.record_failure(ArrayError::MissingComparator);
        assert_eq!(err, ArrayError::MissingComparator);
        assert_eq!(arr.last_error(), ErrorCode::InvalidParameters);
    }
}
