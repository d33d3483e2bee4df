//! Statically typed view over a [`ByteArray`].

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::array::ByteArray;
use crate::config::ArrayConfig;
use crate::element::Element;
use crate::error::{ArrayError, ErrorCode};
use crate::search::SearchOutcome;

/// A [`ByteArray`] whose element width is fixed by `T`.
///
/// Width mismatches cannot occur through this API; every other rule of
/// the byte array (growth, shrink, last error) applies unchanged.
#[derive(Debug)]
pub struct TypedArray<T: Element> {
    inner: ByteArray,
    _marker: PhantomData<T>,
}

impl<T: Element> TypedArray<T> {
    /// Create an empty array with room for `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_config(ArrayConfig::new(capacity, T::WIDTH))
    }

    /// Create from a config; its `element_width` is overridden by `T::WIDTH`.
    pub fn with_config(config: ArrayConfig) -> Result<Self, ArrayError> {
        let config = ArrayConfig {
            element_width: T::WIDTH,
            ..config
        };
        Ok(Self {
            inner: ByteArray::with_config(config)?,
            _marker: PhantomData,
        })
    }

    /// Build an array holding `values` in order.
    pub fn from_slice(values: &[T]) -> Result<Self, ArrayError> {
        let mut arr = Self::new(values.len().max(1))?;
        for value in values {
            arr.push(*value)?;
        }
        Ok(arr)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of allocated element slots.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Outcome of the most recent operation.
    pub fn last_error(&self) -> ErrorCode {
        self.inner.last_error()
    }

    /// Decoded element at `pos`.
    pub fn get(&self, pos: usize) -> Result<T, ArrayError> {
        self.inner.get(pos).map(T::read_bytes)
    }

    /// Overwrite the element at `pos`.
    pub fn set(&mut self, pos: usize, value: T) -> Result<(), ArrayError> {
        self.inner.set(pos, &encode(value))
    }

    /// Insert `value` at `pos` (`pos == len` appends).
    pub fn insert(&mut self, pos: usize, value: T) -> Result<(), ArrayError> {
        self.inner.insert(pos, &encode(value))
    }

    /// Append `value`.
    pub fn push(&mut self, value: T) -> Result<(), ArrayError> {
        self.inner.push(&encode(value))
    }

    /// Remove the element at `pos`, returning it.
    ///
    /// If the follow-up shrink fails the element is still removed and
    /// returned; the failure shows up only as
    /// [`ErrorCode::ReallocationFailure`] in [`last_error`](Self::last_error).
    pub fn pop(&mut self, pos: usize) -> Result<T, ArrayError> {
        let value = self.get(pos)?;
        match self.inner.pop(pos) {
            Ok(()) | Err(ArrayError::ShrinkFailed { .. }) => Ok(value),
            Err(e) => Err(e),
        }
    }

    /// Index of the first element whose encoding equals `key`'s.
    pub fn linear_search(&self, key: T) -> SearchOutcome {
        self.inner.linear_search(&encode(key))
    }

    /// Binary search in an array sorted ascending by `compare`.
    pub fn binary_search_by<F>(&self, key: T, mut compare: F) -> SearchOutcome
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.inner.binary_search_by(&encode(key), |a, b| {
            compare(&T::read_bytes(a), &T::read_bytes(b))
        })
    }

    /// Sort ascending by `compare`. Not stable.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.inner
            .sort_by(|a, b| compare(&T::read_bytes(a), &T::read_bytes(b)));
    }

    /// Decode every live element into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.inner
            .as_bytes()
            .chunks_exact(T::WIDTH)
            .map(T::read_bytes)
            .collect()
    }

    /// The underlying byte array.
    pub fn as_byte_array(&self) -> &ByteArray {
        &self.inner
    }

    /// Unwrap into the underlying byte array.
    pub fn into_inner(self) -> ByteArray {
        self.inner
    }
}

impl<T: Element + Ord> TypedArray<T> {
    /// Sort ascending by `T`'s natural order.
    pub fn sort(&mut self) {
        self.sort_by(T::cmp);
    }

    /// Binary search by `T`'s natural order.
    pub fn binary_search(&self, key: T) -> SearchOutcome {
        self.binary_search_by(key, T::cmp)
    }
}

fn encode<T: Element>(value: T) -> Vec<u8> {
    let mut buf = vec![0u8; T::WIDTH];
    value.write_bytes(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_type() {
        let arr = TypedArray::<u64>::new(4).unwrap();
        assert_eq!(arr.as_byte_array().element_width(), 8);
    }

    #[test]
    fn config_width_is_overridden() {
        let arr = TypedArray::<u16>::with_config(ArrayConfig::new(3, 99)).unwrap();
        assert_eq!(arr.as_byte_array().element_width(), 2);
        assert_eq!(arr.capacity(), 3);
    }

    #[test]
    fn scenario_insert_then_pop() {
        let mut arr = TypedArray::<i32>::new(2).unwrap();
        arr.insert(0, 10).unwrap();
        arr.insert(1, 20).unwrap();
        arr.insert(1, 15).unwrap();
        assert_eq!(arr.to_vec(), vec![10, 15, 20]);
        assert_eq!(arr.pop(0).unwrap(), 10);
        assert_eq!(arr.to_vec(), vec![15, 20]);
    }

    #[test]
    fn pop_returns_value_when_shrink_is_refused() {
        let config = ArrayConfig::new(8, 0).with_resize_budget(0);
        let mut arr = TypedArray::<i32>::with_config(config).unwrap();
        for v in [1, 2, 3, 4] {
            arr.push(v).unwrap();
        }
        assert_eq!(arr.pop(1).unwrap(), 2);
        assert_eq!(arr.last_error(), ErrorCode::ReallocationFailure);
        assert_eq!(arr.to_vec(), vec![1, 3, 4]);
        assert_eq!(arr.capacity(), 8);
    }

    #[test]
    fn sort_and_search_natural_order() {
        let mut arr = TypedArray::from_slice(&[9u32, 1, 5, 3]).unwrap();
        arr.sort();
        assert_eq!(arr.to_vec(), vec![1, 3, 5, 9]);
        assert_eq!(arr.binary_search(5), SearchOutcome::Found(2));
        assert_eq!(arr.binary_search(4), SearchOutcome::NotFound);
        assert_eq!(arr.linear_search(9), SearchOutcome::Found(3));
    }

    #[test]
    fn float_sort_by_total_cmp() {
        let mut arr = TypedArray::from_slice(&[2.5f64, -1.0, 0.0]).unwrap();
        arr.sort_by(f64::total_cmp);
        assert_eq!(arr.to_vec(), vec![-1.0, 0.0, 2.5]);
    }

    #[test]
    fn get_out_of_range_reports_invalid() {
        let arr = TypedArray::from_slice(&[1i8]).unwrap();
        assert!(arr.get(1).is_err());
        assert_eq!(arr.last_error(), ErrorCode::InvalidParameters);
    }

    #[test]
    fn from_empty_slice() {
        let arr = TypedArray::<i64>::from_slice(&[]).unwrap();
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), 1);
    }
}
