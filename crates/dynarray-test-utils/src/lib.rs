//! Test utilities for dynarray development.
//!
//! Byte-level helpers for 4-byte integer fixtures, the comparators the
//! search and sort tests share, and a couple of prebuilt arrays.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cmp::Ordering;

use dynarray::ByteArray;

/// Width of the `i32` fixtures in bytes.
pub const I32_WIDTH: usize = 4;

/// Native-endian encoding of `v`.
pub fn i32_bytes(v: i32) -> [u8; 4] {
    v.to_ne_bytes()
}

/// Decode a 4-byte slot.
///
/// # Panics
///
/// Panics if `bytes` is not exactly four bytes long.
pub fn i32_from(bytes: &[u8]) -> i32 {
    let raw: [u8; 4] = bytes.try_into().expect("i32 slot must be 4 bytes");
    i32::from_ne_bytes(raw)
}

/// Ascending comparator over encoded `i32` slots.
pub fn ascending_i32(a: &[u8], b: &[u8]) -> Ordering {
    i32_from(a).cmp(&i32_from(b))
}

/// Descending comparator over encoded `i32` slots.
pub fn descending_i32(a: &[u8], b: &[u8]) -> Ordering {
    ascending_i32(b, a)
}

/// Build an `i32` array holding `values` in order, starting from `capacity` slots.
pub fn i32_array_with_capacity(capacity: usize, values: &[i32]) -> ByteArray {
    let mut arr = ByteArray::new(capacity, I32_WIDTH).expect("fixture capacity must be non-zero");
    for &v in values {
        arr.push(&i32_bytes(v)).expect("fixture push");
    }
    arr
}

/// Build an `i32` array holding `values` in order.
pub fn i32_array(values: &[i32]) -> ByteArray {
    i32_array_with_capacity(values.len().max(1), values)
}

/// Decode every live element of an `i32` array.
pub fn i32_contents(arr: &ByteArray) -> Vec<i32> {
    arr.as_bytes().chunks_exact(I32_WIDTH).map(i32_from).collect()
}
