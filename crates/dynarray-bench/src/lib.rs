//! Benchmark workloads for the dynarray container.
//!
//! - [`scrambled_i32`]: deterministic pseudo-random `i32` values via seed
//! - [`filled_array`]: a [`ByteArray`] preloaded with those values
//! - [`ascending`]: the comparator the sort and binary-search benches use

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cmp::Ordering;

use dynarray::ByteArray;

/// Deterministic pseudo-random values, reproducible per `seed`.
pub fn scrambled_i32(n: usize, seed: u64) -> Vec<i32> {
    (0..n as u64)
        .map(|i| {
            let x = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407));
            (x >> 33) as i32
        })
        .collect()
}

/// A 4-byte-element array holding `scrambled_i32(n, seed)` in order.
pub fn filled_array(n: usize, seed: u64) -> ByteArray {
    let mut arr = match ByteArray::new(n.max(1), 4) {
        Ok(arr) => arr,
        Err(e) => panic!("benchmark array of {n} elements: {e}"),
    };
    for v in scrambled_i32(n, seed) {
        if let Err(e) = arr.push(&v.to_ne_bytes()) {
            panic!("benchmark push: {e}");
        }
    }
    arr
}

/// Ascending order over native-endian `i32` slots.
pub fn ascending(a: &[u8], b: &[u8]) -> Ordering {
    decode(a).cmp(&decode(b))
}

fn decode(bytes: &[u8]) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes);
    i32::from_ne_bytes(raw)
}
