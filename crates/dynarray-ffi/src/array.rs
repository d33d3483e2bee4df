//! Array lifecycle, access, mutation, search, and error FFI.
//!
//! All arrays live in one process-wide handle table behind a `Mutex`. The
//! lock is held for the duration of each call, including comparator
//! callbacks, so comparators must not call back into this library.
//!
//! A value or key pointer is read only after the handle resolves and the
//! supplied width matches the array's element width; a stale handle, null
//! pointer, or wrong width never touches caller memory. The bytes are then
//! copied into a local buffer before the array is mutated, so a pointer
//! previously returned by `da_get` stays usable as the source of a
//! `da_insert`/`da_set` on the same array, even when the insert
//! reallocates the storage it points into.

use std::cmp::Ordering;
use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_int;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use dynarray::{ArrayError, ByteArray, ErrorCode, SearchOutcome};
use smallvec::SmallVec;

use crate::handle::{HandleTable, NULL_HANDLE};

/// Three-way comparator: negative, zero, or positive as `a` orders before,
/// equal to, or after `b`. Both pointers address one element each.
pub type DaCompareFn = Option<unsafe extern "C" fn(a: *const c_void, b: *const c_void) -> c_int>;

static ARRAYS: Mutex<HandleTable<ByteArray>> = Mutex::new(HandleTable::new());

static DESCRIPTIONS: OnceLock<Vec<CString>> = OnceLock::new();

const UNKNOWN_CODE: &CStr = c"unknown error code";

/// Elements up to this many bytes are copied without a heap allocation.
type ValueBuf = SmallVec<[u8; 32]>;

/// Lock the array table.
///
/// Operations leave arrays consistent even if they unwind, so a poisoned
/// lock is recovered rather than bricking every live handle.
fn arrays() -> MutexGuard<'static, HandleTable<ByteArray>> {
    ARRAYS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Copy one element of `arr` from a caller pointer.
///
/// A null `ptr` or a `width` other than the element width is recorded on
/// `arr` and returned as an error without reading `ptr`.
#[allow(unsafe_code)]
fn read_value(arr: &ByteArray, ptr: *const c_void, width: usize) -> Result<ValueBuf, ArrayError> {
    if ptr.is_null() {
        return Err(arr.record_failure(ArrayError::MissingValue));
    }
    let expected = arr.element_width();
    if width != expected {
        return Err(arr.record_failure(ArrayError::WidthMismatch {
            expected,
            actual: width,
        }));
    }
    // SAFETY: a non-null `ptr` addresses at least `width` readable bytes
    // per caller contract, and `width` equals the element width.
    let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), expected) };
    Ok(SmallVec::from_slice(bytes))
}

/// Adapt a C comparator to a Rust `Ordering` comparator.
#[allow(unsafe_code)]
fn ordering_of(
    compare: unsafe extern "C" fn(*const c_void, *const c_void) -> c_int,
) -> impl FnMut(&[u8], &[u8]) -> Ordering {
    move |a: &[u8], b: &[u8]| {
        // SAFETY: both slices are whole elements of a live array; the C
        // comparator only reads `element_width` bytes from each.
        let raw = unsafe { compare(a.as_ptr().cast(), b.as_ptr().cast()) };
        raw.cmp(&0)
    }
}

// ── lifecycle ───────────────────────────────────────────────────

/// Create an empty array of `capacity` slots, each `element_width` bytes.
///
/// Returns the array handle, or 0 if either argument is zero or the
/// storage cannot be allocated.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_create(capacity: usize, element_width: usize) -> u64 {
    ffi_guard!(NULL_HANDLE, {
        match ByteArray::new(capacity, element_width) {
            Ok(arr) => arrays().insert(arr),
            Err(e) => {
                log::debug!("da_create({capacity}, {element_width}) refused: {e}");
                NULL_HANDLE
            }
        }
    })
}

/// Destroy an array and release its storage. Unknown handles are ignored.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_destroy(handle: u64) {
    ffi_guard!((), {
        // Drop outside the lock.
        let removed = arrays().remove(handle);
        drop(removed);
    })
}

/// Number of arrays currently alive. Intended for leak checks.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_live_arrays() -> usize {
    ffi_guard!(0, { arrays().len() })
}

// ── accessors ───────────────────────────────────────────────────

/// Number of elements, or 0 for no instance.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_len(handle: u64) -> usize {
    ffi_guard!(0, { arrays().get(handle).map_or(0, ByteArray::len) })
}

/// Number of allocated slots, or 0 for no instance.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_capacity(handle: u64) -> usize {
    ffi_guard!(0, { arrays().get(handle).map_or(0, ByteArray::capacity) })
}

/// Element width in bytes, or 0 for no instance.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_element_width(handle: u64) -> usize {
    ffi_guard!(0, {
        arrays().get(handle).map_or(0, ByteArray::element_width)
    })
}

/// Address of element `pos`, or null if `pos >= len` or no instance.
///
/// The pointer is invalidated by the next insert, pop, sort, or destroy on
/// this array. It is not aligned beyond one byte.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_get(handle: u64, pos: usize) -> *mut c_void {
    ffi_guard!(std::ptr::null_mut(), {
        let mut table = arrays();
        match table.get_mut(handle) {
            Some(arr) => arr
                .get_mut(pos)
                .map_or(std::ptr::null_mut(), |slot| slot.as_mut_ptr().cast()),
            None => std::ptr::null_mut(),
        }
    })
}

// ── mutation ────────────────────────────────────────────────────

/// Overwrite element `pos` with `value_width` bytes from `value`.
///
/// Rejected (error `InvalidParameters`, storage unchanged) if `pos >= len`,
/// `value` is null, or `value_width` differs from the element width.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_set(handle: u64, pos: usize, value: *const c_void, value_width: usize) {
    ffi_guard!((), {
        let mut table = arrays();
        let Some(Ok(bytes)) = table
            .get(handle)
            .map(|arr| read_value(arr, value, value_width))
        else {
            return;
        };
        if let Some(arr) = table.get_mut(handle) {
            let _ = arr.set(pos, &bytes);
        }
    })
}

/// Insert `value` at `pos`, shifting later elements up. `pos == len` appends.
///
/// Rejected with `InvalidParameters` on a bad position, null value, or
/// width mismatch; fails with `ReallocationFailure` if the array is full
/// and cannot grow. Either way the array is unchanged.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_insert(handle: u64, pos: usize, value: *const c_void, value_width: usize) {
    ffi_guard!((), {
        let mut table = arrays();
        let Some(Ok(bytes)) = table
            .get(handle)
            .map(|arr| read_value(arr, value, value_width))
        else {
            return;
        };
        if let Some(arr) = table.get_mut(handle) {
            let _ = arr.insert(pos, &bytes);
        }
    })
}

/// Remove element `pos`, shifting later elements down.
///
/// A `ReallocationFailure` after a valid `pos` means the element *was*
/// removed but the storage could not be shrunk.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_pop(handle: u64, pos: usize) {
    ffi_guard!((), {
        if let Some(arr) = arrays().get_mut(handle) {
            let _ = arr.pop(pos);
        }
    })
}

// ── search & ordering ───────────────────────────────────────────

/// Index of the first element byte-equal to `key`.
///
/// Returns -1 if absent, -2 for no instance, a null key, or a width
/// mismatch.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_search(handle: u64, key: *const c_void, key_width: usize) -> i64 {
    ffi_guard!(SearchOutcome::INVALID, {
        let table = arrays();
        let Some(arr) = table.get(handle) else {
            return SearchOutcome::INVALID;
        };
        match read_value(arr, key, key_width) {
            Ok(key) => arr.linear_search(&key).to_sentinel(),
            Err(_) => SearchOutcome::INVALID,
        }
    })
}

/// Binary search for `key` in an array sorted ascending by `compare`.
///
/// `compare` is called as `compare(element, key)`. Returns the index of
/// some equal element, -1 if none, or -2 for no instance, a null key, a
/// null comparator, or a width mismatch.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_binary_search(
    handle: u64,
    key: *const c_void,
    key_width: usize,
    compare: DaCompareFn,
) -> i64 {
    ffi_guard!(SearchOutcome::INVALID, {
        let table = arrays();
        let Some(arr) = table.get(handle) else {
            return SearchOutcome::INVALID;
        };
        let Ok(key) = read_value(arr, key, key_width) else {
            return SearchOutcome::INVALID;
        };
        let outcome = match compare {
            Some(cmp) => arr.binary_search_by(&key, ordering_of(cmp)),
            None => {
                arr.record_failure(ArrayError::MissingComparator);
                SearchOutcome::Invalid
            }
        };
        outcome.to_sentinel()
    })
}

/// Sort the array ascending by `compare`. Not stable.
///
/// A null comparator records `InvalidParameters` and leaves the order
/// unchanged.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_sort(handle: u64, compare: DaCompareFn) {
    ffi_guard!((), {
        if let Some(arr) = arrays().get_mut(handle) {
            match compare {
                Some(cmp) => arr.sort_by(ordering_of(cmp)),
                None => {
                    arr.record_failure(ArrayError::MissingComparator);
                }
            }
        }
    })
}

// ── errors ──────────────────────────────────────────────────────

/// Error code recorded by the last call on `handle`, as an `ErrorCode`
/// value. Returns `NoInstance` for unknown handles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_get_error(handle: u64) -> i32 {
    ffi_guard!(ErrorCode::NoInstance as i32, {
        arrays()
            .get(handle)
            .map_or(ErrorCode::NoInstance, ByteArray::last_error) as i32
    })
}

/// Static, NUL-terminated explanation of an `ErrorCode` value.
///
/// Never returns null; unknown codes get a generic message. The string
/// must not be freed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_describe_error(code: i32) -> *const std::os::raw::c_char {
    ffi_guard!(UNKNOWN_CODE.as_ptr(), {
        let descriptions = DESCRIPTIONS.get_or_init(|| {
            ErrorCode::ALL
                .iter()
                .map(|c| CString::new(c.describe()).unwrap_or_default())
                .collect()
        });
        ErrorCode::from_raw(code)
            .and_then(|c| descriptions.get(c as usize))
            .map_or(UNKNOWN_CODE.as_ptr(), |s| s.as_ptr())
    })
}
