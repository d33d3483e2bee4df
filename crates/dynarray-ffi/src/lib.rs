//! C ABI for the dynarray container.
//!
//! Arrays are created with `da_create` and addressed by opaque `u64`
//! handles. A zero, destroyed, or otherwise unknown handle is treated as
//! "no instance": accessors return 0 or null, searches return `-2`, and
//! `da_get_error` reports `NoInstance`.
//!
//! Every entry point runs inside a panic guard. A caught panic returns the
//! entry point's neutral value and its message is kept per thread for
//! `da_last_panic_message`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::os::raw::c_char;

thread_local! {
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Run `$body`, converting a panic into `$fallback`.
macro_rules! ffi_guard {
    ($fallback:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $fallback
            }
        }
    };
}

pub mod array;
mod handle;

pub use handle::NULL_HANDLE;

pub(crate) fn record_panic(payload: &(dyn Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    log::error!("panic caught at C boundary: {msg}");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Copy the calling thread's last caught panic message into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator),
/// or 0 if no panic has been caught. When `buf` is non-null and `cap > 0`,
/// writes at most `cap - 1` bytes followed by a NUL. Pass a null `buf` to
/// query the length first.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: buf points to at least `cap` writable bytes per caller contract.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        i32::try_from(bytes.len()).unwrap_or(i32::MAX)
    })
}
