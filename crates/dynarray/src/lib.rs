//! Type-erased resizable arrays with width-checked byte access.
//!
//! A [`ByteArray`] stores elements of a fixed byte width chosen at
//! construction. Callers interpret the bytes as their own type; the
//! container only guarantees that every write has exactly the declared
//! width and lands inside the live range.
//!
//! # Architecture
//!
//! ```text
//! TypedArray<T: Element>   (optional codec layer, width = T::WIDTH)
//! └── ByteArray            (len, last error, growth/shrink policy)
//!     └── Storage          (Vec<u8>, capacity * width bytes, fallible resize)
//! ```
//!
//! # Error reporting
//!
//! Operations return `Result<_, ArrayError>` (searches return a
//! [`SearchOutcome`]) and also record an [`ErrorCode`] as the array's last
//! error. Every call overwrites it, read-only accessors included.
//!
//! # Capacity policy
//!
//! - **Grow:** a full array grows to `2c + 1` slots, or `c + 1` if that fails.
//! - **Shrink:** after a removal leaves `len < c / 2`, capacity halves.
//!
//! Reallocations are reported through the [`log`] facade at `debug` level,
//! failed ones at `warn`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod config;
pub mod element;
pub mod error;
pub mod policy;
pub mod search;
mod storage;
pub mod typed;

// Public re-exports for the primary API surface.
pub use array::ByteArray;
pub use config::ArrayConfig;
pub use element::Element;
pub use error::{ArrayError, ErrorCode};
pub use search::SearchOutcome;
pub use typed::TypedArray;
