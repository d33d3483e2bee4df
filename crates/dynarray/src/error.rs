//! Error taxonomy for array operations.
//!
//! [`ErrorCode`] is the coarse, ABI-stable outcome recorded as the
//! container's last error. [`ArrayError`] is the detailed error carried by
//! `Result` returns; [`ArrayError::code`] collapses it to an [`ErrorCode`].

use std::error::Error;
use std::fmt;

/// Outcome of the most recent operation on a container.
///
/// Values are ABI-stable and shared with the C bindings.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The operation completed successfully.
    #[default]
    NoError = 0,
    /// No container was supplied (null or destroyed handle).
    NoInstance = 1,
    /// An index, payload, or byte width was rejected.
    InvalidParameters = 2,
    /// The storage buffer could not be resized.
    ReallocationFailure = 3,
}

impl ErrorCode {
    /// All codes, in discriminant order.
    pub const ALL: [ErrorCode; 4] = [
        ErrorCode::NoError,
        ErrorCode::NoInstance,
        ErrorCode::InvalidParameters,
        ErrorCode::ReallocationFailure,
    ];

    /// Human-readable explanation of the code.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::NoError => "no error: the last operation completed successfully",
            Self::NoInstance => "no instance: the array is null or has been destroyed",
            Self::InvalidParameters => {
                "invalid parameters: index out of range, missing value, or element width mismatch"
            }
            Self::ReallocationFailure => {
                "reallocation failure: the storage buffer could not be resized"
            }
        }
    }

    /// Convert a raw discriminant back into a code.
    ///
    /// Returns `None` for values outside the defined range.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::NoError),
            1 => Some(Self::NoInstance),
            2 => Some(Self::InvalidParameters),
            3 => Some(Self::ReallocationFailure),
            _ => None,
        }
    }

    /// Whether this code reports success.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::NoError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Detailed errors returned by array operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// Construction requested zero slots.
    ZeroCapacity,
    /// Construction requested a zero-byte element width.
    ZeroElementWidth,
    /// A read, write, or removal addressed a slot at or past the length.
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// Length at the time of the call.
        len: usize,
    },
    /// An insertion position was past the end (`index > len`).
    InsertPositionOutOfBounds {
        /// The rejected position.
        index: usize,
        /// Length at the time of the call.
        len: usize,
    },
    /// A value or key did not match the element width.
    WidthMismatch {
        /// The container's element width in bytes.
        expected: usize,
        /// The width that was supplied.
        actual: usize,
    },
    /// A value or key was absent (a null pointer at the C boundary).
    MissingValue,
    /// An ordering operation was invoked without a comparator.
    MissingComparator,
    /// Storage for the requested number of slots could not be obtained.
    AllocationFailed {
        /// Capacity (in elements) of the last attempted allocation.
        requested_capacity: usize,
        /// Element width in bytes.
        element_width: usize,
    },
    /// A removal completed but the follow-up shrink could not reallocate.
    ///
    /// The element is gone and `len` is already decremented; the container
    /// is merely left over-allocated.
    ShrinkFailed {
        /// Capacity (in elements) the shrink tried to reach.
        requested_capacity: usize,
        /// Length after the removal.
        len: usize,
    },
}

impl ArrayError {
    /// The coarse code recorded as the container's last error.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ZeroCapacity
            | Self::ZeroElementWidth
            | Self::IndexOutOfBounds { .. }
            | Self::InsertPositionOutOfBounds { .. }
            | Self::WidthMismatch { .. }
            | Self::MissingValue
            | Self::MissingComparator => ErrorCode::InvalidParameters,
            Self::AllocationFailed { .. } | Self::ShrinkFailed { .. } => {
                ErrorCode::ReallocationFailure
            }
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "capacity must be at least one element"),
            Self::ZeroElementWidth => write!(f, "element width must be at least one byte"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::InsertPositionOutOfBounds { index, len } => {
                write!(f, "insert position {index} past end of length {len}")
            }
            Self::WidthMismatch { expected, actual } => {
                write!(f, "width mismatch: expected {expected} bytes, got {actual}")
            }
            Self::MissingValue => write!(f, "no value supplied"),
            Self::MissingComparator => write!(f, "no comparator supplied"),
            Self::AllocationFailed {
                requested_capacity,
                element_width,
            } => write!(
                f,
                "allocation failed: {requested_capacity} elements of {element_width} bytes"
            ),
            Self::ShrinkFailed {
                requested_capacity,
                len,
            } => write!(
                f,
                "element removed (length now {len}) but shrink to {requested_capacity} elements failed"
            ),
        }
    }
}

impl Error for ArrayError {}
