//! Error types for typed-marshal.

use thiserror::Error;

use crate::bridge::ElementType;

/// Errors raised while building an output array.
///
/// Every variant is reported only after the builder has cleaned up: a caller
/// receiving an error never holds a reference to a partially built array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    /// The host runtime could not allocate the output array.
    #[error("failed to allocate array of {len} {element_type} elements")]
    Allocation {
        /// Requested array length.
        len: usize,
        /// Requested element type.
        element_type: ElementType,
    },

    /// Constructing the boxed object for one element failed.
    #[error("failed to construct object at index {index}: {message}")]
    Construction {
        /// Index of the element whose object could not be built.
        index: usize,
        /// Message reported by the host runtime.
        message: String,
    },

    /// The host runtime reported a failure without element context.
    #[error("host runtime error: {message}")]
    Host {
        /// Message reported by the host runtime.
        message: String,
    },

    /// The array was accessed through the wrong layout or element type.
    #[error("array layout mismatch: expected {expected}, got {actual}")]
    LayoutMismatch {
        /// Element type the accessor required.
        expected: ElementType,
        /// Element type the array was allocated with.
        actual: ElementType,
    },

    /// Slot access past the end of the array.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// The invalid index.
        index: usize,
        /// The array length.
        len: usize,
    },

    /// The source produced a different number of elements than it declared.
    #[error("source declared {expected} elements but produced {got}")]
    LengthMismatch {
        /// Declared length (the allocated array length).
        expected: usize,
        /// Number of elements actually produced.
        got: usize,
    },

    /// A write cursor was advanced past the end of its array.
    #[error("write cursor advanced past array length {len}")]
    CursorOverflow {
        /// The array length.
        len: usize,
    },
}

impl MarshalError {
    /// Create a host runtime error.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    /// Create a layout mismatch error.
    pub fn layout_mismatch(expected: ElementType, actual: ElementType) -> Self {
        Self::LayoutMismatch { expected, actual }
    }

    /// Add element context to a host error.
    #[must_use]
    pub fn at_index(self, index: usize) -> MarshalError {
        match self {
            MarshalError::Host { message } => MarshalError::Construction { index, message },
            other => other,
        }
    }
}
