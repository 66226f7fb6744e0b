//! Error types for populator dispatch.

use thiserror::Error;
use typed_marshal::{ElementType, MarshalError};

/// Errors that can occur when building an array from a populator.
#[derive(Debug, Error)]
pub enum DynError {
    /// No builder is registered for the populator's type token.
    #[error("cannot process type {type_name}")]
    UnsupportedType {
        /// Name of the unsupported native type.
        type_name: &'static str,
    },

    /// The populator was handed a buffer of a different element type than it
    /// writes.
    #[error("populator buffer mismatch: expected {expected}, got {actual}")]
    BufferMismatch {
        /// Element type the populator writes.
        expected: ElementType,
        /// Element type of the buffer it was given.
        actual: ElementType,
    },

    /// The populator failed while filling the array.
    #[error("populator failed: {0}")]
    Populate(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Allocation, construction or layout failure from the builders.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
}

impl DynError {
    /// Wrap a populator-side error.
    pub fn populate(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        DynError::Populate(err.into())
    }
}
