//! The host-runtime boundary consumed by the builders.

use crate::{
    bridge::{ElementType, Scalar},
    error::MarshalError,
};

/// Object and array primitives of a reference-counted host runtime.
///
/// Handles are owned values: holding an `Object` means holding one counted
/// reference, and it is returned to the runtime with [`HostRuntime::release`].
/// A boxed slot holds `None` (null) or exactly one owned reference.
pub trait HostRuntime {
    /// Owned handle to a one-dimensional host array.
    type Array;

    /// Owned (counted) reference to a host object.
    type Object;

    /// Allocate an array of `len` elements of `element_type`.
    ///
    /// Bulk storage is zeroed; every boxed slot starts as `None`.
    fn allocate(&self, len: usize, element_type: ElementType) -> Result<Self::Array, MarshalError>;

    /// Declared length of `array`.
    fn array_len(&self, array: &Self::Array) -> usize;

    /// Element type `array` was allocated with.
    fn element_type(&self, array: &Self::Array) -> ElementType;

    /// Writable inline storage of a bulk array.
    ///
    /// # Errors
    /// `LayoutMismatch` when `T` is not the array's element type.
    fn bulk_mut<'a, T: Scalar>(&self, array: &'a mut Self::Array) -> Result<&'a mut [T], MarshalError>;

    /// Reference slot `index` of a boxed array.
    ///
    /// # Errors
    /// `LayoutMismatch` for bulk arrays, `IndexOutOfBounds` past the end.
    fn slot_mut<'a>(
        &self,
        array: &'a mut Self::Array,
        index: usize,
    ) -> Result<&'a mut Option<Self::Object>, MarshalError>;

    /// Construct a new text object from UTF-8 `bytes`.
    fn make_text(&self, bytes: &[u8]) -> Result<Self::Object, MarshalError>;

    /// New owned reference to the runtime's empty sentinel.
    fn empty(&self) -> Self::Object;

    /// New owned reference to the object `object` refers to.
    fn acquire(&self, object: &Self::Object) -> Self::Object;

    /// Give up one owned reference.
    fn release(&self, object: Self::Object);

    /// Dispose of `array`, releasing every reference its slots own.
    fn release_array(&self, array: Self::Array);
}
