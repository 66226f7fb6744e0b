//! One-dimensional array builders over containers and ranges.
//!
//! Both entry points allocate the output array once, at the exact declared
//! length, and hand it to the element type's [`HostBinding::fill`] strategy.
//! A failed fill disposes of the array before the error is returned, so the
//! caller receives either a complete array or nothing.

use std::borrow::Borrow;

use crate::{bridge::HostBinding, error::MarshalError, runtime::HostRuntime};

/// Build an array holding a copy of every element of `values`, in order.
///
/// ```
/// use typed_marshal::{build_array, Heap};
/// let heap = Heap::new();
/// let array = build_array(&heap, &[1i32, 2, 3]).unwrap();
/// assert_eq!(array.values::<i32>(), Some(&[1, 2, 3][..]));
/// ```
pub fn build_array<R, T>(rt: &R, values: &[T]) -> Result<R::Array, MarshalError>
where
    R: HostRuntime + ?Sized,
    T: HostBinding,
{
    build_with::<R, T, _, _>(rt, values.len(), values.iter())
}

/// Build an array from a range whose length is known before iteration.
///
/// The iterator's reported length is the declared size; a range that yields
/// a different number of items fails with `LengthMismatch`.
pub fn build_array_from_range<R, T, I>(rt: &R, range: I) -> Result<R::Array, MarshalError>
where
    R: HostRuntime + ?Sized,
    T: HostBinding,
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
{
    let iter = range.into_iter();
    build_with::<R, T, _, _>(rt, iter.len(), iter)
}

fn build_with<R, T, I, B>(rt: &R, len: usize, values: I) -> Result<R::Array, MarshalError>
where
    R: HostRuntime + ?Sized,
    T: HostBinding,
    I: Iterator<Item = B>,
    B: Borrow<T>,
{
    let element_type = T::element_type();
    let mut array = rt.allocate(len, element_type)?;
    tracing::debug!(len, %element_type, "allocated output array");
    match T::fill(rt, &mut array, values) {
        Ok(()) => Ok(array),
        Err(err) => {
            tracing::warn!(len, %element_type, error = %err, "disposing partially built array");
            rt.release_array(array);
            Err(err)
        }
    }
}
