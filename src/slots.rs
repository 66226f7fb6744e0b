//! Boxed-slot writes and the rollback that keeps slots observable.

use std::borrow::Borrow;

use crate::{bridge::strings::TextBytes, error::MarshalError, runtime::HostRuntime};

/// Store `object` in slot `index`, releasing whatever the slot held before.
pub(crate) fn store<R>(
    rt: &R,
    array: &mut R::Array,
    index: usize,
    object: R::Object,
) -> Result<(), MarshalError>
where
    R: HostRuntime + ?Sized,
{
    let slot = match rt.slot_mut(array, index) {
        Ok(slot) => slot,
        Err(err) => {
            rt.release(object);
            return Err(err);
        }
    };
    if let Some(previous) = slot.replace(object) {
        rt.release(previous);
    }
    Ok(())
}

/// Force slots `[start, len)` to the empty sentinel.
///
/// Slots before `start` hold committed objects and are left alone.
pub(crate) fn rollback_from<R>(rt: &R, array: &mut R::Array, start: usize)
where
    R: HostRuntime + ?Sized,
{
    let len = rt.array_len(array);
    if start < len {
        tracing::warn!(start, len, "rolling back unwritten object slots");
    }
    for index in start..len {
        let Ok(slot) = rt.slot_mut(array, index) else {
            continue;
        };
        if let Some(previous) = slot.take() {
            rt.release(previous);
        }
        *slot = Some(rt.empty());
    }
}

/// Construct one text object per value and store it in order.
///
/// On failure at index `k`, slots `[0, k)` keep their objects and `[k, len)`
/// are forced to the empty sentinel before the error is returned.
pub(crate) fn fill_boxed<T, R, I, B>(rt: &R, array: &mut R::Array, values: I) -> Result<(), MarshalError>
where
    T: TextBytes + ?Sized,
    R: HostRuntime + ?Sized,
    I: Iterator<Item = B>,
    B: Borrow<T>,
{
    let mut values = values;
    let expected = rt.array_len(array);
    let mut written = 0;
    while written < expected {
        let Some(value) = values.next() else {
            rollback_from(rt, array, written);
            return Err(MarshalError::LengthMismatch {
                expected,
                got: written,
            });
        };
        let stored = rt
            .make_text(value.borrow().text_bytes())
            .map_err(|e| e.at_index(written))
            .and_then(|object| store(rt, array, written, object));
        if let Err(err) = stored {
            rollback_from(rt, array, written);
            return Err(err);
        }
        written += 1;
    }
    let extra = values.count();
    if extra > 0 {
        rollback_from(rt, array, written);
        return Err(MarshalError::LengthMismatch {
            expected,
            got: expected + extra,
        });
    }
    Ok(())
}
