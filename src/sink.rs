//! Push-style writer for boxed text arrays.

use crate::{bridge::ElementType, error::MarshalError, runtime::HostRuntime, slots};

/// Forward-only text output a producer pushes values into.
///
/// The producer stages a value in [`TextOutput::pending_mut`] and commits it
/// with [`TextOutput::advance`]; the host object is built at the moment of
/// advance. Object safe, so producers can take `&mut dyn TextOutput`.
pub trait TextOutput {
    /// The staged value committed by the next [`TextOutput::advance`].
    fn pending_mut(&mut self) -> &mut String;

    /// Commit the staged value to the current slot and move to the next.
    fn advance(&mut self) -> Result<(), MarshalError>;

    /// Number of slots committed so far.
    fn position(&self) -> usize;

    /// Total number of slots in the target array.
    fn len(&self) -> usize;

    /// Whether the target array has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stage `value` and commit it.
    fn push(&mut self, value: &str) -> Result<(), MarshalError> {
        let pending = self.pending_mut();
        pending.clear();
        pending.push_str(value);
        self.advance()
    }
}

/// [`TextOutput`] over a pre-allocated boxed array.
pub struct TextSink<'a, R: HostRuntime + ?Sized> {
    rt: &'a R,
    array: &'a mut R::Array,
    index: usize,
    len: usize,
    pending: String,
}

impl<'a, R: HostRuntime + ?Sized> TextSink<'a, R> {
    /// Create a cursor at slot 0 of `array`.
    ///
    /// # Errors
    /// `LayoutMismatch` when `array` is not an object array.
    pub fn new(rt: &'a R, array: &'a mut R::Array) -> Result<Self, MarshalError> {
        let actual = rt.element_type(array);
        if actual != ElementType::Object {
            return Err(MarshalError::layout_mismatch(ElementType::Object, actual));
        }
        let len = rt.array_len(array);
        Ok(Self {
            rt,
            array,
            index: 0,
            len,
            pending: String::new(),
        })
    }

    /// Slots not yet written.
    pub fn remaining(&self) -> usize {
        self.len - self.index
    }

    /// Force every unwritten slot to the empty sentinel.
    ///
    /// Committed slots keep their objects.
    pub fn rollback(self) {
        slots::rollback_from(self.rt, self.array, self.index);
    }

    /// Check that every slot was written.
    ///
    /// # Errors
    /// `LengthMismatch` after rolling back the unwritten slots.
    pub fn finish(self) -> Result<(), MarshalError> {
        if self.index == self.len {
            return Ok(());
        }
        let err = MarshalError::LengthMismatch {
            expected: self.len,
            got: self.index,
        };
        self.rollback();
        Err(err)
    }
}

impl<R: HostRuntime + ?Sized> TextOutput for TextSink<'_, R> {
    fn pending_mut(&mut self) -> &mut String {
        &mut self.pending
    }

    fn advance(&mut self) -> Result<(), MarshalError> {
        if self.index >= self.len {
            return Err(MarshalError::CursorOverflow { len: self.len });
        }
        let object = self
            .rt
            .make_text(self.pending.as_bytes())
            .map_err(|e| e.at_index(self.index))?;
        slots::store(self.rt, self.array, self.index, object)?;
        self.index += 1;
        Ok(())
    }

    fn position(&self) -> usize {
        self.index
    }

    fn len(&self) -> usize {
        self.len
    }
}
