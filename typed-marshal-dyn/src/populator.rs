//! Producers whose element type is known only at run time.

use typed_marshal::TextOutput;

use crate::{DynError, buffer::BulkBuffer, token::TypeToken};

/// A producer that declares its element type and size at run time and fills
/// an array allocated for it.
///
/// Scalar populators implement [`Populator::insert_into_buffer`]; text
/// populators implement [`Populator::insert_and_forget`]. The registry calls
/// exactly one of them, chosen by [`Populator::type_token`].
pub trait Populator {
    /// Number of elements the populator writes.
    fn len(&self) -> usize;

    /// Whether the populator writes no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Token of the native element type the populator writes.
    fn type_token(&self) -> TypeToken;

    /// Write every element directly into `buffer` (`len()` elements).
    fn insert_into_buffer(&self, _buffer: BulkBuffer<'_>) -> Result<(), DynError> {
        Err(DynError::populate(format!(
            "populator for {} does not write bulk buffers",
            self.type_token().type_name()
        )))
    }

    /// Push every element through `out`, advancing exactly `len()` times.
    fn insert_and_forget(&self, _out: &mut dyn TextOutput) -> Result<(), DynError> {
        Err(DynError::populate(format!(
            "populator for {} does not write text",
            self.type_token().type_name()
        )))
    }
}

impl<P: Populator + ?Sized> Populator for &P {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn type_token(&self) -> TypeToken {
        (**self).type_token()
    }

    fn insert_into_buffer(&self, buffer: BulkBuffer<'_>) -> Result<(), DynError> {
        (**self).insert_into_buffer(buffer)
    }

    fn insert_and_forget(&self, out: &mut dyn TextOutput) -> Result<(), DynError> {
        (**self).insert_and_forget(out)
    }
}
