//! Typed bulk storage handed to populators.

use typed_marshal::{ElementType, Scalar};

use crate::DynError;

/// Writable inline storage of a bulk array, tagged with its element type.
///
/// The populator matches on the variant (or calls [`BulkBuffer::downcast`])
/// and writes its values directly.
#[derive(Debug)]
pub enum BulkBuffer<'a> {
    /// Signed 8-bit storage.
    I8(&'a mut [i8]),
    /// Signed 16-bit storage.
    I16(&'a mut [i16]),
    /// Signed 32-bit storage.
    I32(&'a mut [i32]),
    /// Signed 64-bit storage.
    I64(&'a mut [i64]),
    /// Unsigned 8-bit storage.
    U8(&'a mut [u8]),
    /// Unsigned 16-bit storage.
    U16(&'a mut [u16]),
    /// Unsigned 32-bit storage.
    U32(&'a mut [u32]),
    /// Unsigned 64-bit storage.
    U64(&'a mut [u64]),
    /// 32-bit float storage.
    F32(&'a mut [f32]),
    /// 64-bit float storage.
    F64(&'a mut [f64]),
}

impl<'a> BulkBuffer<'a> {
    /// Element type of the underlying array.
    pub fn element_type(&self) -> ElementType {
        match self {
            BulkBuffer::I8(_) => ElementType::Int8,
            BulkBuffer::I16(_) => ElementType::Int16,
            BulkBuffer::I32(_) => ElementType::Int32,
            BulkBuffer::I64(_) => ElementType::Int64,
            BulkBuffer::U8(_) => ElementType::UInt8,
            BulkBuffer::U16(_) => ElementType::UInt16,
            BulkBuffer::U32(_) => ElementType::UInt32,
            BulkBuffer::U64(_) => ElementType::UInt64,
            BulkBuffer::F32(_) => ElementType::Float32,
            BulkBuffer::F64(_) => ElementType::Float64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            BulkBuffer::I8(b) => b.len(),
            BulkBuffer::I16(b) => b.len(),
            BulkBuffer::I32(b) => b.len(),
            BulkBuffer::I64(b) => b.len(),
            BulkBuffer::U8(b) => b.len(),
            BulkBuffer::U16(b) => b.len(),
            BulkBuffer::U32(b) => b.len(),
            BulkBuffer::U64(b) => b.len(),
            BulkBuffer::F32(b) => b.len(),
            BulkBuffer::F64(b) => b.len(),
        }
    }

    /// Whether the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The storage as `&mut [T]`.
    ///
    /// # Errors
    /// `BufferMismatch` when `T` is not the buffer's element type.
    pub fn downcast<T: BulkElement>(self) -> Result<&'a mut [T], DynError> {
        let actual = self.element_type();
        T::from_buffer(self).ok_or(DynError::BufferMismatch {
            expected: T::element_type(),
            actual,
        })
    }
}

/// Scalar types that have a [`BulkBuffer`] variant.
pub trait BulkElement: Scalar + Sized {
    /// Tag `data` with its variant.
    fn wrap(data: &mut [Self]) -> BulkBuffer<'_>;

    /// Take the storage back out, if `buffer` is this type's variant.
    fn from_buffer(buffer: BulkBuffer<'_>) -> Option<&mut [Self]>;
}

macro_rules! impl_bulk_element {
    ($rust:ty, $variant:ident) => {
        impl BulkElement for $rust {
            fn wrap(data: &mut [Self]) -> BulkBuffer<'_> {
                BulkBuffer::$variant(data)
            }
            fn from_buffer(buffer: BulkBuffer<'_>) -> Option<&mut [Self]> {
                match buffer {
                    BulkBuffer::$variant(data) => Some(data),
                    _ => None,
                }
            }
        }

        impl<'a> From<&'a mut [$rust]> for BulkBuffer<'a> {
            fn from(data: &'a mut [$rust]) -> Self {
                BulkBuffer::$variant(data)
            }
        }
    };
}

impl_bulk_element!(i8, I8);
impl_bulk_element!(i16, I16);
impl_bulk_element!(i32, I32);
impl_bulk_element!(i64, I64);
impl_bulk_element!(u8, U8);
impl_bulk_element!(u16, U16);
impl_bulk_element!(u32, U32);
impl_bulk_element!(u64, U64);
impl_bulk_element!(f32, F32);
impl_bulk_element!(f64, F64);
