//! Export of finished heap arrays as Arrow arrays.

use std::sync::Arc;

use arrow_array::{
    ArrayRef, ArrowPrimitiveType, PrimitiveArray, StringArray,
    types::{
        Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
        UInt16Type, UInt32Type, UInt64Type,
    },
};
use arrow_schema::DataType;

use super::{HeapArray, Storage};
use crate::bridge::{ElementType, Scalar};

impl ElementType {
    /// Arrow `DataType` used when exporting arrays of this element type.
    ///
    /// Object arrays export as `Utf8`; the empty sentinel becomes null.
    pub fn arrow_data_type(self) -> DataType {
        match self {
            ElementType::Int8 => DataType::Int8,
            ElementType::Int16 => DataType::Int16,
            ElementType::Int32 => DataType::Int32,
            ElementType::Int64 => DataType::Int64,
            ElementType::UInt8 => DataType::UInt8,
            ElementType::UInt16 => DataType::UInt16,
            ElementType::UInt32 => DataType::UInt32,
            ElementType::UInt64 => DataType::UInt64,
            ElementType::Float32 => DataType::Float32,
            ElementType::Float64 => DataType::Float64,
            ElementType::Object => DataType::Utf8,
        }
    }
}

fn primitive<A>(array: &HeapArray) -> ArrayRef
where
    A: ArrowPrimitiveType,
    A::Native: Scalar,
{
    let values = array.values::<A::Native>().unwrap_or_default();
    Arc::new(PrimitiveArray::<A>::from_iter_values(values.iter().copied()))
}

impl HeapArray {
    /// Copy this array into an Arrow array of [`ElementType::arrow_data_type`].
    pub fn to_arrow(&self) -> ArrayRef {
        match self.element_type {
            ElementType::Int8 => primitive::<Int8Type>(self),
            ElementType::Int16 => primitive::<Int16Type>(self),
            ElementType::Int32 => primitive::<Int32Type>(self),
            ElementType::Int64 => primitive::<Int64Type>(self),
            ElementType::UInt8 => primitive::<UInt8Type>(self),
            ElementType::UInt16 => primitive::<UInt16Type>(self),
            ElementType::UInt32 => primitive::<UInt32Type>(self),
            ElementType::UInt64 => primitive::<UInt64Type>(self),
            ElementType::Float32 => primitive::<Float32Type>(self),
            ElementType::Float64 => primitive::<Float64Type>(self),
            ElementType::Object => {
                let texts: StringArray = match &self.storage {
                    Storage::Boxed(slots) => slots
                        .iter()
                        .map(|slot| slot.as_ref().and_then(|r| r.as_text()))
                        .collect(),
                    Storage::Bulk(_) => StringArray::new_null(self.len),
                };
                Arc::new(texts)
            }
        }
    }
}
